//! Declarative gates for dialogue nodes.

use serde::{Deserialize, Serialize};
use wanderer_rules::{Character, Faction, TimeOfDay, Weather, WorldState};

/// A numeric quantity a condition can compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    /// Conversations with this character before the current one.
    PriorEncounters,
    Relationship,
    Reputation(Faction),
    Gold,
    Hp,
    Mp,
    Exp,
}

impl Field {
    fn read(&self, character: &Character, world: &WorldState) -> i64 {
        match self {
            Field::PriorEncounters => i64::from(character.prior_encounters()),
            Field::Relationship => i64::from(character.relationship()),
            Field::Reputation(faction) => i64::from(world.reputation(*faction)),
            Field::Gold => i64::from(world.player.gold),
            Field::Hp => i64::from(world.player.hp()),
            Field::Mp => i64::from(world.player.mp()),
            Field::Exp => i64::from(world.player.exp),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    fn holds(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
        }
    }
}

/// Predicate over the world and the character being spoken to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Compare {
        field: Field,
        op: Comparison,
        value: i64,
    },
    /// True when the flag is set to `true`.
    Flag(String),
    TimeOfDay(TimeOfDay),
    Weather(Weather),
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn compare(field: Field, op: Comparison, value: i64) -> Self {
        Condition::Compare { field, op, value }
    }

    /// Only the very first conversation with the character.
    pub fn first_encounter() -> Self {
        Self::compare(Field::PriorEncounters, Comparison::Eq, 0)
    }

    /// Any conversation after the first.
    pub fn returning() -> Self {
        Self::compare(Field::PriorEncounters, Comparison::Gt, 0)
    }

    pub fn relationship_at_least(value: i32) -> Self {
        Self::compare(Field::Relationship, Comparison::Ge, i64::from(value))
    }

    pub fn relationship_below(value: i32) -> Self {
        Self::compare(Field::Relationship, Comparison::Lt, i64::from(value))
    }

    pub fn reputation_at_least(faction: Faction, value: i32) -> Self {
        Self::compare(Field::Reputation(faction), Comparison::Ge, i64::from(value))
    }

    pub fn reputation_above(faction: Faction, value: i32) -> Self {
        Self::compare(Field::Reputation(faction), Comparison::Gt, i64::from(value))
    }

    pub fn gold_above(value: u32) -> Self {
        Self::compare(Field::Gold, Comparison::Gt, i64::from(value))
    }

    pub fn flag(key: impl Into<String>) -> Self {
        Condition::Flag(key.into())
    }

    /// Conjunction with another condition.
    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::All(mut parts) => {
                parts.push(other);
                Condition::All(parts)
            }
            first => Condition::All(vec![first, other]),
        }
    }

    /// Evaluate against current state. Pure: reads only.
    pub fn evaluate(&self, character: &Character, world: &WorldState) -> bool {
        match self {
            Condition::Compare { field, op, value } => op.holds(field.read(character, world), *value),
            Condition::Flag(key) => world.flag(key),
            Condition::TimeOfDay(time) => world.time_of_day == *time,
            Condition::Weather(weather) => world.weather == *weather,
            Condition::All(parts) => parts.iter().all(|c| c.evaluate(character, world)),
            Condition::Any(parts) => parts.iter().any(|c| c.evaluate(character, world)),
            Condition::Not(inner) => !inner.evaluate(character, world),
        }
    }
}
