//! Creatures and harvestable resources.

use serde::{Deserialize, Serialize};

use super::{EntityId, Position};
use crate::mechanics::BehaviorKind;

/// Full energy; creatures respawn and eat back up to this.
pub const MAX_ENERGY: f32 = 100.0;

/// Static description of a creature species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Species {
    pub name: &'static str,
    pub color: u32,
    pub behavior: BehaviorKind,
}

/// Species populating the forest.
pub const SPECIES: [Species; 3] = [
    Species {
        name: "Светлячок",
        color: 0xffff00,
        behavior: BehaviorKind::Fly,
    },
    Species {
        name: "Лесной дух",
        color: 0x00ff00,
        behavior: BehaviorKind::Wander,
    },
    Species {
        name: "Тень",
        color: 0x4a0e4e,
        behavior: BehaviorKind::Hide,
    },
];

/// Static description of a resource node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceKind {
    pub name: &'static str,
    pub color: u32,
    pub value: u32,
}

/// Resource nodes scattered across the map.
pub const RESOURCE_KINDS: [ResourceKind; 3] = [
    ResourceKind {
        name: "Светящийся гриб",
        color: 0x00ffff,
        value: 10,
    },
    ResourceKind {
        name: "Магический кристалл",
        color: 0x9370db,
        value: 25,
    },
    ResourceKind {
        name: "Древняя руна",
        color: 0xffd700,
        value: 50,
    },
];

/// Where a creature is in its movement routine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Movement {
    /// Not moving and not planning to.
    Still,
    /// Waiting before the next hop.
    Pausing { remaining_ms: f32 },
    /// Moving from `from` to `to`; the logical position updates on arrival.
    Travelling {
        from: Position,
        to: Position,
        elapsed_ms: f32,
        duration_ms: f32,
    },
}

/// An autonomous creature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub id: EntityId,
    pub species: String,
    pub color: u32,
    pub behavior: BehaviorKind,
    /// Logical position used for feeding and proximity checks.
    pub position: Position,
    pub energy: f32,
    pub hunger: f32,
    pub movement: Movement,
}

impl Creature {
    /// Spawn a rested, fed creature of the given species.
    pub fn spawn(species: &Species, position: Position) -> Self {
        Self {
            id: EntityId::new(),
            species: species.name.to_string(),
            color: species.color,
            behavior: species.behavior,
            position,
            energy: MAX_ENERGY,
            hunger: 0.0,
            movement: Movement::Still,
        }
    }

    pub fn is_hungry(&self, threshold: f32) -> bool {
        self.hunger > threshold
    }

    pub fn is_exhausted(&self) -> bool {
        self.energy <= 0.0
    }

    /// Eating restores full energy and clears hunger.
    pub fn feed(&mut self) {
        self.hunger = 0.0;
        self.energy = MAX_ENERGY;
    }

    /// Reset in place at a new position. Identity is kept.
    pub fn respawn(&mut self, position: Position) {
        self.position = position;
        self.energy = MAX_ENERGY;
        self.hunger = 0.0;
        self.movement = Movement::Still;
    }

    /// Where the renderer should draw the creature right now.
    pub fn display_position(&self) -> Position {
        match self.movement {
            Movement::Travelling {
                from,
                to,
                elapsed_ms,
                duration_ms,
            } if duration_ms > 0.0 => from.lerp(to, elapsed_ms / duration_ms),
            _ => self.position,
        }
    }
}

/// A harvestable node. Never destroyed; collection just toggles it off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: EntityId,
    pub kind: String,
    pub color: u32,
    pub value: u32,
    pub position: Position,
    pub collected: bool,
}

impl Resource {
    pub fn spawn(kind: &ResourceKind, position: Position) -> Self {
        Self {
            id: EntityId::new(),
            kind: kind.name.to_string(),
            color: kind.color,
            value: kind.value,
            position,
            collected: false,
        }
    }

    pub fn is_available(&self) -> bool {
        !self.collected
    }

    /// Make a collected node available again at a new spot.
    pub fn regrow(&mut self, position: Position) {
        self.position = position;
        self.collected = false;
    }
}
