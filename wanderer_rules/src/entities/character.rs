//! Character definitions.

use serde::{Deserialize, Serialize};

use super::{EntityId, Position};
use crate::mechanics::{clamp_relationship, Activity, Archetype, Mood, TimeOfDay};

/// A non-player character the wanderer can talk to.
///
/// Identity fields are public. The relationship score, mood and interaction
/// counter are kept private so the clamp and the mood derivation always hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    pub archetype: Archetype,
    /// Static line spoken when no authored dialogue node applies.
    pub greeting: String,
    pub home: Position,

    relationship: i32,
    mood: Mood,
    interaction_count: u32,
}

impl Character {
    /// Create a new character with a neutral disposition.
    pub fn new(name: impl Into<String>, archetype: Archetype, greeting: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            archetype,
            greeting: greeting.into(),
            home: Position::default(),
            relationship: 0,
            mood: Mood::Neutral,
            interaction_count: 0,
        }
    }

    /// Set where the character stands on the map.
    pub fn with_home(mut self, home: Position) -> Self {
        self.home = home;
        self
    }

    pub fn relationship(&self) -> i32 {
        self.relationship
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    /// Number of times the player has started a conversation.
    pub fn interaction_count(&self) -> u32 {
        self.interaction_count
    }

    /// Conversations held before the current one.
    pub fn prior_encounters(&self) -> u32 {
        self.interaction_count.saturating_sub(1)
    }

    /// Count a new conversation and return the updated total.
    pub fn record_interaction(&mut self) -> u32 {
        self.interaction_count = self.interaction_count.saturating_add(1);
        self.interaction_count
    }

    /// Shift the relationship by `delta`, clamp it and re-derive the mood.
    ///
    /// Returns the new relationship score.
    pub fn adjust_relationship(&mut self, delta: i32) -> i32 {
        self.relationship = clamp_relationship(self.relationship.saturating_add(delta));
        self.mood = Mood::from_relationship(self.relationship);
        self.relationship
    }

    /// Override the mood without touching the relationship.
    pub fn drift_mood(&mut self, mood: Mood) {
        self.mood = mood;
    }

    /// What the character is doing at this time of day.
    pub fn activity(&self, time: TimeOfDay) -> Activity {
        Activity::scheduled_for(time)
    }
}
