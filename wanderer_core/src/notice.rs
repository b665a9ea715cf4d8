//! Outputs handed to the presentation layer.

use serde::{Deserialize, Serialize};
use wanderer_rules::{EntityId, Position, TimeOfDay, Weather};

use crate::routine::IdleAction;

/// A message banner to show the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub text: String,
    /// How long the banner stays fully visible.
    pub duration_ms: u32,
}

impl Notice {
    pub fn new(text: impl Into<String>, duration_ms: u32) -> Self {
        Self {
            text: text.into(),
            duration_ms,
        }
    }
}

/// A visual effect the renderer should play. Cues carry no game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldCue {
    WeatherChanged(Weather),
    DayPhaseChanged {
        time_of_day: TimeOfDay,
        overlay_alpha: f32,
    },
    MeteorStrike {
        x: f32,
    },
    Vortex {
        at: Position,
    },
    MigrantFlyby {
        y: f32,
    },
    TimeScaleChanged {
        scale: f32,
    },
    CharacterIdle {
        character: EntityId,
        action: IdleAction,
    },
}
