//! Idle behaviour for villagers between conversations.

use serde::{Deserialize, Serialize};
use wanderer_rules::Mood;

use crate::random::RandomPort;

/// Walking speed of a strolling villager, in pixels per second.
pub const STROLL_SPEED: f32 = 50.0;

/// Small self-directed busywork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pastime {
    Idle,
    Thinking,
    Working,
}

impl Pastime {
    pub const ALL: [Pastime; 3] = [Pastime::Idle, Pastime::Thinking, Pastime::Working];
}

/// One roll of a villager's idle routine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IdleAction {
    /// Walk along a heading for a while, then stop.
    Stroll { heading_deg: i32, duration_ms: u32 },
    Halt,
    /// Mood changes without any relationship change.
    MoodShift(Mood),
    Busy(Pastime),
}

impl IdleAction {
    /// Walking velocity in pixels per second; zero unless strolling.
    pub fn velocity(&self) -> (f32, f32) {
        match self {
            IdleAction::Stroll { heading_deg, .. } => {
                let radians = (*heading_deg as f32).to_radians();
                (radians.cos() * STROLL_SPEED, radians.sin() * STROLL_SPEED)
            }
            _ => (0.0, 0.0),
        }
    }
}

/// Roll the next idle action. Each of the four kinds is equally likely.
pub fn roll_idle_action(random: &mut dyn RandomPort) -> IdleAction {
    match random.random_range(0, 3) {
        0 => IdleAction::Stroll {
            heading_deg: random.random_range(0, 360),
            duration_ms: random.random_range(1000, 3000).max(0) as u32,
        },
        1 => IdleAction::Halt,
        2 => IdleAction::MoodShift(Mood::ALL[random.pick(Mood::ALL.len())]),
        _ => IdleAction::Busy(Pastime::ALL[random.pick(Pastime::ALL.len())]),
    }
}
