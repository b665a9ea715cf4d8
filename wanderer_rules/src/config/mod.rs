//! Tuning configuration.
//!
//! Every value has a default matching the shipped game, so an empty TOML
//! document is a valid configuration:
//!
//! ```toml
//! [ecosystem]
//! creature_count = 40
//! regeneration_chance = 0.005
//!
//! [scheduler]
//! weather_interval_ms = 15000
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RealmConfig {
    pub player: PlayerConfig,
    pub ecosystem: EcosystemConfig,
    pub scheduler: SchedulerConfig,
    pub npc: NpcConfig,
}

impl RealmConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RealmConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.player;
        if p.max_hp <= 0 {
            return Err(invalid("player.max_hp", "must be positive"));
        }
        if p.max_mp <= 0 {
            return Err(invalid("player.max_mp", "must be positive"));
        }

        let e = &self.ecosystem;
        if e.world_width <= 0.0 || e.world_height <= 0.0 {
            return Err(invalid("ecosystem.world_width/world_height", "must be positive"));
        }
        for (field, rate) in [
            ("ecosystem.energy_decay_per_ms", e.energy_decay_per_ms),
            ("ecosystem.hunger_growth_per_ms", e.hunger_growth_per_ms),
            ("ecosystem.consumption_radius", e.consumption_radius),
            ("ecosystem.interaction_radius", e.interaction_radius),
        ] {
            if rate.is_nan() || rate < 0.0 {
                return Err(invalid(field, format!("must be non-negative, got {rate}")));
            }
        }
        if !(0.0..=1.0).contains(&e.regeneration_chance) {
            return Err(invalid(
                "ecosystem.regeneration_chance",
                format!("must be within [0, 1], got {}", e.regeneration_chance),
            ));
        }
        if e.wander_pause_min_ms > e.wander_pause_max_ms {
            return Err(invalid(
                "ecosystem.wander_pause_min_ms",
                "must not exceed wander_pause_max_ms",
            ));
        }

        let s = &self.scheduler;
        for (field, interval) in [
            ("scheduler.event_interval_ms", s.event_interval_ms),
            ("scheduler.weather_interval_ms", s.weather_interval_ms),
            ("scheduler.day_cycle_interval_ms", s.day_cycle_interval_ms),
        ] {
            if interval == 0 {
                return Err(invalid(field, "must be greater than zero"));
            }
        }
        if s.distortion_time_scale.is_nan() || s.distortion_time_scale <= 0.0 {
            return Err(invalid("scheduler.distortion_time_scale", "must be positive"));
        }

        if self.npc.idle_interval_ms == 0 {
            return Err(invalid("npc.idle_interval_ms", "must be greater than zero"));
        }
        Ok(())
    }
}

/// Starting stats of the wanderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub name: String,
    pub max_hp: i32,
    pub max_mp: i32,
    pub starting_hp: i32,
    pub starting_mp: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: "Странник".to_string(),
            max_hp: 100,
            max_mp: 50,
            starting_hp: 100,
            starting_mp: 50,
        }
    }
}

/// Creature and resource tuning. Rates are per millisecond of game time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcosystemConfig {
    pub world_width: f32,
    pub world_height: f32,
    pub creature_count: usize,
    pub resource_count: usize,
    pub energy_decay_per_ms: f32,
    pub hunger_growth_per_ms: f32,
    /// Creatures start looking for food above this hunger.
    pub hunger_threshold: f32,
    pub consumption_radius: f32,
    /// Creatures closer than this share energy.
    pub interaction_radius: f32,
    /// Chance per tick that a collected resource grows back.
    pub regeneration_chance: f64,
    pub fly_range: f32,
    pub fly_duration_ms: f32,
    pub wander_range: f32,
    pub wander_duration_ms: f32,
    pub wander_pause_min_ms: f32,
    pub wander_pause_max_ms: f32,
}

impl Default for EcosystemConfig {
    fn default() -> Self {
        Self {
            world_width: 2000.0,
            world_height: 2000.0,
            creature_count: 20,
            resource_count: 30,
            energy_decay_per_ms: 0.001,
            hunger_growth_per_ms: 0.002,
            hunger_threshold: 50.0,
            consumption_radius: 20.0,
            interaction_radius: 30.0,
            regeneration_chance: 1.0 / 1001.0,
            fly_range: 200.0,
            fly_duration_ms: 3000.0,
            wander_range: 100.0,
            wander_duration_ms: 2000.0,
            wander_pause_min_ms: 2000.0,
            wander_pause_max_ms: 5000.0,
        }
    }
}

/// Cadences and magnitudes of world events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub event_interval_ms: u64,
    pub weather_interval_ms: u64,
    pub day_cycle_interval_ms: u64,
    pub anomaly_mp_restore: i32,
    pub anomaly_vortices: u32,
    pub distortion_time_scale: f32,
    pub distortion_duration_ms: u64,
    pub meteor_count: u32,
    pub meteor_stagger_ms: u64,
    pub migration_flock_size: u32,
    pub migration_stagger_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            event_interval_ms: 45_000,
            weather_interval_ms: 30_000,
            day_cycle_interval_ms: 120_000,
            anomaly_mp_restore: 20,
            anomaly_vortices: 5,
            distortion_time_scale: 0.5,
            distortion_duration_ms: 12_000,
            meteor_count: 10,
            meteor_stagger_ms: 500,
            migration_flock_size: 15,
            migration_stagger_ms: 200,
        }
    }
}

/// Non-player character behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    pub idle_interval_ms: u64,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            idle_interval_ms: 3_000,
        }
    }
}
