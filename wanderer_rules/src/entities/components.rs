//! Player stats and the records carried in the quest log and inventory.

use serde::{Deserialize, Serialize};

use crate::config::PlayerConfig;

/// The wanderer's bounded stats.
///
/// `hp` and `mp` never leave `[0, max]`; gold and experience never go negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub level: u32,
    hp: i32,
    max_hp: i32,
    mp: i32,
    max_mp: i32,
    pub exp: u32,
    pub gold: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::from_config(&PlayerConfig::default())
    }
}

impl PlayerStats {
    /// Starting stats for a new session.
    pub fn from_config(config: &PlayerConfig) -> Self {
        let max_hp = config.max_hp.max(1);
        let max_mp = config.max_mp.max(1);
        Self {
            name: config.name.clone(),
            level: 1,
            hp: config.starting_hp.clamp(0, max_hp),
            max_hp,
            mp: config.starting_mp.clamp(0, max_mp),
            max_mp,
            exp: 0,
            gold: 0,
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn mp(&self) -> i32 {
        self.mp
    }

    pub fn max_mp(&self) -> i32 {
        self.max_mp
    }

    /// Heal (positive) or wound (negative), clamped to `[0, max_hp]`.
    pub fn change_hp(&mut self, delta: i32) -> i32 {
        self.hp = self.hp.saturating_add(delta).clamp(0, self.max_hp);
        self.hp
    }

    /// Restore (positive) or drain (negative) mana, clamped to `[0, max_mp]`.
    pub fn change_mp(&mut self, delta: i32) -> i32 {
        self.mp = self.mp.saturating_add(delta).clamp(0, self.max_mp);
        self.mp
    }

    pub fn grant_exp(&mut self, amount: u32) -> u32 {
        self.exp = self.exp.saturating_add(amount);
        self.exp
    }

    pub fn add_gold(&mut self, amount: u32) -> u32 {
        self.gold = self.gold.saturating_add(amount);
        self.gold
    }

    /// Spend gold if the purse allows it.
    pub fn spend_gold(&mut self, amount: u32) -> bool {
        match self.gold.checked_sub(amount) {
            Some(rest) => {
                self.gold = rest;
                true
            }
            None => false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// An item in the wanderer's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// An entry in the quest log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub active: bool,
}

impl Quest {
    /// Create an active quest.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let stats = PlayerStats::default();
        assert_eq!(stats.hp(), 100);
        assert_eq!(stats.max_hp(), 100);
        assert_eq!(stats.mp(), 50);
        assert_eq!(stats.max_mp(), 50);
        assert_eq!(stats.level, 1);
        assert!(stats.is_alive());
    }

    #[test]
    fn test_hp_and_mp_are_bounded() {
        let mut stats = PlayerStats::default();
        assert_eq!(stats.change_mp(20), 50);
        assert_eq!(stats.change_mp(-80), 0);
        assert_eq!(stats.change_hp(-250), 0);
        assert!(!stats.is_alive());
        assert_eq!(stats.change_hp(i32::MAX), 100);
    }

    #[test]
    fn test_gold_never_goes_negative() {
        let mut stats = PlayerStats::default();
        stats.add_gold(30);
        assert!(!stats.spend_gold(31));
        assert_eq!(stats.gold, 30);
        assert!(stats.spend_gold(30));
        assert_eq!(stats.gold, 0);
    }

    #[test]
    fn test_starting_values_respect_maxima() {
        let config = PlayerConfig {
            starting_mp: 900,
            ..PlayerConfig::default()
        };
        let stats = PlayerStats::from_config(&config);
        assert_eq!(stats.mp(), stats.max_mp());
    }
}
