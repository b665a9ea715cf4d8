//! World state management - the shared record both simulation engines mutate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::PlayerConfig;
use crate::entities::{Item, PlayerStats, Quest};
use crate::mechanics::{Faction, TimeOfDay, Weather};

/// The complete shared state of a play session.
///
/// One instance lives for the whole session and is handed by reference to
/// every engine operation. Each operation takes `&mut WorldState` for its full
/// duration, so no reader observes a half-applied mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub player: PlayerStats,

    /// Faction -> reputation score.
    pub reputation: HashMap<Faction, i32>,

    /// Open-ended story flags.
    pub flags: HashMap<String, bool>,

    /// Character name -> relationship score, mirrored from each character.
    pub relationships: HashMap<String, i32>,

    pub time_of_day: TimeOfDay,
    pub weather: Weather,

    pub quests: Vec<Quest>,
    pub inventory: Vec<Item>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new(&PlayerConfig::default())
    }
}

impl WorldState {
    /// Fresh state at session start: morning, clear skies, neutral factions.
    pub fn new(player: &PlayerConfig) -> Self {
        Self {
            player: PlayerStats::from_config(player),
            reputation: Faction::ALL.iter().map(|f| (*f, 0)).collect(),
            flags: HashMap::new(),
            relationships: HashMap::new(),
            time_of_day: TimeOfDay::Morning,
            weather: Weather::Clear,
            quests: Vec::new(),
            inventory: Vec::new(),
        }
    }

    pub fn reputation(&self, faction: Faction) -> i32 {
        self.reputation.get(&faction).copied().unwrap_or(0)
    }

    pub fn add_reputation(&mut self, faction: Faction, delta: i32) -> i32 {
        let score = self.reputation.entry(faction).or_insert(0);
        *score = score.saturating_add(delta);
        *score
    }

    /// Unset flags read as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    pub fn set_flag(&mut self, key: impl Into<String>, value: bool) {
        self.flags.insert(key.into(), value);
    }

    pub fn record_relationship(&mut self, character: &str, score: i32) {
        self.relationships.insert(character.to_string(), score);
    }

    pub fn relationship_with(&self, character: &str) -> Option<i32> {
        self.relationships.get(character).copied()
    }

    /// Move to the next phase of the day and return it.
    pub fn advance_time_of_day(&mut self) -> TimeOfDay {
        self.time_of_day = self.time_of_day.next();
        self.time_of_day
    }

    pub fn has_quest(&self, quest_id: &str) -> bool {
        self.quests.iter().any(|q| q.id == quest_id)
    }

    /// Append a quest unless one with the same id is already logged.
    pub fn add_quest(&mut self, quest: Quest) -> bool {
        if self.has_quest(&quest.id) {
            return false;
        }
        self.quests.push(quest);
        true
    }

    pub fn add_item(&mut self, item: Item) {
        self.inventory.push(item);
    }

    pub fn has_item(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|i| i.id == item_id)
    }

    /// Read-only view for the HUD.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            player_name: self.player.name.clone(),
            level: self.player.level,
            hp: self.player.hp(),
            max_hp: self.player.max_hp(),
            mp: self.player.mp(),
            max_mp: self.player.max_mp(),
            exp: self.player.exp,
            gold: self.player.gold,
            time_of_day: self.time_of_day,
            weather: self.weather,
            overlay_alpha: self.time_of_day.overlay_alpha(),
            active_quests: self.quests.iter().filter(|q| q.active).count(),
            inventory_size: self.inventory.len(),
        }
    }
}

/// What the HUD displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub player_name: String,
    pub level: u32,
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub exp: u32,
    pub gold: u32,
    pub time_of_day: TimeOfDay,
    pub weather: Weather,
    pub overlay_alpha: f32,
    pub active_quests: usize,
    pub inventory_size: usize,
}

impl WorldSnapshot {
    /// Encode for a HUD living outside the process (e.g. a web overlay).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_defaults() {
        let state = WorldState::default();
        assert_eq!(state.time_of_day, TimeOfDay::Morning);
        assert_eq!(state.weather, Weather::Clear);
        assert_eq!(state.reputation(Faction::Guardians), 0);
        assert_eq!(state.reputation.len(), 4);
        assert!(!state.flag("foundCat"));
    }

    #[test]
    fn test_time_of_day_cycle() {
        let mut state = WorldState::default();
        assert_eq!(state.advance_time_of_day(), TimeOfDay::Day);
        assert_eq!(state.advance_time_of_day(), TimeOfDay::Evening);
        assert_eq!(state.advance_time_of_day(), TimeOfDay::Night);
        assert_eq!(state.advance_time_of_day(), TimeOfDay::Morning);
    }

    #[test]
    fn test_flags_and_reputation() {
        let mut state = WorldState::default();
        state.set_flag("foundCat", true);
        assert!(state.flag("foundCat"));

        assert_eq!(state.add_reputation(Faction::Rebels, 35), 35);
        assert_eq!(state.add_reputation(Faction::Rebels, -5), 30);
    }

    #[test]
    fn test_duplicate_quest_is_ignored() {
        let mut state = WorldState::default();
        assert!(state.add_quest(Quest::new("find_cat", "Найти кота", "")));
        assert!(!state.add_quest(Quest::new("find_cat", "Найти кота", "")));
        assert_eq!(state.quests.len(), 1);
    }

    #[test]
    fn test_snapshot_json() {
        let mut state = WorldState::default();
        state.time_of_day = TimeOfDay::Night;
        state.player.add_gold(12);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.gold, 12);
        assert!((snapshot.overlay_alpha - 0.6).abs() < 1e-6);

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"time_of_day\":\"night\""));
        let back: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
