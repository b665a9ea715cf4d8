//! Response effects and the single interpreter that applies them.

use serde::{Deserialize, Serialize};
use tracing::debug;
use wanderer_rules::{Character, Faction, Item, Quest, WorldState};

use crate::notice::Notice;
use crate::random::RandomPort;

/// Lines the mystic may foresee.
pub const FORTUNES: [&str; 5] = [
    "Вижу великую битву в твоём будущем...",
    "Звёзды говорят о встрече с важным союзником.",
    "Остерегайся предательства со стороны близких.",
    "Твой путь приведёт к древним сокровищам.",
    "Тёмные силы следят за тобой...",
];

const FORTUNE_DURATION_MS: u32 = 4000;

/// One state change caused by picking a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Shift the character's relationship; clamped, mood re-derived.
    AdjustRelationship(i32),
    SetFlag { key: String, value: bool },
    AddReputation { faction: Faction, delta: i32 },
    AddItem(Item),
    AddQuest(Quest),
    /// Restore mana, capped at the player's maximum.
    RestoreMp(i32),
    GrantExp(u32),
    Notify { text: String, duration_ms: u32 },
    /// Show a randomly chosen line from [`FORTUNES`].
    TellFortune,
    NoOp,
}

impl Effect {
    pub fn notify(text: impl Into<String>, duration_ms: u32) -> Self {
        Effect::Notify {
            text: text.into(),
            duration_ms,
        }
    }

    pub fn set_flag(key: impl Into<String>, value: bool) -> Self {
        Effect::SetFlag {
            key: key.into(),
            value,
        }
    }

    /// Apply the effect. Returns a notice when the effect has something to say.
    pub fn apply(
        &self,
        character: &mut Character,
        world: &mut WorldState,
        random: &mut dyn RandomPort,
    ) -> Option<Notice> {
        match self {
            Effect::AdjustRelationship(delta) => {
                let score = character.adjust_relationship(*delta);
                world.record_relationship(&character.name, score);
                debug!(
                    character = %character.name,
                    delta,
                    relationship = score,
                    mood = ?character.mood(),
                    "relationship changed"
                );
                None
            }
            Effect::SetFlag { key, value } => {
                world.set_flag(key.clone(), *value);
                None
            }
            Effect::AddReputation { faction, delta } => {
                let score = world.add_reputation(*faction, *delta);
                debug!(?faction, delta, reputation = score, "reputation changed");
                None
            }
            Effect::AddItem(item) => {
                world.add_item(item.clone());
                None
            }
            Effect::AddQuest(quest) => {
                if !world.add_quest(quest.clone()) {
                    debug!(quest = %quest.id, "quest already logged");
                }
                None
            }
            Effect::RestoreMp(amount) => {
                world.player.change_mp(*amount);
                None
            }
            Effect::GrantExp(amount) => {
                world.player.grant_exp(*amount);
                None
            }
            Effect::Notify { text, duration_ms } => Some(Notice::new(text.clone(), *duration_ms)),
            Effect::TellFortune => {
                let fortune = FORTUNES[random.pick(FORTUNES.len())];
                Some(Notice::new(
                    format!("Предсказание: {}", fortune),
                    FORTUNE_DURATION_MS,
                ))
            }
            Effect::NoOp => None,
        }
    }
}
