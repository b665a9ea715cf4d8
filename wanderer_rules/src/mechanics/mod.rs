//! Game mechanics: moods, archetypes, factions, the day cycle and weather.

use serde::{Deserialize, Serialize};

/// Lowest relationship score a character can hold toward the player.
pub const RELATIONSHIP_MIN: i32 = -100;

/// Highest relationship score a character can hold toward the player.
pub const RELATIONSHIP_MAX: i32 = 100;

/// Relationship above which a character becomes happy.
pub const HAPPY_THRESHOLD: i32 = 50;

/// Relationship below which a character becomes angry.
pub const ANGRY_THRESHOLD: i32 = -30;

/// Clamp a relationship score into `[RELATIONSHIP_MIN, RELATIONSHIP_MAX]`.
pub fn clamp_relationship(score: i32) -> i32 {
    score.clamp(RELATIONSHIP_MIN, RELATIONSHIP_MAX)
}

/// Fixed character categories. The archetype picks the dialogue tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Mystic,
    Merchant,
    Guardian,
    Rebel,
    Child,
    /// Characters without an authored tree; they only ever say their greeting.
    Commoner,
}

impl Archetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Mystic => "mystic",
            Archetype::Merchant => "merchant",
            Archetype::Guardian => "guardian",
            Archetype::Rebel => "rebel",
            Archetype::Child => "child",
            Archetype::Commoner => "commoner",
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A character's visible disposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    #[default]
    Neutral,
    Sad,
    Angry,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Neutral, Mood::Sad, Mood::Angry];

    /// Derive mood from a relationship score.
    ///
    /// Only happy, angry and neutral come out of this rule. `Sad` is reached
    /// through idle mood drift alone.
    pub fn from_relationship(score: i32) -> Self {
        if score > HAPPY_THRESHOLD {
            Mood::Happy
        } else if score < ANGRY_THRESHOLD {
            Mood::Angry
        } else {
            Mood::Neutral
        }
    }

    /// Indicator colour (0xRRGGBB) drawn above the character.
    pub fn indicator_color(&self) -> u32 {
        match self {
            Mood::Happy => 0x00ff00,
            Mood::Neutral => 0xffff00,
            Mood::Sad => 0x0000ff,
            Mood::Angry => 0xff0000,
        }
    }
}

/// Factions the player can earn reputation with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Guardians,
    Rebels,
    Merchants,
    Mystics,
}

impl Faction {
    pub const ALL: [Faction; 4] = [
        Faction::Guardians,
        Faction::Rebels,
        Faction::Merchants,
        Faction::Mystics,
    ];
}

/// Phases of the day. The cycle wraps from night back to morning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    #[default]
    Morning,
    Day,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const CYCLE: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Day,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    /// The phase that follows this one.
    pub fn next(&self) -> Self {
        match self {
            TimeOfDay::Morning => TimeOfDay::Day,
            TimeOfDay::Day => TimeOfDay::Evening,
            TimeOfDay::Evening => TimeOfDay::Night,
            TimeOfDay::Night => TimeOfDay::Morning,
        }
    }

    /// Darkness of the screen overlay for this phase (0.0 - 1.0).
    pub fn overlay_alpha(&self) -> f32 {
        match self {
            TimeOfDay::Morning | TimeOfDay::Day => 0.0,
            TimeOfDay::Evening => 0.3,
            TimeOfDay::Night => 0.6,
        }
    }

    /// Message shown when this phase begins.
    pub fn arrival_message(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Рассвет...",
            TimeOfDay::Day => "Солнце в зените.",
            TimeOfDay::Evening => "Наступает вечер...",
            TimeOfDay::Night => "Ночь окутывает мир...",
        }
    }
}

/// Weather conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Snow,
    Fog,
}

impl Weather {
    pub const ALL: [Weather; 4] = [Weather::Clear, Weather::Rain, Weather::Snow, Weather::Fog];

    /// Message shown when the weather turns to this condition.
    pub fn onset_message(&self) -> &'static str {
        match self {
            Weather::Clear => "Погода прояснилась.",
            Weather::Rain => "Начался дождь...",
            Weather::Snow => "Пошел снег...",
            Weather::Fog => "Туман окутывает землю...",
        }
    }
}

/// How a creature moves around the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    /// Continuous hops; the creature never rests.
    Fly,
    /// Short hops separated by pauses.
    Wander,
    /// Stays put and fades in and out.
    Hide,
}

/// What a character is doing according to their daily schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Work,
    Socialize,
    Relax,
    Sleep,
}

impl Activity {
    /// Scheduled activity for a phase of the day.
    pub fn scheduled_for(time: TimeOfDay) -> Self {
        match time {
            TimeOfDay::Morning => Activity::Work,
            TimeOfDay::Day => Activity::Socialize,
            TimeOfDay::Evening => Activity::Relax,
            TimeOfDay::Night => Activity::Sleep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_thresholds() {
        assert_eq!(Mood::from_relationship(51), Mood::Happy);
        assert_eq!(Mood::from_relationship(50), Mood::Neutral);
        assert_eq!(Mood::from_relationship(0), Mood::Neutral);
        assert_eq!(Mood::from_relationship(-30), Mood::Neutral);
        assert_eq!(Mood::from_relationship(-31), Mood::Angry);
    }

    #[test]
    fn test_mood_indicator_colors_are_distinct() {
        assert_eq!(Mood::Happy.indicator_color(), 0x00ff00);
        assert_eq!(Mood::Sad.indicator_color(), 0x0000ff);
        let mut colors: Vec<u32> = Mood::ALL.iter().map(|m| m.indicator_color()).collect();
        colors.sort_unstable();
        colors.dedup();
        assert_eq!(colors.len(), Mood::ALL.len());
    }

    #[test]
    fn test_relationship_clamp() {
        assert_eq!(clamp_relationship(250), RELATIONSHIP_MAX);
        assert_eq!(clamp_relationship(-101), RELATIONSHIP_MIN);
        assert_eq!(clamp_relationship(42), 42);
    }

    #[test]
    fn test_day_cycle_wraps() {
        let mut time = TimeOfDay::Morning;
        for _ in 0..4 {
            time = time.next();
        }
        assert_eq!(time, TimeOfDay::Morning);
        assert_eq!(TimeOfDay::Evening.next(), TimeOfDay::Night);
        assert_eq!(TimeOfDay::Night.next(), TimeOfDay::Morning);
    }

    #[test]
    fn test_night_is_darkest() {
        let darkest = TimeOfDay::CYCLE
            .iter()
            .max_by(|a, b| a.overlay_alpha().total_cmp(&b.overlay_alpha()));
        assert_eq!(darkest, Some(&TimeOfDay::Night));
    }

    #[test]
    fn test_schedule() {
        assert_eq!(Activity::scheduled_for(TimeOfDay::Morning), Activity::Work);
        assert_eq!(Activity::scheduled_for(TimeOfDay::Night), Activity::Sleep);
    }
}
