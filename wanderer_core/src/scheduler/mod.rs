//! World event scheduling - weather, the day cycle and random incidents.
//!
//! [`EventScheduler::maybe_fire`] is called with the current game clock.
//! Three independent cadences run alongside queued tasks. Everything that fell
//! due since the last call fires in time order:
//!
//! 1. **Weather**: roll a new weather; an unchanged roll is a silent no-op
//! 2. **Day phase**: advance the time of day one step around the cycle
//! 3. **Incident**: pick one [`RandomEvent`] and apply it
//!
//! Staggered visuals and timed reversals are queued on a [`TaskQueue`] and run
//! once the clock reaches them.

mod queue;

pub use queue::*;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wanderer_rules::{Position, SchedulerConfig, TimeOfDay, Weather, WorldState};

use crate::notice::{Notice, WorldCue};
use crate::random::RandomPort;

const STATE_CHANGE_NOTICE_MS: u32 = 2000;
const INCIDENT_NOTICE_MS: u32 = 4000;
/// Vortices and migrating flocks keep this far from the map edge.
const EDGE_MARGIN: f32 = 200.0;
const FLOCK_SPREAD: f32 = 50.0;
const NORMAL_TIME_SCALE: f32 = 1.0;

/// The catalog of random world incidents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomEvent {
    MeteorShower,
    MagicAnomaly,
    CreatureMigration,
    TimeDistortion,
}

impl RandomEvent {
    pub const ALL: [RandomEvent; 4] = [
        RandomEvent::MeteorShower,
        RandomEvent::MagicAnomaly,
        RandomEvent::CreatureMigration,
        RandomEvent::TimeDistortion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RandomEvent::MeteorShower => "Метеоритный дождь",
            RandomEvent::MagicAnomaly => "Магическая аномалия",
            RandomEvent::CreatureMigration => "Миграция существ",
            RandomEvent::TimeDistortion => "Временной разлом",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RandomEvent::MeteorShower => "С неба падают метеориты!",
            RandomEvent::MagicAnomaly => "Магия в воздухе сгущается...",
            RandomEvent::CreatureMigration => "Стая существ пролетает мимо.",
            RandomEvent::TimeDistortion => "Время течет странно...",
        }
    }

    /// Banner text announcing the incident.
    pub fn announcement(&self) -> String {
        format!("⚠️ {}: {}", self.name(), self.description())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEventKind {
    WeatherChanged(Weather),
    DayPhase(TimeOfDay),
    Incident(RandomEvent),
}

/// An entry in the world event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldEvent {
    pub kind: WorldEventKind,
    /// Game clock time the event was due at.
    pub at_ms: u64,
}

/// Deferred work queued by an incident.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduledAction {
    MeteorStrike,
    /// One bird of a flock crossing near `base_y`.
    MigrantFlyby { base_y: f32 },
    RestoreTimeScale,
}

/// Which source fires next during catch-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Due {
    Weather,
    DayPhase,
    Incident,
    Task,
}

/// Everything one call to [`EventScheduler::maybe_fire`] produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FireReport {
    pub events: Vec<WorldEvent>,
    pub notices: Vec<Notice>,
    pub cues: Vec<WorldCue>,
}

impl FireReport {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.notices.is_empty() && self.cues.is_empty()
    }
}

/// Owns the world's periodic and delayed events.
#[derive(Debug, Clone)]
pub struct EventScheduler {
    config: SchedulerConfig,
    world_width: f32,
    world_height: f32,
    next_weather_at: u64,
    next_day_at: u64,
    next_event_at: u64,
    log: Vec<WorldEvent>,
    tasks: TaskQueue<ScheduledAction>,
    time_scale: f32,
    pending_restore: Option<TaskId>,
}

impl EventScheduler {
    /// Scheduler whose first firings fall one interval after `start_ms`.
    pub fn new(config: SchedulerConfig, start_ms: u64) -> Self {
        Self {
            next_weather_at: start_ms + config.weather_interval_ms,
            next_day_at: start_ms + config.day_cycle_interval_ms,
            next_event_at: start_ms + config.event_interval_ms,
            config,
            world_width: 2000.0,
            world_height: 2000.0,
            log: Vec::new(),
            tasks: TaskQueue::new(),
            time_scale: NORMAL_TIME_SCALE,
            pending_restore: None,
        }
    }

    /// Map size used to place incident visuals.
    pub fn with_world_size(mut self, width: f32, height: f32) -> Self {
        self.world_width = width;
        self.world_height = height;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn log(&self) -> &[WorldEvent] {
        &self.log
    }

    /// Multiplier applied to simulation time; below 1.0 during a time distortion.
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Fire everything due at `now_ms`.
    pub fn maybe_fire(
        &mut self,
        now_ms: u64,
        world: &mut WorldState,
        random: &mut dyn RandomPort,
    ) -> FireReport {
        let mut report = FireReport::default();

        while let Some((at, due)) = self.next_due(now_ms) {
            match due {
                Due::Weather => {
                    self.next_weather_at += self.config.weather_interval_ms.max(1);
                    self.roll_weather(at, world, random, &mut report);
                }
                Due::DayPhase => {
                    self.next_day_at += self.config.day_cycle_interval_ms.max(1);
                    self.advance_day(at, world, &mut report);
                }
                Due::Incident => {
                    self.next_event_at += self.config.event_interval_ms.max(1);
                    let event = RandomEvent::ALL[random.pick(RandomEvent::ALL.len())];
                    self.trigger(event, at, world, random, &mut report);
                }
                Due::Task => {
                    if let Some((id, action)) = self.tasks.pop_due(now_ms) {
                        self.run_task(id, action, random, &mut report);
                    }
                }
            }
        }

        report
    }

    /// Apply a specific incident right away.
    pub fn trigger(
        &mut self,
        event: RandomEvent,
        at_ms: u64,
        world: &mut WorldState,
        random: &mut dyn RandomPort,
        report: &mut FireReport,
    ) {
        info!(event = ?event, at_ms, "world event");
        report
            .notices
            .push(Notice::new(event.announcement(), INCIDENT_NOTICE_MS));

        match event {
            RandomEvent::MeteorShower => {
                for i in 0..u64::from(self.config.meteor_count) {
                    self.tasks.schedule(
                        at_ms + i * self.config.meteor_stagger_ms,
                        ScheduledAction::MeteorStrike,
                    );
                }
            }
            RandomEvent::MagicAnomaly => {
                for _ in 0..self.config.anomaly_vortices {
                    let at = Position::new(
                        random.random_between(EDGE_MARGIN, self.world_width - EDGE_MARGIN),
                        random.random_between(EDGE_MARGIN, self.world_height - EDGE_MARGIN),
                    );
                    report.cues.push(WorldCue::Vortex { at });
                }
                let mp = world.player.change_mp(self.config.anomaly_mp_restore);
                debug!(mp, "magic anomaly restored mana");
            }
            RandomEvent::CreatureMigration => {
                let base_y =
                    random.random_between(EDGE_MARGIN, self.world_height - EDGE_MARGIN);
                for i in 0..u64::from(self.config.migration_flock_size) {
                    self.tasks.schedule(
                        at_ms + i * self.config.migration_stagger_ms,
                        ScheduledAction::MigrantFlyby { base_y },
                    );
                }
            }
            RandomEvent::TimeDistortion => {
                // A second distortion extends the first rather than stacking.
                if let Some(previous) = self.pending_restore.take() {
                    self.tasks.cancel(previous);
                }
                self.time_scale = self.config.distortion_time_scale;
                self.pending_restore = Some(self.tasks.schedule(
                    at_ms + self.config.distortion_duration_ms,
                    ScheduledAction::RestoreTimeScale,
                ));
                report.cues.push(WorldCue::TimeScaleChanged {
                    scale: self.time_scale,
                });
            }
        }

        self.record(WorldEventKind::Incident(event), at_ms, report);
    }

    /// Drop every pending task without running it. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        self.pending_restore = None;
        self.tasks.clear()
    }

    /// Earliest firing due at or before `now_ms`. Ties go to weather, then the
    /// day phase, then incidents, then queued tasks.
    fn next_due(&self, now_ms: u64) -> Option<(u64, Due)> {
        [
            Some((self.next_weather_at, Due::Weather)),
            Some((self.next_day_at, Due::DayPhase)),
            Some((self.next_event_at, Due::Incident)),
            self.tasks.next_due().map(|at| (at, Due::Task)),
        ]
        .into_iter()
        .flatten()
        .filter(|(at, _)| *at <= now_ms)
        .min_by_key(|(at, _)| *at)
    }

    fn roll_weather(
        &mut self,
        at_ms: u64,
        world: &mut WorldState,
        random: &mut dyn RandomPort,
        report: &mut FireReport,
    ) {
        let weather = Weather::ALL[random.pick(Weather::ALL.len())];
        if weather == world.weather {
            debug!(?weather, "weather unchanged");
            return;
        }
        world.weather = weather;
        info!(?weather, at_ms, "weather changed");
        report.notices.push(Notice::new(
            weather.onset_message(),
            STATE_CHANGE_NOTICE_MS,
        ));
        report.cues.push(WorldCue::WeatherChanged(weather));
        self.record(WorldEventKind::WeatherChanged(weather), at_ms, report);
    }

    fn advance_day(&mut self, at_ms: u64, world: &mut WorldState, report: &mut FireReport) {
        let time_of_day = world.advance_time_of_day();
        info!(?time_of_day, at_ms, "day phase advanced");
        report.notices.push(Notice::new(
            time_of_day.arrival_message(),
            STATE_CHANGE_NOTICE_MS,
        ));
        report.cues.push(WorldCue::DayPhaseChanged {
            time_of_day,
            overlay_alpha: time_of_day.overlay_alpha(),
        });
        self.record(WorldEventKind::DayPhase(time_of_day), at_ms, report);
    }

    fn run_task(
        &mut self,
        id: TaskId,
        action: ScheduledAction,
        random: &mut dyn RandomPort,
        report: &mut FireReport,
    ) {
        match action {
            ScheduledAction::MeteorStrike => {
                let x = random.random_between(0.0, self.world_width);
                report.cues.push(WorldCue::MeteorStrike { x });
            }
            ScheduledAction::MigrantFlyby { base_y } => {
                let y = base_y + random.random_between(-FLOCK_SPREAD, FLOCK_SPREAD);
                report.cues.push(WorldCue::MigrantFlyby { y });
            }
            ScheduledAction::RestoreTimeScale => {
                if self.pending_restore == Some(id) {
                    self.pending_restore = None;
                }
                self.time_scale = NORMAL_TIME_SCALE;
                debug!("time scale restored");
                report.cues.push(WorldCue::TimeScaleChanged {
                    scale: self.time_scale,
                });
            }
        }
    }

    fn record(&mut self, kind: WorldEventKind, at_ms: u64, report: &mut FireReport) {
        let event = WorldEvent { kind, at_ms };
        self.log.push(event);
        report.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedRandom, SeededRandom};

    /// Only the incident cadence fires within the first hour.
    fn incidents_only() -> SchedulerConfig {
        SchedulerConfig {
            weather_interval_ms: 3_600_000,
            day_cycle_interval_ms: 3_600_000,
            ..SchedulerConfig::default()
        }
    }

    #[test]
    fn test_same_weather_roll_is_silent() {
        let mut scheduler = EventScheduler::new(SchedulerConfig::default(), 0);
        let mut world = WorldState::default();
        let mut rng = FixedRandom::new(vec![0]);

        let report = scheduler.maybe_fire(30_000, &mut world, &mut rng);

        assert_eq!(world.weather, Weather::Clear);
        assert!(report.is_empty());
        assert!(scheduler.log().is_empty());
    }

    #[test]
    fn test_weather_change_notifies() {
        let config = SchedulerConfig {
            event_interval_ms: 3_600_000,
            ..SchedulerConfig::default()
        };
        let mut scheduler = EventScheduler::new(config, 0);
        let mut world = WorldState::default();
        let mut rng = FixedRandom::new(vec![1]);

        let report = scheduler.maybe_fire(30_000, &mut world, &mut rng);

        assert_eq!(world.weather, Weather::Rain);
        assert_eq!(report.notices, vec![Notice::new("Начался дождь...", 2000)]);
        assert_eq!(report.cues, vec![WorldCue::WeatherChanged(Weather::Rain)]);
        assert_eq!(
            scheduler.log(),
            &[WorldEvent {
                kind: WorldEventKind::WeatherChanged(Weather::Rain),
                at_ms: 30_000
            }]
        );

        // Rolling rain again changes nothing.
        let report = scheduler.maybe_fire(60_000, &mut world, &mut rng);
        assert!(report.events.is_empty());
        assert_eq!(scheduler.log().len(), 1);
    }

    #[test]
    fn test_nothing_fires_early() {
        let mut scheduler = EventScheduler::new(SchedulerConfig::default(), 1_000);
        let mut world = WorldState::default();
        let mut rng = FixedRandom::new(vec![1]);

        assert!(scheduler.maybe_fire(30_999, &mut world, &mut rng).is_empty());
        assert_eq!(world.weather, Weather::Clear);
    }

    #[test]
    fn test_day_cycle_catches_up_and_wraps() {
        let config = SchedulerConfig {
            weather_interval_ms: 3_600_000,
            event_interval_ms: 3_600_000,
            ..SchedulerConfig::default()
        };
        let mut scheduler = EventScheduler::new(config, 0);
        let mut world = WorldState::default();
        let mut rng = FixedRandom::new(vec![0]);

        let report = scheduler.maybe_fire(480_000, &mut world, &mut rng);

        assert_eq!(world.time_of_day, TimeOfDay::Morning);
        assert_eq!(report.events.len(), 4);
        assert_eq!(
            report.cues[2],
            WorldCue::DayPhaseChanged {
                time_of_day: TimeOfDay::Night,
                overlay_alpha: 0.6
            }
        );
        assert_eq!(report.notices[3].text, "Рассвет...");
    }

    #[test]
    fn test_meteor_shower_is_staggered() {
        let mut scheduler = EventScheduler::new(incidents_only(), 0);
        let mut world = WorldState::default();
        let mut rng = FixedRandom::new(vec![0]);

        let report = scheduler.maybe_fire(45_000, &mut world, &mut rng);
        assert_eq!(
            report.notices,
            vec![Notice::new("⚠️ Метеоритный дождь: С неба падают метеориты!", 4000)]
        );
        assert_eq!(report.cues, vec![WorldCue::MeteorStrike { x: 0.0 }]);
        assert_eq!(scheduler.pending_tasks(), 9);

        let report = scheduler.maybe_fire(46_000, &mut world, &mut rng);
        assert_eq!(report.cues.len(), 2);

        let report = scheduler.maybe_fire(49_500, &mut world, &mut rng);
        assert_eq!(report.cues.len(), 7);
        assert_eq!(scheduler.pending_tasks(), 0);
        assert_eq!(scheduler.log().len(), 1);
    }

    #[test]
    fn test_magic_anomaly_restores_bounded_mana() {
        let mut scheduler = EventScheduler::new(incidents_only(), 0);
        let mut world = WorldState::default();
        let mut rng = FixedRandom::new(vec![1]);
        world.player.change_mp(-40);

        let report = scheduler.maybe_fire(45_000, &mut world, &mut rng);

        assert_eq!(world.player.mp(), 30);
        let vortices = report
            .cues
            .iter()
            .filter(|c| matches!(c, WorldCue::Vortex { .. }))
            .count();
        assert_eq!(vortices, 5);

        scheduler.maybe_fire(90_000, &mut world, &mut rng);
        scheduler.maybe_fire(135_000, &mut world, &mut rng);
        assert_eq!(world.player.mp(), world.player.max_mp());
    }

    #[test]
    fn test_migration_flock() {
        let mut scheduler = EventScheduler::new(incidents_only(), 0);
        let mut world = WorldState::default();
        let mut rng = FixedRandom::new(vec![2]);

        scheduler.maybe_fire(45_000, &mut world, &mut rng);
        let report = scheduler.maybe_fire(45_000 + 14 * 200, &mut world, &mut rng);

        assert_eq!(report.cues.len(), 14);
        assert!(report
            .cues
            .iter()
            .all(|c| matches!(c, WorldCue::MigrantFlyby { .. })));
    }

    #[test]
    fn test_time_distortion_restores() {
        let mut scheduler = EventScheduler::new(incidents_only(), 0);
        let mut world = WorldState::default();
        let mut rng = FixedRandom::new(vec![3]);

        scheduler.maybe_fire(45_000, &mut world, &mut rng);
        assert_eq!(scheduler.time_scale(), 0.5);

        scheduler.maybe_fire(56_999, &mut world, &mut rng);
        assert_eq!(scheduler.time_scale(), 0.5);

        let report = scheduler.maybe_fire(57_000, &mut world, &mut rng);
        assert_eq!(scheduler.time_scale(), 1.0);
        assert_eq!(report.cues, vec![WorldCue::TimeScaleChanged { scale: 1.0 }]);
    }

    #[test]
    fn test_repeated_distortion_extends_instead_of_stacking() {
        let config = SchedulerConfig {
            event_interval_ms: 10_000,
            ..incidents_only()
        };
        let mut scheduler = EventScheduler::new(config, 0);
        let mut world = WorldState::default();
        let mut rng = FixedRandom::new(vec![3]);

        scheduler.maybe_fire(10_000, &mut world, &mut rng);
        scheduler.maybe_fire(20_000, &mut world, &mut rng);
        assert_eq!(scheduler.pending_tasks(), 1);

        scheduler.maybe_fire(25_000, &mut world, &mut rng);
        assert_eq!(scheduler.time_scale(), 0.5);
        assert_eq!(scheduler.pending_tasks(), 1);
    }

    #[test]
    fn test_cancel_all_discards_pending() {
        let mut scheduler = EventScheduler::new(incidents_only(), 0);
        let mut world = WorldState::default();
        let mut rng = FixedRandom::new(vec![0]);

        scheduler.maybe_fire(45_000, &mut world, &mut rng);
        assert_eq!(scheduler.cancel_all(), 9);

        let report = scheduler.maybe_fire(50_000, &mut world, &mut rng);
        assert!(report.cues.is_empty());
    }

    #[test]
    fn test_catch_up_fires_in_time_order() {
        let mut scheduler = EventScheduler::new(SchedulerConfig::default(), 0);
        let mut world = WorldState::default();
        let mut rng = SeededRandom::new(21);

        let report = scheduler.maybe_fire(300_000, &mut world, &mut rng);

        assert_eq!(report.events, scheduler.log());
        assert!(report.events.windows(2).all(|pair| pair[0].at_ms <= pair[1].at_ms));
        let incidents: Vec<u64> = report
            .events
            .iter()
            .filter(|e| matches!(e.kind, WorldEventKind::Incident(_)))
            .map(|e| e.at_ms)
            .collect();
        assert_eq!(incidents, vec![45_000, 90_000, 135_000, 180_000, 225_000, 270_000]);
    }

    #[test]
    fn test_catch_up_runs_restores_between_distortions() {
        let mut scheduler = EventScheduler::new(incidents_only(), 0);
        let mut world = WorldState::default();
        let mut rng = FixedRandom::new(vec![3]);

        let report = scheduler.maybe_fire(100_000, &mut world, &mut rng);

        assert_eq!(
            report.cues,
            vec![
                WorldCue::TimeScaleChanged { scale: 0.5 },
                WorldCue::TimeScaleChanged { scale: 1.0 },
                WorldCue::TimeScaleChanged { scale: 0.5 },
            ]
        );
        assert_eq!(scheduler.time_scale(), 0.5);
        assert_eq!(scheduler.pending_tasks(), 1);
    }
}
