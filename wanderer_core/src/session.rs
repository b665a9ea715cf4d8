//! A play session: the shared world plus every engine that mutates it.
//!
//! The session is the explicit context object for one run of the game. It is
//! created when the world loads and consumed by [`GameSession::end`], which
//! discards all pending scheduled work.

use tracing::{debug, info};
use wanderer_rules::{Activity, Character, EntityId, RealmConfig, WorldSnapshot, WorldState};

use crate::dialogue::{
    response_index_for_key, village_roster, RelationshipEngine, ResolvedDialogue, ResponseOutcome,
};
use crate::ecosystem::{EcosystemSimulation, EcosystemSummary, StepReport};
use crate::error::SessionError;
use crate::notice::{Notice, WorldCue};
use crate::random::{RandomPort, SeededRandom};
use crate::routine::{roll_idle_action, IdleAction};
use crate::scheduler::{EventScheduler, WorldEvent};

pub struct GameSession {
    config: RealmConfig,
    world: WorldState,
    engines: Vec<RelationshipEngine>,
    ecosystem: EcosystemSimulation,
    scheduler: EventScheduler,
    random: Box<dyn RandomPort>,
    /// Game clock driving the scheduler.
    clock_ms: f64,
    /// Scaled time since the villagers last rolled an idle action.
    idle_elapsed_ms: f32,
    notices: Vec<Notice>,
    cues: Vec<WorldCue>,
}

fn find_engine(
    engines: &mut [RelationshipEngine],
    id: EntityId,
) -> Result<&mut RelationshipEngine, SessionError> {
    engines
        .iter_mut()
        .find(|engine| engine.character().id == id)
        .ok_or(SessionError::UnknownCharacter(id))
}

impl GameSession {
    /// Start a session with the village roster and a freshly populated forest.
    pub fn new(config: RealmConfig, mut random: Box<dyn RandomPort>) -> Result<Self, SessionError> {
        config.validate()?;

        let mut world = WorldState::new(&config.player);
        let engines: Vec<RelationshipEngine> = village_roster()
            .into_iter()
            .map(RelationshipEngine::new)
            .collect();
        for engine in &engines {
            let character = engine.character();
            world.record_relationship(&character.name, character.relationship());
        }

        let ecosystem = EcosystemSimulation::populate(config.ecosystem.clone(), random.as_mut());
        let scheduler = EventScheduler::new(config.scheduler.clone(), 0)
            .with_world_size(config.ecosystem.world_width, config.ecosystem.world_height);

        info!(
            player = %config.player.name,
            characters = engines.len(),
            creatures = ecosystem.creatures().len(),
            "session started"
        );

        Ok(Self {
            config,
            world,
            engines,
            ecosystem,
            scheduler,
            random,
            clock_ms: 0.0,
            idle_elapsed_ms: 0.0,
            notices: Vec::new(),
            cues: Vec::new(),
        })
    }

    /// Reproducible session driven by a seeded generator.
    pub fn with_seed(config: RealmConfig, seed: u64) -> Result<Self, SessionError> {
        Self::new(config, Box::new(SeededRandom::new(seed)))
    }

    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.engines.iter().map(|engine| engine.character())
    }

    pub fn character(&self, id: EntityId) -> Option<&Character> {
        self.characters().find(|c| c.id == id)
    }

    pub fn character_by_name(&self, name: &str) -> Option<&Character> {
        self.characters().find(|c| c.name == name)
    }

    /// What a character is doing at the current time of day.
    pub fn activity(&self, id: EntityId) -> Option<Activity> {
        self.character(id)
            .map(|character| character.activity(self.world.time_of_day))
    }

    pub fn engine(&self, id: EntityId) -> Option<&RelationshipEngine> {
        self.engines.iter().find(|engine| engine.character().id == id)
    }

    /// Open a conversation with a character.
    pub fn resolve(&mut self, id: EntityId) -> Result<ResolvedDialogue, SessionError> {
        let engine = find_engine(&mut self.engines, id)?;
        Ok(engine.resolve(&self.world))
    }

    /// Answer the open conversation with the response at `index`.
    pub fn apply_response(
        &mut self,
        id: EntityId,
        index: usize,
    ) -> Result<ResponseOutcome, SessionError> {
        let engine = find_engine(&mut self.engines, id)?;
        let outcome = engine.apply_response(index, &mut self.world, self.random.as_mut());
        if let ResponseOutcome::Applied { notices, .. } = &outcome {
            self.notices.extend(notices.iter().cloned());
        }
        Ok(outcome)
    }

    /// Answer by number key. Keys that map to no response close the conversation.
    pub fn apply_response_key(
        &mut self,
        id: EntityId,
        key: char,
    ) -> Result<ResponseOutcome, SessionError> {
        let index = response_index_for_key(key).unwrap_or(usize::MAX);
        self.apply_response(id, index)
    }

    /// Advance the ecosystem and villagers by `dt_ms` of real time.
    pub fn step(&mut self, dt_ms: f32) -> StepReport {
        let scaled = dt_ms.max(0.0) * self.scheduler.time_scale();
        let report = self.ecosystem.step(scaled, self.random.as_mut());
        self.run_idle_routine(scaled);
        report
    }

    /// Fire scheduled world events due at `now_ms`.
    pub fn maybe_fire(&mut self, now_ms: u64) -> Vec<WorldEvent> {
        let report = self
            .scheduler
            .maybe_fire(now_ms, &mut self.world, self.random.as_mut());
        self.notices.extend(report.notices);
        self.cues.extend(report.cues);
        report.events
    }

    /// One frame of the game loop: advance the clock, step, then fire events.
    pub fn tick(&mut self, dt_ms: f32) -> Vec<WorldEvent> {
        self.clock_ms += f64::from(dt_ms.max(0.0));
        self.step(dt_ms);
        self.maybe_fire(self.clock_ms as u64)
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms as u64
    }

    pub fn time_scale(&self) -> f32 {
        self.scheduler.time_scale()
    }

    pub fn world_state(&self) -> &WorldState {
        &self.world
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    pub fn set_flag(&mut self, key: impl Into<String>, value: bool) {
        self.world.set_flag(key, value);
    }

    pub fn ecosystem(&self) -> &EcosystemSimulation {
        &self.ecosystem
    }

    pub fn ecosystem_summary(&self) -> EcosystemSummary {
        self.ecosystem.summary(self.scheduler.log().len())
    }

    pub fn scheduler(&self) -> &EventScheduler {
        &self.scheduler
    }

    pub fn event_log(&self) -> &[WorldEvent] {
        self.scheduler.log()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn drain_cues(&mut self) -> Vec<WorldCue> {
        std::mem::take(&mut self.cues)
    }

    /// Tear the session down. Pending scheduled tasks are dropped without
    /// running; returns how many there were.
    pub fn end(mut self) -> usize {
        let dropped = self.scheduler.cancel_all();
        info!(
            dropped_tasks = dropped,
            clock_ms = self.clock_ms as u64,
            "session ended"
        );
        dropped
    }

    fn run_idle_routine(&mut self, scaled_dt_ms: f32) {
        let interval = self.config.npc.idle_interval_ms.max(1) as f32;
        self.idle_elapsed_ms += scaled_dt_ms;

        while self.idle_elapsed_ms >= interval {
            self.idle_elapsed_ms -= interval;
            for engine in &mut self.engines {
                let action = roll_idle_action(self.random.as_mut());
                if let IdleAction::MoodShift(mood) = action {
                    engine.drift_mood(mood);
                    debug!(character = %engine.character().name, ?mood, "mood drifted");
                }
                self.cues.push(WorldCue::CharacterIdle {
                    character: engine.character().id,
                    action,
                });
            }
        }
    }
}
