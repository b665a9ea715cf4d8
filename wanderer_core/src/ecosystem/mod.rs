//! Ecosystem simulation - creatures, resources and their interactions.
//!
//! Every call to [`EcosystemSimulation::step`] runs these phases in order:
//!
//! 1. **Snapshot**: record creature positions for the proximity pass
//! 2. **Vitals**: drain energy, grow hunger, feed hungry creatures that sit
//!    next to a resource, respawn exhausted ones
//! 3. **Movement**: advance hops; arrivals update the logical position
//! 4. **Regrowth**: each collected resource may reappear somewhere new
//! 5. **Sharing**: creatures that were close at the snapshot average energy

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use wanderer_rules::{
    BehaviorKind, Creature, EcosystemConfig, EntityId, Movement, Position, Resource,
    RESOURCE_KINDS, SPECIES,
};

use crate::random::RandomPort;

/// Upper bound on pause/hop transitions a single creature makes in one step.
const MAX_PHASES_PER_STEP: usize = 64;

/// What happened during one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// (creature, resource) pairs where the creature ate the resource.
    pub consumed: Vec<(EntityId, EntityId)>,
    pub respawned: Vec<EntityId>,
    pub regrown: Vec<EntityId>,
    /// Number of creature pairs that shared energy.
    pub energy_exchanges: usize,
}

/// Counts shown on the debug overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcosystemSummary {
    pub creatures: usize,
    pub available_resources: usize,
    pub events: usize,
}

/// Owns every creature and resource and advances them each frame.
#[derive(Debug, Clone)]
pub struct EcosystemSimulation {
    config: EcosystemConfig,
    creatures: Vec<Creature>,
    resources: Vec<Resource>,
}

impl EcosystemSimulation {
    /// An empty ecosystem; populate with [`spawn_creature`](Self::spawn_creature)
    /// and [`spawn_resource`](Self::spawn_resource) or use [`populate`](Self::populate).
    pub fn new(config: EcosystemConfig) -> Self {
        Self {
            config,
            creatures: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Fill the world with randomly placed creatures and resources.
    pub fn populate(config: EcosystemConfig, random: &mut dyn RandomPort) -> Self {
        let mut sim = Self::new(config);
        for _ in 0..sim.config.creature_count {
            let species = SPECIES[random.pick(SPECIES.len())];
            let position = sim.random_position(random);
            let mut creature = Creature::spawn(&species, position);
            sim.start_routine(&mut creature, random);
            sim.creatures.push(creature);
        }
        for _ in 0..sim.config.resource_count {
            let kind = RESOURCE_KINDS[random.pick(RESOURCE_KINDS.len())];
            let position = sim.random_position(random);
            sim.resources.push(Resource::spawn(&kind, position));
        }
        debug!(
            creatures = sim.creatures.len(),
            resources = sim.resources.len(),
            "ecosystem populated"
        );
        sim
    }

    pub fn config(&self) -> &EcosystemConfig {
        &self.config
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn creature(&self, id: EntityId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    pub fn creature_mut(&mut self, id: EntityId) -> Option<&mut Creature> {
        self.creatures.iter_mut().find(|c| c.id == id)
    }

    pub fn resource(&self, id: EntityId) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    pub fn resource_mut(&mut self, id: EntityId) -> Option<&mut Resource> {
        self.resources.iter_mut().find(|r| r.id == id)
    }

    /// Add a creature as-is. Its movement routine starts on the next step.
    pub fn spawn_creature(&mut self, creature: Creature) -> EntityId {
        let id = creature.id;
        self.creatures.push(creature);
        id
    }

    pub fn spawn_resource(&mut self, resource: Resource) -> EntityId {
        let id = resource.id;
        self.resources.push(resource);
        id
    }

    pub fn available_resources(&self) -> usize {
        self.resources.iter().filter(|r| r.is_available()).count()
    }

    pub fn summary(&self, events: usize) -> EcosystemSummary {
        EcosystemSummary {
            creatures: self.creatures.len(),
            available_resources: self.available_resources(),
            events,
        }
    }

    /// Index of the closest uncollected resource to `from`.
    pub fn nearest_available_resource(&self, from: Position) -> Option<usize> {
        self.resources
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_available())
            .map(|(i, r)| (i, from.distance_to(r.position)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Advance the whole ecosystem by `dt_ms` milliseconds of game time.
    pub fn step(&mut self, dt_ms: f32, random: &mut dyn RandomPort) -> StepReport {
        let dt_ms = dt_ms.max(0.0);
        let mut report = StepReport::default();

        let snapshot: Vec<Position> = self.creatures.iter().map(|c| c.position).collect();

        for index in 0..self.creatures.len() {
            self.update_vitals(index, dt_ms, random, &mut report);
            self.advance_movement(index, dt_ms, random);
        }

        self.regrow_resources(random, &mut report);
        report.energy_exchanges = self.share_energy(&snapshot);

        report
    }

    fn update_vitals(
        &mut self,
        index: usize,
        dt_ms: f32,
        random: &mut dyn RandomPort,
        report: &mut StepReport,
    ) {
        let decay = dt_ms * self.config.energy_decay_per_ms;
        let growth = dt_ms * self.config.hunger_growth_per_ms;
        let threshold = self.config.hunger_threshold;
        let radius = self.config.consumption_radius;

        let creature = &mut self.creatures[index];
        creature.energy -= decay;
        creature.hunger += growth;

        if creature.is_hungry(threshold) {
            let position = creature.position;
            if let Some(target) = self.nearest_available_resource(position) {
                let resource = &mut self.resources[target];
                if position.distance_to(resource.position) < radius {
                    resource.collected = true;
                    let resource_id = resource.id;
                    let creature = &mut self.creatures[index];
                    creature.feed();
                    trace!(creature = %creature.id, resource = %resource_id, "resource consumed");
                    report.consumed.push((creature.id, resource_id));
                }
            }
        }

        if self.creatures[index].is_exhausted() {
            let position = self.random_position(random);
            let mut creature = self.creatures[index].clone();
            creature.respawn(position);
            self.start_routine(&mut creature, random);
            debug!(creature = %creature.id, x = position.x, y = position.y, "creature respawned");
            report.respawned.push(creature.id);
            self.creatures[index] = creature;
        }
    }

    fn advance_movement(&mut self, index: usize, dt_ms: f32, random: &mut dyn RandomPort) {
        let mut creature = self.creatures[index].clone();
        let mut remaining = dt_ms;

        // A long frame can cover a pause and a hop; stop once time runs out.
        // Time left after MAX_PHASES_PER_STEP transitions is dropped.
        for _ in 0..MAX_PHASES_PER_STEP {
            match creature.movement {
                Movement::Still => {
                    if creature.behavior == BehaviorKind::Hide {
                        break;
                    }
                    self.start_routine(&mut creature, random);
                    if creature.movement == Movement::Still {
                        break;
                    }
                }
                Movement::Pausing { remaining_ms } => {
                    if remaining < remaining_ms {
                        creature.movement = Movement::Pausing {
                            remaining_ms: remaining_ms - remaining,
                        };
                        break;
                    }
                    remaining -= remaining_ms;
                    creature.movement = self.plan_hop(creature.behavior, creature.position, random);
                }
                Movement::Travelling {
                    from,
                    to,
                    elapsed_ms,
                    duration_ms,
                } => {
                    let left = duration_ms - elapsed_ms;
                    if remaining < left {
                        creature.movement = Movement::Travelling {
                            from,
                            to,
                            elapsed_ms: elapsed_ms + remaining,
                            duration_ms,
                        };
                        break;
                    }
                    remaining -= left;
                    creature.position = to;
                    creature.movement = self.after_arrival(creature.behavior, to, random);
                }
            }
            if remaining <= 0.0 {
                break;
            }
        }

        self.creatures[index] = creature;
    }

    /// First movement state for a freshly spawned creature.
    fn start_routine(&self, creature: &mut Creature, random: &mut dyn RandomPort) {
        creature.movement = match creature.behavior {
            BehaviorKind::Fly => self.plan_hop(BehaviorKind::Fly, creature.position, random),
            BehaviorKind::Wander => self.plan_pause(random),
            BehaviorKind::Hide => Movement::Still,
        };
    }

    fn after_arrival(
        &self,
        behavior: BehaviorKind,
        at: Position,
        random: &mut dyn RandomPort,
    ) -> Movement {
        match behavior {
            BehaviorKind::Fly => self.plan_hop(behavior, at, random),
            BehaviorKind::Wander => self.plan_pause(random),
            BehaviorKind::Hide => Movement::Still,
        }
    }

    fn plan_pause(&self, random: &mut dyn RandomPort) -> Movement {
        Movement::Pausing {
            remaining_ms: random.random_between(
                self.config.wander_pause_min_ms,
                self.config.wander_pause_max_ms,
            ),
        }
    }

    fn plan_hop(
        &self,
        behavior: BehaviorKind,
        from: Position,
        random: &mut dyn RandomPort,
    ) -> Movement {
        let (range, duration_ms) = match behavior {
            BehaviorKind::Fly => (self.config.fly_range, self.config.fly_duration_ms),
            BehaviorKind::Wander => (self.config.wander_range, self.config.wander_duration_ms),
            BehaviorKind::Hide => return Movement::Still,
        };
        let to = Position::new(
            from.x + random.random_between(-range, range),
            from.y + random.random_between(-range, range),
        )
        .clamped(self.config.world_width, self.config.world_height);

        Movement::Travelling {
            from,
            to,
            elapsed_ms: 0.0,
            duration_ms: duration_ms.max(1.0),
        }
    }

    fn regrow_resources(&mut self, random: &mut dyn RandomPort, report: &mut StepReport) {
        for index in 0..self.resources.len() {
            if !self.resources[index].collected {
                continue;
            }
            if random.random_f64() < self.config.regeneration_chance {
                let position = self.random_position(random);
                let resource = &mut self.resources[index];
                resource.regrow(position);
                trace!(resource = %resource.id, "resource regrown");
                report.regrown.push(resource.id);
            }
        }
    }

    /// Average energy for every pair that was within range at the snapshot.
    fn share_energy(&mut self, snapshot: &[Position]) -> usize {
        let radius = self.config.interaction_radius;
        let count = snapshot.len().min(self.creatures.len());
        let mut exchanges = 0;

        for i in 0..count {
            for j in (i + 1)..count {
                if snapshot[i].distance_to(snapshot[j]) < radius {
                    let mean = (self.creatures[i].energy + self.creatures[j].energy) / 2.0;
                    self.creatures[i].energy = mean;
                    self.creatures[j].energy = mean;
                    exchanges += 1;
                }
            }
        }
        exchanges
    }

    fn random_position(&self, random: &mut dyn RandomPort) -> Position {
        Position::new(
            random.random_between(0.0, self.config.world_width),
            random.random_between(0.0, self.config.world_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use wanderer_rules::{Species, MAX_ENERGY};

    const HIDER: Species = SPECIES[2];

    fn quiet_config() -> EcosystemConfig {
        EcosystemConfig {
            regeneration_chance: 0.0,
            ..EcosystemConfig::default()
        }
    }

    #[test]
    fn test_populate_counts() {
        let mut rng = SeededRandom::new(1);
        let sim = EcosystemSimulation::populate(EcosystemConfig::default(), &mut rng);
        let summary = sim.summary(0);
        assert_eq!(summary.creatures, 20);
        assert_eq!(summary.available_resources, 30);
        for creature in sim.creatures() {
            assert!((0.0..=2000.0).contains(&creature.position.x));
            assert!((0.0..=2000.0).contains(&creature.position.y));
        }
    }

    #[test]
    fn test_vitals_follow_rates() {
        let mut rng = SeededRandom::new(2);
        let mut sim = EcosystemSimulation::new(quiet_config());
        let id = sim.spawn_creature(Creature::spawn(&HIDER, Position::new(100.0, 100.0)));

        sim.step(1000.0, &mut rng);

        let creature = sim.creature(id).unwrap();
        assert!((creature.energy - 99.0).abs() < 1e-3);
        assert!((creature.hunger - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_hungry_creature_eats_nearby_resource() {
        let mut rng = SeededRandom::new(3);
        let mut sim = EcosystemSimulation::new(quiet_config());
        let mut creature = Creature::spawn(&HIDER, Position::new(500.0, 500.0));
        creature.hunger = 60.0;
        creature.energy = 40.0;
        let creature_id = sim.spawn_creature(creature);
        let near = sim.spawn_resource(Resource::spawn(&RESOURCE_KINDS[0], Position::new(510.0, 500.0)));
        let far = sim.spawn_resource(Resource::spawn(&RESOURCE_KINDS[1], Position::new(900.0, 900.0)));

        let report = sim.step(16.0, &mut rng);

        assert_eq!(report.consumed, vec![(creature_id, near)]);
        assert!(sim.resource(near).unwrap().collected);
        assert!(!sim.resource(far).unwrap().collected);
        let creature = sim.creature(creature_id).unwrap();
        assert_eq!(creature.hunger, 0.0);
        assert_eq!(creature.energy, MAX_ENERGY);
    }

    #[test]
    fn test_hungry_creature_ignores_distant_food() {
        let mut rng = SeededRandom::new(4);
        let mut sim = EcosystemSimulation::new(quiet_config());
        let mut creature = Creature::spawn(&HIDER, Position::new(0.0, 0.0));
        creature.hunger = 60.0;
        let creature_id = sim.spawn_creature(creature);
        sim.spawn_resource(Resource::spawn(&RESOURCE_KINDS[0], Position::new(100.0, 0.0)));

        let report = sim.step(16.0, &mut rng);

        assert!(report.consumed.is_empty());
        assert!(sim.creature(creature_id).unwrap().hunger > 60.0);
        assert_eq!(sim.available_resources(), 1);
    }

    #[test]
    fn test_no_resources_is_not_an_error() {
        let mut rng = SeededRandom::new(5);
        let mut sim = EcosystemSimulation::new(quiet_config());
        let mut creature = Creature::spawn(&HIDER, Position::new(0.0, 0.0));
        creature.hunger = 99.0;
        sim.spawn_creature(creature);

        let report = sim.step(16.0, &mut rng);
        assert!(report.consumed.is_empty());
        assert!(sim.nearest_available_resource(Position::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_exhausted_creature_respawns() {
        let mut rng = SeededRandom::new(6);
        let mut sim = EcosystemSimulation::new(quiet_config());
        let mut creature = Creature::spawn(&HIDER, Position::new(10.0, 10.0));
        creature.energy = 0.5;
        creature.hunger = 20.0;
        let id = sim.spawn_creature(creature);

        let report = sim.step(1000.0, &mut rng);

        assert_eq!(report.respawned, vec![id]);
        let creature = sim.creature(id).unwrap();
        assert_eq!(creature.energy, MAX_ENERGY);
        assert_eq!(creature.hunger, 0.0);
        assert_eq!(sim.creatures().len(), 1);
    }

    #[test]
    fn test_close_creatures_share_energy() {
        let mut rng = SeededRandom::new(7);
        let mut sim = EcosystemSimulation::new(EcosystemConfig {
            energy_decay_per_ms: 0.0,
            ..quiet_config()
        });
        let mut a = Creature::spawn(&HIDER, Position::new(100.0, 100.0));
        a.energy = 80.0;
        let mut b = Creature::spawn(&HIDER, Position::new(110.0, 100.0));
        b.energy = 20.0;
        let mut far = Creature::spawn(&HIDER, Position::new(900.0, 900.0));
        far.energy = 10.0;
        let (a, b, far) = (
            sim.spawn_creature(a),
            sim.spawn_creature(b),
            sim.spawn_creature(far),
        );

        let report = sim.step(0.0, &mut rng);

        assert_eq!(report.energy_exchanges, 1);
        assert_eq!(sim.creature(a).unwrap().energy, 50.0);
        assert_eq!(sim.creature(b).unwrap().energy, 50.0);
        assert_eq!(sim.creature(far).unwrap().energy, 10.0);
    }

    #[test]
    fn test_collected_resources_regrow_with_certain_chance() {
        let mut rng = SeededRandom::new(8);
        let mut sim = EcosystemSimulation::new(EcosystemConfig {
            regeneration_chance: 1.0,
            ..EcosystemConfig::default()
        });
        let mut resource = Resource::spawn(&RESOURCE_KINDS[1], Position::new(5.0, 5.0));
        resource.collected = true;
        let id = sim.spawn_resource(resource);

        let report = sim.step(16.0, &mut rng);

        assert_eq!(report.regrown, vec![id]);
        assert!(sim.resource(id).unwrap().is_available());
    }

    #[test]
    fn test_wanderer_commits_position_after_hop() {
        let mut rng = SeededRandom::new(9);
        let config = EcosystemConfig {
            energy_decay_per_ms: 0.0,
            hunger_growth_per_ms: 0.0,
            ..quiet_config()
        };
        let mut sim = EcosystemSimulation::new(config);
        let start = Position::new(1000.0, 1000.0);
        let id = sim.spawn_creature(Creature::spawn(&SPECIES[1], start));

        // First step plans the pause; the rest cover pause + hop.
        sim.step(0.0, &mut rng);
        assert!(matches!(sim.creature(id).unwrap().movement, Movement::Pausing { .. }));

        let mut arrived = false;
        for _ in 0..200 {
            let before = sim.creature(id).unwrap().clone();
            sim.step(100.0, &mut rng);
            let after = sim.creature(id).unwrap();
            if let Movement::Travelling { to, .. } = before.movement {
                if !matches!(after.movement, Movement::Travelling { .. }) {
                    assert_eq!(after.position, to);
                    arrived = true;
                    break;
                }
            }
        }
        assert!(arrived, "wanderer never finished a hop");
        let end = sim.creature(id).unwrap().position;
        assert!((end.x - start.x).abs() <= 100.0 && (end.y - start.y).abs() <= 100.0);
    }

    #[test]
    fn test_hiders_never_move() {
        let mut rng = SeededRandom::new(10);
        let mut sim = EcosystemSimulation::new(quiet_config());
        let id = sim.spawn_creature(Creature::spawn(&HIDER, Position::new(300.0, 300.0)));
        for _ in 0..50 {
            sim.step(100.0, &mut rng);
        }
        assert_eq!(sim.creature(id).unwrap().position, Position::new(300.0, 300.0));
    }

    #[test]
    fn test_huge_frame_still_returns() {
        let mut rng = SeededRandom::new(12);
        let mut sim = EcosystemSimulation::new(quiet_config());
        let flier = sim.spawn_creature(Creature::spawn(&SPECIES[0], Position::new(1000.0, 1000.0)));
        let walker = sim.spawn_creature(Creature::spawn(&SPECIES[1], Position::new(500.0, 500.0)));

        let report = sim.step(1.0e11, &mut rng);

        assert_eq!(report.respawned.len(), 2);
        for id in [flier, walker] {
            let creature = sim.creature(id).unwrap();
            assert!((0.0..=2000.0).contains(&creature.position.x));
            assert!((0.0..=2000.0).contains(&creature.position.y));
            assert_ne!(creature.movement, Movement::Still);
        }
    }

    #[test]
    fn test_sharing_ignores_positions_reached_mid_step() {
        let mut rng = SeededRandom::new(13);
        let mut sim = EcosystemSimulation::new(EcosystemConfig {
            energy_decay_per_ms: 0.0,
            hunger_growth_per_ms: 0.0,
            ..quiet_config()
        });
        let mut walker = Creature::spawn(&SPECIES[1], Position::new(500.0, 500.0));
        walker.energy = 80.0;
        walker.movement = Movement::Travelling {
            from: Position::new(500.0, 500.0),
            to: Position::new(110.0, 100.0),
            elapsed_ms: 1990.0,
            duration_ms: 2000.0,
        };
        let mut sitter = Creature::spawn(&HIDER, Position::new(100.0, 100.0));
        sitter.energy = 20.0;
        let (walker, sitter) = (sim.spawn_creature(walker), sim.spawn_creature(sitter));

        let report = sim.step(16.0, &mut rng);

        assert_eq!(sim.creature(walker).unwrap().position, Position::new(110.0, 100.0));
        assert_eq!(report.energy_exchanges, 0);
        assert_eq!(sim.creature(walker).unwrap().energy, 80.0);
        assert_eq!(sim.creature(sitter).unwrap().energy, 20.0);

        let report = sim.step(0.0, &mut rng);
        assert_eq!(report.energy_exchanges, 1);
        assert_eq!(sim.creature(walker).unwrap().energy, 50.0);
        assert_eq!(sim.creature(sitter).unwrap().energy, 50.0);
    }

    #[test]
    fn test_respawned_creature_shares_from_old_position() {
        let mut rng = SeededRandom::new(14);
        let mut sim = EcosystemSimulation::new(EcosystemConfig {
            energy_decay_per_ms: 0.0,
            ..quiet_config()
        });
        let mut dying = Creature::spawn(&HIDER, Position::new(100.0, 100.0));
        dying.energy = 0.0;
        let mut neighbour = Creature::spawn(&HIDER, Position::new(110.0, 100.0));
        neighbour.energy = 20.0;
        let (dying, neighbour) = (sim.spawn_creature(dying), sim.spawn_creature(neighbour));

        let report = sim.step(16.0, &mut rng);

        assert_eq!(report.respawned, vec![dying]);
        assert_eq!(report.energy_exchanges, 1);
        let reborn = sim.creature(dying).unwrap();
        assert_ne!(reborn.position, Position::new(100.0, 100.0));
        assert_eq!(reborn.energy, 60.0);
        assert_eq!(sim.creature(neighbour).unwrap().energy, 60.0);
    }
}
