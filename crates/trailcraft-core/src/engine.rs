//! Simulation engine - main entry point for hosts
//!
//! Owns the catalog, config, game state and a seeded rng. Player actions are
//! methods that run one system and then recalculate derived state. Periodic
//! work runs from two timers that only advance when the host calls
//! [`SimulationEngine::advance_time`].

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use trailcraft_logic::catalog::{Catalog, EquipSlot, ResourceKind};
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::geo::GeoPoint;
use trailcraft_logic::ids::{ComponentId, ItemId, ResourceId, UpgradeId};
use trailcraft_logic::skills::Skill;

use crate::components::{NodeId, ResourceNode};
use crate::persistence::{self, SaveStore};
use crate::state::GameState;
use crate::systems::*;

/// Main simulation engine
pub struct SimulationEngine {
    pub catalog: Catalog,
    pub config: GameConfig,
    pub state: GameState,
    rng: ChaCha8Rng,

    // Next due time of each running timer, in sim seconds
    world_timer: Option<f64>,
    scout_timer: Option<f64>,
    last_world_tick: f64,
}

impl SimulationEngine {
    pub fn new(catalog: Catalog, config: GameConfig, seed: u64) -> Self {
        Self::with_state(catalog, config, seed, GameState::new())
    }

    fn with_state(catalog: Catalog, config: GameConfig, seed: u64, mut state: GameState) -> Self {
        recalculate_stat_bonuses(&mut state, &catalog);
        let now = state.now;
        Self {
            catalog,
            config,
            state,
            rng: ChaCha8Rng::seed_from_u64(seed),
            world_timer: None,
            scout_timer: None,
            last_world_tick: now,
        }
    }

    /// Rebuild an engine from saved state. Missing or unreadable keys start empty.
    pub fn restore(catalog: Catalog, config: GameConfig, seed: u64, store: &dyn SaveStore) -> Self {
        Self::with_state(catalog, config, seed, persistence::load_state(store))
    }

    /// Best-effort save of every persisted map. Returns the number of keys
    /// that failed; failures are logged.
    pub fn persist(&self, store: &mut dyn SaveStore) -> usize {
        persistence::save_state(store, &self.state)
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        persistence::export_json(&self.state)
    }

    // ── Clock and location ──

    /// Current sim time in seconds since the Unix epoch.
    pub fn now(&self) -> f64 {
        self.state.now
    }

    /// Jump the clock without running ticks. Running timers are rescheduled
    /// from the new time.
    pub fn set_clock(&mut self, now: f64) {
        self.state.now = now;
        self.last_world_tick = now;
        if self.world_timer.is_some() {
            self.world_timer = Some(now + self.config.world_tick_secs);
        }
        if self.scout_timer.is_some() {
            self.scout_timer = Some(now + self.config.scout_tick_secs);
        }
    }

    pub fn set_player_location(&mut self, location: Option<GeoPoint>) {
        self.state.player_location = location;
    }

    pub fn set_home_base(&mut self, location: Option<GeoPoint>) {
        self.state.home_base = location;
    }

    // ── Timers ──

    pub fn start_world_timer(&mut self) {
        if self.world_timer.is_none() {
            self.world_timer = Some(self.state.now + self.config.world_tick_secs);
            self.last_world_tick = self.state.now;
        }
    }

    pub fn stop_world_timer(&mut self) {
        self.world_timer = None;
    }

    pub fn start_scout_timer(&mut self) {
        if self.scout_timer.is_none() {
            self.scout_timer = Some(self.state.now + self.config.scout_tick_secs);
        }
    }

    pub fn stop_scout_timer(&mut self) {
        self.scout_timer = None;
    }

    pub fn world_timer_running(&self) -> bool {
        self.world_timer.is_some()
    }

    pub fn scout_timer_running(&self) -> bool {
        self.scout_timer.is_some()
    }

    /// Move the clock forward, running every due tick in time order. A world
    /// tick and a scout tick due at the same instant run world first.
    pub fn advance_time(&mut self, by: Duration) {
        let target = self.state.now + by.as_secs_f64();
        loop {
            let world_due = self.world_timer.filter(|t| *t <= target);
            let scout_due = self.scout_timer.filter(|t| *t <= target);
            match (world_due, scout_due) {
                (Some(w), Some(s)) if s < w => self.run_scout_tick(s),
                (Some(w), _) => self.run_world_tick(w),
                (None, Some(s)) => self.run_scout_tick(s),
                (None, None) => break,
            }
        }
        self.state.now = target;
    }

    fn run_world_tick(&mut self, at: f64) {
        self.state.now = at;
        self.update_world_state();
        self.world_timer = Some(at + self.config.world_tick_secs);
    }

    fn run_scout_tick(&mut self, at: f64) {
        self.state.now = at;
        scout_tick(&mut self.state, &self.catalog, &self.config, &mut self.rng);
        self.scout_timer = Some(at + self.config.scout_tick_secs);
    }

    /// One world tick at the current clock: despawn, potions, growth,
    /// fetch charges, feathers, then spawning.
    pub fn update_world_state(&mut self) {
        let dt = (self.state.now - self.last_world_tick).max(0.0);
        self.last_world_tick = self.state.now;

        despawn_expired(&mut self.state);
        expire_potions(&mut self.state);
        update_pet_growth_states(&mut self.state, &self.catalog);
        restore_fetch_charges(&mut self.state, &self.catalog, &self.config);
        accumulate_feathers(&mut self.state, &self.catalog, dt);
        update_spawns(&mut self.state, &self.catalog, &self.config, &mut self.rng);
    }

    fn after_action(&mut self) {
        recalculate_stat_bonuses(&mut self.state, &self.catalog);
    }

    // ── Queries ──

    pub fn nodes(&self) -> Vec<ResourceNode> {
        self.state.nodes()
    }

    pub fn level(&self, skill: Skill) -> u32 {
        self.state.level(skill, &self.config)
    }

    pub fn inventory_weight(&self) -> f32 {
        inventory_weight(&self.state, &self.catalog)
    }

    pub fn can_craft(&self, target: &CraftTarget) -> bool {
        can_craft(&self.state, &self.catalog, &self.config, target)
    }

    pub fn craft_blocker(&self, target: &CraftTarget) -> Option<String> {
        craft_blocker(&self.state, &self.catalog, &self.config, target)
    }

    pub fn can_build_upgrade(&self, id: &UpgradeId) -> bool {
        can_build_upgrade(&self.state, &self.catalog, id)
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.state.events.drain()
    }

    // ── Actions ──

    pub fn gather(&mut self, node: NodeId) -> GatherResult {
        let here = self.state.player_location;
        let result = resolve_gather(
            &mut self.state,
            &self.catalog,
            &self.config,
            node,
            here,
            &mut self.rng,
        );
        self.after_action();
        result
    }

    pub fn pet_fetch(&mut self, node: NodeId) -> GatherResult {
        let result = pet_fetch_resource(
            &mut self.state,
            &self.catalog,
            &self.config,
            node,
            &mut self.rng,
        );
        self.after_action();
        result
    }

    pub fn craft(&mut self, target: &CraftTarget) -> bool {
        let ok = craft(
            &mut self.state,
            &self.catalog,
            &self.config,
            target,
            &mut self.rng,
        );
        self.after_action();
        ok
    }

    pub fn build_upgrade(&mut self, id: &UpgradeId) -> bool {
        let ok = build_upgrade(&mut self.state, &self.catalog, &self.config, id);
        self.after_action();
        ok
    }

    pub fn repair_tool(&mut self, tool: &ItemId, repair_item: &ItemId) -> bool {
        let ok = repair_tool(&mut self.state, &self.catalog, &self.config, tool, repair_item);
        self.after_action();
        ok
    }

    pub fn equip(&mut self, item: &ItemId) -> bool {
        equip(&mut self.state, &self.catalog, item)
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> bool {
        unequip(&mut self.state, &self.catalog, slot)
    }

    pub fn drop_resource(&mut self, id: &ResourceId, qty: u32) -> bool {
        drop_resource(&mut self.state, &self.catalog, id, qty)
    }

    pub fn drop_component(&mut self, id: &ComponentId, qty: u32) -> bool {
        drop_component(&mut self.state, &self.catalog, id, qty)
    }

    pub fn drop_item(&mut self, id: &ItemId, qty: u32) -> bool {
        let ok = drop_item(&mut self.state, &self.catalog, id, qty);
        self.after_action();
        ok
    }

    pub fn drink_potion(&mut self, item: &ItemId) -> bool {
        drink_potion(&mut self.state, &self.catalog, &self.config, item)
    }

    pub fn horizon_scan(&mut self) -> Option<ScanReport> {
        horizon_scan(&mut self.state, &self.catalog, &self.config, &mut self.rng)
    }

    pub fn place_egg(&mut self, egg: &ResourceId) -> bool {
        place_egg(&mut self.state, &self.catalog, &self.config, egg)
    }

    pub fn hatch_egg(&mut self, slot: usize) -> bool {
        hatch_egg(&mut self.state, &self.catalog, slot)
    }

    pub fn set_active_companion(&mut self, creature: Option<u32>) -> bool {
        set_active_companion(&mut self.state, creature)
    }

    pub fn feed_pet(&mut self, creature: u32, treat: &ItemId) -> bool {
        feed_pet(&mut self.state, &self.catalog, creature, treat)
    }

    pub fn assign_scout(&mut self, creature: u32, family: ResourceKind) -> bool {
        assign_scout(&mut self.state, &self.catalog, creature, family)
    }

    pub fn clear_scout(&mut self) -> bool {
        clear_scout(&mut self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::components::{Creature, CreatureState};
    use trailcraft_logic::catalog::CreatureKind;
    use trailcraft_logic::skills::Stat;

    fn engine() -> SimulationEngine {
        SimulationEngine::new(Catalog::standard(), GameConfig::default(), 42)
    }

    fn here() -> GeoPoint {
        GeoPoint::new(48.85, 2.35)
    }

    #[test]
    fn test_engine_creation() {
        let engine = engine();
        assert_eq!(engine.now(), 0.0);
        assert!(engine.nodes().is_empty());
        assert!(!engine.world_timer_running());
    }

    #[test]
    fn test_world_timer_spawns_nodes() {
        let mut engine = engine();
        engine.set_player_location(Some(here()));
        engine.advance_time(Duration::from_secs(60));
        assert!(engine.nodes().is_empty(), "no timer, no ticks");

        engine.start_world_timer();
        engine.start_world_timer();
        engine.advance_time(Duration::from_secs(15));
        assert!(!engine.nodes().is_empty());
        assert_eq!(engine.now(), 75.0);
        let spawned = engine
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SimEvent::NodeSpawned { .. }))
            .count();
        assert_eq!(spawned, engine.nodes().len());
    }

    #[test]
    fn test_nodes_expire_without_player() {
        let mut engine = engine();
        engine.set_player_location(Some(here()));
        engine.start_world_timer();
        engine.advance_time(Duration::from_secs(15));
        assert!(!engine.nodes().is_empty());

        engine.set_player_location(None);
        engine.advance_time(Duration::from_secs(2 * 3600));
        assert!(engine.nodes().is_empty());
    }

    #[test]
    fn test_stop_timer() {
        let mut engine = engine();
        engine.set_player_location(Some(here()));
        engine.start_world_timer();
        engine.stop_world_timer();
        engine.advance_time(Duration::from_secs(600));
        assert!(engine.nodes().is_empty());
    }

    #[test]
    fn test_scout_ticks_every_ten_minutes() {
        let mut engine = engine();
        let mut raven = Creature::hatch(0, CreatureKind::Raven, 0.0, 3);
        raven.growth_started_at = None;
        raven.state = CreatureState::TrainedAdult;
        engine.state.companions.creatures.push(raven);
        assert!(engine.assign_scout(0, ResourceKind::Wood));

        engine.start_scout_timer();
        engine.advance_time(Duration::from_secs(599));
        assert!(engine.state.inventory.resources.is_empty());
        engine.advance_time(Duration::from_secs(1));
        let wood = engine.state.inventory.resource_count(&ResourceId::from("T1_wood"));
        assert!((1..=3).contains(&wood));

        engine.advance_time(Duration::from_secs(1800));
        let after = engine.state.inventory.resource_count(&ResourceId::from("T1_wood"));
        assert!(after >= wood + 3);
    }

    #[test]
    fn test_restore_rebuilds_bonuses() {
        let mut engine = engine();
        let gloves = ItemId::from("forager_gloves");
        engine.state.inventory.add_item(&gloves, 1);
        assert!(engine.equip(&gloves));
        engine.state.skills.xp.insert(Skill::Foraging, 300);

        let mut store = MemoryStore::new();
        assert_eq!(engine.persist(&mut store), 0);
        let restored = SimulationEngine::restore(Catalog::standard(), GameConfig::default(), 1, &store);
        assert_eq!(restored.level(Skill::Foraging), 4);
        assert!(restored.state.bonuses.get(Stat::SkillXp(Skill::Foraging)) > 0.0);
    }
}
