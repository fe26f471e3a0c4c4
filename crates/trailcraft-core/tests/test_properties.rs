//! Integration tests for state invariants under randomized play.
//!
//! Exercises: gather, craft, drop and tick sequences driven by seeded
//! ChaCha8 rngs, checking that stock, durability, egg ownership and node
//! bookkeeping stay consistent after every step.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use trailcraft_core::components::{IncubationSlot, NodeId};
use trailcraft_core::state::GameState;
use trailcraft_core::systems::{
    craft, despawn_expired, drop_item, drop_resource, equip, handle_rare_drops, resolve_gather,
    spawn_pass, update_spawns, CraftTarget, GatherOutcome,
};
use trailcraft_logic::catalog::{Catalog, CreatureKind, EquipSlot, ResourceKind};
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::constants::upgrades;
use trailcraft_logic::geo::GeoPoint;
use trailcraft_logic::ids::{ItemId, ResourceId, UpgradeId};
use trailcraft_logic::skills::{level_for_xp, Skill};

// ── Helpers ────────────────────────────────────────────────────────────

fn origin() -> GeoPoint {
    GeoPoint::new(35.68, 139.76)
}

fn geared_state() -> GameState {
    let mut state = GameState::new();
    state.player_location = Some(origin());
    for skill in Skill::ALL {
        state.skills.xp.insert(skill, 1_500);
    }
    for tool in ["T2_pickaxe", "T2_axe", "T2_knife"] {
        let id = ItemId::from(tool);
        state.inventory.add_item(&id, 3);
    }
    state
}

fn equip_all(state: &mut GameState, catalog: &Catalog) {
    for tool in ["T2_pickaxe", "T2_axe", "T2_knife"] {
        let id = ItemId::from(tool);
        if state.inventory.item_count(&id) > 0 {
            equip(state, catalog, &id);
        }
    }
}

fn assert_durability_bounds(state: &GameState, catalog: &Catalog) {
    for (id, d) in &state.inventory.durability {
        let max = catalog.item(id).and_then(|def| def.max_durability).unwrap_or(0);
        assert!(*d > 0, "{} kept a zero durability entry", id);
        assert!(*d <= max, "{} durability {} over max {}", id, d, max);
    }
}

// ── Gather outcome invariant ───────────────────────────────────────────

#[test]
fn invalid_keeps_node_and_others_remove_exactly_it() {
    let catalog = Catalog::standard();
    let config = GameConfig::default();

    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = geared_state();
        equip_all(&mut state, &catalog);
        spawn_pass(&mut state, &catalog, &config, &mut rng);

        for node in state.nodes() {
            let before: Vec<NodeId> = state.nodes().iter().map(|n| n.id).collect();
            // stand on some nodes, far from others
            let stand = if rng.gen_bool(0.7) {
                node.location
            } else {
                origin().destination(0.0, 5_000.0)
            };
            let result = resolve_gather(&mut state, &catalog, &config, node.id, Some(stand), &mut rng);
            let after: Vec<NodeId> = state.nodes().iter().map(|n| n.id).collect();
            match result.outcome {
                GatherOutcome::Invalid => assert_eq!(before, after),
                _ => {
                    let expected: Vec<NodeId> =
                        before.iter().copied().filter(|id| *id != node.id).collect();
                    assert_eq!(after, expected);
                }
            }
            assert_durability_bounds(&state, &catalog);
        }
    }
}

// ── Stock never negative ───────────────────────────────────────────────

#[test]
fn random_debits_never_underflow() {
    let catalog = Catalog::standard();
    let config = GameConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let mut state = geared_state();
    state.upgrades.insert(UpgradeId::from(upgrades::WORKBENCH));
    state.upgrades.insert(UpgradeId::from(upgrades::BASIC_FORGE));
    state.inventory.add_resource(&ResourceId::from("T1_stone"), 7);
    state.inventory.add_resource(&ResourceId::from("T1_wood"), 5);
    state.inventory.add_resource(&ResourceId::from("T0_herb"), 4);

    let targets = [
        CraftTarget::component("T1_ingot"),
        CraftTarget::component("T1_plank"),
        CraftTarget::component("T0_cordage"),
        CraftTarget::item("T1_knife"),
    ];
    for _ in 0..200 {
        let before = state.inventory.clone();
        match rng.gen_range(0..3) {
            0 => {
                let target = &targets[rng.gen_range(0..targets.len())];
                if !craft(&mut state, &catalog, &config, target, &mut rng) {
                    assert_eq!(state.inventory, before, "failed craft mutated stock");
                }
            }
            1 => {
                let qty = rng.gen_range(1..5);
                let id = ResourceId::from("T1_stone");
                if !drop_resource(&mut state, &catalog, &id, qty) {
                    assert_eq!(state.inventory, before);
                }
            }
            _ => {
                let id = ItemId::from("T2_knife");
                if !drop_item(&mut state, &catalog, &id, 1) {
                    assert_eq!(state.inventory, before);
                }
            }
        }
        // u32 stock can't go negative, but a failed debit must not wrap or
        // leave zero-count entries behind
        assert!(state.inventory.resources.values().all(|q| *q > 0));
        assert!(state.inventory.components.values().all(|q| *q > 0));
        assert!(state.inventory.items.values().all(|q| *q > 0));
    }
}

// ── Durability ─────────────────────────────────────────────────────────

#[test]
fn broken_tool_loses_one_copy_and_unequips() {
    let catalog = Catalog::standard();
    let config = GameConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut state = GameState::new();
    state.player_location = Some(origin());
    let pick = ItemId::from("T1_pickaxe");
    state.inventory.add_item(&pick, 2);
    equip(&mut state, &catalog, &pick);

    let mut gathers = 0;
    while state.inventory.item_count(&pick) == 2 {
        let node = state.spawn_node(ResourceId::from("T1_stone"), origin(), 600.0, false, false);
        let result = resolve_gather(&mut state, &catalog, &config, node, Some(origin()), &mut rng);
        assert_ne!(result.outcome, GatherOutcome::Invalid, "{}", result.message);
        // keep room in the bag
        state.inventory.resources.clear();
        gathers += 1;
        assert!(gathers <= 500, "pickaxe never broke");
    }
    // save rolls only ever skip wear
    assert!(gathers >= 50);
    assert_eq!(state.inventory.item_count(&pick), 1);
    assert_eq!(state.inventory.durability(&pick), None);
    assert!(state.equipment.get(EquipSlot::Pickaxe).is_none());
}

// ── Egg uniqueness ─────────────────────────────────────────────────────

#[test]
fn no_second_egg_of_a_held_kind() {
    let catalog = Catalog::standard();
    let config = GameConfig::default();
    let wood = catalog
        .resource(&ResourceId::from("T5_wood"))
        .cloned()
        .expect("T5 wood");
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let mut state = GameState::new();
    state.skills.xp.insert(Skill::Woodcutting, 10_000);
    state.inventory.add_resource(&CreatureKind::Raven.egg(), 1);
    state.incubator.slots.push(IncubationSlot {
        egg: CreatureKind::Owl.egg(),
        kind: CreatureKind::Owl,
        started_at: 0.0,
    });
    state.unlocked_pets.insert(CreatureKind::Hawk);

    for _ in 0..5_000 {
        handle_rare_drops(&mut state, &catalog, &config, &wood, &mut rng);
    }
    assert_eq!(state.inventory.resource_count(&CreatureKind::Raven.egg()), 1);
    assert_eq!(state.inventory.resource_count(&CreatureKind::Owl.egg()), 0);
    assert_eq!(state.inventory.resource_count(&CreatureKind::Hawk.egg()), 0);
}

#[test]
fn eggs_drop_at_most_once_per_kind() {
    let catalog = Catalog::standard();
    let config = GameConfig::default();
    let wood = catalog
        .resource(&ResourceId::from("T5_wood"))
        .cloned()
        .expect("T5 wood");
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut state = GameState::new();
    state.skills.xp.insert(Skill::Woodcutting, 10_000);

    for _ in 0..20_000 {
        handle_rare_drops(&mut state, &catalog, &config, &wood, &mut rng);
    }
    for kind in [CreatureKind::Raven, CreatureKind::Owl, CreatureKind::Hawk] {
        assert!(state.inventory.resource_count(&kind.egg()) <= 1, "{:?}", kind);
    }
}

// ── Level curve ────────────────────────────────────────────────────────

#[test]
fn level_formula_matches_closed_form() {
    let config = GameConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    for _ in 0..1_000 {
        let xp: u64 = rng.gen_range(0..20_000);
        let expected = 1 + (xp / 100).min(config.level_cap as u64 - 1) as u32;
        assert_eq!(level_for_xp(xp, config.base_xp_per_level, config.level_cap), expected);
    }
}

// ── World churn ────────────────────────────────────────────────────────

#[test]
fn world_never_exceeds_cap_while_walking() {
    let catalog = Catalog::standard();
    let config = GameConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let mut state = GameState::new();
    let mut here = origin();

    for step in 0..120 {
        state.now = step as f64 * config.world_tick_secs;
        here = here.destination(rng.gen_range(0.0..360.0), rng.gen_range(0.0..40.0));
        state.player_location = Some(here);
        despawn_expired(&mut state);
        update_spawns(&mut state, &catalog, &config, &mut rng);
        assert!(state.regular_node_count() <= config.base_node_cap);
        for node in state.nodes() {
            let def = catalog.resource(&node.resource).expect("spawned from catalog");
            assert!(def.kind.is_standard_gather() || def.kind == ResourceKind::Track);
            assert!(!node.discovery);
        }
    }
}
