//! Trailcraft Headless Simulation Harness
//!
//! Validates catalog data and runs scripted play sessions against the
//! simulation engine. Runs entirely in-process with a seeded rng and a
//! simulated clock; no map, no GPS, no rendering.
//!
//! Usage:
//!   cargo run -p trailcraft-simtest
//!   cargo run -p trailcraft-simtest -- --verbose
//!   cargo run -p trailcraft-simtest -- --json

use std::time::Duration;

use serde::Serialize;
use trailcraft_core::components::CreatureState;
use trailcraft_core::engine::SimulationEngine;
use trailcraft_core::persistence::{keys, MemoryStore};
use trailcraft_core::systems::{CraftTarget, SimEvent};
use trailcraft_logic::catalog::items::tool_durability;
use trailcraft_logic::catalog::{Catalog, CreatureKind, EquipSlot, ResourceKind, MAX_TIER};
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::constants::upgrades;
use trailcraft_logic::geo::GeoPoint;
use trailcraft_logic::ids::{ItemId, ResourceId, UpgradeId};
use trailcraft_logic::skills::{level_for_xp, unlock_level, xp_progress, Skill};

const SEED: u64 = 0x7A11;

fn trailhead() -> GeoPoint {
    GeoPoint::new(46.5197, 6.6323)
}

fn new_engine() -> SimulationEngine {
    SimulationEngine::new(Catalog::standard(), GameConfig::default(), SEED)
}

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let json = json_mode();
    if !json {
        println!("=== Trailcraft Simulation Harness ===\n");
    }

    let mut results = Vec::new();

    // 1. Catalog consistency
    results.extend(validate_catalog(verbose && !json));

    // 2. Level curve sweep
    results.extend(validate_level_curve(verbose && !json));

    // 3. Starter session: workbench, first tools, first gathers
    results.extend(validate_starter_session(verbose && !json));

    // 4. World spawning while walking
    results.extend(validate_world_session(verbose && !json));

    // 5. Companion lifecycle
    results.extend(validate_companion_lifecycle(verbose && !json));

    // 6. Persistence roundtrip
    results.extend(validate_persistence(verbose && !json));

    let failed = results.iter().filter(|r| !r.passed).count();

    if json {
        match serde_json::to_string_pretty(&results) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("failed to serialize results: {}", e);
                std::process::exit(2);
            }
        }
    } else {
        // ── Summary ──
        println!();
        let passed = results.iter().filter(|r| r.passed).count();
        let total = results.len();

        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }

        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed, total, failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn json_mode() -> bool {
    std::env::args().any(|a| a == "--json")
}

fn section(title: &str) {
    if !json_mode() {
        println!("--- {} ---", title);
    }
}

// ── 1. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog(verbose: bool) -> Vec<TestResult> {
    section("Catalog");
    let mut results = Vec::new();
    let catalog = Catalog::standard();

    let issues = catalog.validate();
    results.push(TestResult::new(
        "catalog_no_issues",
        issues.is_empty(),
        if issues.is_empty() {
            "no authoring gaps".to_string()
        } else {
            issues
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    ));

    // Every family has one resource per tier
    for kind in [
        ResourceKind::Stone,
        ResourceKind::Wood,
        ResourceKind::Herb,
        ResourceKind::Track,
    ] {
        let start = if kind == ResourceKind::Track { 1 } else { 0 };
        let tiers = (start..=MAX_TIER)
            .filter(|t| catalog.resource_at(kind, *t).is_some())
            .count();
        let expected = (MAX_TIER - start + 1) as usize;
        results.push(TestResult::new(
            &format!("catalog_tiers_{:?}", kind).to_lowercase(),
            tiers == expected,
            format!("{} of {} tiers present", tiers, expected),
        ));
    }

    // Tool durability follows the tier curve
    let off_curve: Vec<_> = catalog
        .items
        .values()
        .filter(|i| i.is_tool())
        .filter(|i| i.max_durability != Some(tool_durability(i.tier)))
        .map(|i| i.id.to_string())
        .collect();
    results.push(TestResult::new(
        "catalog_tool_durability_curve",
        off_curve.is_empty(),
        if off_curve.is_empty() {
            "all tools on curve".to_string()
        } else {
            format!("off curve: {}", off_curve.join(", "))
        },
    ));

    // Every creature can hatch from an egg the catalog knows about
    let eggless: Vec<_> = CreatureKind::ALL
        .iter()
        .filter(|k| catalog.resource(&k.egg()).is_none())
        .map(|k| k.name())
        .collect();
    results.push(TestResult::new(
        "catalog_eggs_present",
        eggless.is_empty(),
        format!("{} creatures, missing eggs: {:?}", CreatureKind::ALL.len(), eggless),
    ));

    if verbose {
        println!(
            "  {} resources, {} components, {} items, {} upgrades, {} spawn entries",
            catalog.resources.len(),
            catalog.components.len(),
            catalog.items.len(),
            catalog.upgrades.len(),
            catalog.spawn_table.len()
        );
    }

    results
}

// ── 2. Level curve ──────────────────────────────────────────────────────

fn validate_level_curve(verbose: bool) -> Vec<TestResult> {
    section("Level Curve");
    let mut results = Vec::new();
    let config = GameConfig::default();
    let per = config.base_xp_per_level;
    let cap = config.level_cap;

    for (xp, expected) in [(0, 1), (99, 1), (100, 2), (900, 10), (1_000, 11)] {
        let level = level_for_xp(xp, per, cap);
        results.push(TestResult::new(
            &format!("level_at_{}_xp", xp),
            level == expected,
            format!("level {} (expected {})", level, expected),
        ));
    }

    let huge = level_for_xp(u64::MAX, per, cap);
    results.push(TestResult::new(
        "level_clamped_to_cap",
        huge == cap,
        format!("level {} at max xp, cap {}", huge, cap),
    ));

    // Monotonic over the whole range
    let monotonic = (0..(per * cap as u64))
        .step_by(7)
        .collect::<Vec<_>>()
        .windows(2)
        .all(|w| level_for_xp(w[0], per, cap) <= level_for_xp(w[1], per, cap));
    results.push(TestResult::new(
        "level_monotonic",
        monotonic,
        "level never decreases with xp",
    ));

    results.push(TestResult::new(
        "xp_progress_none_at_cap",
        xp_progress(per * cap as u64, per, cap).is_none()
            && xp_progress(150, per, cap) == Some((50, per)),
        "progress reported within level, none at cap",
    ));

    let unlocks: Vec<u32> = (0..=MAX_TIER).map(unlock_level).collect();
    let expected = vec![1, 1, 5, 10, 15, 20, 25, 30, 35, 40, 45, 50];
    results.push(TestResult::new(
        "unlock_levels_by_tier",
        unlocks == expected,
        format!("{:?}", unlocks),
    ));

    if verbose {
        for tier in [1i8, 4, 8, MAX_TIER] {
            let level = unlock_level(tier);
            println!(
                "  tier {:2}: level {:2} at {:5} xp",
                tier,
                level,
                (level as u64 - 1) * per
            );
        }
    }

    results
}

// ── 3. Starter session ──────────────────────────────────────────────────

fn validate_starter_session(verbose: bool) -> Vec<TestResult> {
    section("Starter Session");
    let mut results = Vec::new();
    let mut engine = new_engine();
    engine.set_player_location(Some(trailhead()));

    let workbench = UpgradeId::from(upgrades::WORKBENCH);
    results.push(TestResult::new(
        "workbench_blocked_when_empty",
        !engine.can_build_upgrade(&workbench),
        "cannot build from an empty bag",
    ));

    engine.state.inventory.add_resource(&ResourceId::from("T0_wood"), 14);
    engine.state.inventory.add_resource(&ResourceId::from("T0_stone"), 8);
    engine.state.inventory.add_resource(&ResourceId::from("T0_herb"), 3);

    let built = engine.build_upgrade(&workbench);
    results.push(TestResult::new(
        "workbench_built",
        built && engine.state.has_upgrade(upgrades::WORKBENCH),
        format!(
            "wood left {}, stone left {}",
            engine.state.inventory.resource_count(&ResourceId::from("T0_wood")),
            engine.state.inventory.resource_count(&ResourceId::from("T0_stone"))
        ),
    ));

    let steps = [
        CraftTarget::component("T0_handle"),
        CraftTarget::component("T0_cordage"),
        CraftTarget::item("T1_pickaxe"),
    ];
    let crafted: Vec<bool> = steps.iter().map(|t| engine.craft(t)).collect();
    results.push(TestResult::new(
        "first_pickaxe_crafted",
        crafted.iter().all(|c| *c),
        format!("handle/cordage/pickaxe: {:?}", crafted),
    ));

    let pick = ItemId::from("T1_pickaxe");
    let equipped = engine.equip(&pick);
    results.push(TestResult::new(
        "first_pickaxe_equipped",
        equipped && engine.state.equipment.get(EquipSlot::Pickaxe) == Some(&pick),
        format!("durability {:?}", engine.state.inventory.durability(&pick)),
    ));

    let mut successes = 0;
    for _ in 0..5 {
        let node = engine
            .state
            .spawn_node(ResourceId::from("T1_stone"), trailhead(), 1_800.0, false, false);
        if engine.gather(node).is_success() {
            successes += 1;
        }
    }
    let mining_xp = engine.state.skills.xp(Skill::Mining);
    results.push(TestResult::new(
        "first_gathers",
        successes == 5 && mining_xp > 0,
        format!(
            "{} of 5 gathers, {} mining xp, pickaxe at {:?}",
            successes,
            mining_xp,
            engine.state.inventory.durability(&pick)
        ),
    ));

    if verbose {
        println!("  bag weight {:.1}", engine.inventory_weight());
    }

    results
}

// ── 4. World session ────────────────────────────────────────────────────

fn validate_world_session(verbose: bool) -> Vec<TestResult> {
    section("World Session");
    let mut results = Vec::new();
    let mut engine = new_engine();
    let cap = engine.config.base_node_cap;
    let mut here = trailhead();
    engine.set_player_location(Some(here));
    engine.start_world_timer();

    let mut max_nodes = 0;
    let mut spawned = 0;
    let mut despawned = 0;
    // two hours, a short walk every minute
    for minute in 0..120 {
        here = here.destination((minute * 37 % 360) as f64, 25.0);
        engine.set_player_location(Some(here));
        engine.advance_time(Duration::from_secs(60));
        max_nodes = max_nodes.max(engine.state.regular_node_count());
        for event in engine.drain_events() {
            match event {
                SimEvent::NodeSpawned { .. } => spawned += 1,
                SimEvent::NodeDespawned { .. } => despawned += 1,
                _ => {}
            }
        }
    }

    results.push(TestResult::new(
        "world_respects_node_cap",
        max_nodes <= cap,
        format!("peak {} nodes, cap {}", max_nodes, cap),
    ));
    results.push(TestResult::new(
        "world_spawns_and_expires",
        spawned > 0 && despawned > 0,
        format!("{} spawned, {} despawned", spawned, despawned),
    ));

    let radius = engine.config.resource_spawn_radius;
    let far: Vec<_> = engine
        .nodes()
        .into_iter()
        .filter(|n| n.location.distance_to(&here) > radius + 2.0 * 25.0 * 120.0)
        .collect();
    results.push(TestResult::new(
        "world_nodes_near_player_path",
        far.is_empty(),
        format!("{} nodes live, {} implausibly far", engine.nodes().len(), far.len()),
    ));

    let replay = {
        let mut again = new_engine();
        let mut p = trailhead();
        again.set_player_location(Some(p));
        again.start_world_timer();
        for minute in 0..120 {
            p = p.destination((minute * 37 % 360) as f64, 25.0);
            again.set_player_location(Some(p));
            again.advance_time(Duration::from_secs(60));
        }
        again.nodes()
    };
    results.push(TestResult::new(
        "world_deterministic_for_seed",
        replay == engine.nodes(),
        "same seed and path give the same world",
    ));

    if verbose {
        for node in engine.nodes().iter().take(5) {
            println!(
                "  {:?} {} at {:.0} m",
                node.id,
                node.resource,
                node.location.distance_to(&here)
            );
        }
    }

    results
}

// ── 5. Companion lifecycle ──────────────────────────────────────────────

fn validate_companion_lifecycle(verbose: bool) -> Vec<TestResult> {
    section("Companion Lifecycle");
    let mut results = Vec::new();
    let mut engine = new_engine();
    engine.set_player_location(Some(trailhead()));
    let egg = CreatureKind::Raven.egg();

    engine.state.inventory.add_resource(&egg, 1);
    results.push(TestResult::new(
        "egg_needs_incubator",
        !engine.place_egg(&egg),
        "no incubator, egg stays in the bag",
    ));

    engine
        .state
        .upgrades
        .insert(UpgradeId::from(upgrades::INCUBATOR));
    let placed = engine.place_egg(&egg);
    let early = engine.hatch_egg(0);
    results.push(TestResult::new(
        "egg_incubates",
        placed && !early,
        "placed, not ready to hatch yet",
    ));

    let (incubation, growth) = match engine.catalog.creature(CreatureKind::Raven) {
        Some(def) => (def.incubation_secs, def.growth_secs),
        None => {
            results.push(TestResult::new(
                "raven_defined",
                false,
                "no raven in the catalog",
            ));
            return results;
        }
    };

    engine.advance_time(Duration::from_secs_f64(incubation));
    let hatched = engine.hatch_egg(0);
    results.push(TestResult::new(
        "egg_hatches",
        hatched
            && engine.state.companions.active == Some(0)
            && engine.state.unlocked_pets.contains(&CreatureKind::Raven),
        format!("hatched after {:.0} min", incubation / 60.0),
    ));

    engine.start_world_timer();
    let tick = engine.config.world_tick_secs;
    engine.advance_time(Duration::from_secs_f64(growth + tick));
    let state = engine
        .state
        .companions
        .get(0)
        .map(|c| c.state)
        .unwrap_or(CreatureState::Hatchling);
    results.push(TestResult::new(
        "hatchling_matures",
        state == CreatureState::UntrainedAdult,
        format!("{:?} after {:.1} h", state, growth / 3600.0),
    ));

    let matured = engine
        .drain_events()
        .iter()
        .filter(|e| matches!(e, SimEvent::CompanionMatured { .. }))
        .count();
    results.push(TestResult::new(
        "matured_once",
        matured == 1,
        format!("{} maturation events", matured),
    ));

    let charges = engine
        .state
        .companions
        .active()
        .map_or(0, |c| c.fetch_charges);
    results.push(TestResult::new(
        "fetch_charges_full",
        charges > 0,
        format!("{} fetch charges", charges),
    ));

    if verbose {
        if let Some(c) = engine.state.companions.active() {
            println!("  active {} ({:?}), charges {}", c.kind.name(), c.state, c.fetch_charges);
        }
    }

    results
}

// ── 6. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(verbose: bool) -> Vec<TestResult> {
    section("Persistence");
    let mut results = Vec::new();
    let mut engine = new_engine();
    engine.set_player_location(Some(trailhead()));
    engine.set_home_base(Some(trailhead()));
    engine.start_world_timer();
    engine.advance_time(Duration::from_secs(600));
    engine.state.skills.xp.insert(Skill::Woodcutting, 1_234);
    engine.state.inventory.add_resource(&ResourceId::from("T2_wood"), 6);

    let mut store = MemoryStore::default();
    let failures = engine.persist(&mut store);
    results.push(TestResult::new(
        "persist_all_keys",
        failures == 0 && store.blobs.len() == keys::ALL.len(),
        format!("{} blobs, {} failures", store.blobs.len(), failures),
    ));

    let restored = SimulationEngine::restore(Catalog::standard(), GameConfig::default(), SEED, &store);
    results.push(TestResult::new(
        "restore_matches",
        restored.state.inventory == engine.state.inventory
            && restored.state.skills.xp(Skill::Woodcutting) == 1_234
            && restored.nodes() == engine.nodes()
            && restored.state.home_base == engine.state.home_base,
        format!("{} nodes restored", restored.nodes().len()),
    ));

    let exported = engine
        .export_json()
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str::<serde_json::Value>(&s).map_err(|e| e.to_string()));
    results.push(TestResult::new(
        "export_json_parses",
        exported.is_ok(),
        match &exported {
            Ok(v) => format!("{} top-level keys", v.as_object().map_or(0, |o| o.len())),
            Err(e) => e.clone(),
        },
    ));

    if verbose {
        for key in keys::ALL {
            let len = store.blobs.get(key).map_or(0, |b| b.len());
            println!("  {:20} {:6} bytes", key, len);
        }
    }

    results
}
