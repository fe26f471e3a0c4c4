//! World spawn scheduler - despawns expired nodes and fills the rings
//!
//! The inner ring fills up to `base_node_cap` inside the spawn radius. An
//! adult companion adds an outer donut between the radius and the radius
//! plus its vision bonus, holding up to its bonus-node allotment.

use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use trailcraft_logic::catalog::{Catalog, CreatureKind, SpawnEntry};
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::constants::upgrades;
use trailcraft_logic::geo::GeoPoint;
use trailcraft_logic::ids::ResourceId;

use super::{bonus_node_allotment, roll, vision_bonus, SimEvent};
use crate::components::{Lifespan, NodeId, SpawnTracker};
use crate::state::GameState;

/// Remove every node whose lifespan has run out. Returns how many went.
pub fn despawn_expired(state: &mut GameState) -> usize {
    let now = state.now;
    let mut expired: Vec<NodeId> = state
        .world
        .query::<(&NodeId, &Lifespan)>()
        .iter()
        .filter(|(_, (_, life))| life.expired(now))
        .map(|(_, (id, _))| *id)
        .collect();
    expired.sort();
    for id in &expired {
        state.remove_node(*id);
        state.events.push(SimEvent::NodeDespawned { node: *id });
    }
    if !expired.is_empty() {
        debug!("despawned {} nodes", expired.len());
    }
    expired.len()
}

/// Node cap including the companion's outer-ring allotment.
pub fn effective_node_cap(state: &GameState, catalog: &Catalog, config: &GameConfig) -> usize {
    config.base_node_cap + bonus_node_allotment(state, catalog)
}

/// Whether a spawn pass is due: below the cap, and either enough time has
/// passed or the player has moved far enough since the last pass.
pub fn should_spawn(state: &GameState, catalog: &Catalog, config: &GameConfig) -> bool {
    let Some(here) = state.player_location else {
        return false;
    };
    if state.regular_node_count() >= effective_node_cap(state, catalog, config) {
        return false;
    }
    match (state.spawner.last_spawn_at, state.spawner.last_spawn_location) {
        (Some(at), Some(from)) => {
            state.now - at >= config.spawn_interval_secs
                || from.distance_to(&here) >= config.spawn_movement_threshold
        }
        _ => true,
    }
}

/// Weighted pick among spawn-table entries visible at the player's levels.
pub fn choose_spawn_resource(
    state: &GameState,
    catalog: &Catalog,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Option<ResourceId> {
    let candidates: Vec<&SpawnEntry> = catalog
        .spawn_table
        .iter()
        .filter(|entry| {
            catalog
                .resource(&entry.resource)
                .and_then(|r| r.skill)
                .map_or(false, |skill| entry.visible_at(state.level(skill, config)))
        })
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let weights = WeightedIndex::new(candidates.iter().map(|e| e.weight)).ok()?;
    Some(candidates[weights.sample(rng)].resource.clone())
}

/// Trained dragon: chance to bump a spawn one tier if the player qualifies.
pub(crate) fn dragon_tier_up(
    state: &GameState,
    catalog: &Catalog,
    config: &GameConfig,
    resource: ResourceId,
    rng: &mut impl Rng,
) -> ResourceId {
    if !state.companions.active_trained(CreatureKind::Dragon)
        || !roll(rng, config.dragon_tier_up_chance)
    {
        return resource;
    }
    let Some(def) = catalog.resource(&resource) else {
        return resource;
    };
    let Some(next) = catalog.resource_at(def.kind, def.tier + 1) else {
        return resource;
    };
    let qualifies = next
        .skill
        .map_or(false, |skill| state.level(skill, config) >= next.required_level);
    if qualifies {
        next.id.clone()
    } else {
        resource
    }
}

/// Random point in the annulus `[min_r, max_r]` around `center`, uniform by area.
fn random_point(center: GeoPoint, min_r: f64, max_r: f64, rng: &mut impl Rng) -> GeoPoint {
    let bearing = rng.gen_range(0.0..360.0);
    let u: f64 = rng.gen();
    let dist = (u * (max_r * max_r - min_r * min_r) + min_r * min_r).sqrt();
    center.destination(bearing, dist)
}

fn try_place(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    center: GeoPoint,
    ring: (f64, f64),
    rng: &mut impl Rng,
) -> Option<NodeId> {
    let resource = choose_spawn_resource(state, catalog, config, rng)?;
    let occupied: Vec<GeoPoint> = state.nodes().iter().map(|n| n.location).collect();

    for _ in 0..config.spawn_attempts_per_node {
        let point = random_point(center, ring.0, ring.1, rng);
        if occupied
            .iter()
            .any(|p| p.distance_to(&point) < config.min_distance_between_nodes)
        {
            continue;
        }
        if state
            .home_base
            .map_or(false, |base| base.distance_to(&point) < config.min_distance_from_base)
        {
            continue;
        }

        let resource = dragon_tier_up(state, catalog, config, resource, rng);
        let near_tower = state.has_upgrade(upgrades::WATCHTOWER)
            && state
                .home_base
                .map_or(false, |base| base.distance_to(&point) <= config.watchtower_influence_radius);
        let enriched = near_tower && roll(rng, config.enrichment_chance);
        let lifespan = catalog
            .resource(&resource)
            .map_or(600.0, |def| def.lifespan_secs);
        return Some(state.spawn_node(resource, point, lifespan, enriched, false));
    }
    None
}

/// Fill both rings around the player. Returns the number of nodes spawned.
pub fn spawn_pass(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> usize {
    let Some(center) = state.player_location else {
        return 0;
    };
    let radius = config.resource_spawn_radius;
    let regular: Vec<GeoPoint> = state
        .nodes()
        .iter()
        .filter(|n| !n.discovery)
        .map(|n| n.location)
        .collect();
    let mut spawned = 0;
    // nodes left behind outside both rings still count toward the cap
    let mut headroom = effective_node_cap(state, catalog, config).saturating_sub(regular.len());

    let inner = regular
        .iter()
        .filter(|p| p.distance_to(&center) < radius)
        .count();
    let inner_slots = config.base_node_cap.saturating_sub(inner).min(headroom);
    for _ in 0..inner_slots {
        if try_place(state, catalog, config, center, (0.0, radius), rng).is_some() {
            spawned += 1;
            headroom -= 1;
        }
    }

    let bonus = bonus_node_allotment(state, catalog);
    let outer_max = radius + vision_bonus(state, catalog, config);
    let outer_min = radius + config.outer_ring_min_gap;
    if bonus > 0 && outer_max > outer_min {
        let outer = regular
            .iter()
            .filter(|p| {
                let d = p.distance_to(&center);
                d >= radius && d <= outer_max
            })
            .count();
        let outer_slots = bonus.saturating_sub(outer).min(headroom);
        for _ in 0..outer_slots {
            if try_place(state, catalog, config, center, (outer_min, outer_max), rng).is_some() {
                spawned += 1;
            }
        }
    }

    state.spawner = SpawnTracker {
        last_spawn_at: Some(state.now),
        last_spawn_location: Some(center),
    };
    debug!(
        "spawn pass at ({:.5}, {:.5}): {} new, {} live",
        center.lat,
        center.lon,
        spawned,
        state.node_count()
    );
    spawned
}

/// Run a spawn pass if one is due.
pub fn update_spawns(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> usize {
    if should_spawn(state, catalog, config) {
        spawn_pass(state, catalog, config, rng)
    } else {
        0
    }
}
