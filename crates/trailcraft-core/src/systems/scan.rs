//! Horizon scan - a Watchtower action that plants one distant, rich node
//!
//! The discovery node matches the player's strongest gathering skill at the
//! highest tier that skill can work, and sits 500-1200 m away in a random
//! direction. Only one discovery exists at a time.

use log::info;
use rand::Rng;
use trailcraft_logic::catalog::{Catalog, ResourceKind};
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::constants::upgrades;
use trailcraft_logic::geo::cardinal_direction;
use trailcraft_logic::ids::ResourceId;
use trailcraft_logic::skills::Skill;

use super::FeedbackCategory;
use crate::components::NodeId;
use crate::state::GameState;

/// What a successful scan found.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub node: NodeId,
    pub resource: ResourceId,
    pub distance: f64,
    pub direction: &'static str,
    pub message: String,
}

fn family_of(skill: Skill) -> Option<ResourceKind> {
    match skill {
        Skill::Mining => Some(ResourceKind::Stone),
        Skill::Woodcutting => Some(ResourceKind::Wood),
        Skill::Foraging => Some(ResourceKind::Herb),
        _ => None,
    }
}

/// Seconds until the next scan is allowed, zero when ready.
pub fn scan_cooldown_remaining(state: &GameState, config: &GameConfig) -> f64 {
    state
        .scan
        .last_scan_at
        .map_or(0.0, |at| (at + config.scan_cooldown_secs - state.now).max(0.0))
}

/// Strongest gathering skill; ties go to the earlier skill in
/// mining, woodcutting, foraging order.
fn strongest_gathering_skill(state: &GameState, config: &GameConfig) -> (Skill, u32) {
    let mut best = (Skill::GATHERING[0], state.level(Skill::GATHERING[0], config));
    for skill in Skill::GATHERING.iter().skip(1) {
        let level = state.level(*skill, config);
        if level > best.1 {
            best = (*skill, level);
        }
    }
    best
}

pub fn horizon_scan(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Option<ScanReport> {
    if !state.has_upgrade(upgrades::WATCHTOWER) {
        state.events.feedback(
            "You need a Watchtower to scan the horizon.",
            false,
            FeedbackCategory::World,
        );
        return None;
    }
    let Some(here) = state.player_location else {
        state.events.feedback(
            "You need to know where you are to scan.",
            false,
            FeedbackCategory::World,
        );
        return None;
    };
    let remaining = scan_cooldown_remaining(state, config);
    if remaining > 0.0 {
        let minutes = (remaining / 60.0).ceil() as u64;
        state.events.feedback(
            format!(
                "The horizon is quiet. Scan again in {}h {}m.",
                minutes / 60,
                minutes % 60
            ),
            false,
            FeedbackCategory::World,
        );
        return None;
    }

    let (skill, level) = strongest_gathering_skill(state, config);
    let kind = family_of(skill)?;
    let def = catalog
        .resources
        .values()
        .filter(|r| r.kind == kind && r.required_level <= level)
        .max_by_key(|r| r.tier)?;

    if let Some(old) = state.scan.discovery.take() {
        state.remove_node(old);
    }

    let bearing = rng.gen_range(0.0..360.0);
    let distance = rng.gen_range(config.scan_min_distance..=config.scan_max_distance);
    let location = here.destination(bearing, distance);
    let node = state.spawn_node(
        def.id.clone(),
        location,
        config.discovery_lifespan_secs,
        false,
        true,
    );
    state.scan.discovery = Some(node);
    state.scan.last_scan_at = Some(state.now);

    let direction = cardinal_direction(bearing);
    let message = format!(
        "You spot a rich vein of {} about {:.0}m to the {}.",
        def.name, distance, direction
    );
    info!("horizon scan: {} at {:.0}m {}", def.id, distance, direction);
    state
        .events
        .feedback(message.clone(), true, FeedbackCategory::World);

    Some(ScanReport {
        node,
        resource: def.id.clone(),
        distance,
        direction,
        message,
    })
}
