//! Scouts - a trained companion sent out to gather on its own

use log::info;
use rand::Rng;
use trailcraft_logic::catalog::{Catalog, ResourceKind};
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::gathering::clamp_to_capacity;

use super::FeedbackCategory;
use crate::components::ScoutAssignment;
use crate::state::GameState;

/// Send a trained creature that is not the active companion out scouting.
pub fn assign_scout(
    state: &mut GameState,
    catalog: &Catalog,
    creature: u32,
    family: ResourceKind,
) -> bool {
    let Some(c) = state.companions.get(creature) else {
        return false;
    };
    let name = catalog
        .creature(c.kind)
        .map_or_else(|| c.kind.name().to_string(), |d| d.name.clone());
    if !c.is_trained() {
        state.events.feedback(
            format!("Your {} needs training before it can scout.", name),
            false,
            FeedbackCategory::Companion,
        );
        return false;
    }
    if state.companions.active == Some(creature) {
        state.events.feedback(
            format!("Your {} is at your side and can't scout.", name),
            false,
            FeedbackCategory::Companion,
        );
        return false;
    }
    if !family.is_standard_gather() {
        return false;
    }
    state.scout = Some(ScoutAssignment { creature, family });
    info!("{} scouting for {:?}", name, family);
    state.events.feedback(
        format!("Your {} sets off to scout.", name),
        true,
        FeedbackCategory::Companion,
    );
    true
}

pub fn clear_scout(state: &mut GameState) -> bool {
    state.scout.take().is_some()
}

/// One scout trip. Returns the units brought back.
pub fn scout_tick(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> u32 {
    let Some(assignment) = state.scout else {
        return 0;
    };
    // scouts that were selected or lost since assignment go home
    let Some(kind) = state
        .companions
        .get(assignment.creature)
        .filter(|c| c.is_trained())
        .map(|c| c.kind)
    else {
        state.scout = None;
        return 0;
    };
    if state.companions.active == Some(assignment.creature) {
        state.scout = None;
        return 0;
    }
    let Some(skill) = assignment.family.skill() else {
        return 0;
    };
    let level = state.level(skill, config);
    let Some(def) = catalog
        .resources
        .values()
        .filter(|r| r.kind == assignment.family && r.required_level <= level)
        .max_by_key(|r| r.tier)
    else {
        return 0;
    };

    let amount = rng.gen_range(config.scout_yield_min..=config.scout_yield_max);
    let added = clamp_to_capacity(
        amount,
        state.stored(catalog, def.storage),
        state.capacity(catalog, config, def.storage),
    );
    if added == 0 {
        state.events.feedback(
            format!("Your {} returned but your bag is full.", kind.name()),
            false,
            FeedbackCategory::Companion,
        );
        return 0;
    }
    state.inventory.add_resource(&def.id, added);
    state.events.feedback(
        format!("Your {} brought back {} {}.", kind.name(), added, def.name),
        true,
        FeedbackCategory::Companion,
    );
    added
}
