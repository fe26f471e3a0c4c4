//! Companion lifecycle - incubation, growth, training quests, fetch charges
//!
//! Creatures move hatchling → untrained adult → trained adult and never back.
//! Abilities only apply while a creature is the selected companion.

use log::{info, warn};
use trailcraft_logic::catalog::{Catalog, CreatureKind, ItemCategory};
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::constants::{specials, upgrades};
use trailcraft_logic::ids::{ItemId, ResourceId};

use super::{FeedbackCategory, SimEvent};
use crate::components::{Creature, CreatureState, IncubationSlot};
use crate::state::GameState;

// ── Incubator ──

/// Put an egg from inventory into a free incubator slot.
pub fn place_egg(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    egg: &ResourceId,
) -> bool {
    let Some(kind) = catalog.creature_for_egg(egg) else {
        state.events.feedback(
            format!("{} is not an egg.", catalog.display_name(egg.as_str())),
            false,
            FeedbackCategory::Companion,
        );
        return false;
    };
    if !state.has_upgrade(upgrades::INCUBATOR) {
        state.events.feedback(
            "You need an Incubator to hatch eggs.",
            false,
            FeedbackCategory::Companion,
        );
        return false;
    }
    if state.incubator.slots.len() >= config.incubator_slots {
        state.events.feedback(
            "The incubator is full.",
            false,
            FeedbackCategory::Companion,
        );
        return false;
    }
    if !state.inventory.remove_resource(egg, 1) {
        state.events.feedback(
            format!("You have no {}.", catalog.display_name(egg.as_str())),
            false,
            FeedbackCategory::Companion,
        );
        return false;
    }

    state.incubator.slots.push(IncubationSlot {
        egg: egg.clone(),
        kind,
        started_at: state.now,
    });
    state.events.feedback(
        format!("The {} egg is warming in the incubator.", kind.name()),
        true,
        FeedbackCategory::Companion,
    );
    true
}

/// Hatch the egg in `slot` once its incubation time has elapsed.
pub fn hatch_egg(state: &mut GameState, catalog: &Catalog, slot: usize) -> bool {
    let Some(entry) = state.incubator.slots.get(slot) else {
        return false;
    };
    let kind = entry.kind;
    let Some(def) = catalog.creature(kind) else {
        warn!("no creature definition for {:?}", kind);
        return false;
    };
    if !entry.ready(state.now, def.incubation_secs) {
        let left = (def.incubation_secs - (state.now - entry.started_at)).max(0.0);
        state.events.feedback(
            format!("The {} egg needs {} more minutes.", kind.name(), (left / 60.0).ceil()),
            false,
            FeedbackCategory::Companion,
        );
        return false;
    }

    state.incubator.slots.remove(slot);
    let id = state.companions.next_id;
    state.companions.next_id += 1;
    state
        .companions
        .creatures
        .push(Creature::hatch(id, kind, state.now, def.max_fetch_charges));
    state.unlocked_pets.insert(kind);
    if state.companions.active.is_none() {
        state.companions.active = Some(id);
    }
    info!("hatched {} #{}", kind.name(), id);
    state.events.feedback(
        format!("A {} hatched!", kind.name()),
        true,
        FeedbackCategory::Companion,
    );
    true
}

// ── Growth and training ──

/// Promote hatchlings whose growth time (plus treat credit) has elapsed.
pub fn update_pet_growth_states(state: &mut GameState, catalog: &Catalog) {
    let now = state.now;
    let mut matured = Vec::new();
    for creature in state.companions.creatures.iter_mut() {
        if creature.state != CreatureState::Hatchling {
            continue;
        }
        let (Some(started), Some(def)) = (creature.growth_started_at, catalog.creature(creature.kind))
        else {
            continue;
        };
        if now - started + creature.growth_reduction >= def.growth_secs {
            creature.state = CreatureState::UntrainedAdult;
            creature.growth_started_at = None;
            creature.growth_reduction = 0.0;
            creature.quest_progress.clear();
            matured.push((creature.id, creature.kind));
        }
    }
    for (id, kind) in matured {
        info!("{} #{} matured", kind.name(), id);
        state.events.push(SimEvent::CompanionMatured { creature: id, kind });
        state.events.feedback(
            format!("Your {} is fully grown and ready to train.", kind.name()),
            true,
            FeedbackCategory::Companion,
        );
    }
}

/// Credit quest progress to the active companion if it is in training.
pub fn update_active_pet_quest_progress(
    state: &mut GameState,
    catalog: &Catalog,
    key: &str,
    amount: u32,
) {
    let Some(creature) = state.companions.active_mut() else {
        return;
    };
    if creature.state != CreatureState::UntrainedAdult || amount == 0 {
        return;
    }
    let Some(def) = catalog.creature(creature.kind) else {
        return;
    };
    let Some(objective) = def.quest.objective(key) else {
        return;
    };

    let current = creature.quest_progress.get(key).copied().unwrap_or(0);
    if current >= objective.required {
        return;
    }
    let progress = current.saturating_add(amount).min(objective.required);
    creature.quest_progress.insert(key.to_string(), progress);

    let complete = def.quest.objectives.iter().all(|o| {
        creature.quest_progress.get(&o.key).copied().unwrap_or(0) >= o.required
    });
    let (id, kind) = (creature.id, creature.kind);
    if complete {
        creature.state = CreatureState::TrainedAdult;
        creature.quest_progress.clear();
    }

    state.events.push(SimEvent::QuestProgress {
        quest: def.quest.title.clone(),
        objective: key.to_string(),
        progress,
        required: objective.required,
    });
    if complete {
        info!("{} #{} completed training", kind.name(), id);
        state.events.push(SimEvent::CompanionTrained { creature: id, kind });
        state.events.feedback(
            format!("Your {} completed \"{}\"!", kind.name(), def.quest.title),
            true,
            FeedbackCategory::Companion,
        );
    }
}

// ── Selection and care ──

/// Select a companion, or clear the selection with `None`.
pub fn set_active_companion(state: &mut GameState, creature: Option<u32>) -> bool {
    if let Some(id) = creature {
        if state.companions.get(id).is_none() {
            return false;
        }
        if state.scout.map_or(false, |s| s.creature == id) {
            state.scout = None;
            state.events.feedback(
                "Your scout returned to your side.",
                true,
                FeedbackCategory::Companion,
            );
        }
    }
    state.companions.active = creature;
    true
}

/// Feed a treat to a hatchling to shorten its growth.
pub fn feed_pet(state: &mut GameState, catalog: &Catalog, creature: u32, treat: &ItemId) -> bool {
    let Some(reduction) = catalog
        .item(treat)
        .filter(|def| def.category == ItemCategory::PetTreat)
        .and_then(|def| def.growth_reduction_secs)
    else {
        return false;
    };
    let Some(kind) = state
        .companions
        .get(creature)
        .filter(|c| c.state == CreatureState::Hatchling)
        .map(|c| c.kind)
    else {
        state.events.feedback(
            "Only hatchlings can be fed treats.",
            false,
            FeedbackCategory::Companion,
        );
        return false;
    };
    if !state.inventory.remove_item(treat, 1) {
        state.events.feedback(
            "You have no treats.",
            false,
            FeedbackCategory::Companion,
        );
        return false;
    }
    if let Some(c) = state.companions.get_mut(creature) {
        c.growth_reduction += reduction;
    }
    state.events.feedback(
        format!("Your {} happily eats the treat.", kind.name()),
        true,
        FeedbackCategory::Companion,
    );
    true
}

// ── Abilities ──

/// Fetch-charge cap for a creature right now.
pub fn max_fetch_charges(catalog: &Catalog, config: &GameConfig, creature: &Creature, now: f64) -> u32 {
    let base = catalog
        .creature(creature.kind)
        .map_or(0, |def| def.max_fetch_charges);
    if creature.kind == CreatureKind::Owl && creature.is_trained() && config.is_night(now) {
        base + 1
    } else {
        base
    }
}

/// Spend one charge of the active companion, scheduling its restore.
pub fn spend_fetch_charge(state: &mut GameState, catalog: &Catalog) -> bool {
    let now = state.now;
    let Some(creature) = state.companions.active_mut() else {
        return false;
    };
    let Some(def) = catalog.creature(creature.kind) else {
        return false;
    };
    if creature.fetch_charges == 0 {
        return false;
    }
    creature.fetch_charges -= 1;
    creature.pending_restores.push(now + def.fetch_cooldown_secs);
    true
}

/// Undo the most recent `spend_fetch_charge`.
pub fn refund_fetch_charge(state: &mut GameState) {
    if let Some(creature) = state.companions.active_mut() {
        if creature.pending_restores.pop().is_some() {
            creature.fetch_charges += 1;
        }
    }
}

/// Turn due restores into charges and keep every creature within its cap.
pub fn restore_fetch_charges(state: &mut GameState, catalog: &Catalog, config: &GameConfig) {
    let now = state.now;
    for creature in state.companions.creatures.iter_mut() {
        let max = max_fetch_charges(catalog, config, creature, now);
        let before = creature.pending_restores.len();
        creature.pending_restores.retain(|&at| at > now);
        let due = (before - creature.pending_restores.len()) as u32;
        creature.fetch_charges += due;
        // a raised cap (owl at night) fills immediately
        while creature.fetch_charges + (creature.pending_restores.len() as u32) < max {
            creature.fetch_charges += 1;
        }
        creature.fetch_charges = creature.fetch_charges.min(max);
    }
}

/// Trained creatures shed feathers; whole ones land in inventory.
pub fn accumulate_feathers(state: &mut GameState, catalog: &Catalog, dt_secs: f64) {
    let per_hour: f64 = state
        .companions
        .creatures
        .iter()
        .filter(|c| c.is_trained())
        .filter_map(|c| catalog.creature(c.kind))
        .map(|def| def.feathers_per_hour)
        .sum();
    if per_hour <= 0.0 || dt_secs <= 0.0 {
        return;
    }
    state.feather_accumulator += per_hour * dt_secs / 3600.0;
    let whole = state.feather_accumulator.floor();
    if whole >= 1.0 {
        state.feather_accumulator -= whole;
        state
            .inventory
            .add_resource(&ResourceId::from(specials::FEATHER), whole as u32);
    }
}

/// Extra spawn radius from the selected adult companion.
pub fn vision_bonus(state: &GameState, catalog: &Catalog, config: &GameConfig) -> f64 {
    let Some(creature) = state.companions.active().filter(|c| c.state.is_adult()) else {
        return 0.0;
    };
    let Some(def) = catalog.creature(creature.kind) else {
        return 0.0;
    };
    if creature.kind == CreatureKind::Owl && creature.is_trained() && config.is_night(state.now) {
        def.vision_bonus * 2.0
    } else {
        def.vision_bonus
    }
}

/// Extra outer-ring nodes allowed by the selected adult companion.
pub fn bonus_node_allotment(state: &GameState, catalog: &Catalog) -> usize {
    state
        .companions
        .active()
        .filter(|c| c.state.is_adult())
        .and_then(|c| catalog.creature(c.kind))
        .map_or(0, |def| def.bonus_nodes)
}
