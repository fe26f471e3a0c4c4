//! Hunting - tracks resolve to hides through a success roll
//!
//! A knife is mandatory. Tracks from `hunt_bow_required_tier` up also need a
//! bow and arrows; below that, a bow with arrows only improves the odds.

use log::warn;
use rand::Rng;
use trailcraft_logic::catalog::{Catalog, CreatureKind, EquipSlot, ResourceDef};
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::constants::objectives;
use trailcraft_logic::gathering::{
    clamp_to_capacity, hunt_chance, hunt_xp, hunt_yield_range, HuntOdds,
};
use trailcraft_logic::ids::ItemId;
use trailcraft_logic::skills::{Skill, Stat};

use super::{
    add_xp, consume_durability, handle_rare_drops, roll, update_active_pet_quest_progress,
    GatherMode, GatherResult,
};
use crate::state::GameState;

/// Equipped item in `slot` with its tier.
fn equipped_tier(state: &GameState, catalog: &Catalog, slot: EquipSlot) -> Option<(ItemId, i8)> {
    state
        .equipment
        .get(slot)
        .and_then(|id| catalog.item(id).map(|def| (id.clone(), def.tier)))
}

/// Use up one equipped arrow, unequipping the stack when it runs out.
fn consume_arrow(state: &mut GameState, arrow: &ItemId) {
    state.inventory.remove_item(arrow, 1);
    if state.inventory.item_count(arrow) == 0 {
        state.equipment.clear(EquipSlot::Ammo);
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn resolve_hunt(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    track: &ResourceDef,
    skill: Skill,
    level: u32,
    mode: GatherMode,
    rng: &mut impl Rng,
) -> GatherResult {
    let Some(hide) = track.hide.as_ref().and_then(|id| catalog.resource(id)) else {
        warn!("track {} has no hide", track.id);
        return GatherResult::invalid(format!("{} leads nowhere.", track.name));
    };

    if let GatherMode::Fetch(kind) = mode {
        // companions always bring something back
        let (lo, hi) = hunt_yield_range(0);
        let amount = rng.gen_range(lo..=hi);
        let added = clamp_to_capacity(
            amount,
            state.stored(catalog, hide.storage),
            state.capacity(catalog, config, hide.storage),
        );
        let gained = add_xp(state, config, skill, hunt_xp(track.base_xp, 0, true));
        handle_rare_drops(state, catalog, config, track, rng);
        if added == 0 {
            return GatherResult::failure(format!(
                "Your {} caught a {} but you have no room for the {}.",
                kind.name(),
                animal(track),
                hide.name
            ));
        }
        update_active_pet_quest_progress(state, catalog, objectives::HUNT_SUCCESS, 1);
        state.inventory.add_resource(&hide.id, added);
        return GatherResult::success(format!(
            "Your {} brought back {} {} (+{} XP)",
            kind.name(),
            added,
            hide.name,
            gained
        ));
    }

    // ── Equipment checks ──
    let min_knife = track.tool.map_or(track.tier - 1, |req| req.min_tier);
    let knife = match equipped_tier(state, catalog, EquipSlot::Knife) {
        Some((id, tier)) if tier >= min_knife => (id, tier),
        _ => {
            return GatherResult::invalid(format!(
                "You need a tier {}+ knife to hunt {}.",
                min_knife,
                animal(track)
            ))
        }
    };
    let bow = equipped_tier(state, catalog, EquipSlot::Bow);
    let arrow = equipped_tier(state, catalog, EquipSlot::Ammo)
        .filter(|(id, _)| state.inventory.item_count(id) > 0);
    let ranged = bow.zip(arrow);
    if track.tier >= config.hunt_bow_required_tier && ranged.is_none() {
        return GatherResult::invalid(format!(
            "{} is too wary. You need a bow and arrows.",
            animal(track)
        ));
    }

    // ── Roll ──
    let hawk = state.companions.active_trained(CreatureKind::Hawk);
    let odds = HuntOdds {
        level_delta: level as i64 - track.required_level as i64,
        bow_tier: ranged.as_ref().map(|((_, t), _)| *t),
        arrow_tier: ranged.as_ref().map(|(_, (_, t))| *t),
        gear_bonus: state.bonuses.get(Stat::HuntSuccess),
        companion_bonus: if hawk { config.hawk_hunt_bonus } else { 0.0 },
    };
    let chance = hunt_chance(config, &odds);
    let success = roll(rng, chance);
    let levels_above = level as i64 - track.required_level as i64;

    if !success {
        if let Some(((bow_id, _), (arrow_id, _))) = &ranged {
            consume_arrow(state, arrow_id);
            consume_durability(state, catalog, config, bow_id, track.tier, levels_above, rng);
        }
        consume_durability(state, catalog, config, &knife.0, track.tier, levels_above, rng);
        let gained = add_xp(state, config, skill, hunt_xp(track.base_xp, knife.1, false));
        return GatherResult::failure(format!(
            "The {} got away. (+{} XP)",
            animal(track),
            gained
        ));
    }

    let (lo, hi) = hunt_yield_range(knife.1);
    let amount = rng.gen_range(lo..=hi);
    let added = clamp_to_capacity(
        amount,
        state.stored(catalog, hide.storage),
        state.capacity(catalog, config, hide.storage),
    );

    if let Some(((bow_id, _), (arrow_id, _))) = &ranged {
        let saved = hawk && roll(rng, config.hawk_arrow_save_chance);
        if !saved {
            consume_arrow(state, arrow_id);
        }
        consume_durability(state, catalog, config, bow_id, track.tier, levels_above, rng);
    }
    consume_durability(state, catalog, config, &knife.0, track.tier, levels_above, rng);

    state.inventory.add_resource(&hide.id, added);
    let gained = add_xp(state, config, skill, hunt_xp(track.base_xp, knife.1, true));
    handle_rare_drops(state, catalog, config, track, rng);

    if added == 0 {
        return GatherResult::failure(format!(
            "You caught the {} but have no room for the {}. (+{} XP)",
            animal(track),
            hide.name,
            gained
        ));
    }
    update_active_pet_quest_progress(state, catalog, objectives::HUNT_SUCCESS, 1);
    GatherResult::success(format!(
        "Hunted {} and took {} {} (+{} XP)",
        animal(track),
        added,
        hide.name,
        gained
    ))
}

/// "Deer Tracks" → "Deer".
fn animal(track: &ResourceDef) -> &str {
    track.name.trim_end_matches(" Tracks")
}
