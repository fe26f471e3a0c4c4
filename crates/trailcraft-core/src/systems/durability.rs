//! Durability system - tool wear, breakage and repair

use log::warn;
use rand::Rng;
use trailcraft_logic::catalog::Catalog;
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::gathering::{
    durability_loss, durability_save_chance, repair_xp, repaired_durability,
};
use trailcraft_logic::ids::ItemId;
use trailcraft_logic::skills::Skill;

use super::{add_xp, recalculate_stat_bonuses, roll, FeedbackCategory};
use crate::state::GameState;

/// Result of one use of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wear {
    /// No durability lost (higher tier or save roll).
    None,
    Worn { lost: u32, remaining: u32 },
    /// Reached zero: one copy destroyed.
    Broken,
}

/// Apply one use of `tool` against a resource of `resource_tier`.
///
/// `levels_above` is the player's skill level minus the resource's required
/// level; it gates the save roll for same-tier tools.
pub fn consume_durability(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    tool: &ItemId,
    resource_tier: i8,
    levels_above: i64,
    rng: &mut impl Rng,
) -> Wear {
    let Some(def) = catalog.item(tool) else {
        warn!("durability check for unknown item {}", tool);
        return Wear::None;
    };
    let Some(max) = def.max_durability else {
        return Wear::None;
    };

    let saved = durability_save_chance(config, def.tier, resource_tier, levels_above)
        .map_or(false, |chance| roll(rng, chance));
    let loss = durability_loss(def.tier, resource_tier, saved);
    if loss == 0 {
        return Wear::None;
    }

    let current = state.inventory.durability(tool).unwrap_or(max).min(max);
    let remaining = current.saturating_sub(loss);
    if remaining > 0 {
        state.inventory.durability.insert(tool.clone(), remaining);
        return Wear::Worn { lost: loss, remaining };
    }

    state.inventory.durability.remove(tool);
    state.inventory.remove_item(tool, 1);
    if let Some(slot) = state.equipment.slot_of(tool) {
        state.equipment.clear(slot);
        recalculate_stat_bonuses(state, catalog);
    }
    state.events.feedback(
        format!("Your {} broke!", def.name),
        false,
        FeedbackCategory::Equipment,
    );
    Wear::Broken
}

/// Restore a tool's durability with a repair item.
pub fn repair_tool(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    tool: &ItemId,
    repair_item: &ItemId,
) -> bool {
    let (Some(tool_def), Some(kit_def)) = (catalog.item(tool), catalog.item(repair_item)) else {
        warn!("repair with unknown item {} / {}", tool, repair_item);
        return false;
    };
    let (Some(max), Some(fraction)) = (tool_def.max_durability, kit_def.repair_fraction) else {
        state.events.feedback(
            format!("{} cannot repair {}.", kit_def.name, tool_def.name),
            false,
            FeedbackCategory::Equipment,
        );
        return false;
    };
    if state.inventory.item_count(repair_item) == 0 {
        state.events.feedback(
            format!("You have no {}.", kit_def.name),
            false,
            FeedbackCategory::Equipment,
        );
        return false;
    }
    let Some(current) = state.inventory.durability(tool) else {
        state.events.feedback(
            format!("You have no {} in use.", tool_def.name),
            false,
            FeedbackCategory::Equipment,
        );
        return false;
    };
    if current >= max {
        state.events.feedback(
            format!("Your {} is already in perfect condition.", tool_def.name),
            false,
            FeedbackCategory::Equipment,
        );
        return false;
    }

    let restored = repaired_durability(current, max, fraction);
    state.inventory.remove_item(repair_item, 1);
    state.inventory.durability.insert(tool.clone(), restored);
    add_xp(state, config, Skill::Smithing, repair_xp(tool_def.tier) as f64);
    state.events.feedback(
        format!("Repaired {} ({}/{}).", tool_def.name, restored, max),
        true,
        FeedbackCategory::Equipment,
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use trailcraft_logic::catalog::EquipSlot;

    fn lucky() -> StepRng {
        StepRng::new(0, 0)
    }

    fn unlucky() -> StepRng {
        StepRng::new(0xFFFF_FFFF_0000_0000, 0)
    }

    fn with_pickaxe(tier: i8, durability: u32) -> (GameState, ItemId) {
        let mut state = GameState::new();
        let id = ItemId::from(format!("T{}_pickaxe", tier));
        state.inventory.add_item(&id, 1);
        state.inventory.durability.insert(id.clone(), durability);
        state.equipment.set(EquipSlot::Pickaxe, id.clone());
        (state, id)
    }

    #[test]
    fn higher_tier_tool_never_wears() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let (mut state, pick) = with_pickaxe(3, 10);
        let wear = consume_durability(&mut state, &catalog, &config, &pick, 2, 0, &mut unlucky());
        assert_eq!(wear, Wear::None);
        assert_eq!(state.inventory.durability(&pick), Some(10));
    }

    #[test]
    fn same_tier_loses_one_and_lower_loses_two() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let (mut state, pick) = with_pickaxe(2, 10);
        consume_durability(&mut state, &catalog, &config, &pick, 2, 0, &mut unlucky());
        assert_eq!(state.inventory.durability(&pick), Some(9));
        consume_durability(&mut state, &catalog, &config, &pick, 3, 0, &mut unlucky());
        assert_eq!(state.inventory.durability(&pick), Some(7));
    }

    #[test]
    fn save_roll_needs_level_margin() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let (mut state, pick) = with_pickaxe(2, 10);
        // two levels above: no save roll even with a lucky rng
        consume_durability(&mut state, &catalog, &config, &pick, 2, 2, &mut lucky());
        assert_eq!(state.inventory.durability(&pick), Some(9));
        // three levels above: lucky rng saves
        let wear = consume_durability(&mut state, &catalog, &config, &pick, 2, 3, &mut lucky());
        assert_eq!(wear, Wear::None);
        assert_eq!(state.inventory.durability(&pick), Some(9));
    }

    #[test]
    fn breaking_removes_entry_and_one_copy() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let (mut state, pick) = with_pickaxe(1, 1);
        state.inventory.add_item(&pick, 1);
        let wear = consume_durability(&mut state, &catalog, &config, &pick, 1, 0, &mut unlucky());
        assert_eq!(wear, Wear::Broken);
        assert_eq!(state.inventory.durability(&pick), None);
        assert_eq!(state.inventory.item_count(&pick), 1);
        assert!(state.equipment.get(EquipSlot::Pickaxe).is_none());
    }

    #[test]
    fn repair_clamps_and_grants_xp() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let (mut state, pick) = with_pickaxe(2, 60);
        let kit = ItemId::from("repair_kit");
        state.inventory.add_item(&kit, 2);
        // max 70, +35 clamps to 70
        assert!(repair_tool(&mut state, &catalog, &config, &pick, &kit));
        assert_eq!(state.inventory.durability(&pick), Some(70));
        assert_eq!(state.inventory.item_count(&kit), 1);
        assert_eq!(state.skills.xp(Skill::Smithing), 8);
        // already full
        assert!(!repair_tool(&mut state, &catalog, &config, &pick, &kit));
        assert_eq!(state.inventory.item_count(&kit), 1);
    }
}
