//! Equipment and stock management - equip, unequip, drop, weight

use trailcraft_logic::catalog::{Catalog, EquipSlot};
use trailcraft_logic::ids::{ComponentId, ItemId, ResourceId};

use super::{recalculate_stat_bonuses, FeedbackCategory};
use crate::state::GameState;

/// Equip an owned item into its slot, replacing whatever was there.
pub fn equip(state: &mut GameState, catalog: &Catalog, item: &ItemId) -> bool {
    let Some(def) = catalog.item(item) else {
        return false;
    };
    let Some(slot) = def.slot else {
        state.events.feedback(
            format!("{} can't be equipped.", def.name),
            false,
            FeedbackCategory::Equipment,
        );
        return false;
    };
    if state.inventory.item_count(item) == 0 {
        state.events.feedback(
            format!("You don't have a {}.", def.name),
            false,
            FeedbackCategory::Equipment,
        );
        return false;
    }

    state.equipment.set(slot, item.clone());
    if let Some(max) = def.max_durability {
        if state.inventory.durability(item).map_or(true, |d| d == 0) {
            state.inventory.durability.insert(item.clone(), max);
        }
    }
    recalculate_stat_bonuses(state, catalog);
    state.events.feedback(
        format!("Equipped {}.", def.name),
        true,
        FeedbackCategory::Equipment,
    );
    true
}

pub fn unequip(state: &mut GameState, catalog: &Catalog, slot: EquipSlot) -> bool {
    let Some(item) = state.equipment.clear(slot) else {
        return false;
    };
    recalculate_stat_bonuses(state, catalog);
    state.events.feedback(
        format!("Unequipped {}.", catalog.display_name(item.as_str())),
        true,
        FeedbackCategory::Equipment,
    );
    true
}

pub fn drop_resource(state: &mut GameState, catalog: &Catalog, id: &ResourceId, qty: u32) -> bool {
    if qty == 0 || !state.inventory.remove_resource(id, qty) {
        return false;
    }
    state.events.feedback(
        format!("Dropped {} {}.", qty, catalog.display_name(id.as_str())),
        true,
        FeedbackCategory::Equipment,
    );
    true
}

pub fn drop_component(state: &mut GameState, catalog: &Catalog, id: &ComponentId, qty: u32) -> bool {
    if qty == 0 || !state.inventory.remove_component(id, qty) {
        return false;
    }
    state.events.feedback(
        format!("Dropped {} {}.", qty, catalog.display_name(id.as_str())),
        true,
        FeedbackCategory::Equipment,
    );
    true
}

/// Drop items. Dropping the last copy of an equipped item unequips it and
/// forgets its durability.
pub fn drop_item(state: &mut GameState, catalog: &Catalog, id: &ItemId, qty: u32) -> bool {
    if qty == 0 || !state.inventory.remove_item(id, qty) {
        return false;
    }
    if state.inventory.item_count(id) == 0 {
        state.inventory.durability.remove(id);
        if let Some(slot) = state.equipment.slot_of(id) {
            state.equipment.clear(slot);
            recalculate_stat_bonuses(state, catalog);
        }
    }
    state.events.feedback(
        format!("Dropped {} {}.", qty, catalog.display_name(id.as_str())),
        true,
        FeedbackCategory::Equipment,
    );
    true
}

/// Carried weight. Equipped items are worn, so one unit of each is excluded.
pub fn inventory_weight(state: &GameState, catalog: &Catalog) -> f32 {
    let resources: f32 = state
        .inventory
        .resources
        .iter()
        .filter_map(|(id, qty)| catalog.resource(id).map(|d| d.weight * *qty as f32))
        .sum();
    let components: f32 = state
        .inventory
        .components
        .iter()
        .filter_map(|(id, qty)| catalog.component(id).map(|d| d.weight * *qty as f32))
        .sum();
    let items: f32 = state
        .inventory
        .items
        .iter()
        .filter_map(|(id, qty)| {
            let carried = if state.equipment.is_equipped(id) {
                qty.saturating_sub(1)
            } else {
                *qty
            };
            catalog.item(id).map(|d| d.weight * carried as f32)
        })
        .sum();
    resources + components + items
}
