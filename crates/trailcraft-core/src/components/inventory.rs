//! Player stock and equipped gear.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trailcraft_logic::catalog::EquipSlot;
use trailcraft_logic::ids::{ComponentId, ItemId, ResourceId};

/// Three independent stock maps plus per-tool durability.
///
/// Counts never go negative: every `remove_*` checks availability first and
/// leaves the map untouched when there is not enough.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub resources: BTreeMap<ResourceId, u32>,
    pub components: BTreeMap<ComponentId, u32>,
    pub items: BTreeMap<ItemId, u32>,
    /// Remaining durability of the active copy of each tool.
    pub durability: BTreeMap<ItemId, u32>,
}

fn add<K: Ord + Clone>(map: &mut BTreeMap<K, u32>, id: &K, qty: u32) {
    if qty > 0 {
        let entry = map.entry(id.clone()).or_insert(0);
        *entry = entry.saturating_add(qty);
    }
}

fn remove<K: Ord>(map: &mut BTreeMap<K, u32>, id: &K, qty: u32) -> bool {
    let have = map.get(id).copied().unwrap_or(0);
    if have < qty {
        return false;
    }
    if have == qty {
        map.remove(id);
    } else if let Some(count) = map.get_mut(id) {
        *count = have - qty;
    }
    true
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resource_count(&self, id: &ResourceId) -> u32 {
        self.resources.get(id).copied().unwrap_or(0)
    }

    pub fn component_count(&self, id: &ComponentId) -> u32 {
        self.components.get(id).copied().unwrap_or(0)
    }

    pub fn item_count(&self, id: &ItemId) -> u32 {
        self.items.get(id).copied().unwrap_or(0)
    }

    pub fn add_resource(&mut self, id: &ResourceId, qty: u32) {
        add(&mut self.resources, id, qty);
    }

    pub fn add_component(&mut self, id: &ComponentId, qty: u32) {
        add(&mut self.components, id, qty);
    }

    pub fn add_item(&mut self, id: &ItemId, qty: u32) {
        add(&mut self.items, id, qty);
    }

    pub fn remove_resource(&mut self, id: &ResourceId, qty: u32) -> bool {
        remove(&mut self.resources, id, qty)
    }

    pub fn remove_component(&mut self, id: &ComponentId, qty: u32) -> bool {
        remove(&mut self.components, id, qty)
    }

    pub fn remove_item(&mut self, id: &ItemId, qty: u32) -> bool {
        remove(&mut self.items, id, qty)
    }

    pub fn durability(&self, id: &ItemId) -> Option<u32> {
        self.durability.get(id).copied()
    }
}

/// Slot → equipped item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub slots: BTreeMap<EquipSlot, ItemId>,
}

impl Equipment {
    pub fn get(&self, slot: EquipSlot) -> Option<&ItemId> {
        self.slots.get(&slot)
    }

    pub fn set(&mut self, slot: EquipSlot, item: ItemId) -> Option<ItemId> {
        self.slots.insert(slot, item)
    }

    pub fn clear(&mut self, slot: EquipSlot) -> Option<ItemId> {
        self.slots.remove(&slot)
    }

    pub fn slot_of(&self, item: &ItemId) -> Option<EquipSlot> {
        self.slots
            .iter()
            .find(|(_, equipped)| *equipped == item)
            .map(|(slot, _)| *slot)
    }

    pub fn is_equipped(&self, item: &ItemId) -> bool {
        self.slot_of(item).is_some()
    }
}
