//! Crafting resolver - recipe validation, efficiency saves and outputs
//!
//! Components and items share one path. Generic ingredient lines resolve to
//! the lowest-tier stack that still covers the quantity after every explicit
//! line has been reserved.

use log::warn;
use rand::Rng;
use std::collections::BTreeMap;
use trailcraft_logic::catalog::{
    Catalog, ComponentCategory, EquipSlot, GenericMember, Recipe,
};
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::constants::{
    objectives, upgrades, SMELT_OBJECTIVE_MIN_TIER, TOOL_OBJECTIVE_MIN_TIER,
};
use trailcraft_logic::ids::{ComponentId, ItemId, ResourceId};
use trailcraft_logic::skills::Skill;

use super::{
    add_xp, recalculate_stat_bonuses, roll, update_active_pet_quest_progress, FeedbackCategory,
};
use crate::state::GameState;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CraftTarget {
    Component(ComponentId),
    Item(ItemId),
}

impl CraftTarget {
    pub fn component(id: impl Into<String>) -> Self {
        CraftTarget::Component(ComponentId::new(id))
    }

    pub fn item(id: impl Into<String>) -> Self {
        CraftTarget::Item(ItemId::new(id))
    }
}

/// A concrete ingredient line, generics already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingredient {
    Resource(ResourceId, u32),
    Component(ComponentId, u32),
    Item(ItemId, u32),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum StockKey {
    Resource(ResourceId),
    Component(ComponentId),
    Item(ItemId),
}

fn on_hand(state: &GameState, key: &StockKey) -> u32 {
    match key {
        StockKey::Resource(id) => state.inventory.resource_count(id),
        StockKey::Component(id) => state.inventory.component_count(id),
        StockKey::Item(id) => state.inventory.item_count(id),
    }
}

/// Resolve a recipe against current stock. `Err` carries the first shortfall.
pub fn resolve_ingredients(
    state: &GameState,
    catalog: &Catalog,
    recipe: &Recipe,
) -> Result<Vec<Ingredient>, String> {
    let mut reserved: BTreeMap<StockKey, u32> = BTreeMap::new();
    let mut lines = Vec::with_capacity(recipe.line_count());

    let explicit = recipe
        .resources
        .iter()
        .map(|(id, qty)| (StockKey::Resource(id.clone()), *qty, catalog.display_name(id.as_str())))
        .chain(recipe.components.iter().map(|(id, qty)| {
            (StockKey::Component(id.clone()), *qty, catalog.display_name(id.as_str()))
        }))
        .chain(recipe.items.iter().map(|(id, qty)| {
            (StockKey::Item(id.clone()), *qty, catalog.display_name(id.as_str()))
        }));

    for (key, qty, name) in explicit {
        let have = on_hand(state, &key);
        if have < qty {
            return Err(format!("Need {} {} (have {}).", qty, name, have));
        }
        *reserved.entry(key.clone()).or_insert(0) += qty;
        lines.push(match key {
            StockKey::Resource(id) => Ingredient::Resource(id, qty),
            StockKey::Component(id) => Ingredient::Component(id, qty),
            StockKey::Item(id) => Ingredient::Item(id, qty),
        });
    }

    for (generic, qty) in &recipe.generics {
        let chosen = catalog.generic_members(generic).into_iter().find_map(|member| {
            let key = match member {
                GenericMember::Resource(id) => StockKey::Resource(id),
                GenericMember::Component(id) => StockKey::Component(id),
            };
            let free = on_hand(state, &key).saturating_sub(reserved.get(&key).copied().unwrap_or(0));
            (free >= *qty).then_some(key)
        });
        let Some(key) = chosen else {
            let tier = if generic.min_tier > 0 {
                format!("tier {}+ ", generic.min_tier)
            } else {
                String::new()
            };
            return Err(format!("Need {} {}{}.", qty, tier, generic.class.label()));
        };
        *reserved.entry(key.clone()).or_insert(0) += qty;
        lines.push(match key {
            StockKey::Resource(id) => Ingredient::Resource(id, *qty),
            StockKey::Component(id) => Ingredient::Component(id, *qty),
            StockKey::Item(id) => Ingredient::Item(id, *qty),
        });
    }

    Ok(lines)
}

/// Debit one resolved line. Lines come from `resolve_ingredients`, so stock
/// is already known to cover them.
pub(crate) fn deduct(state: &mut GameState, line: &Ingredient) {
    let ok = match line {
        Ingredient::Resource(id, qty) => state.inventory.remove_resource(id, *qty),
        Ingredient::Component(id, qty) => state.inventory.remove_component(id, *qty),
        Ingredient::Item(id, qty) => state.inventory.remove_item(id, *qty),
    };
    if !ok {
        warn!("ingredient {:?} vanished mid-craft", line);
    }
}

/// Everything `craft` needs once the checks pass.
struct CraftPlan<'a> {
    name: &'a str,
    tier: i8,
    recipe: &'a Recipe,
    craft_yield: u32,
    lines: Vec<Ingredient>,
}

fn plan<'a>(
    state: &GameState,
    catalog: &'a Catalog,
    config: &GameConfig,
    target: &CraftTarget,
) -> Result<CraftPlan<'a>, String> {
    let (name, tier, recipe, skill, unlock, craft_yield) = match target {
        CraftTarget::Component(id) => {
            let def = catalog
                .component(id)
                .ok_or_else(|| format!("Unknown component {}.", id))?;
            (
                def.name.as_str(),
                def.tier,
                def.recipe.as_ref(),
                Some(def.category.skill()),
                def.unlock_level(),
                def.craft_yield,
            )
        }
        CraftTarget::Item(id) => {
            let def = catalog
                .item(id)
                .ok_or_else(|| format!("Unknown item {}.", id))?;
            (
                def.name.as_str(),
                def.tier,
                def.recipe.as_ref(),
                def.craft_skill,
                def.unlock_level(),
                def.craft_yield,
            )
        }
    };

    let Some(recipe) = recipe else {
        return Err(format!("{} can't be crafted.", name));
    };
    let Some(skill) = skill else {
        warn!("{} has a recipe but no crafting skill", name);
        return Err(format!("{} can't be crafted.", name));
    };
    if let Some(upgrade) = &recipe.required_upgrade {
        if !state.upgrades.contains(upgrade) {
            let building = catalog
                .upgrade(upgrade)
                .map(|u| u.name.clone())
                .unwrap_or_else(|| {
                    warn!("recipe for {} names unknown upgrade {}", name, upgrade);
                    upgrade.to_string()
                });
            return Err(format!("Requires {}.", building));
        }
    }
    let level = state.level(skill, config);
    if level < unlock {
        return Err(format!(
            "{} requires {} level {} (you are {}).",
            name,
            skill.name(),
            unlock,
            level
        ));
    }
    let lines = resolve_ingredients(state, catalog, recipe)?;

    Ok(CraftPlan {
        name,
        tier,
        recipe,
        craft_yield,
        lines,
    })
}

/// Whether `craft` would succeed right now.
pub fn can_craft(state: &GameState, catalog: &Catalog, config: &GameConfig, target: &CraftTarget) -> bool {
    plan(state, catalog, config, target).is_ok()
}

/// Why `craft` would fail, if it would.
pub fn craft_blocker(
    state: &GameState,
    catalog: &Catalog,
    config: &GameConfig,
    target: &CraftTarget,
) -> Option<String> {
    plan(state, catalog, config, target).err()
}

/// Craft one batch of `target`.
pub fn craft(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    target: &CraftTarget,
    rng: &mut impl Rng,
) -> bool {
    let plan = match plan(state, catalog, config, target) {
        Ok(plan) => plan,
        Err(reason) => {
            state.events.feedback(reason, false, FeedbackCategory::Craft);
            return false;
        }
    };

    // at most one line is ever saved per craft
    let efficiency = if state.has_upgrade(upgrades::STOREHOUSE) {
        config.storehouse_efficiency_chance
    } else {
        0.0
    };
    let mut saved: Option<&Ingredient> = None;
    for line in &plan.lines {
        if saved.is_none() && roll(rng, efficiency) {
            saved = Some(line);
            continue;
        }
        deduct(state, line);
    }

    match target {
        CraftTarget::Component(id) => {
            state.inventory.add_component(id, plan.craft_yield);
            update_active_pet_quest_progress(state, catalog, objectives::CRAFT_COMPONENT, 1);
            let is_ingot = catalog
                .component(id)
                .map_or(false, |def| def.category == ComponentCategory::Ingot);
            if is_ingot && plan.tier >= SMELT_OBJECTIVE_MIN_TIER {
                update_active_pet_quest_progress(
                    state,
                    catalog,
                    objectives::SMELT_INGOT_T6,
                    plan.craft_yield,
                );
            }
        }
        CraftTarget::Item(id) => {
            receive_item(state, catalog, id, plan.craft_yield);
            let is_tool = catalog.item(id).map_or(false, |def| def.is_tool());
            if is_tool && plan.tier >= TOOL_OBJECTIVE_MIN_TIER {
                update_active_pet_quest_progress(state, catalog, objectives::CRAFT_TOOL_T10, 1);
            }
        }
    }

    let mut xp_note = Vec::new();
    for (skill, amount) in &plan.recipe.xp {
        let gained = add_xp(state, config, *skill, *amount as f64);
        xp_note.push(format!("+{} {} XP", gained, skill.name()));
    }
    recalculate_stat_bonuses(state, catalog);

    let mut message = format!("Crafted {} {}", plan.craft_yield, plan.name);
    if !xp_note.is_empty() {
        message.push_str(&format!(" ({})", xp_note.join(", ")));
    }
    if let Some(line) = saved {
        let id = match line {
            Ingredient::Resource(id, _) => id.as_str(),
            Ingredient::Component(id, _) => id.as_str(),
            Ingredient::Item(id, _) => id.as_str(),
        };
        message.push_str(&format!(". Saved your {}!", catalog.display_name(id)));
    }
    state.events.feedback(message, true, FeedbackCategory::Craft);
    true
}

/// Add a crafted item, retiring a superseded bag and arming new tools.
fn receive_item(state: &mut GameState, catalog: &Catalog, id: &ItemId, qty: u32) {
    let Some(def) = catalog.item(id) else {
        return;
    };
    if let Some(old) = &def.upgrades_bag {
        if state.inventory.remove_item(old, 1) {
            if state.equipment.get(EquipSlot::Bag) == Some(old) {
                state.equipment.set(EquipSlot::Bag, id.clone());
            }
            state.events.feedback(
                format!(
                    "Your {} was reworked into the {}.",
                    catalog.display_name(old.as_str()),
                    def.name
                ),
                true,
                FeedbackCategory::Craft,
            );
        }
    }
    state.inventory.add_item(id, qty);
    if let Some(max) = def.max_durability {
        if state.inventory.durability(id).map_or(true, |d| d == 0) {
            state.inventory.durability.insert(id.clone(), max);
        }
    }
}
