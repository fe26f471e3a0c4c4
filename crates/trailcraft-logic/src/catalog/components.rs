//! Crafted intermediate components: ingots, planks, leather, extracts.

use serde::{Deserialize, Serialize};

use super::recipe::{GenericClass, Recipe};
use super::resources::{material_name, ResourceKind, MAX_TIER};
use crate::ids::{tiered, ComponentId};
use crate::skills::{unlock_level, Skill};

/// Explicit component category, set at authoring time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComponentCategory {
    Ingot,
    Plank,
    Leather,
    Extract,
    Cordage,
    Handle,
}

impl ComponentCategory {
    /// Skill trained (and level-gated) by crafting this category.
    pub fn skill(self) -> Skill {
        match self {
            ComponentCategory::Ingot => Skill::Smithing,
            ComponentCategory::Plank | ComponentCategory::Handle => Skill::Woodworking,
            ComponentCategory::Leather | ComponentCategory::Cordage => Skill::Leatherworking,
            ComponentCategory::Extract => Skill::Alchemy,
        }
    }

    /// Generic ingredient class this category satisfies, if any.
    pub fn generic_class(self) -> Option<GenericClass> {
        match self {
            ComponentCategory::Ingot => Some(GenericClass::Ingot),
            ComponentCategory::Plank => Some(GenericClass::Plank),
            ComponentCategory::Leather => Some(GenericClass::Leather),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDef {
    pub id: ComponentId,
    pub name: String,
    pub tier: i8,
    pub category: ComponentCategory,
    pub recipe: Option<Recipe>,
    pub craft_yield: u32,
    pub weight: f32,
}

impl ComponentDef {
    /// Crafting-skill level needed before this component can be made.
    pub fn unlock_level(&self) -> u32 {
        unlock_level(self.tier)
    }
}

pub(crate) fn smelter_for(tier: i8) -> &'static str {
    match tier {
        t if t <= 3 => "basic_forge",
        t if t <= 7 => "blast_furnace",
        _ => "star_forge",
    }
}

pub(crate) fn woodshop_for(tier: i8) -> &'static str {
    match tier {
        t if t <= 3 => "workbench",
        t if t <= 7 => "sawmill",
        _ => "artisan_workshop",
    }
}

fn tiered_component(
    category: ComponentCategory,
    tier: i8,
    name: String,
    recipe: Recipe,
    weight: f32,
) -> ComponentDef {
    let family = match category {
        ComponentCategory::Ingot => "ingot",
        ComponentCategory::Plank => "plank",
        ComponentCategory::Leather => "leather",
        ComponentCategory::Extract => "extract",
        ComponentCategory::Cordage => "cordage",
        ComponentCategory::Handle => "handle",
    };
    ComponentDef {
        id: ComponentId::from(tiered(family, tier)),
        name,
        tier,
        category,
        recipe: Some(recipe),
        craft_yield: 1,
        weight,
    }
}

/// Every craftable component.
pub fn standard_components() -> Vec<ComponentDef> {
    let mut out = vec![
        tiered_component(
            ComponentCategory::Cordage,
            0,
            "Twisted Cordage".to_string(),
            Recipe::new()
                .resource("T0_herb", 3)
                .xp(Skill::Leatherworking, 3),
            0.1,
        ),
        tiered_component(
            ComponentCategory::Handle,
            0,
            "Rough Handle".to_string(),
            Recipe::new()
                .resource("T0_wood", 2)
                .xp(Skill::Woodworking, 3),
            0.4,
        ),
    ];

    for tier in 1..=MAX_TIER {
        let xp = 10 * tier as u32;

        let metal = material_name(ResourceKind::Stone, tier);
        let ingot_name = if tier == 1 {
            "Crude Ingot".to_string()
        } else {
            format!("{} Ingot", metal.trim_end_matches(" Ore"))
        };
        out.push(tiered_component(
            ComponentCategory::Ingot,
            tier,
            ingot_name,
            Recipe::new()
                .resource(tiered("stone", tier), 3)
                .upgrade(smelter_for(tier))
                .xp(Skill::Smithing, xp),
            1.0,
        ));

        out.push(tiered_component(
            ComponentCategory::Plank,
            tier,
            format!("{} Plank", material_name(ResourceKind::Wood, tier)),
            Recipe::new()
                .resource(tiered("wood", tier), 2)
                .upgrade(woodshop_for(tier))
                .xp(Skill::Woodworking, xp),
            0.6,
        ));

        out.push(tiered_component(
            ComponentCategory::Leather,
            tier,
            format!("{} Leather", material_name(ResourceKind::Hide, tier)),
            Recipe::new()
                .resource(tiered("hide", tier), 2)
                .upgrade("tannery")
                .xp(Skill::Leatherworking, xp),
            0.4,
        ));

        out.push(tiered_component(
            ComponentCategory::Extract,
            tier,
            format!("{} Extract", material_name(ResourceKind::Herb, tier)),
            Recipe::new()
                .resource(tiered("herb", tier), 3)
                .upgrade("alchemy_lab")
                .xp(Skill::Alchemy, xp),
            0.2,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ResourceId;

    #[test]
    fn tier_one_ingot_recipe() {
        let all = standard_components();
        let ingot = all.iter().find(|c| c.id.as_str() == "T1_ingot").unwrap();
        let recipe = ingot.recipe.as_ref().unwrap();
        assert_eq!(recipe.resources[&ResourceId::from("T1_stone")], 3);
        assert_eq!(recipe.required_upgrade.as_ref().unwrap().as_str(), "basic_forge");
        assert_eq!(recipe.xp[&Skill::Smithing], 10);
        assert_eq!(ingot.unlock_level(), 1);
        assert_eq!(ingot.name, "Crude Ingot");
    }

    #[test]
    fn ingot_names_drop_ore_suffix() {
        let all = standard_components();
        let iron = all.iter().find(|c| c.id.as_str() == "T4_ingot").unwrap();
        assert_eq!(iron.name, "Iron Ingot");
        assert_eq!(
            iron.recipe.as_ref().unwrap().required_upgrade.as_ref().unwrap().as_str(),
            "blast_furnace"
        );
    }

    #[test]
    fn unlock_levels_follow_tier_formula() {
        let all = standard_components();
        for c in &all {
            let expected = match c.tier {
                0 | 1 => 1,
                2 => 5,
                t => (t as u32 - 1) * 5,
            };
            assert_eq!(c.unlock_level(), expected, "{}", c.id);
        }
    }

    #[test]
    fn categories_map_to_crafting_skills() {
        assert_eq!(ComponentCategory::Ingot.skill(), Skill::Smithing);
        assert_eq!(ComponentCategory::Extract.skill(), Skill::Alchemy);
        assert_eq!(ComponentCategory::Cordage.generic_class(), None);
    }
}
