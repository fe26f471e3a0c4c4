//! Finished items: tools, ammunition, bags, gear and consumables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::components::{smelter_for, woodshop_for};
use super::recipe::{GenericClass, GenericIngredient, Recipe};
use super::resources::{material_name, ResourceKind, MAX_TIER};
use crate::ids::{tiered, ItemId};
use crate::skills::{unlock_level, Skill, Stat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ToolCategory {
    Pickaxe,
    Axe,
    Knife,
    Bow,
}

impl ToolCategory {
    pub const ALL: [ToolCategory; 4] = [
        ToolCategory::Pickaxe,
        ToolCategory::Axe,
        ToolCategory::Knife,
        ToolCategory::Bow,
    ];

    pub fn slot(self) -> EquipSlot {
        match self {
            ToolCategory::Pickaxe => EquipSlot::Pickaxe,
            ToolCategory::Axe => EquipSlot::Axe,
            ToolCategory::Knife => EquipSlot::Knife,
            ToolCategory::Bow => EquipSlot::Bow,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ToolCategory::Pickaxe => "pickaxe",
            ToolCategory::Axe => "axe",
            ToolCategory::Knife => "knife",
            ToolCategory::Bow => "bow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Pickaxe,
    Axe,
    Knife,
    Bow,
    Ammo,
    Bag,
    Head,
    Body,
    Hands,
    Neck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PotionKind {
    /// Multiplies gather yield while active.
    IncreasedYield,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCategory {
    Tool(ToolCategory),
    Ammo,
    Bag,
    Gear,
    Potion(PotionKind),
    PetTreat,
    Repair,
}

/// Extra raw-resource capacity granted by an equipped bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagCapacity {
    pub general: u32,
    pub herb: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    pub tier: i8,
    pub category: ItemCategory,
    pub max_durability: Option<u32>,
    pub slot: Option<EquipSlot>,
    pub stat_bonuses: BTreeMap<Stat, f64>,
    /// Units produced per craft.
    pub craft_yield: u32,
    pub recipe: Option<Recipe>,
    /// Skill whose level gates crafting (unlock level from tier).
    pub craft_skill: Option<Skill>,
    pub weight: f32,
    /// Lower-tier bag this one replaces in storage when crafted.
    pub upgrades_bag: Option<ItemId>,
    pub bag_capacity: Option<BagCapacity>,
    /// Fraction of max durability restored when used to repair.
    pub repair_fraction: Option<f64>,
    /// Seconds of growth credited to a hatchling when fed.
    pub growth_reduction_secs: Option<f64>,
}

impl ItemDef {
    pub fn tool_category(&self) -> Option<ToolCategory> {
        match self.category {
            ItemCategory::Tool(cat) => Some(cat),
            _ => None,
        }
    }

    pub fn is_tool(&self) -> bool {
        self.tool_category().is_some()
    }

    pub fn unlock_level(&self) -> u32 {
        unlock_level(self.tier)
    }

    fn base(id: impl Into<String>, name: impl Into<String>, tier: i8, category: ItemCategory) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            tier,
            category,
            max_durability: None,
            slot: None,
            stat_bonuses: BTreeMap::new(),
            craft_yield: 1,
            recipe: None,
            craft_skill: None,
            weight: 1.0,
            upgrades_bag: None,
            bag_capacity: None,
            repair_fraction: None,
            growth_reduction_secs: None,
        }
    }

    fn with_recipe(mut self, skill: Skill, recipe: Recipe) -> Self {
        self.craft_skill = Some(skill);
        self.recipe = Some(recipe);
        self
    }

    fn with_slot(mut self, slot: EquipSlot) -> Self {
        self.slot = Some(slot);
        self
    }

    fn with_bonus(mut self, stat: Stat, value: f64) -> Self {
        self.stat_bonuses.insert(stat, value);
        self
    }

    fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }
}

/// Max durability for a tool of the given tier.
pub fn tool_durability(tier: i8) -> u32 {
    30 + 20 * tier.max(0) as u32
}

fn metal_name(tier: i8) -> String {
    if tier == 1 {
        "Flint".to_string()
    } else {
        material_name(ResourceKind::Stone, tier)
            .trim_end_matches(" Ore")
            .to_string()
    }
}

fn tool(category: ToolCategory, tier: i8) -> ItemDef {
    let id = tiered(category.label(), tier);
    let name = match category {
        ToolCategory::Pickaxe => format!("{} Pickaxe", metal_name(tier)),
        ToolCategory::Axe if tier == 1 => "Flint Hatchet".to_string(),
        ToolCategory::Axe => format!("{} Axe", metal_name(tier)),
        ToolCategory::Knife => format!("{} Knife", metal_name(tier)),
        ToolCategory::Bow if tier == 1 => "Simple Bow".to_string(),
        ToolCategory::Bow => format!("{} Bow", material_name(ResourceKind::Wood, tier)),
    };

    let ingot = tiered("ingot", tier);
    let plank = tiered("plank", tier);
    let leather = tiered("leather", tier);

    let (skill, recipe) = match (category, tier) {
        (ToolCategory::Pickaxe, 1) => (
            Skill::Smithing,
            Recipe::new()
                .component("T0_handle", 1)
                .component("T0_cordage", 1)
                .resource("T0_stone", 3),
        ),
        (ToolCategory::Axe, 1) => (
            Skill::Smithing,
            Recipe::new()
                .component("T0_handle", 1)
                .component("T0_cordage", 1)
                .resource("T0_stone", 2),
        ),
        (ToolCategory::Knife, 1) => (
            Skill::Smithing,
            Recipe::new()
                .component("T0_cordage", 1)
                .resource("T0_stone", 2),
        ),
        (ToolCategory::Bow, 1) => (
            Skill::Woodworking,
            Recipe::new()
                .component("T0_handle", 2)
                .component("T0_cordage", 2),
        ),
        (ToolCategory::Pickaxe, _) => (
            Skill::Smithing,
            Recipe::new()
                .component(&ingot, 3)
                .component(&plank, 1)
                .upgrade(smelter_for(tier)),
        ),
        (ToolCategory::Axe, _) => (
            Skill::Smithing,
            Recipe::new()
                .component(&ingot, 2)
                .component(&plank, 2)
                .upgrade(smelter_for(tier)),
        ),
        (ToolCategory::Knife, _) => (
            Skill::Smithing,
            Recipe::new()
                .component(&ingot, 2)
                .component(&leather, 1)
                .upgrade(smelter_for(tier)),
        ),
        (ToolCategory::Bow, _) => (
            Skill::Woodworking,
            Recipe::new()
                .component(&plank, 3)
                .component("T0_cordage", 2)
                .component(&leather, 1)
                .upgrade(woodshop_for(tier)),
        ),
    };
    let xp = if tier == 1 { 8 } else { 15 * tier as u32 };

    let mut def = ItemDef::base(id, name, tier, ItemCategory::Tool(category))
        .with_recipe(skill, recipe.xp(skill, xp))
        .with_slot(category.slot())
        .with_weight(1.5 + 0.1 * tier as f32);
    def.max_durability = Some(tool_durability(tier));
    def
}

fn arrow(tier: i8) -> ItemDef {
    let recipe = if tier == 1 {
        Recipe::new()
            .resource("T0_wood", 2)
            .resource("T0_stone", 1)
            .resource("feather", 1)
    } else {
        Recipe::new()
            .component(tiered("plank", tier), 1)
            .component(tiered("ingot", tier), 1)
            .resource("feather", 1)
            .upgrade(woodshop_for(tier))
    };
    let mut def = ItemDef::base(
        tiered("arrow", tier),
        format!("{}-tipped Arrow", metal_name(tier)),
        tier,
        ItemCategory::Ammo,
    )
    .with_recipe(Skill::Woodworking, recipe.xp(Skill::Woodworking, 5 * tier as u32))
    .with_slot(EquipSlot::Ammo)
    .with_weight(0.05);
    def.craft_yield = 5;
    def
}

fn bag(
    tier: i8,
    name: &str,
    recipe: Recipe,
    capacity: BagCapacity,
    replaces: Option<&str>,
) -> ItemDef {
    let mut def = ItemDef::base(tiered("bag", tier), name, tier, ItemCategory::Bag)
        .with_recipe(Skill::Leatherworking, recipe)
        .with_slot(EquipSlot::Bag)
        .with_weight(0.5);
    def.bag_capacity = Some(capacity);
    def.upgrades_bag = replaces.map(ItemId::from);
    def
}

fn bags() -> Vec<ItemDef> {
    vec![
        bag(
            1,
            "Rough Satchel",
            Recipe::new()
                .component("T1_leather", 3)
                .component("T0_cordage", 2)
                .upgrade("tannery")
                .xp(Skill::Leatherworking, 20),
            BagCapacity { general: 50, herb: 20 },
            None,
        ),
        bag(
            3,
            "Traveler's Pack",
            Recipe::new()
                .component("T3_leather", 5)
                .component("T3_plank", 1)
                .upgrade("tannery")
                .xp(Skill::Leatherworking, 60),
            BagCapacity { general: 150, herb: 60 },
            Some("T1_bag"),
        ),
        bag(
            5,
            "Expedition Pack",
            Recipe::new()
                .component("T5_leather", 6)
                .component("T5_ingot", 2)
                .upgrade("tannery")
                .xp(Skill::Leatherworking, 100),
            BagCapacity { general: 300, herb: 120 },
            Some("T3_bag"),
        ),
        bag(
            7,
            "Pathfinder's Rucksack",
            Recipe::new()
                .component("T7_leather", 8)
                .component("T7_ingot", 3)
                .upgrade("tannery")
                .xp(Skill::Leatherworking, 150),
            BagCapacity { general: 600, herb: 250 },
            Some("T5_bag"),
        ),
    ]
}

fn gear() -> Vec<ItemDef> {
    let gem = GenericIngredient::any(GenericClass::Gem);
    vec![
        ItemDef::base("forager_gloves", "Forager's Gloves", 2, ItemCategory::Gear)
            .with_recipe(
                Skill::Leatherworking,
                Recipe::new()
                    .component("T2_leather", 2)
                    .component("T0_cordage", 1)
                    .upgrade("tannery")
                    .xp(Skill::Leatherworking, 25),
            )
            .with_slot(EquipSlot::Hands)
            .with_bonus(Stat::SkillXp(Skill::Foraging), 0.05)
            .with_bonus(Stat::SkillXp(Skill::Woodcutting), 0.05)
            .with_weight(0.3),
        ItemDef::base("miner_helm", "Miner's Helm", 4, ItemCategory::Gear)
            .with_recipe(
                Skill::Smithing,
                Recipe::new()
                    .component("T4_ingot", 3)
                    .component("T4_leather", 1)
                    .upgrade("blast_furnace")
                    .xp(Skill::Smithing, 50),
            )
            .with_slot(EquipSlot::Head)
            .with_bonus(Stat::SkillXp(Skill::Mining), 0.10)
            .with_weight(1.2),
        ItemDef::base("hunters_cloak", "Hunter's Cloak", 5, ItemCategory::Gear)
            .with_recipe(
                Skill::Leatherworking,
                Recipe::new()
                    .component("T5_leather", 5)
                    .upgrade("tannery")
                    .xp(Skill::Leatherworking, 60),
            )
            .with_slot(EquipSlot::Body)
            .with_bonus(Stat::HuntSuccess, 0.05)
            .with_bonus(Stat::SkillXp(Skill::Hunting), 0.05)
            .with_weight(1.0),
        ItemDef::base("scholar_circlet", "Scholar's Circlet", 6, ItemCategory::Gear)
            .with_recipe(
                Skill::Smithing,
                Recipe::new()
                    .component("T6_ingot", 2)
                    .generic(gem, 1)
                    .upgrade("blast_furnace")
                    .xp(Skill::Smithing, 75),
            )
            .with_slot(EquipSlot::Head)
            .with_bonus(Stat::GlobalXp, 0.05)
            .with_weight(0.4),
        ItemDef::base("lucky_charm", "Lucky Charm", 7, ItemCategory::Gear)
            .with_recipe(
                Skill::Smithing,
                Recipe::new()
                    .generic(gem, 1)
                    .component("T7_ingot", 1)
                    .component("T0_cordage", 1)
                    .upgrade("blast_furnace")
                    .xp(Skill::Smithing, 80),
            )
            .with_slot(EquipSlot::Neck)
            .with_bonus(Stat::RareFind, 0.01)
            .with_weight(0.1),
        ItemDef::base("warden_amulet", "Warden's Amulet", 9, ItemCategory::Gear)
            .with_recipe(
                Skill::Smithing,
                Recipe::new()
                    .resource("rough_diamond", 1)
                    .component("T9_ingot", 2)
                    .upgrade("star_forge")
                    .xp(Skill::Smithing, 120),
            )
            .with_slot(EquipSlot::Neck)
            .with_bonus(Stat::RareFind, 0.02)
            .with_bonus(Stat::GlobalXp, 0.03)
            .with_weight(0.1),
        ItemDef::base("dragonscale_mail", "Dragonscale Mail", 11, ItemCategory::Gear)
            .with_recipe(
                Skill::Smithing,
                Recipe::new()
                    .component("T11_leather", 8)
                    .component("T11_ingot", 4)
                    .upgrade("star_forge")
                    .xp(Skill::Smithing, 200)
                    .xp(Skill::Leatherworking, 100),
            )
            .with_slot(EquipSlot::Body)
            .with_bonus(Stat::GlobalXp, 0.10)
            .with_bonus(Stat::HuntSuccess, 0.05)
            .with_bonus(Stat::RareFind, 0.005)
            .with_weight(3.0),
    ]
}

fn consumables() -> Vec<ItemDef> {
    let mut treat = ItemDef::base("pet_treat", "Pet Treat", 2, ItemCategory::PetTreat)
        .with_recipe(
            Skill::Alchemy,
            Recipe::new()
                .component("T2_extract", 1)
                .resource("wild_seeds", 2)
                .upgrade("alchemy_lab")
                .xp(Skill::Alchemy, 15),
        )
        .with_weight(0.1);
    treat.growth_reduction_secs = Some(300.0);

    let mut whetstone = ItemDef::base("whetstone", "Whetstone", -1, ItemCategory::Repair)
        .with_weight(0.3);
    whetstone.repair_fraction = Some(0.25);

    let mut kit = ItemDef::base("repair_kit", "Repair Kit", 4, ItemCategory::Repair)
        .with_recipe(
            Skill::Smithing,
            Recipe::new()
                .generic(GenericIngredient::at_least(GenericClass::Ingot, 2), 2)
                .generic(GenericIngredient::any(GenericClass::Leather), 1)
                .upgrade("workbench")
                .xp(Skill::Smithing, 20),
        )
        .with_weight(0.8);
    kit.repair_fraction = Some(0.5);

    vec![
        ItemDef::base(
            "yield_potion",
            "Potion of Plenty",
            3,
            ItemCategory::Potion(PotionKind::IncreasedYield),
        )
        .with_recipe(
            Skill::Alchemy,
            Recipe::new()
                .component("T3_extract", 2)
                .resource("wild_seeds", 1)
                .upgrade("alchemy_lab")
                .xp(Skill::Alchemy, 30),
        )
        .with_weight(0.2),
        treat,
        whetstone,
        kit,
    ]
}

/// Every item in the game.
pub fn standard_items() -> Vec<ItemDef> {
    let mut out = Vec::new();
    for tier in 1..=MAX_TIER {
        for category in ToolCategory::ALL {
            out.push(tool(category, tier));
        }
        out.push(arrow(tier));
    }
    out.extend(bags());
    out.extend(gear());
    out.extend(consumables());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ComponentId;

    fn find<'a>(all: &'a [ItemDef], id: &str) -> &'a ItemDef {
        all.iter().find(|i| i.id.as_str() == id).unwrap()
    }

    #[test]
    fn primitive_tools_need_no_building() {
        let all = standard_items();
        let pick = find(&all, "T1_pickaxe");
        assert_eq!(pick.name, "Flint Pickaxe");
        assert!(pick.recipe.as_ref().unwrap().required_upgrade.is_none());
        assert_eq!(pick.max_durability, Some(50));
        assert_eq!(pick.slot, Some(EquipSlot::Pickaxe));
    }

    #[test]
    fn higher_tier_tools_use_components() {
        let all = standard_items();
        let axe = find(&all, "T5_axe");
        let recipe = axe.recipe.as_ref().unwrap();
        assert_eq!(recipe.components[&ComponentId::from("T5_ingot")], 2);
        assert_eq!(recipe.components[&ComponentId::from("T5_plank")], 2);
        assert_eq!(axe.tool_category(), Some(ToolCategory::Axe));
        assert_eq!(axe.unlock_level(), 20);
    }

    #[test]
    fn arrows_come_in_bundles() {
        let all = standard_items();
        let arrows = find(&all, "T3_arrow");
        assert_eq!(arrows.craft_yield, 5);
        assert!(arrows.max_durability.is_none());
        assert_eq!(arrows.slot, Some(EquipSlot::Ammo));
    }

    #[test]
    fn bag_chain_replaces_previous_tier() {
        let all = standard_items();
        assert_eq!(find(&all, "T1_bag").upgrades_bag, None);
        assert_eq!(
            find(&all, "T5_bag").upgrades_bag,
            Some(ItemId::from("T3_bag"))
        );
    }

    #[test]
    fn gear_carries_bonuses() {
        let all = standard_items();
        let charm = find(&all, "lucky_charm");
        assert_eq!(charm.stat_bonuses[&Stat::RareFind], 0.01);
        let gloves = find(&all, "forager_gloves");
        assert_eq!(gloves.stat_bonuses.len(), 2);
    }

    #[test]
    fn repair_items() {
        let all = standard_items();
        assert_eq!(find(&all, "whetstone").repair_fraction, Some(0.25));
        assert!(find(&all, "whetstone").recipe.is_none());
        assert_eq!(find(&all, "repair_kit").repair_fraction, Some(0.5));
    }
}
