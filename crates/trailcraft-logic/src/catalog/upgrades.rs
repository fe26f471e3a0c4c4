//! Home-base buildings and their prerequisite graph.

use serde::{Deserialize, Serialize};

use super::recipe::{GenericClass, GenericIngredient, Recipe};
use crate::constants::upgrades as ids;
use crate::ids::UpgradeId;
use crate::skills::Skill;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDef {
    pub id: UpgradeId,
    pub name: String,
    pub description: String,
    /// Ingredients consumed and XP granted when built.
    pub cost: Recipe,
    pub prerequisites: Vec<UpgradeId>,
}

fn upgrade(id: &str, name: &str, description: &str, cost: Recipe, prereqs: &[&str]) -> UpgradeDef {
    UpgradeDef {
        id: UpgradeId::from(id),
        name: name.to_string(),
        description: description.to_string(),
        cost,
        prerequisites: prereqs.iter().map(|p| UpgradeId::from(*p)).collect(),
    }
}

pub fn standard_upgrades() -> Vec<UpgradeDef> {
    vec![
        upgrade(
            ids::WORKBENCH,
            "Workbench",
            "Basic woodworking and repairs.",
            Recipe::new()
                .resource("T0_wood", 10)
                .resource("T0_stone", 5)
                .xp(Skill::Woodworking, 15),
            &[],
        ),
        upgrade(
            ids::BASIC_FORGE,
            "Basic Forge",
            "Smelts low-tier ore into ingots.",
            Recipe::new()
                .resource("T0_stone", 20)
                .resource("T0_wood", 10)
                .xp(Skill::Smithing, 20),
            &[ids::WORKBENCH],
        ),
        upgrade(
            ids::TANNERY,
            "Tannery",
            "Cures pelts into leather.",
            Recipe::new()
                .resource("T1_wood", 10)
                .resource("T0_herb", 10)
                .xp(Skill::Leatherworking, 20),
            &[ids::WORKBENCH],
        ),
        upgrade(
            ids::ALCHEMY_LAB,
            "Alchemy Lab",
            "Distills herbs into extracts and potions.",
            Recipe::new()
                .resource("T1_herb", 10)
                .resource("T1_stone", 10)
                .xp(Skill::Alchemy, 20),
            &[ids::WORKBENCH],
        ),
        upgrade(
            ids::STOREHOUSE,
            "Storehouse",
            "Careful storage occasionally saves crafting materials.",
            Recipe::new()
                .component("T1_plank", 20)
                .component("T1_ingot", 10)
                .xp(Skill::Woodworking, 40),
            &[ids::BASIC_FORGE],
        ),
        upgrade(
            ids::INCUBATOR,
            "Incubator",
            "Keeps creature eggs warm until they hatch.",
            Recipe::new()
                .component("T1_plank", 10)
                .component("T1_leather", 5)
                .xp(Skill::Woodworking, 30),
            &[ids::TANNERY],
        ),
        upgrade(
            ids::WATCHTOWER,
            "Watchtower",
            "Enriches nearby nodes and enables horizon scans.",
            Recipe::new()
                .component("T2_plank", 20)
                .component("T2_ingot", 10)
                .xp(Skill::Woodworking, 60),
            &[ids::STOREHOUSE],
        ),
        upgrade(
            ids::SAWMILL,
            "Sawmill",
            "Mills mid-tier timber.",
            Recipe::new()
                .component("T3_plank", 10)
                .component("T3_ingot", 10)
                .xp(Skill::Woodworking, 80),
            &[ids::WORKBENCH, ids::BASIC_FORGE],
        ),
        upgrade(
            ids::BLAST_FURNACE,
            "Blast Furnace",
            "Smelts mid-tier ore.",
            Recipe::new()
                .component("T3_ingot", 20)
                .resource("T3_stone", 30)
                .xp(Skill::Smithing, 80),
            &[ids::BASIC_FORGE],
        ),
        upgrade(
            ids::STAR_FORGE,
            "Star Forge",
            "Smelts the rarest metals.",
            Recipe::new()
                .component("T7_ingot", 20)
                .generic(GenericIngredient::any(GenericClass::Gem), 3)
                .xp(Skill::Smithing, 250),
            &[ids::BLAST_FURNACE],
        ),
        upgrade(
            ids::ARTISAN_WORKSHOP,
            "Artisan Workshop",
            "Works the rarest timber.",
            Recipe::new()
                .component("T7_plank", 20)
                .xp(Skill::Woodworking, 250),
            &[ids::SAWMILL],
        ),
    ]
}
