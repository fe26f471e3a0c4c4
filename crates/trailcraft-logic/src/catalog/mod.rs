//! Static content tables.
//!
//! The catalog is built once at startup from the `standard_*` generators
//! and then only read. Every cross-reference between tables is by id, so
//! [`Catalog::validate`] checks completeness up front instead of relying
//! on exhaustive matches.

pub mod components;
pub mod creatures;
pub mod items;
pub mod recipe;
pub mod resources;
pub mod spawn_table;
pub mod upgrades;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub use components::{ComponentCategory, ComponentDef};
pub use creatures::{CreatureDef, CreatureKind, QuestObjective, TrainingQuest};
pub use items::{
    BagCapacity, EquipSlot, ItemCategory, ItemDef, PotionKind, ToolCategory,
};
pub use recipe::{GenericClass, GenericIngredient, Recipe};
pub use resources::{ResourceDef, ResourceKind, StorageClass, ToolRequirement, MAX_TIER};
pub use spawn_table::{EggDrop, RareDropTable, SpawnEntry};
pub use upgrades::UpgradeDef;

use crate::constants::specials;
use crate::ids::{tiered, ComponentId, ItemId, ResourceId, UpgradeId};
use crate::skills::unlock_level;

/// Gems in ascending value; generic gem ingredients consume the first
/// stack that suffices.
const GEM_ORDER: [&str; 4] = [
    specials::ROUGH_RUBY,
    specials::ROUGH_SAPPHIRE,
    specials::ROUGH_EMERALD,
    specials::ROUGH_DIAMOND,
];

/// A concrete stack that can satisfy a generic ingredient line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenericMember {
    Resource(ResourceId),
    Component(ComponentId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub resources: BTreeMap<ResourceId, ResourceDef>,
    pub components: BTreeMap<ComponentId, ComponentDef>,
    pub items: BTreeMap<ItemId, ItemDef>,
    pub upgrades: BTreeMap<UpgradeId, UpgradeDef>,
    pub creatures: BTreeMap<CreatureKind, CreatureDef>,
    pub spawn_table: Vec<SpawnEntry>,
    pub rare_drops: RareDropTable,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// The shipped content.
    pub fn standard() -> Self {
        let resources = resources::standard_resources();
        let spawn_table = spawn_table::standard_spawn_table(&resources);
        Self {
            resources: resources.into_iter().map(|r| (r.id.clone(), r)).collect(),
            components: components::standard_components()
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
            items: items::standard_items()
                .into_iter()
                .map(|i| (i.id.clone(), i))
                .collect(),
            upgrades: upgrades::standard_upgrades()
                .into_iter()
                .map(|u| (u.id.clone(), u))
                .collect(),
            creatures: creatures::standard_creatures()
                .into_iter()
                .map(|c| (c.kind, c))
                .collect(),
            spawn_table,
            rare_drops: RareDropTable::default(),
        }
    }

    pub fn resource(&self, id: &ResourceId) -> Option<&ResourceDef> {
        self.resources.get(id)
    }

    pub fn component(&self, id: &ComponentId) -> Option<&ComponentDef> {
        self.components.get(id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&ItemDef> {
        self.items.get(id)
    }

    pub fn upgrade(&self, id: &UpgradeId) -> Option<&UpgradeDef> {
        self.upgrades.get(id)
    }

    pub fn creature(&self, kind: CreatureKind) -> Option<&CreatureDef> {
        self.creatures.get(&kind)
    }

    /// Tiered resource of a family, e.g. `(Stone, 3)` → `T3_stone`.
    pub fn resource_at(&self, kind: ResourceKind, tier: i8) -> Option<&ResourceDef> {
        let family = kind.family()?;
        self.resources.get(&ResourceId::from(tiered(family, tier)))
    }

    /// Creature hatched from an egg resource.
    pub fn creature_for_egg(&self, egg: &ResourceId) -> Option<CreatureKind> {
        self.resource(egg).and_then(|r| r.egg_of)
    }

    /// Concrete stacks that satisfy a generic line, lowest tier first.
    pub fn generic_members(&self, ingredient: &GenericIngredient) -> Vec<GenericMember> {
        match ingredient.class {
            GenericClass::Gem => GEM_ORDER
                .iter()
                .map(|id| ResourceId::from(*id))
                .filter(|id| self.resources.contains_key(id))
                .map(GenericMember::Resource)
                .collect(),
            class => {
                let mut members: Vec<&ComponentDef> = self
                    .components
                    .values()
                    .filter(|c| c.category.generic_class() == Some(class))
                    .filter(|c| c.tier >= ingredient.min_tier)
                    .collect();
                members.sort_by_key(|c| (c.tier, c.id.clone()));
                members
                    .into_iter()
                    .map(|c| GenericMember::Component(c.id.clone()))
                    .collect()
            }
        }
    }

    /// Display name for any resource, component or item id.
    pub fn display_name(&self, id: &str) -> String {
        if let Some(r) = self.resources.get(&ResourceId::from(id)) {
            return r.name.clone();
        }
        if let Some(c) = self.components.get(&ComponentId::from(id)) {
            return c.name.clone();
        }
        if let Some(i) = self.items.get(&ItemId::from(id)) {
            return i.name.clone();
        }
        id.to_string()
    }

    /// Check every cross-reference and authoring rule. Empty means clean.
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        for r in self.resources.values() {
            if r.kind.is_standard_gather() || r.kind == ResourceKind::Track {
                if r.skill.is_none() {
                    issues.push(CatalogIssue::MissingSkill {
                        resource: r.id.clone(),
                    });
                }
                if r.required_level != unlock_level(r.tier) {
                    issues.push(CatalogIssue::UnlockLevelMismatch {
                        id: r.id.to_string(),
                        tier: r.tier,
                        level: r.required_level,
                    });
                }
            }
            if let Some(hide) = &r.hide {
                if !self.resources.contains_key(hide) {
                    issues.push(CatalogIssue::UnknownIngredient {
                        owner: r.id.to_string(),
                        ingredient: hide.to_string(),
                    });
                }
            } else if r.is_hunt() {
                issues.push(CatalogIssue::MissingHide {
                    track: r.id.clone(),
                });
            }
            if !(-1..=MAX_TIER).contains(&r.tier) {
                issues.push(CatalogIssue::TierOutOfRange {
                    id: r.id.to_string(),
                    tier: r.tier,
                });
            }
        }

        for c in self.components.values() {
            if !(0..=MAX_TIER).contains(&c.tier) {
                issues.push(CatalogIssue::TierOutOfRange {
                    id: c.id.to_string(),
                    tier: c.tier,
                });
            }
            match &c.recipe {
                Some(recipe) => self.check_recipe(c.id.as_str(), recipe, &mut issues),
                None => issues.push(CatalogIssue::MissingRecipe {
                    id: c.id.to_string(),
                }),
            }
        }

        for i in self.items.values() {
            match &i.recipe {
                Some(recipe) => self.check_recipe(i.id.as_str(), recipe, &mut issues),
                None if i.category != ItemCategory::Repair => {
                    issues.push(CatalogIssue::MissingRecipe {
                        id: i.id.to_string(),
                    })
                }
                None => {}
            }
            if i.recipe.is_some() && i.craft_skill.is_none() {
                issues.push(CatalogIssue::MissingCraftSkill { item: i.id.clone() });
            }
            if i.is_tool() && i.max_durability.is_none() {
                issues.push(CatalogIssue::MissingDurability { item: i.id.clone() });
            }
            if let Some(prev) = &i.upgrades_bag {
                let valid = self
                    .items
                    .get(prev)
                    .map_or(false, |p| p.category == ItemCategory::Bag);
                if !valid {
                    issues.push(CatalogIssue::UnknownBag {
                        item: i.id.clone(),
                        replaces: prev.clone(),
                    });
                }
            }
        }

        for u in self.upgrades.values() {
            self.check_recipe(u.id.as_str(), &u.cost, &mut issues);
            for p in &u.prerequisites {
                if !self.upgrades.contains_key(p) {
                    issues.push(CatalogIssue::UnknownPrerequisite {
                        upgrade: u.id.clone(),
                        prerequisite: p.clone(),
                    });
                }
            }
            if self.has_prerequisite_cycle(&u.id) {
                issues.push(CatalogIssue::PrerequisiteCycle {
                    upgrade: u.id.clone(),
                });
            }
        }

        for kind in CreatureKind::ALL {
            if !self.creatures.contains_key(&kind) {
                issues.push(CatalogIssue::MissingCreature { kind });
            }
            if self.creature_for_egg(&kind.egg()) != Some(kind) {
                issues.push(CatalogIssue::MissingEgg { kind });
            }
        }

        for entry in &self.spawn_table {
            if !self.resources.contains_key(&entry.resource) {
                issues.push(CatalogIssue::UnknownSpawnResource {
                    resource: entry.resource.clone(),
                });
            }
        }

        issues
    }

    fn check_recipe(&self, owner: &str, recipe: &Recipe, issues: &mut Vec<CatalogIssue>) {
        let unknown = |ingredient: &str| CatalogIssue::UnknownIngredient {
            owner: owner.to_string(),
            ingredient: ingredient.to_string(),
        };
        for id in recipe.resources.keys() {
            if !self.resources.contains_key(id) {
                issues.push(unknown(id.as_str()));
            }
        }
        for id in recipe.components.keys() {
            if !self.components.contains_key(id) {
                issues.push(unknown(id.as_str()));
            }
        }
        for id in recipe.items.keys() {
            if !self.items.contains_key(id) {
                issues.push(unknown(id.as_str()));
            }
        }
        for g in recipe.generics.keys() {
            if self.generic_members(g).is_empty() {
                issues.push(unknown(g.class.label()));
            }
        }
        if let Some(up) = &recipe.required_upgrade {
            if !self.upgrades.contains_key(up) {
                issues.push(CatalogIssue::UnknownUpgrade {
                    owner: owner.to_string(),
                    upgrade: up.clone(),
                });
            }
        }
    }

    fn has_prerequisite_cycle(&self, start: &UpgradeId) -> bool {
        let mut stack: Vec<&UpgradeId> = match self.upgrades.get(start) {
            Some(u) => u.prerequisites.iter().collect(),
            None => return false,
        };
        let mut seen = BTreeSet::new();
        while let Some(id) = stack.pop() {
            if id == start {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            if let Some(u) = self.upgrades.get(id) {
                stack.extend(u.prerequisites.iter());
            }
        }
        false
    }
}

/// A catalog authoring gap found by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    MissingSkill { resource: ResourceId },
    MissingHide { track: ResourceId },
    MissingRecipe { id: String },
    MissingCraftSkill { item: ItemId },
    MissingDurability { item: ItemId },
    MissingCreature { kind: CreatureKind },
    MissingEgg { kind: CreatureKind },
    UnknownIngredient { owner: String, ingredient: String },
    UnknownUpgrade { owner: String, upgrade: UpgradeId },
    UnknownPrerequisite { upgrade: UpgradeId, prerequisite: UpgradeId },
    PrerequisiteCycle { upgrade: UpgradeId },
    UnknownBag { item: ItemId, replaces: ItemId },
    UnknownSpawnResource { resource: ResourceId },
    TierOutOfRange { id: String, tier: i8 },
    UnlockLevelMismatch { id: String, tier: i8, level: u32 },
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::MissingSkill { resource } => {
                write!(f, "{} has no associated skill", resource)
            }
            CatalogIssue::MissingHide { track } => write!(f, "{} yields no hide", track),
            CatalogIssue::MissingRecipe { id } => write!(f, "{} has no recipe", id),
            CatalogIssue::MissingCraftSkill { item } => {
                write!(f, "{} has a recipe but no crafting skill", item)
            }
            CatalogIssue::MissingDurability { item } => {
                write!(f, "tool {} has no max durability", item)
            }
            CatalogIssue::MissingCreature { kind } => {
                write!(f, "no definition for creature {}", kind.name())
            }
            CatalogIssue::MissingEgg { kind } => write!(f, "no egg for creature {}", kind.name()),
            CatalogIssue::UnknownIngredient { owner, ingredient } => {
                write!(f, "{} uses unknown ingredient {}", owner, ingredient)
            }
            CatalogIssue::UnknownUpgrade { owner, upgrade } => {
                write!(f, "{} requires unknown upgrade {}", owner, upgrade)
            }
            CatalogIssue::UnknownPrerequisite {
                upgrade,
                prerequisite,
            } => write!(f, "{} requires unknown upgrade {}", upgrade, prerequisite),
            CatalogIssue::PrerequisiteCycle { upgrade } => {
                write!(f, "{} is part of a prerequisite cycle", upgrade)
            }
            CatalogIssue::UnknownBag { item, replaces } => {
                write!(f, "{} replaces unknown bag {}", item, replaces)
            }
            CatalogIssue::UnknownSpawnResource { resource } => {
                write!(f, "spawn table names unknown resource {}", resource)
            }
            CatalogIssue::TierOutOfRange { id, tier } => {
                write!(f, "{} has out-of-range tier {}", id, tier)
            }
            CatalogIssue::UnlockLevelMismatch { id, tier, level } => write!(
                f,
                "{} (tier {}) requires level {}, expected {}",
                id,
                tier,
                level,
                unlock_level(*tier)
            ),
        }
    }
}
