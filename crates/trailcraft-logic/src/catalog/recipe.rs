//! Recipe shape shared by components, items and upgrade costs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::{ComponentId, ItemId, ResourceId, UpgradeId};
use crate::skills::Skill;

/// Family of interchangeable ingredients ("any standard ingot").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GenericClass {
    /// Any `T{n}_ingot` component.
    Ingot,
    /// Any `T{n}_plank` component.
    Plank,
    /// Any `T{n}_leather` component.
    Leather,
    /// Any rough gemstone resource.
    Gem,
}

impl GenericClass {
    pub fn label(self) -> &'static str {
        match self {
            GenericClass::Ingot => "ingot",
            GenericClass::Plank => "plank",
            GenericClass::Leather => "leather",
            GenericClass::Gem => "gemstone",
        }
    }
}

/// A substitutable ingredient line: any member of `class` at `min_tier` or above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GenericIngredient {
    pub class: GenericClass,
    pub min_tier: i8,
}

impl GenericIngredient {
    pub fn any(class: GenericClass) -> Self {
        Self { class, min_tier: -1 }
    }

    pub fn at_least(class: GenericClass, min_tier: i8) -> Self {
        Self { class, min_tier }
    }
}

/// Inputs, gating building and XP reward for one craft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub resources: BTreeMap<ResourceId, u32>,
    pub components: BTreeMap<ComponentId, u32>,
    pub items: BTreeMap<ItemId, u32>,
    pub generics: BTreeMap<GenericIngredient, u32>,
    pub required_upgrade: Option<UpgradeId>,
    pub xp: BTreeMap<Skill, u32>,
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resource(mut self, id: impl Into<String>, qty: u32) -> Self {
        *self.resources.entry(ResourceId::new(id)).or_insert(0) += qty;
        self
    }

    pub fn component(mut self, id: impl Into<String>, qty: u32) -> Self {
        *self.components.entry(ComponentId::new(id)).or_insert(0) += qty;
        self
    }

    pub fn item(mut self, id: impl Into<String>, qty: u32) -> Self {
        *self.items.entry(ItemId::new(id)).or_insert(0) += qty;
        self
    }

    pub fn generic(mut self, ingredient: GenericIngredient, qty: u32) -> Self {
        *self.generics.entry(ingredient).or_insert(0) += qty;
        self
    }

    pub fn upgrade(mut self, id: impl Into<String>) -> Self {
        self.required_upgrade = Some(UpgradeId::new(id));
        self
    }

    pub fn xp(mut self, skill: Skill, amount: u32) -> Self {
        *self.xp.entry(skill).or_insert(0) += amount;
        self
    }

    /// Number of ingredient lines across all categories.
    pub fn line_count(&self) -> usize {
        self.resources.len() + self.components.len() + self.items.len() + self.generics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line_count() == 0
    }
}
