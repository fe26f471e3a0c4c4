//! Raw resource definitions.
//!
//! Four tiered gatherable families (stone, wood, herb, track) plus the hides
//! that hunts produce, and a handful of tier −1 specials that only arrive
//! through rare drops or companions.

use serde::{Deserialize, Serialize};

use super::creatures::CreatureKind;
use super::items::ToolCategory;
use crate::ids::{tiered, ResourceId};
use crate::skills::{unlock_level, Skill};

pub const MAX_TIER: i8 = 11;

/// Broad resource family; drives skill, tool and storage lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Stone,
    Wood,
    Herb,
    /// Animal tracks: gathered by hunting, never directly stocked.
    Track,
    Hide,
    Gem,
    Feather,
    Seed,
    Egg,
}

impl ResourceKind {
    /// Id suffix for tiered families.
    pub fn family(self) -> Option<&'static str> {
        match self {
            ResourceKind::Stone => Some("stone"),
            ResourceKind::Wood => Some("wood"),
            ResourceKind::Herb => Some("herb"),
            ResourceKind::Track => Some("track"),
            ResourceKind::Hide => Some("hide"),
            _ => None,
        }
    }

    pub fn skill(self) -> Option<Skill> {
        match self {
            ResourceKind::Stone => Some(Skill::Mining),
            ResourceKind::Wood => Some(Skill::Woodcutting),
            ResourceKind::Herb => Some(Skill::Foraging),
            ResourceKind::Track => Some(Skill::Hunting),
            _ => None,
        }
    }

    pub fn tool(self) -> Option<ToolCategory> {
        match self {
            ResourceKind::Stone => Some(ToolCategory::Pickaxe),
            ResourceKind::Wood => Some(ToolCategory::Axe),
            ResourceKind::Herb | ResourceKind::Track => Some(ToolCategory::Knife),
            _ => None,
        }
    }

    pub fn storage(self) -> StorageClass {
        match self {
            ResourceKind::Herb => StorageClass::Herb,
            ResourceKind::Stone | ResourceKind::Wood | ResourceKind::Track | ResourceKind::Hide => {
                StorageClass::General
            }
            _ => StorageClass::Special,
        }
    }

    /// Families that spawn as world nodes and resolve through a standard gather.
    pub fn is_standard_gather(self) -> bool {
        matches!(
            self,
            ResourceKind::Stone | ResourceKind::Wood | ResourceKind::Herb
        )
    }
}

/// Which capacity pool a resource counts against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StorageClass {
    General,
    Herb,
    /// Gems, feathers, seeds, eggs: never capacity-limited.
    Special,
}

/// Tool needed to gather a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRequirement {
    pub category: ToolCategory,
    pub min_tier: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDef {
    pub id: ResourceId,
    pub name: String,
    /// Progression tier, or −1 for tier-agnostic specials.
    pub tier: i8,
    pub kind: ResourceKind,
    /// Skill trained by gathering; `None` for products and specials.
    pub skill: Option<Skill>,
    pub base_xp: u32,
    /// Default node lifespan in seconds.
    pub lifespan_secs: f64,
    pub required_level: u32,
    pub tool: Option<ToolRequirement>,
    pub storage: StorageClass,
    pub weight: f32,
    /// Hide produced by a successful hunt (tracks only).
    pub hide: Option<ResourceId>,
    /// Creature hatched from this egg (eggs only).
    pub egg_of: Option<CreatureKind>,
}

impl ResourceDef {
    pub fn is_hunt(&self) -> bool {
        self.kind == ResourceKind::Track
    }
}

const STONE_NAMES: [&str; 12] = [
    "Loose Flint",
    "Fieldstone",
    "Copper Ore",
    "Tin Ore",
    "Iron Ore",
    "Silver Ore",
    "Gold Ore",
    "Cobalt Ore",
    "Mithril Ore",
    "Adamant Ore",
    "Starmetal Ore",
    "Voidstone",
];

const WOOD_NAMES: [&str; 12] = [
    "Fallen Twigs",
    "Birch",
    "Pine",
    "Oak",
    "Maple",
    "Ash",
    "Yew",
    "Ironwood",
    "Ebony",
    "Bloodwood",
    "Spiritwood",
    "Worldtree",
];

const HERB_NAMES: [&str; 12] = [
    "Plant Fiber",
    "Nettle",
    "Sage",
    "Thyme",
    "Yarrow",
    "Mandrake",
    "Nightshade",
    "Ghostcap",
    "Sunpetal",
    "Frostbloom",
    "Starleaf",
    "Dragonroot",
];

/// Quarry per hunting tier (index 0 unused).
pub(crate) const ANIMAL_NAMES: [&str; 12] = [
    "", "Rabbit", "Fox", "Deer", "Boar", "Wolf", "Elk", "Bear", "Moose", "Sabrecat", "Wyvern",
    "Dragon",
];

/// Display name for a tiered material, used by component names.
pub(crate) fn material_name(kind: ResourceKind, tier: i8) -> &'static str {
    let idx = tier.clamp(0, MAX_TIER) as usize;
    match kind {
        ResourceKind::Stone => STONE_NAMES[idx],
        ResourceKind::Wood => WOOD_NAMES[idx],
        ResourceKind::Herb => HERB_NAMES[idx],
        _ => ANIMAL_NAMES[idx],
    }
}

fn gatherable(kind: ResourceKind, tier: i8, name: &str, weight: f32) -> ResourceDef {
    let tool = if tier == 0 {
        None
    } else {
        kind.tool().map(|category| ToolRequirement {
            category,
            min_tier: (tier - 1).max(1),
        })
    };
    ResourceDef {
        id: ResourceId::from(tiered(kind.family().unwrap_or("special"), tier)),
        name: name.to_string(),
        tier,
        kind,
        skill: kind.skill(),
        base_xp: 5 + 5 * tier as u32,
        lifespan_secs: 1800.0 - 60.0 * tier as f64,
        required_level: unlock_level(tier),
        tool,
        storage: kind.storage(),
        weight,
        hide: None,
        egg_of: None,
    }
}

fn special(id: &str, name: &str, kind: ResourceKind, weight: f32) -> ResourceDef {
    ResourceDef {
        id: ResourceId::from(id),
        name: name.to_string(),
        tier: -1,
        kind,
        skill: None,
        base_xp: 0,
        lifespan_secs: 0.0,
        required_level: 1,
        tool: None,
        storage: StorageClass::Special,
        weight,
        hide: None,
        egg_of: None,
    }
}

/// Every raw resource in the game.
pub fn standard_resources() -> Vec<ResourceDef> {
    let mut out = Vec::new();

    for tier in 0..=MAX_TIER {
        let idx = tier as usize;
        out.push(gatherable(
            ResourceKind::Stone,
            tier,
            STONE_NAMES[idx],
            1.0 + 0.1 * tier as f32,
        ));
        out.push(gatherable(ResourceKind::Wood, tier, WOOD_NAMES[idx], 0.8));
        out.push(gatherable(ResourceKind::Herb, tier, HERB_NAMES[idx], 0.1));
    }

    for tier in 1..=MAX_TIER {
        let animal = ANIMAL_NAMES[tier as usize];
        let hide_id = ResourceId::from(tiered("hide", tier));

        let mut track = gatherable(
            ResourceKind::Track,
            tier,
            &format!("{} Tracks", animal),
            0.0,
        );
        track.base_xp = 7 + 8 * tier as u32;
        track.lifespan_secs = 900.0;
        track.hide = Some(hide_id.clone());
        out.push(track);

        out.push(ResourceDef {
            id: hide_id,
            name: format!("{} Pelt", animal),
            tier,
            kind: ResourceKind::Hide,
            skill: None,
            base_xp: 0,
            lifespan_secs: 0.0,
            required_level: 1,
            tool: None,
            storage: StorageClass::General,
            weight: 0.5,
            hide: None,
            egg_of: None,
        });
    }

    out.push(special("rough_ruby", "Rough Ruby", ResourceKind::Gem, 0.2));
    out.push(special("rough_sapphire", "Rough Sapphire", ResourceKind::Gem, 0.2));
    out.push(special("rough_emerald", "Rough Emerald", ResourceKind::Gem, 0.2));
    out.push(special("rough_diamond", "Rough Diamond", ResourceKind::Gem, 0.2));
    out.push(special("feather", "Feather", ResourceKind::Feather, 0.01));
    out.push(special("wild_seeds", "Wild Seeds", ResourceKind::Seed, 0.01));
    out.push(special("rare_seeds", "Rare Seeds", ResourceKind::Seed, 0.01));

    for kind in CreatureKind::ALL {
        let mut egg = special(kind.egg_id(), &format!("{} Egg", kind.name()), ResourceKind::Egg, 0.5);
        egg.egg_of = Some(kind);
        out.push(egg);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(all: &'a [ResourceDef], id: &str) -> &'a ResourceDef {
        all.iter().find(|r| r.id.as_str() == id).unwrap()
    }

    #[test]
    fn tier_one_stone_needs_a_pickaxe() {
        let all = standard_resources();
        let stone = find(&all, "T1_stone");
        assert_eq!(stone.skill, Some(Skill::Mining));
        assert_eq!(stone.required_level, 1);
        let tool = stone.tool.unwrap();
        assert_eq!(tool.category, ToolCategory::Pickaxe);
        assert_eq!(tool.min_tier, 1);
    }

    #[test]
    fn tier_zero_needs_no_tool() {
        let all = standard_resources();
        assert!(find(&all, "T0_wood").tool.is_none());
        assert!(find(&all, "T0_herb").tool.is_none());
    }

    #[test]
    fn tracks_route_to_hides() {
        let all = standard_resources();
        let track = find(&all, "T5_track");
        assert!(track.is_hunt());
        assert_eq!(track.hide.as_ref().unwrap().as_str(), "T5_hide");
        assert_eq!(track.required_level, 20);
        assert_eq!(track.lifespan_secs, 900.0);
    }

    #[test]
    fn herbs_use_herb_storage() {
        let all = standard_resources();
        assert_eq!(find(&all, "T4_herb").storage, StorageClass::Herb);
        assert_eq!(find(&all, "feather").storage, StorageClass::Special);
    }

    #[test]
    fn eggs_know_their_creature() {
        let all = standard_resources();
        assert_eq!(find(&all, "dragon_egg").egg_of, Some(CreatureKind::Dragon));
        assert_eq!(find(&all, "dragon_egg").tier, -1);
    }

    #[test]
    fn ids_are_unique() {
        let all = standard_resources();
        let mut ids: Vec<_> = all.iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), all.len());
    }
}
