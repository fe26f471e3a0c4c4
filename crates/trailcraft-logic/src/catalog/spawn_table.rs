//! Weighted world-spawn table and rare-drop odds.

use serde::{Deserialize, Serialize};

use super::creatures::CreatureKind;
use super::resources::{ResourceDef, ResourceKind, MAX_TIER};
use crate::constants::specials;
use crate::ids::ResourceId;

/// One weighted candidate for a spawned node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub resource: ResourceId,
    pub weight: u32,
    /// Lowest skill level at which the node starts appearing.
    pub min_skill_level_to_see: u32,
    /// Level past which the node stops appearing; `None` means never.
    pub max_skill_level_to_consider: Option<u32>,
}

impl SpawnEntry {
    pub fn visible_at(&self, level: u32) -> bool {
        level >= self.min_skill_level_to_see
            && self
                .max_skill_level_to_consider
                .map_or(true, |max| level <= max)
    }
}

/// Levels early a node shows up before it can be gathered.
const SEE_AHEAD_LEVELS: u32 = 4;
/// Levels past the requirement that a node keeps spawning.
const OUTGROW_LEVELS: u32 = 20;

/// Build the spawn table from every gatherable or huntable resource.
pub fn standard_spawn_table(resources: &[ResourceDef]) -> Vec<SpawnEntry> {
    resources
        .iter()
        .filter(|r| r.kind.is_standard_gather() || r.kind == ResourceKind::Track)
        .map(|r| {
            let base = if r.kind == ResourceKind::Track { 60 } else { 100 };
            let tier = r.tier.max(0) as u32;
            SpawnEntry {
                resource: r.id.clone(),
                weight: base / (tier + 1),
                min_skill_level_to_see: r.required_level.saturating_sub(SEE_AHEAD_LEVELS).max(1),
                max_skill_level_to_consider: (r.tier < MAX_TIER)
                    .then_some(r.required_level + OUTGROW_LEVELS),
            }
        })
        .collect()
}

/// Woodcutting egg roll, gated by skill level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EggDrop {
    pub kind: CreatureKind,
    pub min_level: u32,
    pub chance: f64,
}

/// Base odds for every rare-drop roll. Gear and companion bonuses are
/// added on top at roll time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RareDropTable {
    pub gem_min_tier: i8,
    pub gem_base_chance: f64,
    pub gem_chance_per_tier: f64,
    pub whetstone_min_tier: i8,
    pub whetstone_chance: f64,
    pub feather_chance: f64,
    pub wild_seed_chance: f64,
    pub rare_seed_min_tier: i8,
    pub rare_seed_chance: f64,
    /// Checked in order; the first successful roll wins.
    pub woodcutting_eggs: Vec<EggDrop>,
    pub dragon_egg_track_tier: i8,
    pub dragon_egg_chance: f64,
}

impl Default for RareDropTable {
    fn default() -> Self {
        Self {
            gem_min_tier: 3,
            gem_base_chance: 0.02,
            gem_chance_per_tier: 0.002,
            whetstone_min_tier: 2,
            whetstone_chance: 0.03,
            feather_chance: 0.05,
            wild_seed_chance: 0.08,
            rare_seed_min_tier: 6,
            rare_seed_chance: 0.03,
            woodcutting_eggs: vec![
                EggDrop {
                    kind: CreatureKind::Raven,
                    min_level: 10,
                    chance: 0.01,
                },
                EggDrop {
                    kind: CreatureKind::Owl,
                    min_level: 20,
                    chance: 0.007,
                },
                EggDrop {
                    kind: CreatureKind::Hawk,
                    min_level: 30,
                    chance: 0.005,
                },
            ],
            dragon_egg_track_tier: 11,
            dragon_egg_chance: 0.02,
        }
    }
}

impl RareDropTable {
    pub fn gem_chance(&self, stone_tier: i8) -> f64 {
        self.gem_base_chance + self.gem_chance_per_tier * stone_tier as f64
    }
}

/// Gem awarded for mining a stone of the given tier. `pick` in `[0, 1)`
/// chooses between the two low-tier gems.
pub fn gem_for_tier(stone_tier: i8, pick: f64) -> &'static str {
    match stone_tier {
        t if t < 5 => {
            if pick < 0.5 {
                specials::ROUGH_RUBY
            } else {
                specials::ROUGH_SAPPHIRE
            }
        }
        t if t < 8 => specials::ROUGH_EMERALD,
        _ => specials::ROUGH_DIAMOND,
    }
}
