//! Skills, XP and level progression.
//!
//! Every gathering and crafting action feeds XP into one of eight skills.
//! Levels are derived from XP with a linear curve and clamped to a cap:
//!
//! ```
//! use trailcraft_logic::skills::level_for_xp;
//!
//! assert_eq!(level_for_xp(0, 100, 60), 1);
//! assert_eq!(level_for_xp(250, 100, 60), 3);
//! assert_eq!(level_for_xp(1_000_000, 100, 60), 60);
//! ```
//!
//! # XP modifiers
//!
//! Raw XP grants are scaled by the skill-specific gear bonus, then the
//! global gear bonus, then the companion bonus, and rounded to the nearest
//! integer (see [`modified_xp`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All trainable skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Skill {
    Mining,
    Woodcutting,
    Foraging,
    Hunting,
    Smithing,
    Woodworking,
    Leatherworking,
    Alchemy,
}

impl Skill {
    /// All skills in display order.
    pub const ALL: [Skill; 8] = [
        Skill::Mining,
        Skill::Woodcutting,
        Skill::Foraging,
        Skill::Hunting,
        Skill::Smithing,
        Skill::Woodworking,
        Skill::Leatherworking,
        Skill::Alchemy,
    ];

    /// Skills whose level drives horizon-scan discoveries.
    pub const GATHERING: [Skill; 3] = [Skill::Mining, Skill::Woodcutting, Skill::Foraging];

    pub fn name(self) -> &'static str {
        match self {
            Skill::Mining => "Mining",
            Skill::Woodcutting => "Woodcutting",
            Skill::Foraging => "Foraging",
            Skill::Hunting => "Hunting",
            Skill::Smithing => "Smithing",
            Skill::Woodworking => "Woodworking",
            Skill::Leatherworking => "Leatherworking",
            Skill::Alchemy => "Alchemy",
        }
    }
}

/// Stats that equipped gear can raise. Values are additive fractions
/// (`0.05` = +5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stat {
    /// XP bonus for one skill.
    SkillXp(Skill),
    /// XP bonus for every skill.
    GlobalXp,
    /// Additive hunt success chance.
    HuntSuccess,
    /// Additive chance on every rare-drop roll.
    RareFind,
}

/// Level required to use a resource or craft a recipe of the given tier.
///
/// * tier ≤ 1 → 1
/// * tier 2 → 5
/// * tier ≥ 3 → (tier − 1) × 5
pub fn unlock_level(tier: i8) -> u32 {
    match tier {
        t if t <= 1 => 1,
        2 => 5,
        t => (t as u32 - 1) * 5,
    }
}

/// Level for a total XP amount: `1 + floor(xp / per_level)`, clamped to `cap`.
pub fn level_for_xp(xp: u64, xp_per_level: u64, cap: u32) -> u32 {
    if xp_per_level == 0 {
        return 1;
    }
    let raw = xp / xp_per_level;
    1 + raw.min(cap.saturating_sub(1) as u64) as u32
}

/// Progress within the current level as `(xp_into_level, xp_per_level)`.
///
/// Returns `None` at the level cap.
pub fn xp_progress(xp: u64, xp_per_level: u64, cap: u32) -> Option<(u64, u64)> {
    if xp_per_level == 0 || level_for_xp(xp, xp_per_level, cap) >= cap {
        return None;
    }
    Some((xp % xp_per_level, xp_per_level))
}

/// Apply gear and companion modifiers to a raw XP grant.
///
/// Order matters for rounding parity: skill bonus, then global bonus, then
/// the companion's flat multiplier; the product is rounded once at the end.
pub fn modified_xp(raw: f64, skill_bonus: f64, global_bonus: f64, companion_bonus: f64) -> u64 {
    if raw <= 0.0 {
        return 0;
    }
    let scaled = raw * (1.0 + skill_bonus) * (1.0 + global_bonus) * (1.0 + companion_bonus);
    scaled.round().max(0.0) as u64
}

/// Change in level produced by an XP grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChange {
    pub skill: Skill,
    pub old_level: u32,
    pub new_level: u32,
}

/// Per-skill XP totals. Levels are always derived, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillLedger {
    pub xp: BTreeMap<Skill, u64>,
}

impl SkillLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn xp(&self, skill: Skill) -> u64 {
        self.xp.get(&skill).copied().unwrap_or(0)
    }

    pub fn level(&self, skill: Skill, xp_per_level: u64, cap: u32) -> u32 {
        level_for_xp(self.xp(skill), xp_per_level, cap)
    }

    /// Add already-modified XP. Returns the level change if the level moved.
    pub fn add(
        &mut self,
        skill: Skill,
        amount: u64,
        xp_per_level: u64,
        cap: u32,
    ) -> Option<LevelChange> {
        let old_level = self.level(skill, xp_per_level, cap);
        let total = self.xp.entry(skill).or_insert(0);
        *total = total.saturating_add(amount);
        let new_level = self.level(skill, xp_per_level, cap);
        (new_level != old_level).then_some(LevelChange {
            skill,
            old_level,
            new_level,
        })
    }
}
