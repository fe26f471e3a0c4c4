//! Yield, XP, durability and hunt-odds formulas.
//!
//! Everything here is deterministic: callers roll their random numbers and
//! pass the results in, so the same inputs always give the same answer.
//!
//! ```
//! use trailcraft_logic::gathering::{skill_yield_bonus, tool_yield_range};
//!
//! assert_eq!(tool_yield_range(Some(4)), (2, 4));
//! assert_eq!(skill_yield_bonus(10), 3);
//! ```

use crate::catalog::{BagCapacity, StorageClass};
use crate::config::GameConfig;

/// Inclusive base yield range for a gather with the given tool tier
/// (`None` = bare hands).
pub fn tool_yield_range(tool_tier: Option<i8>) -> (u32, u32) {
    match tool_tier {
        Some(t) if t > 0 => {
            let t = t as u32;
            (1 + t / 3, 2 + t / 2)
        }
        _ => (1, 2),
    }
}

/// Flat yield bonus from skill level: one unit per three levels, max 3.
pub fn skill_yield_bonus(level: u32) -> u32 {
    (level.saturating_sub(1) / 3).min(3)
}

/// Final standard-gather amount before capacity is applied.
pub fn gather_amount(
    rolled_base: u32,
    level: u32,
    potion_multiplier: Option<f64>,
    enrichment_multiplier: Option<f64>,
) -> u32 {
    let mut amount = (rolled_base + skill_yield_bonus(level)) as f64;
    if let Some(m) = potion_multiplier {
        amount *= m;
    }
    if let Some(m) = enrichment_multiplier {
        amount *= m;
    }
    amount.round().max(0.0) as u32
}

/// Raw (pre-gear) XP for a standard gather.
pub fn gather_xp(base_xp: u32, tool_tier: Option<i8>, enrichment_multiplier: Option<f64>) -> f64 {
    let bonus = tool_tier.map_or(0, |t| t.max(0) as u32 * 2);
    let xp = (base_xp + bonus) as f64;
    xp * enrichment_multiplier.unwrap_or(1.0)
}

/// Chance to skip durability loss, or `None` when no save roll applies.
///
/// Only a tool of exactly the resource's tier can be saved, and only once
/// the player is `durability_save_level_threshold` levels past the
/// requirement.
pub fn durability_save_chance(
    config: &GameConfig,
    tool_tier: i8,
    resource_tier: i8,
    levels_above: i64,
) -> Option<f64> {
    if tool_tier != resource_tier
        || levels_above < config.durability_save_level_threshold as i64
    {
        return None;
    }
    let chance = (levels_above - 2) as f64 * config.durability_save_chance_per_level;
    Some(chance.min(config.durability_save_chance_cap))
}

/// Durability points lost for one use.
pub fn durability_loss(tool_tier: i8, resource_tier: i8, saved: bool) -> u32 {
    if tool_tier > resource_tier || saved {
        0
    } else if tool_tier == resource_tier {
        1
    } else {
        2
    }
}

/// Inputs to the hunt success chance.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuntOdds {
    /// Player hunting level minus the track's required level.
    pub level_delta: i64,
    pub bow_tier: Option<i8>,
    pub arrow_tier: Option<i8>,
    /// Summed `HuntSuccess` gear bonus.
    pub gear_bonus: f64,
    /// Active trained hawk bonus, already resolved to a number.
    pub companion_bonus: f64,
}

/// Probability that a hunt succeeds, clamped to the configured window.
pub fn hunt_chance(config: &GameConfig, odds: &HuntOdds) -> f64 {
    let mut chance = config.hunt_base_chance + odds.level_delta as f64 * config.hunt_chance_per_level;
    if let Some(t) = odds.bow_tier {
        chance += config.bow_base_bonus + config.bow_bonus_per_tier * t as f64;
    }
    if let Some(t) = odds.arrow_tier {
        chance += config.arrow_bonus_per_tier * t as f64;
    }
    chance += odds.gear_bonus + odds.companion_bonus;
    chance.clamp(config.hunt_min_chance, config.hunt_max_chance)
}

/// Inclusive hide yield range for a successful hunt.
pub fn hunt_yield_range(knife_tier: i8) -> (u32, u32) {
    let bonus = knife_tier.max(0) as u32 / 4;
    (1 + bonus, 2 + bonus)
}

/// Raw XP for a hunt attempt. Failures pay a third of the base.
pub fn hunt_xp(base_xp: u32, knife_tier: i8, success: bool) -> f64 {
    if success {
        (base_xp + knife_tier.max(0) as u32 * 2) as f64
    } else {
        base_xp as f64 / 3.0
    }
}

/// Capacity limit for a storage class. `None` means unlimited.
pub fn storage_capacity(
    config: &GameConfig,
    bag: Option<BagCapacity>,
    class: StorageClass,
) -> Option<u32> {
    let bag = bag.unwrap_or(BagCapacity { general: 0, herb: 0 });
    match class {
        StorageClass::General => Some(config.base_general_capacity + bag.general),
        StorageClass::Herb => Some(config.base_herb_capacity + bag.herb),
        StorageClass::Special => None,
    }
}

/// Amount that fits given current usage.
pub fn clamp_to_capacity(amount: u32, used: u32, capacity: Option<u32>) -> u32 {
    match capacity {
        Some(cap) => amount.min(cap.saturating_sub(used)),
        None => amount,
    }
}

/// Durability after repairing by a fraction of max, never above max.
pub fn repaired_durability(current: u32, max: u32, fraction: f64) -> u32 {
    let restore = (max as f64 * fraction).ceil() as u32;
    current.saturating_add(restore).min(max)
}

/// Smithing XP for repairing a tool of the given tier.
pub fn repair_xp(tool_tier: i8) -> u32 {
    let t = tool_tier.max(1) as u32;
    2 * t * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yield_ranges() {
        assert_eq!(tool_yield_range(None), (1, 2));
        assert_eq!(tool_yield_range(Some(1)), (1, 2));
        assert_eq!(tool_yield_range(Some(3)), (2, 3));
        assert_eq!(tool_yield_range(Some(11)), (4, 7));
    }

    #[test]
    fn skill_bonus_caps_at_three() {
        assert_eq!(skill_yield_bonus(1), 0);
        assert_eq!(skill_yield_bonus(3), 0);
        assert_eq!(skill_yield_bonus(4), 1);
        assert_eq!(skill_yield_bonus(60), 3);
    }

    #[test]
    fn multipliers_round_once() {
        assert_eq!(gather_amount(2, 1, None, None), 2);
        // (2 + 1) * 1.2 * 1.5 = 5.4
        assert_eq!(gather_amount(2, 4, Some(1.2), Some(1.5)), 5);
        // 3 * 1.5 = 4.5 rounds away from zero
        assert_eq!(gather_amount(3, 1, None, Some(1.5)), 5);
    }

    #[test]
    fn xp_with_tool_and_enrichment() {
        assert_eq!(gather_xp(10, Some(1), None), 12.0);
        assert_eq!(gather_xp(10, None, Some(1.5)), 15.0);
    }

    #[test]
    fn durability_rules() {
        let cfg = GameConfig::default();
        assert_eq!(durability_loss(3, 2, false), 0);
        assert_eq!(durability_loss(2, 2, false), 1);
        assert_eq!(durability_loss(1, 2, false), 2);
        assert_eq!(durability_loss(2, 2, true), 0);

        assert_eq!(durability_save_chance(&cfg, 2, 2, 2), None);
        assert_eq!(durability_save_chance(&cfg, 3, 2, 10), None);
        let c = durability_save_chance(&cfg, 2, 2, 3).unwrap();
        assert!((c - 0.05).abs() < 1e-12);
        assert_eq!(durability_save_chance(&cfg, 2, 2, 100), Some(0.95));
    }

    #[test]
    fn hunt_chance_clamps() {
        let cfg = GameConfig::default();
        let base = hunt_chance(&cfg, &HuntOdds::default());
        assert!((base - 0.5).abs() < 1e-12);

        let hawk = hunt_chance(
            &cfg,
            &HuntOdds {
                companion_bonus: 0.10,
                ..Default::default()
            },
        );
        assert!((hawk - 0.6).abs() < 1e-12);

        let hopeless = hunt_chance(
            &cfg,
            &HuntOdds {
                level_delta: -40,
                ..Default::default()
            },
        );
        assert_eq!(hopeless, 0.10);

        let certain = hunt_chance(
            &cfg,
            &HuntOdds {
                level_delta: 40,
                bow_tier: Some(11),
                arrow_tier: Some(11),
                ..Default::default()
            },
        );
        assert_eq!(certain, 0.95);
    }

    #[test]
    fn bow_and_arrow_bonus() {
        let cfg = GameConfig::default();
        let c = hunt_chance(
            &cfg,
            &HuntOdds {
                bow_tier: Some(5),
                arrow_tier: Some(4),
                ..Default::default()
            },
        );
        // 0.5 + 0.10 + 0.05 + 0.02
        assert!((c - 0.67).abs() < 1e-9);
    }

    #[test]
    fn hunt_xp_and_yield() {
        assert_eq!(hunt_yield_range(3), (1, 2));
        assert_eq!(hunt_yield_range(8), (3, 4));
        assert_eq!(hunt_xp(15, 2, true), 19.0);
        assert_eq!(hunt_xp(15, 2, false), 5.0);
    }

    #[test]
    fn capacity() {
        let cfg = GameConfig::default();
        assert_eq!(storage_capacity(&cfg, None, StorageClass::General), Some(100));
        assert_eq!(
            storage_capacity(
                &cfg,
                Some(BagCapacity {
                    general: 50,
                    herb: 20
                }),
                StorageClass::Herb
            ),
            Some(60)
        );
        assert_eq!(storage_capacity(&cfg, None, StorageClass::Special), None);
        assert_eq!(clamp_to_capacity(5, 98, Some(100)), 2);
        assert_eq!(clamp_to_capacity(5, 120, Some(100)), 0);
        assert_eq!(clamp_to_capacity(5, 120, None), 5);
    }

    #[test]
    fn repair_clamps_to_max() {
        assert_eq!(repaired_durability(10, 50, 0.25), 23);
        assert_eq!(repaired_durability(45, 50, 0.5), 50);
        assert_eq!(repair_xp(3), 18);
    }
}
