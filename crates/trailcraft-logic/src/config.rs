//! Tunable gameplay parameters.
//!
//! Every balance number the resolvers consult lives here so a host can
//! tweak pacing without touching the rules. `GameConfig::default()` holds
//! the shipped values.

use serde::{Deserialize, Serialize};

/// All tunable simulation parameters. Distances in meters, times in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    // ── Progression ──
    pub base_xp_per_level: u64,
    pub level_cap: u32,

    // ── Gathering ──
    /// Maximum player-to-node distance for a manual gather.
    pub gather_distance: f64,
    /// Raw resource units carried without a bag (general storage class).
    pub base_general_capacity: u32,
    /// Raw resource units carried without a bag (herb storage class).
    pub base_herb_capacity: u32,
    pub enrichment_multiplier: f64,
    pub yield_potion_multiplier: f64,
    pub discovery_yield_min: u32,
    pub discovery_yield_max: u32,
    pub discovery_xp_multiplier: f64,

    // ── Durability ──
    /// Levels above the resource requirement before a save roll is possible.
    pub durability_save_level_threshold: u32,
    pub durability_save_chance_per_level: f64,
    pub durability_save_chance_cap: f64,

    // ── Hunting ──
    pub hunt_base_chance: f64,
    pub hunt_chance_per_level: f64,
    pub hunt_min_chance: f64,
    pub hunt_max_chance: f64,
    /// Track tier from which a bow and arrows are mandatory.
    pub hunt_bow_required_tier: i8,
    pub bow_base_bonus: f64,
    pub bow_bonus_per_tier: f64,
    pub arrow_bonus_per_tier: f64,

    // ── Crafting ──
    /// Per-craft material-efficiency save chance with the Storehouse built.
    pub storehouse_efficiency_chance: f64,

    // ── Companions ──
    pub raven_gift_chance: f64,
    pub hawk_hunt_bonus: f64,
    pub hawk_arrow_save_chance: f64,
    pub dragon_rare_find_bonus: f64,
    pub dragon_xp_bonus: f64,
    pub dragon_tier_up_chance: f64,
    pub incubator_slots: usize,
    /// Local hour at which night begins (inclusive).
    pub night_start_hour: u32,
    /// Local hour at which night ends (exclusive).
    pub night_end_hour: u32,
    /// Offset from UTC applied to the sim clock for day/night.
    pub utc_offset_secs: i64,

    // ── World spawning ──
    pub resource_spawn_radius: f64,
    pub base_node_cap: usize,
    pub min_distance_between_nodes: f64,
    pub min_distance_from_base: f64,
    /// Gap kept between the inner ring boundary and outer-ring nodes.
    pub outer_ring_min_gap: f64,
    pub spawn_interval_secs: f64,
    pub spawn_movement_threshold: f64,
    pub spawn_attempts_per_node: usize,
    pub enrichment_chance: f64,
    pub watchtower_influence_radius: f64,

    // ── Horizon scan ──
    pub scan_cooldown_secs: f64,
    pub scan_min_distance: f64,
    pub scan_max_distance: f64,
    pub discovery_lifespan_secs: f64,

    // ── Potions ──
    pub yield_potion_duration_secs: f64,

    // ── Ticks ──
    pub world_tick_secs: f64,
    pub scout_tick_secs: f64,
    pub scout_yield_min: u32,
    pub scout_yield_max: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_xp_per_level: 100,
            level_cap: 60,

            gather_distance: 40.0,
            base_general_capacity: 100,
            base_herb_capacity: 40,
            enrichment_multiplier: 1.5,
            yield_potion_multiplier: 1.2,
            discovery_yield_min: 20,
            discovery_yield_max: 30,
            discovery_xp_multiplier: 5.0,

            durability_save_level_threshold: 3,
            durability_save_chance_per_level: 0.05,
            durability_save_chance_cap: 0.95,

            hunt_base_chance: 0.50,
            hunt_chance_per_level: 0.02,
            hunt_min_chance: 0.10,
            hunt_max_chance: 0.95,
            hunt_bow_required_tier: 5,
            bow_base_bonus: 0.10,
            bow_bonus_per_tier: 0.01,
            arrow_bonus_per_tier: 0.005,

            storehouse_efficiency_chance: 0.02,

            raven_gift_chance: 0.03,
            hawk_hunt_bonus: 0.10,
            hawk_arrow_save_chance: 0.25,
            dragon_rare_find_bonus: 0.005,
            dragon_xp_bonus: 0.05,
            dragon_tier_up_chance: 0.10,
            incubator_slots: 2,
            night_start_hour: 20,
            night_end_hour: 6,
            utc_offset_secs: 0,

            resource_spawn_radius: 250.0,
            base_node_cap: 12,
            min_distance_between_nodes: 30.0,
            min_distance_from_base: 40.0,
            outer_ring_min_gap: 15.0,
            spawn_interval_secs: 180.0,
            spawn_movement_threshold: 100.0,
            spawn_attempts_per_node: 12,
            enrichment_chance: 0.15,
            watchtower_influence_radius: 400.0,

            scan_cooldown_secs: 4.0 * 3600.0,
            scan_min_distance: 500.0,
            scan_max_distance: 1200.0,
            discovery_lifespan_secs: 2.0 * 3600.0,

            yield_potion_duration_secs: 600.0,

            world_tick_secs: 15.0,
            scout_tick_secs: 600.0,
            scout_yield_min: 1,
            scout_yield_max: 3,
        }
    }
}

impl GameConfig {
    /// Whether the given sim time (seconds since the Unix epoch) falls at night.
    pub fn is_night(&self, now_secs: f64) -> bool {
        let local = now_secs as i64 + self.utc_offset_secs;
        let hour = local.rem_euclid(86_400) / 3600;
        let hour = hour as u32;
        if self.night_start_hour > self.night_end_hour {
            hour >= self.night_start_hour || hour < self.night_end_hour
        } else {
            hour >= self.night_start_hour && hour < self.night_end_hour
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let c = GameConfig::default();
        assert!(c.hunt_min_chance < c.hunt_max_chance);
        assert!(c.scan_min_distance < c.scan_max_distance);
        assert!(c.discovery_yield_min <= c.discovery_yield_max);
        assert!(c.world_tick_secs < c.scout_tick_secs);
        assert_eq!(c.base_xp_per_level, 100);
    }

    #[test]
    fn night_wraps_midnight() {
        let c = GameConfig::default();
        assert!(c.is_night(0.0)); // 00:00 UTC
        assert!(c.is_night(5.0 * 3600.0 + 3599.0));
        assert!(!c.is_night(6.0 * 3600.0));
        assert!(!c.is_night(19.0 * 3600.0));
        assert!(c.is_night(20.0 * 3600.0));
    }

    #[test]
    fn night_respects_offset() {
        let c = GameConfig {
            utc_offset_secs: -3 * 3600,
            ..Default::default()
        };
        // 08:00 UTC is 05:00 local
        assert!(c.is_night(8.0 * 3600.0));
        assert!(!c.is_night(9.0 * 3600.0));
    }
}
