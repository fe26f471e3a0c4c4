//! Rare drops - gems, whetstones, feathers, seeds and creature eggs
//!
//! Every roll is ordered skill gate, then ownership exclusion, then the
//! random roll, so ineligible drops never consume randomness.

use log::info;
use rand::Rng;
use trailcraft_logic::catalog::spawn_table::gem_for_tier;
use trailcraft_logic::catalog::{Catalog, CreatureKind, ResourceDef, ResourceKind};
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::constants::specials;
use trailcraft_logic::ids::{ItemId, ResourceId};
use trailcraft_logic::skills::{Skill, Stat};

use super::{roll, FeedbackCategory};
use crate::state::GameState;

/// Additive bonus applied to every rare-drop chance.
pub fn rare_find_bonus(state: &GameState, config: &GameConfig) -> f64 {
    let dragon = if state.companions.active_trained(CreatureKind::Dragon) {
        config.dragon_rare_find_bonus
    } else {
        0.0
    };
    state.bonuses.get(Stat::RareFind) + dragon
}

fn award_resource(state: &mut GameState, catalog: &Catalog, id: &str) {
    let id = ResourceId::from(id);
    state.inventory.add_resource(&id, 1);
    state.events.feedback(
        format!("Rare find: {}!", catalog.display_name(id.as_str())),
        true,
        FeedbackCategory::Gather,
    );
}

/// Roll every rare drop for a successful gather or hunt of `resource`.
pub fn handle_rare_drops(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    resource: &ResourceDef,
    rng: &mut impl Rng,
) {
    let table = &catalog.rare_drops;
    let bonus = rare_find_bonus(state, config);

    match resource.kind {
        ResourceKind::Stone => {
            if resource.tier >= table.gem_min_tier
                && roll(rng, table.gem_chance(resource.tier) + bonus)
            {
                let gem = gem_for_tier(resource.tier, rng.gen::<f64>());
                award_resource(state, catalog, gem);
            }
            if resource.tier >= table.whetstone_min_tier && roll(rng, table.whetstone_chance + bonus)
            {
                let whetstone = ItemId::from(specials::WHETSTONE);
                state.inventory.add_item(&whetstone, 1);
                state.events.feedback(
                    format!("Rare find: {}!", catalog.display_name(specials::WHETSTONE)),
                    true,
                    FeedbackCategory::Gather,
                );
            }
        }
        ResourceKind::Herb => {
            if roll(rng, table.feather_chance + bonus) {
                award_resource(state, catalog, specials::FEATHER);
            }
            if roll(rng, table.wild_seed_chance + bonus) {
                award_resource(state, catalog, specials::WILD_SEEDS);
            }
            if resource.tier >= table.rare_seed_min_tier && roll(rng, table.rare_seed_chance + bonus)
            {
                award_resource(state, catalog, specials::RARE_SEEDS);
            }
        }
        ResourceKind::Wood => {
            let level = state.level(Skill::Woodcutting, config);
            let eligible: Vec<_> = table
                .woodcutting_eggs
                .iter()
                .filter(|egg| level >= egg.min_level)
                .filter(|egg| !state.owns_creature_kind(egg.kind))
                .collect();
            for egg in eligible {
                if roll(rng, egg.chance + bonus) {
                    info!("{} egg found while woodcutting", egg.kind.name());
                    award_resource(state, catalog, egg.kind.egg_id());
                    break;
                }
            }
        }
        ResourceKind::Track => {
            if resource.tier >= table.dragon_egg_track_tier
                && !state.owns_creature_kind(CreatureKind::Dragon)
                && roll(rng, table.dragon_egg_chance + bonus)
            {
                info!("dragon egg found on a hunt");
                award_resource(state, catalog, CreatureKind::Dragon.egg_id());
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use trailcraft_logic::skills::Skill;

    fn lucky() -> StepRng {
        StepRng::new(0, 0)
    }

    fn unlucky() -> StepRng {
        StepRng::new(0xFFFF_FFFF_0000_0000, 0)
    }

    fn res<'a>(catalog: &'a Catalog, id: &str) -> &'a ResourceDef {
        catalog.resource(&ResourceId::from(id)).unwrap()
    }

    #[test]
    fn mining_awards_gem_and_whetstone_when_lucky() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let mut state = GameState::new();
        handle_rare_drops(&mut state, &catalog, &config, res(&catalog, "T4_stone"), &mut lucky());
        assert_eq!(state.inventory.resource_count(&"rough_ruby".into()), 1);
        assert_eq!(state.inventory.item_count(&"whetstone".into()), 1);
    }

    #[test]
    fn low_tier_stone_has_no_gems() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let mut state = GameState::new();
        handle_rare_drops(&mut state, &catalog, &config, res(&catalog, "T1_stone"), &mut lucky());
        assert!(state.inventory.resources.is_empty());
        assert!(state.inventory.items.is_empty());
    }

    #[test]
    fn unlucky_rolls_award_nothing() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let mut state = GameState::new();
        handle_rare_drops(&mut state, &catalog, &config, res(&catalog, "T8_herb"), &mut unlucky());
        assert!(state.inventory.resources.is_empty());
    }

    #[test]
    fn one_egg_per_gather_and_never_a_duplicate() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let mut state = GameState::new();
        state.skills.xp.insert(Skill::Woodcutting, 4_000);
        let wood = res(&catalog, "T5_wood");

        handle_rare_drops(&mut state, &catalog, &config, wood, &mut lucky());
        assert_eq!(state.inventory.resource_count(&"raven_egg".into()), 1);
        assert_eq!(state.inventory.resource_count(&"owl_egg".into()), 0);

        // raven egg held, so the owl is next in line
        handle_rare_drops(&mut state, &catalog, &config, wood, &mut lucky());
        assert_eq!(state.inventory.resource_count(&"raven_egg".into()), 1);
        assert_eq!(state.inventory.resource_count(&"owl_egg".into()), 1);
    }

    #[test]
    fn egg_drops_are_skill_gated() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let mut state = GameState::new();
        state.skills.xp.insert(Skill::Woodcutting, 500); // level 6
        handle_rare_drops(&mut state, &catalog, &config, res(&catalog, "T1_wood"), &mut lucky());
        assert!(state.inventory.resources.is_empty());
    }

    #[test]
    fn unlocked_dragon_blocks_dragon_egg() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let mut state = GameState::new();
        let track = res(&catalog, "T11_track");
        state.unlocked_pets.insert(CreatureKind::Dragon);
        handle_rare_drops(&mut state, &catalog, &config, track, &mut lucky());
        assert!(state.inventory.resources.is_empty());

        state.unlocked_pets.clear();
        handle_rare_drops(&mut state, &catalog, &config, track, &mut lucky());
        assert_eq!(state.inventory.resource_count(&"dragon_egg".into()), 1);
    }

    /// Every `f64` draw is ~0.027, just over the T3 gem chance of 0.026.
    fn near_miss() -> StepRng {
        StepRng::new(0x06E9_78D4_FDF3_B640, 0)
    }

    fn gems(state: &GameState) -> u32 {
        ["rough_ruby", "rough_sapphire", "rough_emerald", "rough_diamond"]
            .iter()
            .map(|g| state.inventory.resource_count(&(*g).into()))
            .sum()
    }

    #[test]
    fn rare_find_gear_and_dragon_raise_the_odds() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let stone = res(&catalog, "T3_stone");

        let mut bare = GameState::new();
        handle_rare_drops(&mut bare, &catalog, &config, stone, &mut near_miss());
        assert_eq!(gems(&bare), 0);

        let mut charmed = GameState::new();
        charmed
            .equipment
            .set(trailcraft_logic::catalog::EquipSlot::Neck, "lucky_charm".into());
        crate::systems::recalculate_stat_bonuses(&mut charmed, &catalog);
        assert!((rare_find_bonus(&charmed, &config) - 0.01).abs() < 1e-12);
        handle_rare_drops(&mut charmed, &catalog, &config, stone, &mut near_miss());
        assert_eq!(gems(&charmed), 1);

        let mut with_dragon = GameState::new();
        let mut dragon = crate::components::Creature::hatch(0, CreatureKind::Dragon, 0.0, 1);
        dragon.growth_started_at = None;
        dragon.state = crate::components::CreatureState::TrainedAdult;
        with_dragon.companions.creatures.push(dragon);
        with_dragon.companions.active = Some(0);
        assert!((rare_find_bonus(&with_dragon, &config) - 0.005).abs() < 1e-12);
        handle_rare_drops(&mut with_dragon, &catalog, &config, stone, &mut near_miss());
        assert_eq!(gems(&with_dragon), 1);
    }
}
