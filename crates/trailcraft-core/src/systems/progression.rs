//! Progression system - XP grants and gear-derived stat bonuses

use log::info;
use trailcraft_logic::catalog::{Catalog, CreatureKind};
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::skills::{modified_xp, Skill, Stat};

use super::{FeedbackCategory, SimEvent};
use crate::components::StatBonuses;
use crate::state::GameState;

/// Grant XP after gear and companion modifiers. Returns the XP actually added.
pub fn add_xp(state: &mut GameState, config: &GameConfig, skill: Skill, raw: f64) -> u64 {
    let companion = if state.companions.active_trained(CreatureKind::Dragon) {
        config.dragon_xp_bonus
    } else {
        0.0
    };
    let amount = modified_xp(
        raw,
        state.bonuses.get(Stat::SkillXp(skill)),
        state.bonuses.get(Stat::GlobalXp),
        companion,
    );
    if amount == 0 {
        return 0;
    }

    if let Some(change) =
        state
            .skills
            .add(skill, amount, config.base_xp_per_level, config.level_cap)
    {
        info!("{} level {} -> {}", skill.name(), change.old_level, change.new_level);
        state.events.push(SimEvent::LevelUp {
            skill,
            level: change.new_level,
        });
        state.events.feedback(
            format!("{} reached level {}!", skill.name(), change.new_level),
            true,
            FeedbackCategory::World,
        );
    }
    amount
}

/// Rebuild the stat-bonus map from equipped gear.
pub fn recalculate_stat_bonuses(state: &mut GameState, catalog: &Catalog) {
    let mut bonuses = StatBonuses::default();
    for item in state.equipment.slots.values() {
        if let Some(def) = catalog.item(item) {
            for (stat, value) in &def.stat_bonuses {
                *bonuses.values.entry(*stat).or_insert(0.0) += value;
            }
        }
    }
    state.bonuses = bonuses;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Creature, CreatureState};
    use trailcraft_logic::catalog::EquipSlot;

    #[test]
    fn plain_xp_and_level_up_event() {
        let config = GameConfig::default();
        let mut state = GameState::new();
        assert_eq!(add_xp(&mut state, &config, Skill::Mining, 99.0), 99);
        assert!(state.events.is_empty());
        add_xp(&mut state, &config, Skill::Mining, 1.0);
        let events = state.events.drain();
        assert!(events.contains(&SimEvent::LevelUp {
            skill: Skill::Mining,
            level: 2
        }));
    }

    #[test]
    fn gear_and_dragon_bonuses_stack() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let mut state = GameState::new();
        state.inventory.add_item(&"miner_helm".into(), 1);
        state.equipment.set(EquipSlot::Head, "miner_helm".into());
        recalculate_stat_bonuses(&mut state, &catalog);
        assert!((state.bonuses.get(Stat::SkillXp(Skill::Mining)) - 0.10).abs() < 1e-12);

        // 100 * 1.1 = 110
        assert_eq!(add_xp(&mut state, &config, Skill::Mining, 100.0), 110);
        // helm does not boost smithing
        assert_eq!(add_xp(&mut state, &config, Skill::Smithing, 100.0), 100);

        let mut dragon = Creature::hatch(0, CreatureKind::Dragon, 0.0, 1);
        dragon.state = CreatureState::TrainedAdult;
        state.companions.creatures.push(dragon);
        state.companions.active = Some(0);
        // 100 * 1.1 * 1.05 = 115.5 -> 116
        assert_eq!(add_xp(&mut state, &config, Skill::Mining, 100.0), 116);
    }

    #[test]
    fn unequipping_clears_bonuses() {
        let catalog = Catalog::standard();
        let mut state = GameState::new();
        state.equipment.set(EquipSlot::Neck, "lucky_charm".into());
        recalculate_stat_bonuses(&mut state, &catalog);
        assert!(state.bonuses.get(Stat::RareFind) > 0.0);
        state.equipment.clear(EquipSlot::Neck);
        recalculate_stat_bonuses(&mut state, &catalog);
        assert_eq!(state.bonuses.get(Stat::RareFind), 0.0);
    }
}
