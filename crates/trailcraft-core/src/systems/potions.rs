//! Potion effects - drinking, stacking and expiry

use trailcraft_logic::catalog::{Catalog, ItemCategory, PotionKind};
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::ids::ItemId;

use super::FeedbackCategory;
use crate::state::GameState;

/// Drink one potion. Drinking again while active extends the expiry.
pub fn drink_potion(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    item: &ItemId,
) -> bool {
    let Some(def) = catalog.item(item) else {
        return false;
    };
    let ItemCategory::Potion(kind) = def.category else {
        state.events.feedback(
            format!("{} is not a potion.", def.name),
            false,
            FeedbackCategory::Equipment,
        );
        return false;
    };
    if !state.inventory.remove_item(item, 1) {
        state.events.feedback(
            format!("You have no {}.", def.name),
            false,
            FeedbackCategory::Equipment,
        );
        return false;
    }

    let duration = match kind {
        PotionKind::IncreasedYield => config.yield_potion_duration_secs,
    };
    let now = state.now;
    let expiry = state.potions.expiries.entry(kind).or_insert(now);
    *expiry = expiry.max(now) + duration;
    let minutes = ((*expiry - now) / 60.0).round();
    state.events.feedback(
        format!("You drink the {}. ({} min left)", def.name, minutes),
        true,
        FeedbackCategory::Equipment,
    );
    true
}

/// Drop every effect whose expiry has passed.
pub fn expire_potions(state: &mut GameState) {
    let now = state.now;
    state.potions.expiries.retain(|_, expiry| *expiry > now);
}

/// Yield multiplier from an unexpired increased-yield potion.
pub fn potion_multiplier(state: &GameState, config: &GameConfig) -> Option<f64> {
    state
        .potions
        .is_active(PotionKind::IncreasedYield, state.now)
        .then_some(config.yield_potion_multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drinking_stacks_duration() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let mut state = GameState::new();
        let potion = ItemId::from("yield_potion");
        state.inventory.add_item(&potion, 2);
        state.now = 1_000.0;

        assert!(drink_potion(&mut state, &catalog, &config, &potion));
        assert!(drink_potion(&mut state, &catalog, &config, &potion));
        assert_eq!(
            state.potions.expiries[&PotionKind::IncreasedYield],
            1_000.0 + 2.0 * config.yield_potion_duration_secs
        );
        assert!(!drink_potion(&mut state, &catalog, &config, &potion));
        assert_eq!(potion_multiplier(&state, &config), Some(1.2));
    }

    #[test]
    fn expired_effects_are_removed() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let mut state = GameState::new();
        let potion = ItemId::from("yield_potion");
        state.inventory.add_item(&potion, 1);
        drink_potion(&mut state, &catalog, &config, &potion);

        state.now = config.yield_potion_duration_secs;
        assert_eq!(potion_multiplier(&state, &config), None);
        expire_potions(&mut state);
        assert!(state.potions.expiries.is_empty());
    }

    #[test]
    fn non_potions_are_rejected() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let mut state = GameState::new();
        let pick = ItemId::from("T1_pickaxe");
        state.inventory.add_item(&pick, 1);
        assert!(!drink_potion(&mut state, &catalog, &config, &pick));
        assert_eq!(state.inventory.item_count(&pick), 1);
    }
}
