//! Base upgrades - the prerequisite graph that unlocks recipes and actions

use log::{info, warn};
use trailcraft_logic::catalog::Catalog;
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::ids::UpgradeId;

use super::{add_xp, deduct, resolve_ingredients, FeedbackCategory};
use crate::state::GameState;

/// Why an upgrade can't be built, or `None` when it can.
pub fn upgrade_blocker(state: &GameState, catalog: &Catalog, id: &UpgradeId) -> Option<String> {
    let Some(def) = catalog.upgrade(id) else {
        warn!("unknown upgrade {}", id);
        return Some(format!("Unknown upgrade {}.", id));
    };
    if state.upgrades.contains(id) {
        return Some(format!("{} is already built.", def.name));
    }
    let missing: Vec<String> = def
        .prerequisites
        .iter()
        .filter(|p| !state.upgrades.contains(*p))
        .map(|p| catalog.upgrade(p).map_or_else(|| p.to_string(), |u| u.name.clone()))
        .collect();
    if !missing.is_empty() {
        return Some(format!("{} requires {}.", def.name, missing.join(", ")));
    }
    resolve_ingredients(state, catalog, &def.cost).err()
}

pub fn can_build_upgrade(state: &GameState, catalog: &Catalog, id: &UpgradeId) -> bool {
    upgrade_blocker(state, catalog, id).is_none()
}

/// Pay for and activate an upgrade.
pub fn build_upgrade(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    id: &UpgradeId,
) -> bool {
    if let Some(reason) = upgrade_blocker(state, catalog, id) {
        state.events.feedback(reason, false, FeedbackCategory::Build);
        return false;
    }
    let Some(def) = catalog.upgrade(id) else {
        return false;
    };
    let lines = match resolve_ingredients(state, catalog, &def.cost) {
        Ok(lines) => lines,
        Err(reason) => {
            state.events.feedback(reason, false, FeedbackCategory::Build);
            return false;
        }
    };
    for line in &lines {
        deduct(state, line);
    }
    state.upgrades.insert(id.clone());
    for (skill, amount) in &def.cost.xp {
        add_xp(state, config, *skill, *amount as f64);
    }
    info!("built {}", def.name);
    state.events.feedback(
        format!("Built the {}! {}", def.name, def.description),
        true,
        FeedbackCategory::Build,
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailcraft_logic::constants::upgrades;
    use trailcraft_logic::skills::Skill;

    #[test]
    fn workbench_from_scratch() {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let mut state = GameState::new();
        let bench = UpgradeId::from(upgrades::WORKBENCH);
        assert!(!can_build_upgrade(&state, &catalog, &bench));

        state.inventory.add_resource(&"T0_wood".into(), 12);
        state.inventory.add_resource(&"T0_stone".into(), 5);
        assert!(build_upgrade(&mut state, &catalog, &config, &bench));
        assert!(state.has_upgrade(upgrades::WORKBENCH));
        assert_eq!(state.inventory.resource_count(&"T0_wood".into()), 2);
        assert_eq!(state.inventory.resource_count(&"T0_stone".into()), 0);
        assert_eq!(state.skills.xp(Skill::Woodworking), 15);

        // no second build
        state.inventory.add_resource(&"T0_wood".into(), 10);
        state.inventory.add_resource(&"T0_stone".into(), 5);
        assert!(!build_upgrade(&mut state, &catalog, &config, &bench));
        assert_eq!(state.inventory.resource_count(&"T0_stone".into()), 5);
    }

    #[test]
    fn prerequisites_gate_building() {
        let catalog = Catalog::standard();
        let mut state = GameState::new();
        let forge = UpgradeId::from(upgrades::BASIC_FORGE);
        state.inventory.add_resource(&"T0_stone".into(), 20);
        state.inventory.add_resource(&"T0_wood".into(), 10);
        let reason = upgrade_blocker(&state, &catalog, &forge).unwrap();
        assert!(reason.contains("Workbench"));

        state.upgrades.insert(UpgradeId::from(upgrades::WORKBENCH));
        assert!(can_build_upgrade(&state, &catalog, &forge));
    }
}
