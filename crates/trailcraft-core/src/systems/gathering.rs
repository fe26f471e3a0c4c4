//! Gathering resolver - the single entry point for collecting a node
//!
//! Every attempt resolves to Success, Failure or Invalid. Invalid attempts
//! change nothing and leave the node in place; Success and Failure consume it.

use log::warn;
use rand::Rng;
use trailcraft_logic::catalog::{Catalog, CreatureKind, ResourceDef, ResourceKind, ToolCategory};
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::constants::{objectives, specials};
use trailcraft_logic::gathering::{clamp_to_capacity, gather_amount, gather_xp, tool_yield_range};
use trailcraft_logic::geo::GeoPoint;
use trailcraft_logic::ids::{ItemId, ResourceId};
use trailcraft_logic::skills::Skill;

use super::{
    add_xp, consume_durability, handle_rare_drops, potion_multiplier, refund_fetch_charge,
    resolve_hunt, roll, spend_fetch_charge, update_active_pet_quest_progress, vision_bonus,
    FeedbackCategory,
};
use crate::components::{NodeId, ResourceNode};
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatherOutcome {
    Success,
    /// Attempted but nothing gained (missed hunt, no room left). Node consumed.
    Failure,
    /// Preconditions unmet. Nothing changed.
    Invalid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatherResult {
    pub outcome: GatherOutcome,
    pub message: String,
}

impl GatherResult {
    pub(crate) fn success(message: impl Into<String>) -> Self {
        Self {
            outcome: GatherOutcome::Success,
            message: message.into(),
        }
    }

    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self {
            outcome: GatherOutcome::Failure,
            message: message.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self {
            outcome: GatherOutcome::Invalid,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == GatherOutcome::Success
    }
}

/// Who is doing the gathering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GatherMode {
    Player,
    /// A companion fetch: no tools, no distance limit, hunts always land.
    Fetch(CreatureKind),
}

/// Gather `node` from `player_location`.
pub fn resolve_gather(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    node: NodeId,
    player_location: Option<GeoPoint>,
    rng: &mut impl Rng,
) -> GatherResult {
    let Some(snapshot) = state.node(node) else {
        return GatherResult::invalid("That resource is no longer there.");
    };
    let Some(def) = catalog.resource(&snapshot.resource) else {
        warn!("node {:?} holds unknown resource {}", node, snapshot.resource);
        return GatherResult::invalid("You can't gather that.");
    };
    let Some(location) = player_location else {
        return GatherResult::invalid("Waiting for your location...");
    };
    let distance = location.distance_to(&snapshot.location);
    if distance > config.gather_distance {
        return GatherResult::invalid(format!(
            "{} is {:.0} m away. Move closer.",
            def.name, distance
        ));
    }

    let result = resolve_at_node(state, catalog, config, &snapshot, def, GatherMode::Player, rng);
    finish(state, &snapshot, def, result)
}

/// Send the active companion to collect a node within its fetch range.
pub fn pet_fetch_resource(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    node: NodeId,
    rng: &mut impl Rng,
) -> GatherResult {
    let Some(creature) = state.companions.active() else {
        return GatherResult::invalid("You have no companion with you.");
    };
    let kind = creature.kind;
    if !creature.state.is_adult() {
        return GatherResult::invalid(format!("Your {} is too young to fetch.", kind.name()));
    }
    if creature.fetch_charges == 0 {
        return GatherResult::invalid(format!("Your {} needs to rest.", kind.name()));
    }
    let Some(snapshot) = state.node(node) else {
        return GatherResult::invalid("That resource is no longer there.");
    };
    let Some(def) = catalog.resource(&snapshot.resource) else {
        warn!("node {:?} holds unknown resource {}", node, snapshot.resource);
        return GatherResult::invalid("You can't gather that.");
    };
    let Some(location) = state.player_location else {
        return GatherResult::invalid("Waiting for your location...");
    };
    let range = config.resource_spawn_radius + vision_bonus(state, catalog, config);
    if location.distance_to(&snapshot.location) > range {
        return GatherResult::invalid(format!("That is beyond your {}'s reach.", kind.name()));
    }

    if !spend_fetch_charge(state, catalog) {
        return GatherResult::invalid(format!("Your {} needs to rest.", kind.name()));
    }
    let result = resolve_at_node(
        state,
        catalog,
        config,
        &snapshot,
        def,
        GatherMode::Fetch(kind),
        rng,
    );
    if !result.is_success() {
        refund_fetch_charge(state);
    }
    finish(state, &snapshot, def, result)
}

fn finish(
    state: &mut GameState,
    node: &ResourceNode,
    def: &ResourceDef,
    result: GatherResult,
) -> GatherResult {
    if result.outcome != GatherOutcome::Invalid {
        state.remove_node(node.id);
    }
    let category = if def.is_hunt() {
        FeedbackCategory::Hunt
    } else {
        FeedbackCategory::Gather
    };
    state
        .events
        .feedback(result.message.clone(), result.is_success(), category);
    result
}

/// Skill gate, then dispatch by resource kind.
fn resolve_at_node(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    node: &ResourceNode,
    def: &ResourceDef,
    mode: GatherMode,
    rng: &mut impl Rng,
) -> GatherResult {
    let Some(skill) = def.skill else {
        warn!("gatherable resource {} has no skill", def.id);
        return GatherResult::invalid(format!("{} can't be gathered.", def.name));
    };
    let level = state.level(skill, config);
    if level < def.required_level {
        return GatherResult::invalid(format!(
            "You need {} level {} for {} (you are {}).",
            skill.name(),
            def.required_level,
            def.name,
            level
        ));
    }

    if def.is_hunt() {
        resolve_hunt(state, catalog, config, def, skill, level, mode, rng)
    } else {
        standard_gather(state, catalog, config, node, def, skill, level, mode, rng)
    }
}

/// The tool a player gathers `def` with, or why they can't.
fn select_tool(
    state: &GameState,
    catalog: &Catalog,
    def: &ResourceDef,
) -> Result<Option<(ItemId, i8)>, GatherResult> {
    let equipped = |category: ToolCategory| {
        state
            .equipment
            .get(category.slot())
            .and_then(|id| catalog.item(id).map(|item| (id.clone(), item.tier)))
    };
    match def.tool {
        Some(req) => match equipped(req.category) {
            Some((id, tier)) if tier >= req.min_tier => Ok(Some((id, tier))),
            _ => Err(GatherResult::invalid(format!(
                "You need a tier {}+ {} to gather {}.",
                req.min_tier,
                req.category.label(),
                def.name
            ))),
        },
        // optional tool still adds yield and XP
        None => Ok(def.kind.tool().and_then(equipped)),
    }
}

#[allow(clippy::too_many_arguments)]
fn standard_gather(
    state: &mut GameState,
    catalog: &Catalog,
    config: &GameConfig,
    node: &ResourceNode,
    def: &ResourceDef,
    skill: Skill,
    level: u32,
    mode: GatherMode,
    rng: &mut impl Rng,
) -> GatherResult {
    let tool = match mode {
        GatherMode::Player => match select_tool(state, catalog, def) {
            Ok(tool) => tool,
            Err(invalid) => return invalid,
        },
        GatherMode::Fetch(_) => None,
    };
    let tool_tier = tool.as_ref().map(|(_, tier)| *tier);
    let enrichment = node.enriched.then_some(config.enrichment_multiplier);

    let amount = if node.discovery {
        rng.gen_range(config.discovery_yield_min..=config.discovery_yield_max)
    } else {
        let (lo, hi) = tool_yield_range(tool_tier);
        let base = rng.gen_range(lo..=hi);
        gather_amount(base, level, potion_multiplier(state, config), enrichment)
    };
    let added = clamp_to_capacity(
        amount,
        state.stored(catalog, def.storage),
        state.capacity(catalog, config, def.storage),
    );
    if added == 0 {
        return GatherResult::invalid(format!("No room for {}. Your bag is full.", def.name));
    }

    if let Some((id, _)) = &tool {
        let levels_above = level as i64 - def.required_level as i64;
        consume_durability(state, catalog, config, id, def.tier, levels_above, rng);
    }
    state.inventory.add_resource(&def.id, added);

    let mut xp = gather_xp(def.base_xp, tool_tier, enrichment);
    if node.discovery {
        xp *= config.discovery_xp_multiplier;
    }
    let gained = add_xp(state, config, skill, xp);

    update_active_pet_quest_progress(state, catalog, objectives::GATHER_ANY, 1);
    let family_objective = match def.kind {
        ResourceKind::Wood => Some(objectives::GATHER_WOOD),
        ResourceKind::Herb => Some(objectives::FORAGE_HERB),
        ResourceKind::Stone => Some(objectives::MINE_ORE),
        _ => None,
    };
    if let Some(key) = family_objective {
        update_active_pet_quest_progress(state, catalog, key, 1);
    }

    handle_rare_drops(state, catalog, config, def, rng);
    raven_gift(state, catalog, config, rng);

    let mut message = match mode {
        GatherMode::Player => format!("Gathered {} {} (+{} XP)", added, def.name, gained),
        GatherMode::Fetch(kind) => format!(
            "Your {} fetched {} {} (+{} XP)",
            kind.name(),
            added,
            def.name,
            gained
        ),
    };
    if added < amount {
        message.push_str(". Your bag is full");
    }
    GatherResult::success(message)
}

/// Trained raven: small chance of a bonus feather or seeds.
fn raven_gift(state: &mut GameState, catalog: &Catalog, config: &GameConfig, rng: &mut impl Rng) {
    if !state.companions.active_trained(CreatureKind::Raven) || !roll(rng, config.raven_gift_chance)
    {
        return;
    }
    let gift = if rng.gen::<f64>() < 0.5 {
        specials::FEATHER
    } else {
        specials::WILD_SEEDS
    };
    state.inventory.add_resource(&ResourceId::from(gift), 1);
    state.events.feedback(
        format!("Your Raven brought you a {}!", catalog.display_name(gift)),
        true,
        FeedbackCategory::Companion,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Creature, CreatureState};
    use crate::systems::SimEvent;
    use rand::rngs::mock::StepRng;
    use trailcraft_logic::catalog::{EquipSlot, PotionKind};

    fn lucky() -> StepRng {
        StepRng::new(0, 0)
    }

    fn unlucky() -> StepRng {
        StepRng::new(0xFFFF_FFFF_0000_0000, 0)
    }

    fn here() -> GeoPoint {
        GeoPoint::new(47.0, 8.0)
    }

    fn setup(resource: &str) -> (Catalog, GameConfig, GameState, NodeId) {
        let catalog = Catalog::standard();
        let config = GameConfig::default();
        let mut state = GameState::new();
        let node = state.spawn_node(ResourceId::from(resource), here(), 600.0, false, false);
        state.events.drain();
        (catalog, config, state, node)
    }

    fn equip(state: &mut GameState, slot: EquipSlot, id: &str) {
        let id = ItemId::from(id);
        state.inventory.add_item(&id, 1);
        state.equipment.set(slot, id);
    }

    #[test]
    fn missing_tool_is_invalid_and_keeps_node() {
        let (catalog, config, mut state, node) = setup("T1_stone");
        let r = resolve_gather(&mut state, &catalog, &config, node, Some(here()), &mut lucky());
        assert_eq!(r.outcome, GatherOutcome::Invalid);
        assert!(state.node(node).is_some());
        assert!(state.inventory.resources.is_empty());
    }

    #[test]
    fn too_far_or_no_location_is_invalid() {
        let (catalog, config, mut state, node) = setup("T0_wood");
        let far = here().destination(0.0, 100.0);
        let r = resolve_gather(&mut state, &catalog, &config, node, Some(far), &mut lucky());
        assert_eq!(r.outcome, GatherOutcome::Invalid);
        let r = resolve_gather(&mut state, &catalog, &config, node, None, &mut lucky());
        assert_eq!(r.outcome, GatherOutcome::Invalid);
        assert_eq!(state.node_count(), 1);
    }

    #[test]
    fn under_leveled_is_invalid() {
        let (catalog, config, mut state, node) = setup("T3_stone");
        equip(&mut state, EquipSlot::Pickaxe, "T3_pickaxe");
        let r = resolve_gather(&mut state, &catalog, &config, node, Some(here()), &mut lucky());
        assert_eq!(r.outcome, GatherOutcome::Invalid);
        assert!(r.message.contains("Mining level 10"));
    }

    #[test]
    fn bare_hand_gather_grants_resource_and_xp() {
        let (catalog, config, mut state, node) = setup("T0_wood");
        let r = resolve_gather(&mut state, &catalog, &config, node, Some(here()), &mut unlucky());
        assert_eq!(r.outcome, GatherOutcome::Success);
        assert_eq!(state.inventory.resource_count(&"T0_wood".into()), 1);
        assert_eq!(state.skills.xp(Skill::Woodcutting), 5);
        assert!(state.node(node).is_none());
    }

    #[test]
    fn tool_gather_wears_same_tier_tool() {
        let (catalog, config, mut state, node) = setup("T1_stone");
        equip(&mut state, EquipSlot::Pickaxe, "T1_pickaxe");
        let r = resolve_gather(&mut state, &catalog, &config, node, Some(here()), &mut unlucky());
        assert!(r.is_success());
        assert_eq!(state.inventory.resource_count(&"T1_stone".into()), 1);
        // base 10 + tool tier 1 * 2
        assert_eq!(state.skills.xp(Skill::Mining), 12);
        assert_eq!(state.inventory.durability(&"T1_pickaxe".into()), Some(49));
    }

    #[test]
    fn enrichment_and_potion_multiply_yield() {
        let (catalog, config, mut state, _) = setup("T0_herb");
        let node = state.spawn_node(ResourceId::from("T0_herb"), here(), 600.0, true, false);
        state
            .potions
            .expiries
            .insert(PotionKind::IncreasedYield, 1_000.0);
        let r = resolve_gather(&mut state, &catalog, &config, node, Some(here()), &mut unlucky());
        assert!(r.is_success());
        // 1 * 1.2 * 1.5 = 1.8 -> 2
        assert_eq!(state.inventory.resource_count(&"T0_herb".into()), 2);
        // 5 * 1.5
        assert_eq!(state.skills.xp(Skill::Foraging), 8);
    }

    #[test]
    fn discovery_node_gives_flat_yield_and_bonus_xp() {
        let (catalog, config, mut state, _) = setup("T0_wood");
        let node = state.spawn_node(ResourceId::from("T0_wood"), here(), 600.0, false, true);
        state.scan.discovery = Some(node);
        let r = resolve_gather(&mut state, &catalog, &config, node, Some(here()), &mut unlucky());
        assert!(r.is_success());
        assert_eq!(state.inventory.resource_count(&"T0_wood".into()), 20);
        assert_eq!(state.skills.xp(Skill::Woodcutting), 25);
        assert_eq!(state.scan.discovery, None);
    }

    #[test]
    fn full_bag_is_invalid_without_wear() {
        let (catalog, config, mut state, node) = setup("T1_stone");
        equip(&mut state, EquipSlot::Pickaxe, "T1_pickaxe");
        state.inventory.add_resource(&"T0_stone".into(), 100);
        let r = resolve_gather(&mut state, &catalog, &config, node, Some(here()), &mut unlucky());
        assert_eq!(r.outcome, GatherOutcome::Invalid);
        assert_eq!(state.inventory.durability(&"T1_pickaxe".into()), None);
        assert!(state.node(node).is_some());
    }

    #[test]
    fn gathering_advances_active_quest() {
        let (catalog, config, mut state, node) = setup("T0_herb");
        let mut raven = Creature::hatch(0, CreatureKind::Raven, 0.0, 3);
        raven.state = CreatureState::UntrainedAdult;
        state.companions.creatures.push(raven);
        state.companions.active = Some(0);
        resolve_gather(&mut state, &catalog, &config, node, Some(here()), &mut unlucky());
        let c = state.companions.get(0).unwrap();
        assert_eq!(c.quest_progress[objectives::GATHER_ANY], 1);
        assert_eq!(c.quest_progress[objectives::FORAGE_HERB], 1);
    }

    #[test]
    fn fetch_spends_a_charge_and_skips_tools() {
        let (catalog, config, mut state, _) = setup("T0_wood");
        let far = here().destination(90.0, 200.0);
        let node = state.spawn_node(ResourceId::from("T1_wood"), far, 600.0, false, false);
        state.player_location = Some(here());
        let mut raven = Creature::hatch(0, CreatureKind::Raven, 0.0, 3);
        raven.state = CreatureState::UntrainedAdult;
        state.companions.creatures.push(raven);
        state.companions.active = Some(0);

        let r = pet_fetch_resource(&mut state, &catalog, &config, node, &mut unlucky());
        assert!(r.is_success(), "{}", r.message);
        assert!(r.message.starts_with("Your Raven fetched"));
        assert_eq!(state.inventory.resource_count(&"T1_wood".into()), 1);
        let c = state.companions.get(0).unwrap();
        assert_eq!(c.fetch_charges, 2);
        assert_eq!(c.pending_restores.len(), 1);
    }

    #[test]
    fn invalid_fetch_refunds_the_charge() {
        let (catalog, config, mut state, _) = setup("T0_wood");
        let node = state.spawn_node(ResourceId::from("T5_wood"), here(), 600.0, false, false);
        state.player_location = Some(here());
        let mut hawk = Creature::hatch(0, CreatureKind::Hawk, 0.0, 2);
        hawk.state = CreatureState::TrainedAdult;
        state.companions.creatures.push(hawk);
        state.companions.active = Some(0);

        let r = pet_fetch_resource(&mut state, &catalog, &config, node, &mut lucky());
        assert_eq!(r.outcome, GatherOutcome::Invalid);
        let c = state.companions.get(0).unwrap();
        assert_eq!(c.fetch_charges, 2);
        assert!(c.pending_restores.is_empty());
        assert!(state.node(node).is_some());
    }

    fn raven(state: &mut GameState, trained: bool, active: bool) {
        let mut c = Creature::hatch(0, CreatureKind::Raven, 0.0, 3);
        c.growth_started_at = None;
        c.state = if trained {
            CreatureState::TrainedAdult
        } else {
            CreatureState::UntrainedAdult
        };
        state.companions.creatures.push(c);
        state.companions.active = active.then_some(0);
    }

    fn companion_feedback(state: &mut GameState) -> usize {
        state
            .events
            .drain()
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    SimEvent::Feedback {
                        category: FeedbackCategory::Companion,
                        ..
                    }
                )
            })
            .count()
    }

    #[test]
    fn trained_raven_brings_a_gift() {
        let (catalog, config, mut state, node) = setup("T0_wood");
        raven(&mut state, true, true);
        let r = resolve_gather(&mut state, &catalog, &config, node, Some(here()), &mut lucky());
        assert!(r.is_success());
        let feathers = state.inventory.resource_count(&specials::FEATHER.into());
        let seeds = state.inventory.resource_count(&specials::WILD_SEEDS.into());
        assert_eq!(feathers + seeds, 1);
        assert_eq!(companion_feedback(&mut state), 1);
    }

    #[test]
    fn no_gift_from_untrained_or_idle_raven() {
        for (trained, active) in [(false, true), (true, false)] {
            let (catalog, config, mut state, node) = setup("T0_wood");
            raven(&mut state, trained, active);
            let r = resolve_gather(&mut state, &catalog, &config, node, Some(here()), &mut lucky());
            assert!(r.is_success());
            assert_eq!(state.inventory.resource_count(&specials::FEATHER.into()), 0);
            assert_eq!(state.inventory.resource_count(&specials::WILD_SEEDS.into()), 0);
            assert_eq!(companion_feedback(&mut state), 0);
        }
    }
}
