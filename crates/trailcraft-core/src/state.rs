//! The single mutable simulation state.
//!
//! Every system takes `&mut GameState` plus the read-only catalog and config.
//! Resource nodes live in the hecs world; everything else is plain data.

use hecs::{Entity, World};
use std::collections::BTreeSet;
use trailcraft_logic::catalog::{BagCapacity, Catalog, CreatureKind, EquipSlot, StorageClass};
use trailcraft_logic::config::GameConfig;
use trailcraft_logic::gathering::storage_capacity;
use trailcraft_logic::geo::GeoPoint;
use trailcraft_logic::ids::{ResourceId, UpgradeId};
use trailcraft_logic::skills::{Skill, SkillLedger};

use crate::components::*;
use crate::systems::{EventLog, SimEvent};

pub struct GameState {
    /// Sim clock, seconds since the Unix epoch.
    pub now: f64,
    pub player_location: Option<GeoPoint>,
    pub home_base: Option<GeoPoint>,

    pub inventory: Inventory,
    pub equipment: Equipment,
    pub bonuses: StatBonuses,
    pub skills: SkillLedger,
    pub upgrades: BTreeSet<UpgradeId>,
    pub potions: PotionEffects,

    pub companions: Companions,
    pub incubator: Incubator,
    pub unlocked_pets: UnlockedPets,
    pub scout: Option<ScoutAssignment>,
    pub feather_accumulator: f64,

    pub scan: ScanState,
    pub spawner: SpawnTracker,
    /// Resource nodes.
    pub world: World,
    pub next_node_id: u64,

    pub events: EventLog,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            player_location: None,
            home_base: None,
            inventory: Inventory::new(),
            equipment: Equipment::default(),
            bonuses: StatBonuses::default(),
            skills: SkillLedger::new(),
            upgrades: BTreeSet::new(),
            potions: PotionEffects::default(),
            companions: Companions::default(),
            incubator: Incubator::default(),
            unlocked_pets: UnlockedPets::new(),
            scout: None,
            feather_accumulator: 0.0,
            scan: ScanState::default(),
            spawner: SpawnTracker::default(),
            world: World::new(),
            next_node_id: 1,
            events: EventLog::new(),
        }
    }

    pub fn level(&self, skill: Skill, config: &GameConfig) -> u32 {
        self.skills
            .level(skill, config.base_xp_per_level, config.level_cap)
    }

    pub fn has_upgrade(&self, id: &str) -> bool {
        self.upgrades.contains(&UpgradeId::from(id))
    }

    /// Capacity granted by the equipped bag, if any.
    pub fn bag_capacity(&self, catalog: &Catalog) -> Option<BagCapacity> {
        self.equipment
            .get(EquipSlot::Bag)
            .and_then(|id| catalog.item(id))
            .and_then(|def| def.bag_capacity)
    }

    /// Units currently stored in a capacity pool.
    pub fn stored(&self, catalog: &Catalog, class: StorageClass) -> u32 {
        self.inventory
            .resources
            .iter()
            .filter(|(id, _)| catalog.resource(id).map(|r| r.storage) == Some(class))
            .map(|(_, qty)| *qty)
            .sum()
    }

    /// Capacity of a pool, `None` when unlimited.
    pub fn capacity(&self, catalog: &Catalog, config: &GameConfig, class: StorageClass) -> Option<u32> {
        storage_capacity(config, self.bag_capacity(catalog), class)
    }

    /// Whether an egg of this creature exists anywhere the player can reach.
    pub fn owns_creature_kind(&self, kind: CreatureKind) -> bool {
        self.inventory.resource_count(&kind.egg()) > 0
            || self.incubator.holds(kind)
            || self.unlocked_pets.contains(&kind)
    }

    // ── Nodes ──

    /// All live nodes, ordered by id.
    pub fn nodes(&self) -> Vec<ResourceNode> {
        let mut out: Vec<ResourceNode> = self
            .world
            .query::<(
                &NodeId,
                &NodeResource,
                &Location,
                &Lifespan,
                Option<&Enriched>,
                Option<&Discovery>,
            )>()
            .iter()
            .map(|(_, (id, res, loc, life, enriched, discovery))| ResourceNode {
                id: *id,
                resource: res.0.clone(),
                location: loc.0,
                spawned_at: life.spawned_at,
                lifespan: life.lifespan,
                enriched: enriched.is_some(),
                discovery: discovery.is_some(),
            })
            .collect();
        out.sort_by_key(|n| n.id);
        out
    }

    pub fn node(&self, id: NodeId) -> Option<ResourceNode> {
        self.nodes().into_iter().find(|n| n.id == id)
    }

    fn node_entity(&self, id: NodeId) -> Option<Entity> {
        self.world
            .query::<&NodeId>()
            .iter()
            .find(|(_, node)| **node == id)
            .map(|(entity, _)| entity)
    }

    /// Live nodes that count toward the spawn cap (discoveries do not).
    pub fn regular_node_count(&self) -> usize {
        self.world
            .query::<(&NodeId, Option<&Discovery>)>()
            .iter()
            .filter(|(_, (_, discovery))| discovery.is_none())
            .count()
    }

    pub fn node_count(&self) -> usize {
        self.world.query::<&NodeId>().iter().count()
    }

    pub fn spawn_node(
        &mut self,
        resource: ResourceId,
        location: GeoPoint,
        lifespan: f64,
        enriched: bool,
        discovery: bool,
    ) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        let entity = self.world.spawn((
            id,
            NodeResource(resource.clone()),
            Location(location),
            Lifespan {
                spawned_at: self.now,
                lifespan,
            },
        ));
        if enriched {
            let _ = self.world.insert_one(entity, Enriched);
        }
        if discovery {
            let _ = self.world.insert_one(entity, Discovery);
        }
        self.events.push(SimEvent::NodeSpawned { node: id, resource });
        id
    }

    /// Re-create a node from a snapshot, keeping its id and spawn time.
    pub(crate) fn restore_node(&mut self, node: &ResourceNode) {
        let entity = self.world.spawn((
            node.id,
            NodeResource(node.resource.clone()),
            Location(node.location),
            Lifespan {
                spawned_at: node.spawned_at,
                lifespan: node.lifespan,
            },
        ));
        if node.enriched {
            let _ = self.world.insert_one(entity, Enriched);
        }
        if node.discovery {
            let _ = self.world.insert_one(entity, Discovery);
        }
        self.next_node_id = self.next_node_id.max(node.id.0 + 1);
    }

    /// Remove a node. Returns false when it no longer exists.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        match self.node_entity(id) {
            Some(entity) => {
                let _ = self.world.despawn(entity);
                if self.scan.discovery == Some(id) {
                    self.scan.discovery = None;
                }
                true
            }
            None => false,
        }
    }
}
