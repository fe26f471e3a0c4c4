//! Save/Load of the player's game state
//!
//! Each top-level map is stored as its own blob under a fixed key, so a
//! corrupt or outdated blob only loses that one map. Blobs are bincode,
//! wrapped in a versioned envelope. Loading is forgiving: anything missing
//! or unreadable falls back to its empty default.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::PathBuf;
use trailcraft_logic::geo::GeoPoint;
use trailcraft_logic::ids::UpgradeId;
use trailcraft_logic::skills::SkillLedger;

use crate::components::{
    Companions, Equipment, Incubator, Inventory, PotionEffects, ResourceNode, ScanState,
    ScoutAssignment, UnlockedPets,
};
use crate::state::GameState;

/// Version number for blob format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Storage keys, one per persisted map.
pub mod keys {
    pub const INVENTORY: &str = "inventory";
    pub const COMPONENTS: &str = "components";
    pub const ITEMS: &str = "items";
    pub const DURABILITY: &str = "durability";
    pub const EQUIPPED: &str = "equipped";
    pub const SKILLS_XP: &str = "skills_xp";
    pub const BASE_UPGRADES: &str = "base_upgrades";
    pub const SCOUT_ASSIGNMENT: &str = "scout_assignment";
    pub const POTION_EFFECTS: &str = "potion_effects";
    pub const CREATURES: &str = "creatures";
    pub const INCUBATION_SLOTS: &str = "incubation_slots";
    pub const UNLOCKED_PETS: &str = "unlocked_pets";
    pub const FEATHER_ACCUMULATOR: &str = "feather_accumulator";
    pub const WATCHTOWER_SCAN: &str = "watchtower_scan";
    pub const HOME_BASE: &str = "home_base";
    pub const CLOCK: &str = "clock";
    pub const NODES: &str = "nodes";

    pub const ALL: [&str; 17] = [
        INVENTORY,
        COMPONENTS,
        ITEMS,
        DURABILITY,
        EQUIPPED,
        SKILLS_XP,
        BASE_UPGRADES,
        SCOUT_ASSIGNMENT,
        POTION_EFFECTS,
        CREATURES,
        INCUBATION_SLOTS,
        UNLOCKED_PETS,
        FEATHER_ACCUMULATOR,
        WATCHTOWER_SCAN,
        HOME_BASE,
        CLOCK,
        NODES,
    ];
}

/// Key/value blob storage.
pub trait SaveStore {
    /// The last bytes saved under `key`, or `None` if never saved.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, SaveError>;
    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), SaveError>;
}

/// In-memory store, for tests and hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub blobs: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, SaveError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), SaveError> {
        self.blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// One `<key>.bin` file per blob inside a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open (and create if needed) a save directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SaveError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.bin", key))
    }
}

impl SaveStore for DirStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, SaveError> {
        match fs::read(self.path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), SaveError> {
        fs::write(self.path(key), bytes)?;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    value: T,
}

/// Encode a value with the current version header.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, SaveError> {
    Ok(bincode::serialize(&Envelope {
        version: SAVE_VERSION,
        value,
    })?)
}

/// Decode a blob, rejecting other format versions before touching the body.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SaveError> {
    let version: u32 = bincode::deserialize(bytes)?;
    if version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: version,
        });
    }
    let envelope: Envelope<T> = bincode::deserialize(bytes)?;
    Ok(envelope.value)
}

fn save_one<T: Serialize>(
    store: &mut dyn SaveStore,
    key: &str,
    value: &T,
) -> Result<(), SaveError> {
    let bytes = encode(value)?;
    store.save(key, &bytes)
}

/// Load one blob. Missing, corrupt or wrong-version blobs yield the default.
fn load_one<T: DeserializeOwned + Default>(store: &dyn SaveStore, key: &str) -> T {
    match store.load(key).and_then(|b| b.map(|b| decode(&b)).transpose()) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            warn!("discarding saved {}: {}", key, e);
            T::default()
        }
    }
}

/// Write every persisted map. Failures are logged and skipped; returns how
/// many keys failed.
pub fn save_state(store: &mut dyn SaveStore, state: &GameState) -> usize {
    let results = [
        (keys::INVENTORY, save_one(store, keys::INVENTORY, &state.inventory.resources)),
        (keys::COMPONENTS, save_one(store, keys::COMPONENTS, &state.inventory.components)),
        (keys::ITEMS, save_one(store, keys::ITEMS, &state.inventory.items)),
        (keys::DURABILITY, save_one(store, keys::DURABILITY, &state.inventory.durability)),
        (keys::EQUIPPED, save_one(store, keys::EQUIPPED, &state.equipment)),
        (keys::SKILLS_XP, save_one(store, keys::SKILLS_XP, &state.skills)),
        (keys::BASE_UPGRADES, save_one(store, keys::BASE_UPGRADES, &state.upgrades)),
        (keys::SCOUT_ASSIGNMENT, save_one(store, keys::SCOUT_ASSIGNMENT, &state.scout)),
        (keys::POTION_EFFECTS, save_one(store, keys::POTION_EFFECTS, &state.potions)),
        (keys::CREATURES, save_one(store, keys::CREATURES, &state.companions)),
        (keys::INCUBATION_SLOTS, save_one(store, keys::INCUBATION_SLOTS, &state.incubator)),
        (keys::UNLOCKED_PETS, save_one(store, keys::UNLOCKED_PETS, &state.unlocked_pets)),
        (
            keys::FEATHER_ACCUMULATOR,
            save_one(store, keys::FEATHER_ACCUMULATOR, &state.feather_accumulator),
        ),
        (keys::WATCHTOWER_SCAN, save_one(store, keys::WATCHTOWER_SCAN, &state.scan)),
        (keys::HOME_BASE, save_one(store, keys::HOME_BASE, &state.home_base)),
        (keys::CLOCK, save_one(store, keys::CLOCK, &state.now)),
        (keys::NODES, save_one(store, keys::NODES, &state.nodes())),
    ];
    let mut failed = 0;
    for (key, result) in results {
        if let Err(e) = result {
            warn!("failed to save {}: {}", key, e);
            failed += 1;
        }
    }
    failed
}

/// Rebuild a game state from whatever the store holds.
///
/// Derived state (stat bonuses) is not persisted; callers recalculate it.
pub fn load_state(store: &dyn SaveStore) -> GameState {
    let mut state = GameState::new();
    state.inventory.resources = load_one(store, keys::INVENTORY);
    state.inventory.components = load_one(store, keys::COMPONENTS);
    state.inventory.items = load_one(store, keys::ITEMS);
    state.inventory.durability = load_one(store, keys::DURABILITY);
    state.equipment = load_one(store, keys::EQUIPPED);
    state.skills = load_one(store, keys::SKILLS_XP);
    state.upgrades = load_one(store, keys::BASE_UPGRADES);
    state.scout = load_one(store, keys::SCOUT_ASSIGNMENT);
    state.potions = load_one(store, keys::POTION_EFFECTS);
    state.companions = load_one(store, keys::CREATURES);
    state.incubator = load_one(store, keys::INCUBATION_SLOTS);
    state.unlocked_pets = load_one(store, keys::UNLOCKED_PETS);
    state.feather_accumulator = load_one(store, keys::FEATHER_ACCUMULATOR);
    state.scan = load_one(store, keys::WATCHTOWER_SCAN);
    state.home_base = load_one(store, keys::HOME_BASE);
    state.now = load_one(store, keys::CLOCK);

    let nodes: Vec<ResourceNode> = load_one(store, keys::NODES);
    for node in &nodes {
        state.restore_node(node);
    }
    if let Some(id) = state.scan.discovery {
        if state.node(id).is_none() {
            state.scan.discovery = None;
        }
    }
    state
}

/// Human-readable snapshot of the persisted maps.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub clock: f64,
    pub home_base: &'a Option<GeoPoint>,
    pub inventory: &'a Inventory,
    pub equipped: &'a Equipment,
    pub skills_xp: &'a SkillLedger,
    pub base_upgrades: &'a BTreeSet<UpgradeId>,
    pub scout_assignment: &'a Option<ScoutAssignment>,
    pub potion_effects: &'a PotionEffects,
    pub creatures: &'a Companions,
    pub incubation_slots: &'a Incubator,
    pub unlocked_pets: &'a UnlockedPets,
    pub feather_accumulator: f64,
    pub watchtower_scan: &'a ScanState,
    pub nodes: Vec<ResourceNode>,
}

pub fn export_json(state: &GameState) -> Result<String, serde_json::Error> {
    let snapshot = Snapshot {
        clock: state.now,
        home_base: &state.home_base,
        inventory: &state.inventory,
        equipped: &state.equipment,
        skills_xp: &state.skills,
        base_upgrades: &state.upgrades,
        scout_assignment: &state.scout,
        potion_effects: &state.potions,
        creatures: &state.companions,
        incubation_slots: &state.incubator,
        unlocked_pets: &state.unlocked_pets,
        feather_accumulator: state.feather_accumulator,
        watchtower_scan: &state.scan,
        nodes: state.nodes(),
    };
    serde_json::to_string_pretty(&snapshot)
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Creature;
    use trailcraft_logic::catalog::{CreatureKind, EquipSlot, ResourceKind};
    use trailcraft_logic::ids::{ItemId, ResourceId};
    use trailcraft_logic::skills::Skill;

    fn populated() -> GameState {
        let mut state = GameState::new();
        state.now = 12_345.0;
        state.home_base = Some(GeoPoint::new(10.0, 20.0));
        state.inventory.add_resource(&ResourceId::from("T1_wood"), 17);
        state.inventory.add_item(&ItemId::from("T1_axe"), 1);
        state.inventory.durability.insert(ItemId::from("T1_axe"), 33);
        state.equipment.set(EquipSlot::Axe, ItemId::from("T1_axe"));
        state.skills.xp.insert(Skill::Woodcutting, 250);
        state.companions.creatures.push(Creature::hatch(0, CreatureKind::Owl, 100.0, 2));
        state.companions.next_id = 1;
        state.scout = Some(ScoutAssignment {
            creature: 0,
            family: ResourceKind::Wood,
        });
        state.feather_accumulator = 0.75;
        let node = state.spawn_node(
            ResourceId::from("T4_stone"),
            GeoPoint::new(10.01, 20.0),
            7200.0,
            false,
            true,
        );
        state.scan.discovery = Some(node);
        state.scan.last_scan_at = Some(12_000.0);
        state
    }

    #[test]
    fn save_load_roundtrip() {
        let state = populated();
        let mut store = MemoryStore::new();
        assert_eq!(save_state(&mut store, &state), 0);
        assert_eq!(store.blobs.len(), keys::ALL.len());

        let loaded = load_state(&store);
        assert_eq!(loaded.now, state.now);
        assert_eq!(loaded.inventory, state.inventory);
        assert_eq!(loaded.equipment, state.equipment);
        assert_eq!(loaded.skills, state.skills);
        assert_eq!(loaded.companions, state.companions);
        assert_eq!(loaded.scout, state.scout);
        assert_eq!(loaded.scan, state.scan);
        assert_eq!(loaded.nodes(), state.nodes());
        assert_eq!(loaded.next_node_id, state.next_node_id);
    }

    #[test]
    fn empty_store_gives_fresh_state() {
        let loaded = load_state(&MemoryStore::new());
        assert_eq!(loaded.now, 0.0);
        assert!(loaded.inventory.resources.is_empty());
        assert_eq!(loaded.node_count(), 0);
    }

    #[test]
    fn bad_blobs_fall_back_per_key() {
        let state = populated();
        let mut store = MemoryStore::new();
        save_state(&mut store, &state);
        store.blobs.insert(keys::INVENTORY.into(), vec![1, 2, 3]);
        let mut stale = bincode::serialize(&(SAVE_VERSION + 1)).unwrap();
        stale.extend(bincode::serialize(&0.5f64).unwrap());
        store.blobs.insert(keys::FEATHER_ACCUMULATOR.into(), stale);

        let loaded = load_state(&store);
        assert!(loaded.inventory.resources.is_empty());
        assert_eq!(loaded.feather_accumulator, 0.0);
        // untouched keys survive
        assert_eq!(loaded.skills, state.skills);
    }

    #[test]
    fn version_mismatch_is_reported() {
        let bytes = bincode::serialize(&Envelope {
            version: 99,
            value: 1u32,
        })
        .unwrap();
        match decode::<u32>(&bytes) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, 99);
            }
            other => panic!("expected version mismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn dangling_discovery_is_cleared() {
        let mut state = populated();
        let node = state.scan.discovery.unwrap();
        let scan = state.scan.clone();
        state.remove_node(node);
        let mut store = MemoryStore::new();
        save_state(&mut store, &state);
        store
            .save(keys::WATCHTOWER_SCAN, &encode(&scan).unwrap())
            .unwrap();
        let loaded = load_state(&store);
        assert_eq!(loaded.scan.discovery, None);
        assert_eq!(loaded.scan.last_scan_at, Some(12_000.0));
    }

    #[test]
    fn json_export_names_every_map() {
        let json = export_json(&populated()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for key in ["inventory", "equipped", "creatures", "watchtower_scan", "nodes"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn dir_store_reads_back_and_misses_cleanly() {
        let dir = std::env::temp_dir().join(format!("trailcraft-save-{}", std::process::id()));
        let mut store = DirStore::open(&dir).unwrap();
        assert!(store.load("clock").unwrap().is_none());
        store.save("clock", &[1, 2, 3]).unwrap();
        assert_eq!(store.load("clock").unwrap(), Some(vec![1, 2, 3]));
        let _ = fs::remove_dir_all(&dir);
    }
}
