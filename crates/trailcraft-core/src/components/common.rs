//! Small shared state: stat bonuses, potion timers, scan and spawn bookkeeping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trailcraft_logic::catalog::{PotionKind, ResourceKind};
use trailcraft_logic::geo::GeoPoint;
use trailcraft_logic::skills::Stat;

use super::NodeId;

/// Aggregated bonuses from equipped gear. Recomputed, never edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatBonuses {
    pub values: BTreeMap<Stat, f64>,
}

impl StatBonuses {
    pub fn get(&self, stat: Stat) -> f64 {
        self.values.get(&stat).copied().unwrap_or(0.0)
    }
}

/// Active potion effects keyed by kind, valued by expiry time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PotionEffects {
    pub expiries: BTreeMap<PotionKind, f64>,
}

impl PotionEffects {
    pub fn is_active(&self, kind: PotionKind, now: f64) -> bool {
        self.expiries.get(&kind).map_or(false, |&at| at > now)
    }
}

/// Watchtower horizon-scan state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanState {
    pub last_scan_at: Option<f64>,
    /// Current ungathered discovery node, if any.
    pub discovery: Option<NodeId>,
}

/// A trained creature sent out to gather one resource family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutAssignment {
    pub creature: u32,
    pub family: ResourceKind,
}

/// When and where the last spawn pass ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnTracker {
    pub last_spawn_at: Option<f64>,
    pub last_spawn_location: Option<GeoPoint>,
}
