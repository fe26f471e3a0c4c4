//! World resource node components.

use serde::{Deserialize, Serialize};
use trailcraft_logic::geo::GeoPoint;
use trailcraft_logic::ids::ResourceId;

/// Stable node identifier. Survives save/load, unlike `hecs::Entity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// What the node yields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeResource(pub ResourceId);

/// Where the node sits on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location(pub GeoPoint);

/// Spawn time and lifetime, both in sim seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lifespan {
    pub spawned_at: f64,
    pub lifespan: f64,
}

impl Lifespan {
    pub fn despawn_at(&self) -> f64 {
        self.spawned_at + self.lifespan
    }

    pub fn expired(&self, now: f64) -> bool {
        now >= self.despawn_at()
    }
}

/// Marker: yield and XP multiplied by the enrichment multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enriched;

/// Marker: horizon-scan discovery node (flat high yield, single use).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery;

/// Read-only snapshot of a node, assembled from its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: NodeId,
    pub resource: ResourceId,
    pub location: GeoPoint,
    pub spawned_at: f64,
    pub lifespan: f64,
    pub enriched: bool,
    pub discovery: bool,
}

impl ResourceNode {
    pub fn despawn_at(&self) -> f64 {
        self.spawned_at + self.lifespan
    }
}
