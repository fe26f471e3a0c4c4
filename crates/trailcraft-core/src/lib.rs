//! Trailcraft Core - location-based gathering and crafting simulation
//!
//! Resource nodes spawn on the real map around the player. Gathering them
//! feeds skills and stock, stock becomes components and tools, tools wear
//! out, and companions hatched from rare eggs extend what the player can
//! reach.
//!
//! # Architecture
//!
//! - **Nodes** live in a `hecs` world as entities with pure-data components
//! - **Everything else** (stock, gear, skills, companions) is plain data on
//!   [`state::GameState`]
//! - **Systems** are free functions over `&mut GameState` plus the read-only
//!   catalog and config
//! - **[`engine::SimulationEngine`]** bundles state, content and a seeded rng
//!   and drives the periodic ticks
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`components`] | Node components, inventory, equipment, creatures |
//! | [`state`] | The single mutable game state |
//! | [`systems`] | Gathering, hunting, crafting, companions, spawning, scan, scouts |
//! | [`engine`] | Host-facing engine, timers and `advance_time` |
//! | [`persistence`] | Per-key bincode blobs and JSON export |
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use trailcraft_core::prelude::*;
//!
//! let mut engine = SimulationEngine::new(Catalog::standard(), GameConfig::default(), 7);
//! engine.set_player_location(Some(GeoPoint::new(51.5, -0.12)));
//! engine.start_world_timer();
//! engine.advance_time(Duration::from_secs(15));
//!
//! for node in engine.nodes() {
//!     let result = engine.gather(node.id);
//!     println!("{}", result.message);
//! }
//! ```

pub mod components;
pub mod engine;
pub mod persistence;
pub mod state;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::SimulationEngine;
    pub use crate::systems::{CraftTarget, GatherOutcome, GatherResult, SimEvent};
    pub use trailcraft_logic::catalog::Catalog;
    pub use trailcraft_logic::config::GameConfig;
    pub use trailcraft_logic::geo::GeoPoint;
}
