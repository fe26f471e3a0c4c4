//! Component and state definitions.
//!
//! Node components are pure data attached to hecs entities. The player's
//! stock, gear and companions are plain structs owned by the game state.
//! None of them carry behavior; that lives in systems.

mod common;
mod creature;
mod inventory;
mod node;

pub use common::*;
pub use creature::*;
pub use inventory::*;
pub use node::*;
