//! Systems - logic that reads the catalog and mutates game state

mod companions;
mod crafting;
mod durability;
mod equipment;
mod events;
mod gathering;
mod hunting;
mod potions;
mod progression;
mod rare_drops;
mod scan;
mod scout;
mod spawning;
mod upgrades;

pub use companions::*;
pub use crafting::*;
pub use durability::*;
pub use equipment::*;
pub use events::*;
pub use gathering::*;
pub use hunting::*;
pub use potions::*;
pub use progression::*;
pub use rare_drops::*;
pub use scan::*;
pub use scout::*;
pub use spawning::*;
pub use upgrades::*;

use rand::Rng;

/// Bernoulli roll that never touches the rng for an impossible event.
pub(crate) fn roll(rng: &mut impl Rng, chance: f64) -> bool {
    chance > 0.0 && rng.gen::<f64>() < chance
}
