//! String-keyed catalog identifiers.
//!
//! Catalog entries are keyed by stable string tags (`"T1_stone"`,
//! `"basic_forge"`) rather than enum variants, so tiered families can be
//! generated from tables and persisted blobs stay readable across catalog
//! revisions. Each kind of entry gets its own newtype so a resource id can
//! never be passed where an item id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Raw gatherable resource (`T3_stone`, `feather`, `raven_egg`).
    ResourceId
);
string_id!(
    /// Intermediate crafted component (`T1_ingot`, `T0_cordage`).
    ComponentId
);
string_id!(
    /// Finished item: tools, arrows, bags, gear, consumables.
    ItemId
);
string_id!(
    /// Base-building upgrade (`basic_forge`, `watchtower`).
    UpgradeId
);

/// Id helper for tiered families: `tiered("stone", 3)` → `"T3_stone"`.
pub fn tiered(family: &str, tier: i8) -> String {
    format!("T{}_{}", tier, family)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiered_ids() {
        assert_eq!(tiered("stone", 1), "T1_stone");
        assert_eq!(ResourceId::from(tiered("herb", 11)).as_str(), "T11_herb");
    }

    #[test]
    fn ids_order_lexically() {
        let a = ItemId::from("T1_axe");
        let b = ItemId::from("T1_knife");
        assert!(a < b);
        assert_eq!(a.to_string(), "T1_axe");
    }
}
