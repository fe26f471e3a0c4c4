//! Well-known catalog ids and quest objective keys.

/// Training-quest objective keys reported by player actions.
pub mod objectives {
    /// Any successful standard gather.
    pub const GATHER_ANY: &str = "gather_any";
    pub const GATHER_WOOD: &str = "gather_wood";
    pub const FORAGE_HERB: &str = "forage_herb";
    pub const MINE_ORE: &str = "mine_ore";
    pub const HUNT_SUCCESS: &str = "hunt_success";
    /// Any component crafted.
    pub const CRAFT_COMPONENT: &str = "craft_component";
    /// Ingot of tier 6 or higher smelted.
    pub const SMELT_INGOT_T6: &str = "smelt_ingot_t6";
    /// Tool of tier 10 or higher crafted.
    pub const CRAFT_TOOL_T10: &str = "craft_tool_t10";
}

/// Upgrade ids the resolvers check directly.
pub mod upgrades {
    pub const WORKBENCH: &str = "workbench";
    pub const BASIC_FORGE: &str = "basic_forge";
    pub const TANNERY: &str = "tannery";
    pub const ALCHEMY_LAB: &str = "alchemy_lab";
    pub const STOREHOUSE: &str = "storehouse";
    pub const INCUBATOR: &str = "incubator";
    pub const WATCHTOWER: &str = "watchtower";
    pub const SAWMILL: &str = "sawmill";
    pub const BLAST_FURNACE: &str = "blast_furnace";
    pub const STAR_FORGE: &str = "star_forge";
    pub const ARTISAN_WORKSHOP: &str = "artisan_workshop";
}

/// Resource ids awarded by rare drops and companions.
pub mod specials {
    pub const ROUGH_RUBY: &str = "rough_ruby";
    pub const ROUGH_SAPPHIRE: &str = "rough_sapphire";
    pub const ROUGH_EMERALD: &str = "rough_emerald";
    pub const ROUGH_DIAMOND: &str = "rough_diamond";
    pub const FEATHER: &str = "feather";
    pub const WILD_SEEDS: &str = "wild_seeds";
    pub const RARE_SEEDS: &str = "rare_seeds";
    /// Item id of the rare-drop repair stone.
    pub const WHETSTONE: &str = "whetstone";
}

/// Tier at and above which hunting a track can yield a dragon egg.
pub const DRAGON_EGG_TRACK_TIER: i8 = 11;
/// Ingot tier that counts toward the smelting objective.
pub const SMELT_OBJECTIVE_MIN_TIER: i8 = 6;
/// Tool tier that counts toward the tool-crafting objective.
pub const TOOL_OBJECTIVE_MIN_TIER: i8 = 10;
