//! Pure game rules for Trailcraft.
//!
//! This crate holds the content catalog and every formula the simulation
//! uses, independent of any world storage or random source. Functions take
//! plain data (and pre-rolled random numbers) and return results, so they
//! are unit-testable in isolation.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Resources, components, items, upgrades, creatures, spawn and rare-drop tables |
//! | [`config`] | Tunable distances, odds, caps and intervals |
//! | [`constants`] | Quest objective keys and well-known ids |
//! | [`gathering`] | Yield, XP, durability, hunt odds and capacity formulas |
//! | [`geo`] | Haversine distance, bearings and projection |
//! | [`ids`] | Typed string ids for catalog entries |
//! | [`skills`] | Skills, stats, level curve and XP modifiers |

pub mod catalog;
pub mod config;
pub mod constants;
pub mod gathering;
pub mod geo;
pub mod ids;
pub mod skills;
