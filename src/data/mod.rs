//! Tier data files
//!
//! Tier tables can be loaded from external RON files so ranks can be
//! retuned without a rebuild.

pub mod loader;

pub use loader::{
    LoadError, TierDef, TierTableDef,
    parse_tier_table, load_tier_table, load_or_default,
    export_tier_table, export_default_tiers,
};
