//! Progression systems

pub mod tiers;
pub mod xp;

pub use tiers::{default_table, default_tiers, Consistency, RankTier, TableError, TierTable};
pub use xp::{compute_rank_info, compute_rank_info_checked, RankError, RankInfo};
