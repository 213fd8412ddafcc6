//! Rankline - XP rank and level progression
//!
//! Turns a lifetime XP total into a rank tier, a level within it,
//! and progress toward the next level.

pub mod progression;
pub mod data;
pub mod settings;

// Re-export commonly used types
pub use progression::{compute_rank_info, compute_rank_info_checked, RankError, RankInfo, RankTier, TierTable};
pub use settings::{OutputFormat, Settings};
