//! Experience and ranks
//!
//! Maps a lifetime XP total onto a rank tier, a level within that tier,
//! and progress through the current level.

use serde::Serialize;
use thiserror::Error;

use super::tiers::{default_table, RankTier, TierTable};

/// Rank calculation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    /// XP was negative, non-finite or not a whole number
    #[error("invalid argument: xp must be a non-negative integer, got {value}")]
    InvalidArgument { value: String },
}

/// Rank and level progress derived from an XP total
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankInfo<'a> {
    pub rank: &'a RankTier,
    /// Position of `rank` in its table
    pub tier_index: usize,
    /// Level within the tier, starting at 1
    pub level: u32,
    /// Levels in lower tiers plus `level`
    pub overall_level: u32,
    pub xp_in_level: u64,
    pub xp_for_next_level: u64,
    /// 0..=100
    pub progress_percent: f64,
    pub is_max_rank: bool,
}

impl RankInfo<'_> {
    /// XP left before the next level, 0 at max rank
    pub fn xp_to_next_level(&self) -> u64 {
        if self.is_max_rank {
            0
        } else {
            self.xp_for_next_level.saturating_sub(self.xp_in_level)
        }
    }

    /// Display label such as "Silver III"
    pub fn label(&self) -> String {
        if self.is_max_rank {
            self.rank.name.clone()
        } else {
            format!("{} {}", self.rank.name, roman(self.level))
        }
    }
}

fn roman(mut n: u32) -> String {
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "M"), (900, "CM"), (500, "D"), (400, "CD"),
        (100, "C"), (90, "XC"), (50, "L"), (40, "XL"),
        (10, "X"), (9, "IX"), (5, "V"), (4, "IV"), (1, "I"),
    ];

    let mut out = String::new();
    for &(value, numeral) in &NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

impl TierTable {
    /// Compute rank info for an XP total
    pub fn rank_info(&self, xp: u64) -> RankInfo<'_> {
        let tier_index = self.tier_index_for(xp);
        let rank = &self.tiers()[tier_index];
        let xp_into_tier = xp.saturating_sub(rank.base_xp);
        let offset = self.level_offset(tier_index);

        if self.is_terminal(tier_index) {
            return RankInfo {
                rank,
                tier_index,
                level: 1,
                overall_level: offset.saturating_add(1),
                xp_in_level: xp_into_tier,
                xp_for_next_level: 1,
                progress_percent: 100.0,
                is_max_rank: true,
            };
        }

        // Clamped: lenient tables may leave XP past the last level before the next tier
        let raw_level = xp_into_tier / rank.level_xp + 1;
        let level = raw_level.min(u64::from(rank.levels)) as u32;
        let xp_in_level = xp_into_tier % rank.level_xp;
        let progress_percent = (xp_in_level as f64 / rank.level_xp as f64 * 100.0).min(100.0);

        RankInfo {
            rank,
            tier_index,
            level,
            overall_level: offset.saturating_add(level),
            xp_in_level,
            xp_for_next_level: rank.level_xp,
            progress_percent,
            is_max_rank: false,
        }
    }

    /// Compute rank info for a signed XP total, rejecting negatives
    pub fn rank_info_checked(&self, xp: i64) -> Result<RankInfo<'_>, RankError> {
        let xp = u64::try_from(xp).map_err(|_| RankError::InvalidArgument { value: xp.to_string() })?;
        Ok(self.rank_info(xp))
    }

    /// Compute rank info for a floating-point XP total
    ///
    /// The value must be finite, non-negative, whole, and fit in a `u64`.
    pub fn rank_info_from_f64(&self, xp: f64) -> Result<RankInfo<'_>, RankError> {
        // 2^64 is exactly representable; anything at or above it does not fit
        if !xp.is_finite() || xp < 0.0 || xp.fract() != 0.0 || xp >= 18_446_744_073_709_551_616.0 {
            return Err(RankError::InvalidArgument { value: xp.to_string() });
        }
        Ok(self.rank_info(xp as u64))
    }

    /// Compute rank info, flooring negative XP to the lowest tier
    pub fn rank_info_saturating(&self, xp: i64) -> RankInfo<'_> {
        if xp < 0 {
            log::warn!("Negative XP {} treated as 0", xp);
        }
        self.rank_info(xp.max(0) as u64)
    }
}

/// Compute rank info against the built-in tier table
pub fn compute_rank_info(xp: u64) -> RankInfo<'static> {
    default_table().rank_info(xp)
}

/// Checked variant of [`compute_rank_info`] for signed input
pub fn compute_rank_info_checked(xp: i64) -> Result<RankInfo<'static>, RankError> {
    default_table().rank_info_checked(xp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::tiers::{Consistency, RankTier};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_zero_xp() {
        let info = compute_rank_info(0);
        assert_eq!(info.rank.name, "Bronze");
        assert_eq!(info.level, 1);
        assert_eq!(info.xp_in_level, 0);
        assert_eq!(info.xp_for_next_level, 100);
        assert_eq!(info.progress_percent, 0.0);
        assert!(!info.is_max_rank);
    }

    #[test]
    fn test_mid_tier() {
        let info = compute_rank_info(250);
        assert_eq!(info.rank.name, "Bronze");
        assert_eq!(info.level, 3);
        assert_eq!(info.xp_in_level, 50);
        assert_eq!(info.progress_percent, 50.0);
        assert_eq!(info.xp_to_next_level(), 50);
    }

    #[test]
    fn test_last_level_of_tier() {
        let info = compute_rank_info(499);
        assert_eq!(info.rank.name, "Bronze");
        assert_eq!(info.level, 5);
        assert_eq!(info.xp_in_level, 99);
        assert_eq!(info.progress_percent, 99.0);
    }

    #[test]
    fn test_tier_boundary() {
        let info = compute_rank_info(500);
        assert_eq!(info.rank.name, "Silver");
        assert_eq!(info.level, 1);
        assert_eq!(info.xp_in_level, 0);
        assert_eq!(info.xp_for_next_level, 200);
        assert_eq!(info.progress_percent, 0.0);
        assert_eq!(info.overall_level, 6);
    }

    #[test]
    fn test_max_rank() {
        let info = compute_rank_info(41_250);
        assert_eq!(info.rank.name, "Devils Master");
        assert!(info.is_max_rank);
        assert_eq!(info.level, 1);
        assert_eq!(info.xp_in_level, 0);
        assert_eq!(info.xp_for_next_level, 1);
        assert_eq!(info.progress_percent, 100.0);
        assert_eq!(info.xp_to_next_level(), 0);

        let far = compute_rank_info(100_000);
        assert!(far.is_max_rank);
        assert_eq!(far.progress_percent, 100.0);
        assert_eq!(far.level, 1);
        assert_eq!(far.xp_in_level, 100_000 - 41_250);

        assert!(compute_rank_info(u64::MAX).is_max_rank);
    }

    #[test]
    fn test_every_tier_base_is_level_one() {
        let table = default_table();
        for tier in table.tiers() {
            let info = table.rank_info(tier.base_xp);
            assert_eq!(info.rank.name, tier.name);
            assert_eq!(info.level, 1);
            assert_eq!(info.xp_in_level, 0);
        }
    }

    #[test]
    fn test_random_sweep_properties() {
        let table = default_table();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut samples: Vec<u64> = (0..2_000).map(|_| rng.gen_range(0..120_000)).collect();
        samples.sort_unstable();

        let mut previous_base = 0;
        for xp in samples {
            let info = table.rank_info(xp);
            assert!((0.0..=100.0).contains(&info.progress_percent), "progress out of range at {}", xp);
            assert!(info.rank.base_xp >= previous_base, "tier went backwards at {}", xp);
            assert!(info.level >= 1 && info.level <= info.rank.levels);
            assert_eq!(info, table.rank_info(xp));
            if xp >= table.terminal().base_xp {
                assert!(info.is_max_rank);
                assert_eq!(info.progress_percent, 100.0);
            }
            previous_base = info.rank.base_xp;
        }
    }

    #[test]
    fn test_lenient_plateau_clamps_level() {
        let tiers = vec![
            RankTier::new("Bronze", 0, 5, 100, "#CD7F32"),
            RankTier::new("Silver", 700, 1, 1, "#C0C0C0"),
        ];
        let table = TierTable::with_consistency(tiers, Consistency::Lenient).unwrap();

        let info = table.rank_info(650);
        assert_eq!(info.rank.name, "Bronze");
        assert_eq!(info.level, 5);
        assert_eq!(info.xp_in_level, 50);
        assert_eq!(info.progress_percent, 50.0);
        assert!(!info.is_max_rank);

        assert!(table.rank_info(700).is_max_rank);
    }

    #[test]
    fn test_progress_divides_before_scaling() {
        let tiers = vec![
            RankTier::new("Thirds", 0, 3, 3, "#333"),
            RankTier::new("Top", 9, 1, 1, "#000"),
        ];
        let table = TierTable::new(tiers).unwrap();
        assert_eq!(table.rank_info(1).progress_percent, 1.0 / 3.0 * 100.0);
        assert_eq!(table.rank_info(1).progress_percent, 33.33333333333333);
    }

    #[test]
    fn test_checked_rejects_negative() {
        assert_eq!(
            compute_rank_info_checked(-1),
            Err(RankError::InvalidArgument { value: "-1".to_string() })
        );
        assert_eq!(compute_rank_info_checked(250).unwrap().level, 3);
    }

    #[test]
    fn test_from_f64() {
        let table = default_table();
        assert_eq!(table.rank_info_from_f64(500.0).unwrap().rank.name, "Silver");
        assert!(table.rank_info_from_f64(f64::NAN).is_err());
        assert!(table.rank_info_from_f64(f64::INFINITY).is_err());
        assert!(table.rank_info_from_f64(-3.0).is_err());
        assert!(table.rank_info_from_f64(12.5).is_err());
        assert!(table.rank_info_from_f64(1e20).is_err());
    }

    #[test]
    fn test_saturating_floors_negative() {
        let table = default_table();
        let info = table.rank_info_saturating(-500);
        assert_eq!(info, table.rank_info(0));
        assert_eq!(table.rank_info_saturating(250).level, 3);
    }

    #[test]
    fn test_label() {
        assert_eq!(compute_rank_info(250).label(), "Bronze III");
        assert_eq!(compute_rank_info(1_400).label(), "Silver V");
        assert_eq!(compute_rank_info(50_000).label(), "Devils Master");
        assert_eq!(roman(9), "IX");
        assert_eq!(roman(14), "XIV");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(compute_rank_info(250)).unwrap();
        assert_eq!(json["rank"]["name"], "Bronze");
        assert_eq!(json["rank"]["levelXp"], 100);
        assert_eq!(json["xpInLevel"], 50);
        assert_eq!(json["progressPercent"], 50.0);
        assert_eq!(json["isMaxRank"], false);
    }
}
