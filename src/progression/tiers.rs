//! Rank tiers
//!
//! The ordered tier table that XP is mapped onto, its validation rules,
//! and the built-in default table.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named band of XP containing a fixed number of levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankTier {
    pub name: String,
    /// Cumulative XP at which this tier begins
    pub base_xp: u64,
    /// Number of levels in this tier
    pub levels: u32,
    /// XP required to advance one level
    pub level_xp: u64,
    /// Display color, `#RGB` or `#RRGGBB`
    pub color: String,
}

impl RankTier {
    pub fn new(
        name: impl Into<String>,
        base_xp: u64,
        levels: u32,
        level_xp: u64,
        color: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_xp,
            levels,
            level_xp,
            color: color.into(),
        }
    }

    /// Total XP covered by the tier's levels, `None` on overflow
    pub fn span(&self) -> Option<u64> {
        u64::from(self.levels).checked_mul(self.level_xp)
    }

    /// XP at which the tier's levels run out
    pub fn end_xp(&self) -> Option<u64> {
        self.span().and_then(|span| self.base_xp.checked_add(span))
    }
}

/// How strictly tier contiguity is enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Consistency {
    /// Each tier must start exactly where the previous tier's levels end
    #[default]
    Strict,
    /// Contiguity mismatches are logged and accepted (legacy tables with plateaus)
    Lenient,
}

/// Tier table validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("tier table is empty")]
    Empty,
    #[error("first tier '{name}' must start at 0 XP, starts at {base_xp}")]
    FirstTierNotZero { name: String, base_xp: u64 },
    #[error("tier {index} has an empty name")]
    EmptyName { index: usize },
    #[error("duplicate tier name '{name}'")]
    DuplicateName { name: String },
    #[error("tier '{name}' must have at least one level")]
    ZeroLevels { name: String },
    #[error("tier '{name}' must require at least 1 XP per level")]
    ZeroLevelXp { name: String },
    #[error("tier '{name}' has invalid color '{color}'")]
    InvalidColor { name: String, color: String },
    #[error("tier '{name}' starts at {base_xp}, not above previous tier at {previous}")]
    NotAscending { name: String, base_xp: u64, previous: u64 },
    #[error("tier '{name}' XP span overflows")]
    Overflow { name: String },
    #[error("table holds more than {} levels in total", u32::MAX)]
    TooManyLevels,
    #[error("terminal tier '{name}' must have exactly 1 level, has {levels}")]
    TerminalLevels { name: String, levels: u32 },
    #[error("tier '{name}' starts at {found}, expected {expected} from the previous tier's levels")]
    Inconsistent { name: String, expected: u64, found: u64 },
}

/// Validated, immutable, ordered list of rank tiers
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    tiers: Vec<RankTier>,
    /// Levels contained in all tiers below each index
    level_offsets: Vec<u32>,
    consistency: Consistency,
}

impl TierTable {
    /// Build a table with strict contiguity
    pub fn new(tiers: Vec<RankTier>) -> Result<Self, TableError> {
        Self::with_consistency(tiers, Consistency::Strict)
    }

    pub fn with_consistency(tiers: Vec<RankTier>, consistency: Consistency) -> Result<Self, TableError> {
        validate(&tiers, consistency)?;

        let mut level_offsets = Vec::with_capacity(tiers.len());
        let mut total = 0u32;
        for tier in &tiers {
            level_offsets.push(total);
            total = total.saturating_add(tier.levels);
        }

        Ok(Self { tiers, level_offsets, consistency })
    }

    pub fn tiers(&self) -> &[RankTier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Always false; a table holds at least one tier
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn consistency(&self) -> Consistency {
        self.consistency
    }

    /// The max rank sentinel
    pub fn terminal(&self) -> &RankTier {
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn is_terminal(&self, index: usize) -> bool {
        index + 1 == self.tiers.len()
    }

    pub fn find(&self, name: &str) -> Option<&RankTier> {
        self.tiers.iter().find(|t| t.name == name)
    }

    /// Index of the highest tier whose base is reached by `xp`
    pub fn tier_index_for(&self, xp: u64) -> usize {
        self.tiers.iter().rposition(|t| t.base_xp <= xp).unwrap_or(0)
    }

    pub fn tier_for(&self, xp: u64) -> &RankTier {
        &self.tiers[self.tier_index_for(xp)]
    }

    /// XP still needed to enter the next tier, `None` at max rank
    pub fn xp_to_next_tier(&self, xp: u64) -> Option<u64> {
        let index = self.tier_index_for(xp);
        self.tiers
            .get(index + 1)
            .map(|next| next.base_xp.saturating_sub(xp))
    }

    /// Levels in all tiers below `index`
    pub fn level_offset(&self, index: usize) -> u32 {
        self.level_offsets.get(index).copied().unwrap_or(0)
    }

    /// Sum of levels across every tier
    pub fn total_levels(&self) -> u32 {
        self.level_offset(self.tiers.len() - 1).saturating_add(self.terminal().levels)
    }
}

impl Default for TierTable {
    fn default() -> Self {
        default_table().clone()
    }
}

fn validate(tiers: &[RankTier], consistency: Consistency) -> Result<(), TableError> {
    let first = tiers.first().ok_or(TableError::Empty)?;
    if first.base_xp != 0 {
        return Err(TableError::FirstTierNotZero {
            name: first.name.clone(),
            base_xp: first.base_xp,
        });
    }

    tiers
        .iter()
        .try_fold(0u32, |total, tier| total.checked_add(tier.levels))
        .ok_or(TableError::TooManyLevels)?;

    let mut names = HashSet::new();
    for (index, tier) in tiers.iter().enumerate() {
        if tier.name.trim().is_empty() {
            return Err(TableError::EmptyName { index });
        }
        if !names.insert(tier.name.as_str()) {
            return Err(TableError::DuplicateName { name: tier.name.clone() });
        }
        if tier.levels == 0 {
            return Err(TableError::ZeroLevels { name: tier.name.clone() });
        }
        if tier.level_xp == 0 {
            return Err(TableError::ZeroLevelXp { name: tier.name.clone() });
        }
        if !is_hex_color(&tier.color) {
            return Err(TableError::InvalidColor {
                name: tier.name.clone(),
                color: tier.color.clone(),
            });
        }

        let Some(next) = tiers.get(index + 1) else {
            if tier.levels != 1 {
                return Err(TableError::TerminalLevels {
                    name: tier.name.clone(),
                    levels: tier.levels,
                });
            }
            continue;
        };

        let end = tier.end_xp().ok_or_else(|| TableError::Overflow { name: tier.name.clone() })?;

        if next.base_xp <= tier.base_xp {
            return Err(TableError::NotAscending {
                name: next.name.clone(),
                base_xp: next.base_xp,
                previous: tier.base_xp,
            });
        }
        if next.base_xp != end {
            match consistency {
                Consistency::Strict => {
                    return Err(TableError::Inconsistent {
                        name: next.name.clone(),
                        expected: end,
                        found: next.base_xp,
                    });
                }
                Consistency::Lenient => {
                    log::warn!(
                        "Tier '{}' starts at {} but '{}' levels end at {}",
                        next.name, next.base_xp, tier.name, end
                    );
                }
            }
        }
    }

    Ok(())
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// The built-in tier list
pub fn default_tiers() -> Vec<RankTier> {
    vec![
        RankTier::new("Bronze", 0, 5, 100, "#CD7F32"),
        RankTier::new("Silver", 500, 5, 200, "#C0C0C0"),
        RankTier::new("Gold", 1_500, 5, 300, "#FFD700"),
        RankTier::new("Platinum", 3_000, 5, 500, "#E5E4E2"),
        RankTier::new("Diamond", 5_500, 5, 750, "#B9F2FF"),
        RankTier::new("Master", 9_250, 5, 1_000, "#9B59B6"),
        RankTier::new("Grandmaster", 14_250, 5, 1_500, "#E74C3C"),
        RankTier::new("Legend", 21_750, 5, 1_900, "#F39C12"),
        RankTier::new("Mythic", 31_250, 5, 2_000, "#1ABC9C"),
        RankTier::new("Devils Master", 41_250, 1, 1, "#8B0000"),
    ]
}

/// Shared built-in table, built on first use
pub fn default_table() -> &'static TierTable {
    static TABLE: OnceLock<TierTable> = OnceLock::new();
    TABLE.get_or_init(|| TierTable::new(default_tiers()).expect("built-in tier table is valid"))
}
