//! RON tier loader
//!
//! Loads tier tables from external RON files, with fallback to the built-in table.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progression::{Consistency, RankTier, TableError, TierTable};

/// Tier file loading and export failures
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Invalid tier table: {0}")]
    Table(#[from] TableError),
}

/// On-disk form of a tier table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTableDef {
    #[serde(default)]
    pub consistency: Consistency,
    pub tiers: Vec<TierDef>,
}

/// On-disk form of a single tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDef {
    pub name: String,
    /// Derived from the previous tier when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_xp: Option<u64>,
    pub levels: u32,
    pub level_xp: u64,
    pub color: String,
}

impl TierTableDef {
    /// Resolve base XP values and validate
    pub fn into_table(self) -> Result<TierTable, TableError> {
        let mut tiers: Vec<RankTier> = Vec::with_capacity(self.tiers.len());

        for def in self.tiers {
            let base_xp = match def.base_xp {
                Some(base) => base,
                None => match tiers.last() {
                    Some(prev) => prev
                        .end_xp()
                        .ok_or_else(|| TableError::Overflow { name: prev.name.clone() })?,
                    None => 0,
                },
            };
            tiers.push(RankTier::new(def.name, base_xp, def.levels, def.level_xp, def.color));
        }

        TierTable::with_consistency(tiers, self.consistency)
    }
}

impl From<&TierTable> for TierTableDef {
    fn from(table: &TierTable) -> Self {
        Self {
            consistency: table.consistency(),
            tiers: table
                .tiers()
                .iter()
                .map(|t| TierDef {
                    name: t.name.clone(),
                    base_xp: Some(t.base_xp),
                    levels: t.levels,
                    level_xp: t.level_xp,
                    color: t.color.clone(),
                })
                .collect(),
        }
    }
}

/// Parse a tier table from RON source
pub fn parse_tier_table(content: &str) -> Result<TierTable, LoadError> {
    let def: TierTableDef = ron::from_str(content)?;
    Ok(def.into_table()?)
}

/// Load a tier table from a RON file
pub fn load_tier_table(path: &Path) -> Result<TierTable, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_tier_table(&content)?;
    log::info!("Loaded {} tiers from {:?}", table.len(), path);
    Ok(table)
}

/// Load a tier table, falling back to the built-in table on any failure
pub fn load_or_default(path: Option<&Path>) -> TierTable {
    let Some(path) = path else {
        return TierTable::default();
    };

    match load_tier_table(path) {
        Ok(table) => table,
        Err(e) => {
            log::warn!("Failed to load tiers from {:?}: {}. Using defaults.", path, e);
            TierTable::default()
        }
    }
}

/// Write a tier table as pretty RON, creating parent directories
pub fn export_tier_table(table: &TierTable, path: &Path) -> Result<(), LoadError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| LoadError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let def = TierTableDef::from(table);
    let content = ron::ser::to_string_pretty(&def, ron::ser::PrettyConfig::default())?;
    fs::write(path, content).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Exported {} tiers to {:?}", table.len(), path);
    Ok(())
}

/// Export the built-in tier table for editing
pub fn export_default_tiers(path: &Path) -> Result<(), LoadError> {
    export_tier_table(&TierTable::default(), path)
}
