//! # Habitat Suitability
//!
//! Per-action lookup from a cell's land-cover label to a score in `[0, 1]`.
//! Tables are plain configuration handed to the model builder.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ============================================================================
// Tiers
// ============================================================================

/// Qualitative suitability grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuitabilityTier {
    VeryHigh,
    High,
    ModerateHigh,
    Moderate,
    LowModerate,
    Low,
    VeryLow,
}

impl SuitabilityTier {
    pub const ALL: [SuitabilityTier; 7] = [
        Self::VeryHigh,
        Self::High,
        Self::ModerateHigh,
        Self::Moderate,
        Self::LowModerate,
        Self::Low,
        Self::VeryLow,
    ];

    pub fn score(self) -> f64 {
        match self {
            Self::VeryHigh => 1.0,
            Self::High => 0.9,
            Self::ModerateHigh => 0.7,
            Self::Moderate => 0.45,
            Self::LowModerate => 0.15,
            Self::Low => 0.05,
            Self::VeryLow => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryHigh => "very high",
            Self::High => "high",
            Self::ModerateHigh => "moderate-high",
            Self::Moderate => "moderate",
            Self::LowModerate => "low-moderate",
            Self::Low => "low",
            Self::VeryLow => "very low",
        }
    }
}

impl fmt::Display for SuitabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SuitabilityTier {
    type Err = Error;

    /// Case-insensitive; `"Moderate-High"` and `"moderate-high"` are the same tier.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.label() == wanted)
            .ok_or_else(|| Error::Config(format!("unknown suitability tier '{s}'")))
    }
}

// ============================================================================
// SuitabilityLookup Trait
// ============================================================================

/// Score a (action, land cover) pair.
///
/// Implementations return 0 for any pair they know nothing about.
pub trait SuitabilityLookup {
    fn score(&self, action: &str, land_cover: &str) -> f64;
}

impl<T: SuitabilityLookup + ?Sized> SuitabilityLookup for &T {
    fn score(&self, action: &str, land_cover: &str) -> f64 {
        (**self).score(action, land_cover)
    }
}

// ============================================================================
// SuitabilityTable
// ============================================================================

/// Action → (land-cover label → tier).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuitabilityTable {
    actions: IndexMap<String, IndexMap<String, SuitabilityTier>>,
}

impl SuitabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        action: impl Into<String>,
        land_cover: impl Into<String>,
        tier: SuitabilityTier,
    ) {
        self.actions
            .entry(action.into())
            .or_default()
            .insert(land_cover.into(), tier);
    }

    pub fn with(
        mut self,
        action: impl Into<String>,
        land_cover: impl Into<String>,
        tier: SuitabilityTier,
    ) -> Self {
        self.insert(action, land_cover, tier);
        self
    }

    /// Load one action's grades from a pipe-delimited table:
    ///
    /// ```text
    /// | Land-Cover Type   | Suitability | Notes |
    /// | ----------------- | ----------- | ----- |
    /// | Mixed Forests     | High        | ...   |
    /// ```
    ///
    /// The first two lines are header and separator. Only the first two
    /// columns are read.
    pub fn insert_markdown(&mut self, action: &str, table: &str) -> Result<()> {
        for (line_no, line) in table.trim().lines().enumerate().skip(2) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut columns = line.trim_matches('|').split('|').map(str::trim);
            let (Some(land_cover), Some(grade)) = (columns.next(), columns.next()) else {
                return Err(Error::Config(format!(
                    "suitability table for '{action}': line {} has fewer than two columns",
                    line_no + 1
                )));
            };
            self.insert(action, land_cover, grade.parse()?);
        }
        Ok(())
    }

    pub fn tier(&self, action: &str, land_cover: &str) -> Option<SuitabilityTier> {
        self.actions.get(action)?.get(land_cover).copied()
    }

    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

impl SuitabilityLookup for SuitabilityTable {
    fn score(&self, action: &str, land_cover: &str) -> f64 {
        self.tier(action, land_cover).map_or(0.0, SuitabilityTier::score)
    }
}
