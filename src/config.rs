//! Build configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it
//! changes. The defaults describe the four-species Menorca dataset.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::export::DEFAULT_PADDING;
use crate::{Error, Result};

/// A species as it appears in the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// Short id used in `Species` and in action/connection names.
    pub name: String,
    /// Taxon as recorded in cell populations; selects the origin cells.
    pub taxon: String,
}

impl SpeciesConfig {
    pub fn new(name: impl Into<String>, taxon: impl Into<String>) -> Self {
        Self { name: name.into(), taxon: taxon.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub species: Vec<SpeciesConfig>,
    pub corridor_action: String,
    pub adaptation_prefix: String,
    pub connection_prefix: String,
    /// One model file is written per width.
    pub truncation_widths: Vec<usize>,
    pub padding: f64,
    pub cache_path: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            species: vec![
                SpeciesConfig::new("atelerix", "atelerix_algirus"),
                SpeciesConfig::new("martes", "martes_martes"),
                SpeciesConfig::new("eliomys", "eliomys_quercinus"),
                SpeciesConfig::new("oryctolagus", "oryctolagus_cuniculus"),
            ],
            corridor_action: "corridor".to_string(),
            adaptation_prefix: "adaptation_".to_string(),
            connection_prefix: "connected_".to_string(),
            truncation_widths: vec![2, 5, 11],
            padding: DEFAULT_PADDING,
            cache_path: PathBuf::from("opl_model_data.json"),
            output_dir: PathBuf::from("opl_data"),
        }
    }
}

impl BuildConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BuildConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.species.is_empty() {
            return Err(Error::Config("at least one species is required".into()));
        }
        let mut seen = HashSet::new();
        for s in &self.species {
            if s.name.is_empty() || s.taxon.is_empty() {
                return Err(Error::Config("species name and taxon must be non-empty".into()));
            }
            if !seen.insert(s.name.as_str()) {
                return Err(Error::Config(format!("duplicate species '{}'", s.name)));
            }
        }
        if self.corridor_action.is_empty() {
            return Err(Error::Config("corridor action name must be non-empty".into()));
        }
        if self.truncation_widths.contains(&0) {
            return Err(Error::Config("truncation widths must be positive".into()));
        }
        if !self.padding.is_finite() {
            return Err(Error::Config(format!("padding must be finite, got {}", self.padding)));
        }
        Ok(())
    }

    pub fn species_names(&self) -> Vec<String> {
        self.species.iter().map(|s| s.name.clone()).collect()
    }

    pub fn adaptation_action(&self, species: &str) -> String {
        format!("{}{species}", self.adaptation_prefix)
    }

    /// One adaptation action per species, then the corridor.
    pub fn actions(&self) -> Vec<String> {
        self.species
            .iter()
            .map(|s| self.adaptation_action(&s.name))
            .chain(std::iter::once(self.corridor_action.clone()))
            .collect()
    }

    pub fn connections(&self) -> Vec<String> {
        self.species
            .iter()
            .map(|s| format!("{}{}", self.connection_prefix, s.name))
            .collect()
    }
}
