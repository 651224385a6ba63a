//! # Dataset Boundary
//!
//! The contract between the model builder and wherever the cell records
//! come from, plus the file plumbing shared by every artifact it writes.
//!
//! ## Implementations
//!
//! | Source | Module | Description |
//! |--------|--------|-------------|
//! | `MemoryDataset` | `memory` | Records built in code or read from a JSON array |
//!
//! The persisted intermediate document lives in [`cache`].

pub mod cache;
pub mod memory;

use std::io::Write;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::Result;

pub use cache::ModelCache;
pub use memory::MemoryDataset;

// ============================================================================
// Cell records
// ============================================================================

/// One grid cell as delivered by the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    /// `cell_<col>_<row>`; parsed when the graph is built.
    pub id: String,
    /// Land-cover label used by the suitability lookup.
    #[serde(default)]
    pub land_cover: Option<String>,
    #[serde(default)]
    pub area_km2: f64,
    /// Action name → cost. Actions without an entry cost 0.
    #[serde(default)]
    pub costs: IndexMap<String, f64>,
    /// Taxa with an observed population in this cell.
    #[serde(default)]
    pub populations: IndexSet<String>,
}

impl CellRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    pub fn with_land_cover(mut self, label: impl Into<String>) -> Self {
        self.land_cover = Some(label.into());
        self
    }

    pub fn with_area(mut self, area_km2: f64) -> Self {
        self.area_km2 = area_km2;
        self
    }

    pub fn with_cost(mut self, action: impl Into<String>, cost: f64) -> Self {
        self.costs.insert(action.into(), cost);
        self
    }

    pub fn with_population(mut self, taxon: impl Into<String>) -> Self {
        self.populations.insert(taxon.into());
        self
    }

    pub fn has_population(&self, taxon: &str) -> bool {
        self.populations.contains(taxon)
    }
}

// ============================================================================
// DatasetSource Trait
// ============================================================================

/// Anything that can list the cells of one planning area.
///
/// Record order is significant: it becomes the `Cells` order and the
/// order in which species origins are discovered.
pub trait DatasetSource {
    fn records(&self) -> Result<Vec<CellRecord>>;
}

impl<T: DatasetSource + ?Sized> DatasetSource for &T {
    fn records(&self) -> Result<Vec<CellRecord>> {
        (**self).records()
    }
}

// ============================================================================
// Atomic writes
// ============================================================================

/// Write a file through a temporary sibling and rename it into place, so
/// readers never observe a half-written artifact.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut out = std::io::BufWriter::new(tmp.as_file_mut());
        write(&mut out)?;
        out.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
