//! # habitat-opl: Grid Habitat Model Exchange
//!
//! Prepares spatial conservation-planning data for an external OPL solver
//! and reads its decisions back.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `DatasetSource` and `SuitabilityLookup` are the contracts with the outside world
//! 2. **Typed records**: `CellId`, `SpeciesOrigins`, `DistanceTable`, `ModelDocument` cross all boundaries
//! 3. **Encoder owns nothing**: document → `.dat` text is a pure function
//! 4. **Decoder is total**: every declaration is either parsed, absent, or an error
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use habitat_opl::{BuildConfig, CellRecord, MemoryDataset, ModelBuilder, SuitabilityTable};
//!
//! # fn example() -> habitat_opl::Result<()> {
//! let dataset = MemoryDataset::new()
//!     .with_record(CellRecord::new("cell_0_0").with_area(0.25).with_population("martes_martes"))
//!     .with_record(CellRecord::new("cell_1_0").with_area(0.25));
//!
//! let builder = ModelBuilder::new(dataset, SuitabilityTable::new(), BuildConfig::default());
//! let doc = builder.load_or_build()?;
//! for path in builder.write_model_files(&doc)? {
//!     println!("wrote {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Adjacency | `graph` | `GridGraph` (Moore neighbourhood) |
//! | Distances | `graph::bfs` | `SpeciesDistances` (hops per origin) |
//! | Encoding | `export` | `opl_model_data_n{K}.dat` |
//! | Decoding | `opl` | `DecodedModel`, `SolutionDocument` |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod graph;
pub mod opl;
pub mod export;
pub mod storage;
pub mod suitability;
pub mod config;

use std::path::{Path, PathBuf};

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    CellId, CellMatrix, DistanceTable, Hops, ModelDocument, SpeciesDistances, SpeciesOrigins,
    CellSolution, ConnectionLink, ModelShape, SolutionDocument, SolutionSummary,
};

// ============================================================================
// Re-exports: Graph, codec, boundary
// ============================================================================

pub use graph::{DistanceEngine, GridGraph, MOORE_OFFSETS};
pub use export::{export_model_dat, ExportOptions, DEFAULT_PADDING};
pub use opl::{DecodedModel, DEFAULT_SPECIES_ARITY};
pub use storage::{CellRecord, DatasetSource, MemoryDataset, ModelCache};
pub use suitability::{SuitabilityLookup, SuitabilityTable, SuitabilityTier};
pub use config::{BuildConfig, SpeciesConfig};

// ============================================================================
// Top-level ModelBuilder handle
// ============================================================================

/// The primary entry point. A `ModelBuilder` wraps a dataset and a
/// suitability lookup and drives the whole exchange with the solver.
pub struct ModelBuilder<S: DatasetSource, L: SuitabilityLookup> {
    source: S,
    suitability: L,
    config: BuildConfig,
}

impl<S: DatasetSource, L: SuitabilityLookup> ModelBuilder<S, L> {
    pub fn new(source: S, suitability: L, config: BuildConfig) -> Self {
        Self { source, suitability, config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the model document from the dataset.
    pub fn build_document(&self) -> Result<ModelDocument> {
        self.config.validate()?;

        // Phase 1: Adjacency
        let records = self.source.records()?;
        let graph = GridGraph::build(records.iter().map(|r| r.id.as_str()))?;
        let cells = graph.cells().to_vec();

        // Phase 2: Origins, in record order
        let mut origins = SpeciesOrigins::new();
        for species in &self.config.species {
            origins.declare(species.name.as_str());
            for (record, cell) in records.iter().zip(&cells) {
                if record.has_population(&species.taxon) {
                    origins.push(species.name.as_str(), *cell);
                }
            }
        }

        // Phase 3: Distances
        let species_distances = DistanceEngine::new(&graph).compute(&origins)?;

        // Phase 4: Per-cell matrices
        let actions = self.config.actions();
        let mut costs = CellMatrix::new();
        let mut suitability_scores = CellMatrix::new();
        let mut area = indexmap::IndexMap::with_capacity(cells.len());
        for (record, cell) in records.iter().zip(&cells) {
            costs.insert(
                *cell,
                actions
                    .iter()
                    .map(|a| (a.clone(), record.costs.get(a).copied().unwrap_or(0.0)))
                    .collect(),
            );
            suitability_scores.insert(
                *cell,
                actions
                    .iter()
                    .filter(|a| **a != self.config.corridor_action)
                    .map(|a| {
                        let score = record
                            .land_cover
                            .as_deref()
                            .map_or(0.0, |lc| self.suitability.score(a, lc));
                        (a.clone(), score)
                    })
                    .collect(),
            );
            area.insert(*cell, record.area_km2);
        }

        let doc = ModelDocument {
            neighbors: graph.to_neighbor_map(),
            cells,
            actions,
            species: self.config.species_names(),
            connections: self.config.connections(),
            costs,
            suitability_scores,
            species_distances,
            species_origins: origins,
            area,
        };
        doc.validate()?;
        Ok(doc)
    }

    /// Reuse the cached document if present; otherwise build and cache it.
    pub fn load_or_build(&self) -> Result<ModelDocument> {
        ModelCache::new(&self.config.cache_path).load_or_build(|| self.build_document())
    }

    /// Write one model file per configured truncation width.
    pub fn write_model_files(&self, doc: &ModelDocument) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.config.truncation_widths.len());
        for &nearest in &self.config.truncation_widths {
            let options = ExportOptions::nearest(nearest).with_padding(self.config.padding);
            let path = self.config.output_dir.join(options.file_name());
            storage::write_atomic(&path, |w| export_model_dat(doc, &options, w))?;
            tracing::info!(path = %path.display(), nearest, "export: model file written");
            written.push(path);
        }
        Ok(written)
    }

    /// Read a solver output file and check it against `doc`.
    pub fn read_solution(&self, doc: &ModelDocument, path: impl AsRef<Path>) -> Result<SolutionDocument> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let solution = SolutionDocument::parse(&text, doc.species.len())?;
        solution.validate(&ModelShape::from_document(doc))?;
        Ok(solution)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed cell identifier: {0}")]
    MalformedIdentifier(String),

    #[error("Duplicate cell: {0}")]
    DuplicateCell(String),

    #[error("Unknown cell: {0}")]
    UnknownCell(String),

    #[error("Parse error in '{declaration}' at position {position}: {message}")]
    ParseError { declaration: String, position: usize, message: String },

    #[error("Length mismatch in '{declaration}': expected {expected}, got {got}")]
    LengthMismatch { declaration: String, expected: usize, got: usize },

    #[error("Inconsistent order: {0}")]
    InconsistentOrder(String),

    #[error("Non-finite value in '{declaration}': {value}")]
    NonFinite { declaration: String, value: f64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
