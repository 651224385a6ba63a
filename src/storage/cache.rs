//! Persisted intermediate model document.
//!
//! Written once as JSON and reused verbatim on later runs. Keys follow the
//! model declaration names (`Cells`, `Costs`, `SpeciesDistances`, ...).

use std::path::{Path, PathBuf};

use super::write_atomic;
use crate::model::ModelDocument;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCache {
    path: PathBuf,
}

impl ModelCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> Result<ModelDocument> {
        let file = std::fs::File::open(&self.path)?;
        let doc = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(doc)
    }

    pub fn store(&self, doc: &ModelDocument) -> Result<()> {
        write_atomic(&self.path, |w| {
            serde_json::to_writer_pretty(&mut *w, doc)?;
            writeln!(w)?;
            Ok(())
        })
    }

    /// Load the cached document, or build and store it if there is none.
    ///
    /// An existing file is never rebuilt or rewritten.
    pub fn load_or_build<F>(&self, build: F) -> Result<ModelDocument>
    where
        F: FnOnce() -> Result<ModelDocument>,
    {
        if self.exists() {
            tracing::info!(path = %self.path.display(), "cache: hit");
            return self.load();
        }
        tracing::info!(path = %self.path.display(), "cache: miss, building");
        let doc = build()?;
        self.store(&doc)?;
        Ok(doc)
    }
}
