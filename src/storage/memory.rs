//! In-memory dataset.
//!
//! The reference implementation of `DatasetSource`: a plain list of
//! records, built in code or read from a JSON array such as
//!
//! ```json
//! [{"id": "cell_0_0", "land_cover": "Forest", "area_km2": 0.25,
//!   "costs": {"corridor": 1.5}, "populations": ["martes_martes"]}]
//! ```
//!
//! Use it for tests, and for callers that already hold their data in memory.

use std::io::Read;
use std::path::Path;

use super::{CellRecord, DatasetSource};
use crate::Result;

// ============================================================================
// MemoryDataset
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDataset {
    records: Vec<CellRecord>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: CellRecord) {
        self.records.push(record);
    }

    pub fn with_record(mut self, record: CellRecord) -> Self {
        self.push(record);
        self
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let records: Vec<CellRecord> = serde_json::from_reader(reader)?;
        tracing::debug!(records = records.len(), "dataset: loaded from json");
        Ok(Self { records })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<CellRecord> for MemoryDataset {
    fn from_iter<I: IntoIterator<Item = CellRecord>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

impl DatasetSource for MemoryDataset {
    fn records(&self) -> Result<Vec<CellRecord>> {
        Ok(self.records.clone())
    }
}
