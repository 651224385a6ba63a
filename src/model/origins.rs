//! Species origin sets.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::CellId;

/// Ordered origin cells per species.
///
/// The position of a cell in its species' list is that origin's index in
/// every distance row, `con_o` vector and truncated distance block, so the
/// order must never be changed after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesOrigins {
    by_species: IndexMap<String, Vec<CellId>>,
}

impl SpeciesOrigins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an origin for `species`, creating the species entry on first use.
    pub fn push(&mut self, species: impl Into<String>, cell: CellId) {
        self.by_species.entry(species.into()).or_default().push(cell);
    }

    /// Register a species with no origins yet (keeps its position in the order).
    pub fn declare(&mut self, species: impl Into<String>) {
        self.by_species.entry(species.into()).or_default();
    }

    pub fn get(&self, species: &str) -> Option<&[CellId]> {
        self.by_species.get(species).map(Vec::as_slice)
    }

    pub fn origin_count(&self, species: &str) -> usize {
        self.get(species).map_or(0, <[CellId]>::len)
    }

    /// Index of `cell` in the origin list of `species`.
    pub fn index_of(&self, species: &str, cell: &CellId) -> Option<usize> {
        self.get(species)?.iter().position(|c| c == cell)
    }

    pub fn is_origin(&self, species: &str, cell: &CellId) -> bool {
        self.index_of(species, cell).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CellId])> {
        self.by_species.iter().map(|(s, cells)| (s.as_str(), cells.as_slice()))
    }

    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.by_species.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_species.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<CellId>)> for SpeciesOrigins {
    fn from_iter<T: IntoIterator<Item = (S, Vec<CellId>)>>(iter: T) -> Self {
        Self {
            by_species: iter.into_iter().map(|(s, cells)| (s.into(), cells)).collect(),
        }
    }
}
