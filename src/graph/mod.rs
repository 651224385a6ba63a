//! # Grid Graph
//!
//! Moore-neighbourhood adjacency over an irregular set of grid cells.
//! Built once per dataset and immutable afterwards.
//!
//! Cells are stored densely in input order; adjacency is kept as indices
//! into that order so the distance engine can run on plain `Vec`s.

pub mod bfs;

use hashbrown::HashMap;
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::model::CellId;
use crate::{Error, Result};

pub use bfs::DistanceEngine;

/// Neighbour offsets as `(dcol, drow)`, in serialization order:
/// up, down, left, right, up-left, down-right, left-down, right-up.
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
];

/// Dense cell index within a [`GridGraph`].
pub type CellIdx = usize;

/// Adjacency over the cells present in a dataset.
#[derive(Debug, Clone, Default)]
pub struct GridGraph {
    cells: Vec<CellId>,
    index: HashMap<CellId, CellIdx>,
    adjacency: Vec<SmallVec<[CellIdx; 8]>>,
}

impl GridGraph {
    /// Parse identifiers and build the adjacency.
    ///
    /// Any identifier that is not `cell_<int>_<int>` aborts the build with
    /// `MalformedIdentifier`; a repeated identifier with `DuplicateCell`.
    pub fn build<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cells = ids
            .into_iter()
            .map(|id| CellId::parse(id.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::from_cells(cells)
    }

    /// Build the adjacency over already-parsed cells.
    pub fn from_cells(cells: Vec<CellId>) -> Result<Self> {
        let mut index = HashMap::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            if index.insert(*cell, i).is_some() {
                return Err(Error::DuplicateCell(cell.to_string()));
            }
        }

        let adjacency = cells
            .iter()
            .map(|cell| {
                MOORE_OFFSETS
                    .iter()
                    .filter_map(|&(dc, dr)| cell.offset(dc, dr))
                    .filter_map(|n| index.get(&n).copied())
                    .collect()
            })
            .collect();

        let graph = Self { cells, index, adjacency };
        tracing::info!(cells = graph.len(), edges = graph.edge_count(), "grid: graph built");
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: &CellId) -> bool {
        self.index.contains_key(cell)
    }

    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    pub fn index_of(&self, cell: &CellId) -> Option<CellIdx> {
        self.index.get(cell).copied()
    }

    pub fn cell(&self, idx: CellIdx) -> CellId {
        self.cells[idx]
    }

    /// Neighbour indices of `idx`, in [`MOORE_OFFSETS`] order.
    pub fn neighbor_indices(&self, idx: CellIdx) -> &[CellIdx] {
        &self.adjacency[idx]
    }

    /// Neighbours of `cell` in [`MOORE_OFFSETS`] order; empty for unknown cells.
    pub fn neighbors(&self, cell: &CellId) -> impl Iterator<Item = CellId> + '_ {
        self.index_of(cell)
            .into_iter()
            .flat_map(move |i| self.adjacency[i].iter().map(move |&j| self.cells[j]))
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|n| n.len()).sum::<usize>() / 2
    }

    /// Adjacency as an ordered map, ready for the model document.
    pub fn to_neighbor_map(&self) -> IndexMap<CellId, Vec<CellId>> {
        self.cells
            .iter()
            .map(|cell| (*cell, self.neighbors(cell).collect()))
            .collect()
    }
}
