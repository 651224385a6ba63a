//! Multi-source hop distances.
//!
//! Each origin gets its own breadth-first traversal over the read-only
//! graph. Runs share no mutable state, so with the `parallel` feature they
//! are spread over the rayon pool; results are identical either way.

use std::collections::VecDeque;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{CellIdx, GridGraph};
use crate::model::{CellId, DistanceTable, Hops, SpeciesDistances, SpeciesOrigins};
use crate::{Error, Result};

/// Hop-distance engine over one [`GridGraph`].
#[derive(Debug, Clone, Copy)]
pub struct DistanceEngine<'g> {
    graph: &'g GridGraph,
}

impl<'g> DistanceEngine<'g> {
    pub fn new(graph: &'g GridGraph) -> Self {
        Self { graph }
    }

    /// Hops from `origin` to every cell, indexed like [`GridGraph::cells`].
    pub fn hops_from(&self, origin: &CellId) -> Result<Vec<Hops>> {
        let idx = self
            .graph
            .index_of(origin)
            .ok_or_else(|| Error::UnknownCell(origin.to_string()))?;
        Ok(self.bfs(idx))
    }

    fn bfs(&self, origin: CellIdx) -> Vec<Hops> {
        let mut dist: Vec<Hops> = vec![None; self.graph.len()];
        let mut queue = VecDeque::new();
        dist[origin] = Some(0);
        queue.push_back(origin);

        while let Some(current) = queue.pop_front() {
            // Set when the cell was enqueued.
            let Some(d) = dist[current] else { continue };
            for &next in self.graph.neighbor_indices(current) {
                if dist[next].is_none() {
                    dist[next] = Some(d + 1);
                    queue.push_back(next);
                }
            }
        }
        dist
    }

    /// Distance table for one species.
    ///
    /// Row `cell[i]` holds the hops from `origins[i]`; a cell an origin
    /// cannot reach holds `None` at that index.
    pub fn species_table(&self, species: &str, origins: &[CellId]) -> Result<DistanceTable> {
        let indices = origins
            .iter()
            .map(|o| {
                self.graph
                    .index_of(o)
                    .ok_or_else(|| Error::UnknownCell(o.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        #[cfg(feature = "parallel")]
        let columns: Vec<Vec<Hops>> = indices.par_iter().map(|&o| self.bfs(o)).collect();
        #[cfg(not(feature = "parallel"))]
        let columns: Vec<Vec<Hops>> = indices.iter().map(|&o| self.bfs(o)).collect();

        let table: DistanceTable = self
            .graph
            .cells()
            .iter()
            .enumerate()
            .map(|(cell_idx, cell)| (*cell, columns.iter().map(|col| col[cell_idx]).collect()))
            .collect();

        tracing::info!(
            species,
            origins = origins.len(),
            unreachable = table.unreachable_count(),
            "distance: species table computed"
        );
        Ok(table)
    }

    /// Distance tables for every species, in origin-set order.
    pub fn compute(&self, origins: &SpeciesOrigins) -> Result<SpeciesDistances> {
        origins
            .iter()
            .map(|(species, cells)| Ok((species.to_string(), self.species_table(species, cells)?)))
            .collect()
    }
}
