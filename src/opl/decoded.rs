//! Read back a model `.dat` file written by [`crate::export`].

use super::{parse_array, parse_array_of_sets, parse_cube, parse_matrix, parse_set};
use crate::{Error, Result};

/// The declarations of a model `.dat` file, in file order.
///
/// Absent declarations come back empty. `species_distances` holds the
/// truncated values as written, padding sentinel included, indexed
/// `[species][cell][origin]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedModel {
    pub cells: Vec<String>,
    pub actions: Vec<String>,
    pub species: Vec<String>,
    pub connections: Vec<String>,
    pub costs: Vec<Vec<f64>>,
    pub suitability_scores: Vec<Vec<f64>>,
    pub neighbors: Vec<Vec<String>>,
    pub species_distances: Vec<Vec<Vec<f64>>>,
    pub area: Vec<f64>,
}

impl DecodedModel {
    pub fn parse(content: &str) -> Result<Self> {
        let cells = parse_set(content, "Cells")?.unwrap_or_default();
        let species = parse_set(content, "Species")?.unwrap_or_default();

        // Each species block holds one row per cell.
        let species_distances =
            parse_cube(content, "SpeciesDistances", cells.len())?.unwrap_or_default();

        let model = Self {
            actions: parse_set(content, "Actions")?.unwrap_or_default(),
            connections: parse_set(content, "Connections")?.unwrap_or_default(),
            costs: parse_matrix(content, "Costs")?.unwrap_or_default(),
            suitability_scores: parse_matrix(content, "SuitabilityScores")?.unwrap_or_default(),
            neighbors: parse_array_of_sets(content, "Neighbors")?.unwrap_or_default(),
            area: parse_array(content, "Area")?.unwrap_or_default(),
            cells,
            species,
            species_distances,
        };
        Ok(model)
    }

    /// Check that every per-cell array has one entry per declared cell.
    pub fn check_lengths(&self) -> Result<()> {
        let expected = self.cells.len();
        let per_cell = [
            ("Costs", self.costs.len()),
            ("SuitabilityScores", self.suitability_scores.len()),
            ("Neighbors", self.neighbors.len()),
            ("Area", self.area.len()),
        ];
        for (declaration, got) in per_cell {
            if got != expected {
                return Err(Error::LengthMismatch { declaration: declaration.into(), expected, got });
            }
        }
        if self.species_distances.len() != self.species.len() {
            return Err(Error::LengthMismatch {
                declaration: "SpeciesDistances".into(),
                expected: self.species.len(),
                got: self.species_distances.len(),
            });
        }
        Ok(())
    }
}
