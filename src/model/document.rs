//! The model document: everything the solver model consumes, in one record.
//!
//! This is also the schema of the persisted intermediate cache, so field
//! names serialize in the same PascalCase the solver-side tooling reads.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{CellId, DistanceTable, SpeciesDistances, SpeciesOrigins};
use crate::{Error, Result};

/// Sparse (cell, action) → value matrix. Missing entries mean 0.0.
pub type CellMatrix = IndexMap<CellId, IndexMap<String, f64>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModelDocument {
    pub cells: Vec<CellId>,
    pub actions: Vec<String>,
    pub species: Vec<String>,
    pub connections: Vec<String>,
    pub costs: CellMatrix,
    pub suitability_scores: CellMatrix,
    pub neighbors: IndexMap<CellId, Vec<CellId>>,
    pub species_distances: SpeciesDistances,
    pub species_origins: SpeciesOrigins,
    pub area: IndexMap<CellId, f64>,
}

impl ModelDocument {
    /// Value of a sparse matrix cell, defaulting to 0.0.
    pub fn matrix_value(matrix: &CellMatrix, cell: &CellId, action: &str) -> f64 {
        matrix.get(cell).and_then(|row| row.get(action)).copied().unwrap_or(0.0)
    }

    pub fn distances(&self, species: &str) -> Option<&DistanceTable> {
        self.species_distances.get(species)
    }

    /// Check the shape invariants between the declared sets and the arrays.
    ///
    /// Costs, suitability and neighbours may be sparse. Area and distance
    /// rows must cover every cell, and every distance row must be exactly as
    /// long as its species' origin list. Every numeric value must be
    /// finite, since the solver format has no spelling for `NaN` or `inf`.
    pub fn validate(&self) -> Result<()> {
        for cell in &self.cells {
            let area = self
                .area
                .get(cell)
                .ok_or_else(|| Error::InconsistentOrder(format!("Area has no entry for {cell}")))?;
            check_finite(&format!("Area[{cell}]"), *area)?;
        }
        check_matrix_finite("Costs", &self.costs)?;
        check_matrix_finite("SuitabilityScores", &self.suitability_scores)?;

        for species in &self.species {
            let table = self.species_distances.get(species).ok_or_else(|| {
                Error::InconsistentOrder(format!("SpeciesDistances has no block for '{species}'"))
            })?;
            let expected = self.species_origins.origin_count(species);
            for cell in &self.cells {
                let row = table.row(cell).ok_or_else(|| {
                    Error::InconsistentOrder(format!(
                        "SpeciesDistances['{species}'] has no row for {cell}"
                    ))
                })?;
                if row.len() != expected {
                    return Err(Error::LengthMismatch {
                        declaration: format!("SpeciesDistances['{species}'][{cell}]"),
                        expected,
                        got: row.len(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn check_finite(declaration: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFinite { declaration: declaration.to_string(), value })
    }
}

fn check_matrix_finite(name: &str, matrix: &CellMatrix) -> Result<()> {
    for (cell, row) in matrix {
        for (action, value) in row {
            check_finite(&format!("{name}[{cell}][{action}]"), *value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> ModelDocument {
        let a = CellId::new(0, 0);
        let b = CellId::new(1, 0);
        let mut doc = ModelDocument {
            cells: vec![a, b],
            actions: vec!["adaptation_atelerix".into(), "corridor".into()],
            species: vec!["atelerix".into()],
            connections: vec!["connected_atelerix".into()],
            ..Default::default()
        };
        doc.area.insert(a, 1.0);
        doc.area.insert(b, 1.0);
        doc.species_origins.push("atelerix", a);
        let table: DistanceTable = [(a, vec![Some(0)]), (b, vec![Some(1)])].into_iter().collect();
        doc.species_distances.insert("atelerix".into(), table);
        doc
    }

    #[test]
    fn test_validate_ok() {
        tiny().validate().unwrap();
    }

    #[test]
    fn test_validate_missing_area() {
        let mut doc = tiny();
        doc.area.shift_remove(&CellId::new(1, 0));
        assert!(matches!(doc.validate(), Err(Error::InconsistentOrder(_))));
    }

    #[test]
    fn test_validate_row_length() {
        let mut doc = tiny();
        doc.species_distances
            .get_mut("atelerix")
            .unwrap()
            .insert(CellId::new(1, 0), vec![Some(1), Some(2)]);
        assert!(matches!(
            doc.validate(),
            Err(Error::LengthMismatch { expected: 1, got: 2, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut doc = tiny();
        doc.area.insert(CellId::new(0, 0), f64::NAN);
        assert!(matches!(doc.validate(), Err(Error::NonFinite { .. })));

        let mut doc = tiny();
        doc.costs
            .entry(CellId::new(1, 0))
            .or_default()
            .insert("corridor".into(), f64::INFINITY);
        match doc.validate() {
            Err(Error::NonFinite { declaration, .. }) => {
                assert_eq!(declaration, "Costs[cell_1_0][corridor]");
            }
            other => panic!("Expected NonFinite, got {other:?}"),
        }
    }

    #[test]
    fn test_matrix_default() {
        let doc = tiny();
        assert_eq!(ModelDocument::matrix_value(&doc.costs, &CellId::new(0, 0), "corridor"), 0.0);
    }

    #[test]
    fn test_cache_field_names() {
        let json = serde_json::to_value(tiny()).unwrap();
        for key in [
            "Cells", "Actions", "Species", "Connections", "Costs", "SuitabilityScores",
            "Neighbors", "SpeciesDistances", "SpeciesOrigins", "Area",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
