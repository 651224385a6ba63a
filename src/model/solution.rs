//! Solver output: per-cell decision flags.
//!
//! | Declaration | Shape |
//! |-------------|-------|
//! | `add` | cells × species (adaptation action taken) |
//! | `cor` | cells (corridor) |
//! | `con` | cells × species (connected) |
//! | `con_o` | cells × species × origins of that species |

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CellId, ModelDocument, SpeciesOrigins};
use crate::opl::{self, DecodedModel};
use crate::{Error, Result};

/// The sets a solution is interpreted against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelShape {
    pub cells: Vec<CellId>,
    pub species: Vec<String>,
    pub origins: SpeciesOrigins,
}

impl ModelShape {
    pub fn from_document(doc: &ModelDocument) -> Self {
        Self {
            cells: doc.cells.clone(),
            species: doc.species.clone(),
            origins: doc.species_origins.clone(),
        }
    }

    /// Shape of a model `.dat` file. Origin sets are not recoverable from
    /// the truncated distances, so they come from the caller.
    pub fn from_decoded(model: &DecodedModel, origins: SpeciesOrigins) -> Result<Self> {
        let cells = model
            .cells
            .iter()
            .map(|id| CellId::parse(id))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { cells, species: model.species.clone(), origins })
    }

    fn origin_counts(&self) -> Vec<usize> {
        self.species.iter().map(|s| self.origins.origin_count(s)).collect()
    }
}

/// Decoded solution. `None` marks a declaration absent from the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolutionDocument {
    pub add: Option<Vec<Vec<bool>>>,
    pub cor: Option<Vec<bool>>,
    pub con: Option<Vec<Vec<bool>>>,
    pub con_o: Option<Vec<Vec<Vec<bool>>>>,
}

/// One cell's decisions, with absent declarations filled by all-zero flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSolution {
    pub cell: CellId,
    pub add: Vec<bool>,
    pub cor: bool,
    pub con: Vec<bool>,
    pub con_o: Vec<Vec<bool>>,
    /// Per species: whether this cell is one of its origins.
    pub is_origin: Vec<bool>,
}

/// A cell connected to one specific origin of a species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionLink {
    pub cell: CellId,
    pub species: String,
    pub origin: CellId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub total_cells: usize,
    pub corridor_cells: usize,
    /// Cells with the species' adaptation action, per species (only when `add` is present).
    pub actions: Vec<(String, usize)>,
    /// Connected cells per species (only when `con` is present).
    pub connections: Vec<(String, usize)>,
}

impl SolutionDocument {
    /// Decode the four solution declarations.
    ///
    /// `species_arity` is the number of rows in each `con_o` cell block.
    /// Row counts are not checked here; see [`SolutionDocument::validate`].
    pub fn parse(content: &str, species_arity: usize) -> Result<Self> {
        let doc = Self {
            add: opl::parse_matrix(content, "add")?,
            cor: opl::parse_array(content, "cor")?,
            con: opl::parse_matrix(content, "con")?,
            con_o: opl::parse_cube(content, "con_o", species_arity)?,
        };
        for (name, present) in [
            ("add", doc.add.is_some()),
            ("cor", doc.cor.is_some()),
            ("con", doc.con.is_some()),
            ("con_o", doc.con_o.is_some()),
        ] {
            if !present {
                tracing::warn!(declaration = name, "solution: declaration absent, using zeros");
            }
        }
        Ok(doc)
    }

    /// Check every present declaration against the model's cardinalities.
    pub fn validate(&self, shape: &ModelShape) -> Result<()> {
        let cells = shape.cells.len();
        let species = shape.species.len();

        if let Some(add) = &self.add {
            check_matrix("add", add, cells, species)?;
        }
        if let Some(cor) = &self.cor {
            check_len("cor", cor.len(), cells)?;
        }
        if let Some(con) = &self.con {
            check_matrix("con", con, cells, species)?;
        }
        if let Some(con_o) = &self.con_o {
            check_len("con_o", con_o.len(), cells)?;
            let counts = shape.origin_counts();
            for (i, block) in con_o.iter().enumerate() {
                check_len(&format!("con_o[{i}]"), block.len(), species)?;
                for ((j, row), expected) in block.iter().enumerate().zip(&counts) {
                    check_len(&format!("con_o[{i}][{j}]"), row.len(), *expected)?;
                }
            }
        }
        Ok(())
    }

    /// Per-cell view in Cells order.
    pub fn cells(&self, shape: &ModelShape) -> Vec<CellSolution> {
        let counts = shape.origin_counts();
        let species = shape.species.len();

        shape
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| CellSolution {
                cell: *cell,
                add: row_or_zeros(self.add.as_deref(), i, species),
                cor: self.cor.as_ref().and_then(|c| c.get(i)).copied().unwrap_or(false),
                con: row_or_zeros(self.con.as_deref(), i, species),
                con_o: self
                    .con_o
                    .as_ref()
                    .and_then(|c| c.get(i))
                    .cloned()
                    .unwrap_or_else(|| counts.iter().map(|&n| vec![false; n]).collect()),
                is_origin: shape.species.iter().map(|s| shape.origins.is_origin(s, cell)).collect(),
            })
            .collect()
    }

    /// Every (cell, species, origin) with `con = 1` for the species and
    /// `con_o = 1` for the origin.
    pub fn connection_links(&self, shape: &ModelShape) -> Vec<ConnectionLink> {
        let mut links = Vec::new();
        for sol in self.cells(shape) {
            for (s, species) in shape.species.iter().enumerate() {
                if !sol.con.get(s).copied().unwrap_or(false) {
                    continue;
                }
                let (Some(flags), Some(origins)) = (sol.con_o.get(s), shape.origins.get(species)) else {
                    continue;
                };
                for (flag, origin) in flags.iter().zip(origins) {
                    if *flag {
                        links.push(ConnectionLink {
                            cell: sol.cell,
                            species: species.clone(),
                            origin: *origin,
                        });
                    }
                }
            }
        }
        links
    }

    pub fn summary(&self, shape: &ModelShape) -> SolutionSummary {
        let cells = self.cells(shape);
        SolutionSummary {
            total_cells: cells.len(),
            corridor_cells: cells.iter().filter(|c| c.cor).count(),
            actions: match self.add {
                Some(_) => per_species(shape, &cells, |c| &c.add),
                None => Vec::new(),
            },
            connections: match self.con {
                Some(_) => per_species(shape, &cells, |c| &c.con),
                None => Vec::new(),
            },
        }
    }
}

/// Cells whose `pick` flag is set, per species.
fn per_species<F>(shape: &ModelShape, cells: &[CellSolution], pick: F) -> Vec<(String, usize)>
where
    F: Fn(&CellSolution) -> &Vec<bool>,
{
    shape
        .species
        .iter()
        .enumerate()
        .map(|(s, name)| {
            let n = cells.iter().filter(|c| pick(c).get(s).copied().unwrap_or(false)).count();
            (name.clone(), n)
        })
        .collect()
}

impl fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Summary Statistics ===")?;
        writeln!(f, "Total cells: {}", self.total_cells)?;
        if self.corridor_cells > 0 {
            writeln!(f, "Corridor cells: {}", self.corridor_cells)?;
        }
        if !self.actions.is_empty() {
            writeln!(f, "--- Action Summary ---")?;
            for (species, n) in &self.actions {
                writeln!(f, "Actions for {species}: {n}")?;
            }
        }
        if !self.connections.is_empty() {
            writeln!(f, "--- Connection Summary ---")?;
            for (species, n) in &self.connections {
                writeln!(f, "Connections for {species}: {n}")?;
            }
        }
        Ok(())
    }
}

fn row_or_zeros(rows: Option<&[Vec<bool>]>, i: usize, width: usize) -> Vec<bool> {
    rows.and_then(|r| r.get(i)).cloned().unwrap_or_else(|| vec![false; width])
}

fn check_len(declaration: &str, got: usize, expected: usize) -> Result<()> {
    if got == expected {
        Ok(())
    } else {
        Err(Error::LengthMismatch { declaration: declaration.to_string(), expected, got })
    }
}

fn check_matrix(name: &str, rows: &[Vec<bool>], cells: usize, width: usize) -> Result<()> {
    check_len(name, rows.len(), cells)?;
    for (i, row) in rows.iter().enumerate() {
        check_len(&format!("{name}[{i}]"), row.len(), width)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shape() -> ModelShape {
        let cells = vec![CellId::new(0, 0), CellId::new(1, 0), CellId::new(2, 0)];
        let mut origins = SpeciesOrigins::new();
        origins.push("atelerix", CellId::new(0, 0));
        origins.push("atelerix", CellId::new(2, 0));
        origins.push("martes", CellId::new(1, 0));
        ModelShape { cells, species: vec!["atelerix".into(), "martes".into()], origins }
    }

    const SOLUTION: &str = "\
// solution (optimal) with objective 12.5
add = [[1 0]
 [0 0]
 [0 1]];
cor = [0 1 0];
con = [[1 0] [1 1] [0 0]];
con_o = [[[1 0] [0]]
 [[1 1] [1]]
 [[0 0] [0]]];
";

    #[test]
    fn test_parse_and_validate() {
        let sol = SolutionDocument::parse(SOLUTION, 2).unwrap();
        sol.validate(&shape()).unwrap();
        assert_eq!(sol.cor, Some(vec![false, true, false]));
    }

    #[test]
    fn test_validate_length_mismatch() {
        let sol = SolutionDocument::parse("cor = [1 0];", 2).unwrap();
        let err = sol.validate(&shape()).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { expected: 3, got: 2, .. }));
    }

    #[test]
    fn test_validate_origin_width() {
        let sol = SolutionDocument::parse("con_o = [[[1] [0]] [[1] [0]] [[1] [0]]];", 2).unwrap();
        let err = sol.validate(&shape()).unwrap_err();
        match err {
            Error::LengthMismatch { declaration, expected, got } => {
                assert_eq!(declaration, "con_o[0][0]");
                assert_eq!((expected, got), (2, 1));
            }
            other => panic!("Expected LengthMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_absent_declarations_default_to_zero() {
        let sol = SolutionDocument::parse("cor = [1 0 0];", 2).unwrap();
        assert!(sol.con.is_none());
        let cells = sol.cells(&shape());
        assert_eq!(cells[0].con, vec![false, false]);
        assert_eq!(cells[0].con_o, vec![vec![false, false], vec![false]]);
        assert!(cells[0].cor);
        assert_eq!(cells[2].is_origin, vec![true, false]);
    }

    #[test]
    fn test_connection_links() {
        let sol = SolutionDocument::parse(SOLUTION, 2).unwrap();
        let links = sol.connection_links(&shape());
        assert_eq!(links, vec![
            ConnectionLink { cell: CellId::new(0, 0), species: "atelerix".into(), origin: CellId::new(0, 0) },
            ConnectionLink { cell: CellId::new(1, 0), species: "atelerix".into(), origin: CellId::new(0, 0) },
            ConnectionLink { cell: CellId::new(1, 0), species: "atelerix".into(), origin: CellId::new(2, 0) },
            ConnectionLink { cell: CellId::new(1, 0), species: "martes".into(), origin: CellId::new(1, 0) },
        ]);
    }

    #[test]
    fn test_summary() {
        let sol = SolutionDocument::parse(SOLUTION, 2).unwrap();
        let summary = sol.summary(&shape());
        assert_eq!(summary.total_cells, 3);
        assert_eq!(summary.corridor_cells, 1);
        assert_eq!(summary.actions, vec![("atelerix".into(), 1), ("martes".into(), 1)]);
        assert_eq!(summary.connections, vec![("atelerix".into(), 2), ("martes".into(), 1)]);
        let text = summary.to_string();
        assert!(text.contains("Corridor cells: 1"));
        assert!(text.contains("Connections for atelerix: 2"));
    }
}
