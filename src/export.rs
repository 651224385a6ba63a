//! OPL model export: serialize a [`ModelDocument`] as solver input.
//!
//! Produces the `.dat` text read by the external OPL model:
//!
//! ```text
//! ModelDocument → export_model_dat() → Cells/Actions/... declarations
//!   → opl_data/opl_model_data_n{K}.dat → solver
//! ```
//!
//! Output is a pure function of the document and [`ExportOptions`]:
//! identical inputs give byte-identical files.

use std::fmt::Display;
use std::io::Write;

use indexmap::IndexMap;

use crate::model::*;
use crate::{Error, Result};

/// Sentinel written in place of every distance not kept by truncation.
pub const DEFAULT_PADDING: f64 = 1e6;

/// Options for one model file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    /// Distances kept per (species, cell) row.
    pub nearest: usize,
    pub padding: f64,
}

impl ExportOptions {
    pub fn nearest(nearest: usize) -> Self {
        Self { nearest, padding: DEFAULT_PADDING }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Conventional file name for this truncation width.
    pub fn file_name(&self) -> String {
        format!("opl_model_data_n{}.dat", self.nearest)
    }
}

/// Export a model document as an OPL `.dat` file.
///
/// Fails with `InconsistentOrder` (or `LengthMismatch`) before writing
/// anything if the arrays do not cover the declared sets, and with
/// `NonFinite` if any value or the padding is `NaN` or infinite.
pub fn export_model_dat(
    doc: &ModelDocument,
    options: &ExportOptions,
    writer: &mut dyn Write,
) -> Result<()> {
    doc.validate()?;
    if !options.padding.is_finite() {
        return Err(Error::NonFinite {
            declaration: "SpeciesDistances".into(),
            value: options.padding,
        });
    }

    write_set(writer, "Cells", &doc.cells)?;
    write_set(writer, "Actions", &doc.actions)?;
    write_set(writer, "Species", &doc.species)?;
    write_set(writer, "Connections", &doc.connections)?;

    write_matrix(writer, "Costs", &doc.costs, &doc.cells, &doc.actions)?;
    write_matrix(writer, "SuitabilityScores", &doc.suitability_scores, &doc.cells, &doc.actions)?;
    write_array_of_sets(writer, "Neighbors", &doc.neighbors, &doc.cells)?;

    write_species_distances(writer, doc, options)?;

    write_numbers(writer, "Area", &doc.area, &doc.cells)?;

    tracing::debug!(
        cells = doc.cells.len(),
        species = doc.species.len(),
        nearest = options.nearest,
        "export: model written"
    );
    Ok(())
}

/// `Name = {\n  "a",\n  "b",\n};`
pub fn write_set<T: Display>(writer: &mut dyn Write, name: &str, items: &[T]) -> Result<()> {
    writeln!(writer, "{name} = {{")?;
    for item in items {
        writeln!(writer, "  \"{item}\",")?;
    }
    writeln!(writer, "}};\n")?;
    Ok(())
}

/// Dense `rows × cols` matrix; missing (row, col) pairs are written as 0.0.
pub fn write_matrix(
    writer: &mut dyn Write,
    name: &str,
    matrix: &CellMatrix,
    rows: &[CellId],
    cols: &[String],
) -> Result<()> {
    writeln!(writer, "{name} = [")?;
    for cell in rows {
        let values: Vec<String> = cols
            .iter()
            .map(|col| format_float(ModelDocument::matrix_value(matrix, cell, col)))
            .collect();
        writeln!(writer, "  [{}],", values.join(", "))?;
    }
    writeln!(writer, "];\n")?;
    Ok(())
}

/// One quoted set per cell, in `rows` order. Cells without an entry get `{}`.
pub fn write_array_of_sets(
    writer: &mut dyn Write,
    name: &str,
    sets: &IndexMap<CellId, Vec<CellId>>,
    rows: &[CellId],
) -> Result<()> {
    writeln!(writer, "{name} = [")?;
    for cell in rows {
        let quoted: Vec<String> = sets
            .get(cell)
            .map(|members| members.iter().map(|m| format!("\"{m}\"")).collect())
            .unwrap_or_default();
        writeln!(writer, "{{{}}},", quoted.join(", "))?;
    }
    writeln!(writer, "];\n")?;
    Ok(())
}

/// 1-D numeric array in `keys` order. Every key must have a value.
pub fn write_numbers(
    writer: &mut dyn Write,
    name: &str,
    values: &IndexMap<CellId, f64>,
    keys: &[CellId],
) -> Result<()> {
    writeln!(writer, "{name} = [")?;
    for key in keys {
        let value = values
            .get(key)
            .ok_or_else(|| Error::InconsistentOrder(format!("{name} has no entry for {key}")))?;
        writeln!(writer, "{},", format_float(*value))?;
    }
    writeln!(writer, "];\n")?;
    Ok(())
}

/// `SpeciesDistances`: one block per species, one row per cell.
///
/// Every row is exactly as wide as the longest distance row in the whole
/// document. Only the `nearest` smallest reachable distances of each row
/// keep their value; everything else is the padding sentinel.
pub fn write_species_distances(
    writer: &mut dyn Write,
    doc: &ModelDocument,
    options: &ExportOptions,
) -> Result<()> {
    let tables = doc
        .species
        .iter()
        .map(|species| {
            doc.distances(species).ok_or_else(|| {
                Error::InconsistentOrder(format!("SpeciesDistances has no block for '{species}'"))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let width = tables
        .iter()
        .flat_map(|table| doc.cells.iter().filter_map(|cell| table.row(cell)))
        .map(<[Hops]>::len)
        .max()
        .unwrap_or(0);

    let padding = format_float(options.padding);

    writeln!(writer, "SpeciesDistances = [")?;
    for (species, table) in doc.species.iter().zip(&tables) {
        writeln!(writer, "[")?;
        for cell in &doc.cells {
            let row = table.row(cell).ok_or_else(|| {
                Error::InconsistentOrder(format!("SpeciesDistances['{species}'] has no row for {cell}"))
            })?;
            let values: Vec<String> = truncate_nearest(row, width, options.nearest)
                .into_iter()
                .map(|hops| hops.map_or_else(|| padding.clone(), |h| h.to_string()))
                .collect();
            writeln!(writer, "[{}],", values.join(", "))?;
        }
        writeln!(writer, "],")?;
    }
    writeln!(writer, "];\n")?;
    Ok(())
}

/// Keep the `nearest` smallest distances of `row`, widened to `width`.
///
/// Ties go to the lower origin index. Unreachable entries are never kept.
/// Returned positions set to `None` are written as padding.
pub fn truncate_nearest(row: &[Hops], width: usize, nearest: usize) -> Vec<Hops> {
    let mut ranked: Vec<(u32, usize)> = row
        .iter()
        .enumerate()
        .filter_map(|(idx, hops)| hops.map(|h| (h, idx)))
        .collect();
    ranked.sort_unstable();

    let mut out = vec![None; width.max(row.len())];
    for &(hops, idx) in ranked.iter().take(nearest) {
        out[idx] = Some(hops);
    }
    out.truncate(width);
    out
}

/// Format a float the way the solver-side tooling expects: integral values
/// keep a trailing `.0` (`2.0`, `1000000.0`), others use the shortest
/// representation that round-trips (`0.45`).
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
