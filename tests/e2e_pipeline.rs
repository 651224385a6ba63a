//! End-to-end tests for the full builder pipeline.
//!
//! Each test exercises: dataset -> ModelBuilder -> cache / model files / solution.

use std::path::Path;

use habitat_opl::{
    BuildConfig, CellId, CellRecord, DecodedModel, Error, MemoryDataset, ModelBuilder,
    SpeciesConfig, SuitabilityTable, SuitabilityTier,
};
use pretty_assertions::assert_eq;

fn config_in(dir: &Path) -> BuildConfig {
    BuildConfig {
        species: vec![
            SpeciesConfig::new("martes", "martes_martes"),
            SpeciesConfig::new("eliomys", "eliomys_quercinus"),
        ],
        truncation_widths: vec![1, 3],
        cache_path: dir.join("opl_model_data.json"),
        output_dir: dir.join("opl_data"),
        ..BuildConfig::default()
    }
}

/// Helper: a 3x2 strip with martes at both ends and eliomys in the middle.
fn strip() -> MemoryDataset {
    let mut ds = MemoryDataset::new();
    for row in 0..2 {
        for col in 0..3 {
            let mut r = CellRecord::new(format!("cell_{col}_{row}"))
                .with_area(1.5)
                .with_land_cover("Mixed Forests");
            if row == 0 && col != 1 {
                r = r.with_population("martes_martes").with_cost("adaptation_martes", 4.0);
            }
            if row == 1 && col == 1 {
                r = r.with_population("eliomys_quercinus");
            }
            ds.push(r);
        }
    }
    ds
}

fn table() -> SuitabilityTable {
    SuitabilityTable::new()
        .with("adaptation_martes", "Mixed Forests", SuitabilityTier::High)
        .with("corridor", "Mixed Forests", SuitabilityTier::VeryHigh)
}

// ============================================================================
// 1. Document contents
// ============================================================================

#[test]
fn test_build_document() {
    let dir = tempfile::tempdir().unwrap();
    let builder = ModelBuilder::new(strip(), table(), config_in(dir.path()));
    let doc = builder.build_document().unwrap();

    assert_eq!(doc.cells.len(), 6);
    assert_eq!(doc.actions, vec!["adaptation_martes", "adaptation_eliomys", "corridor"]);
    assert_eq!(doc.connections, vec!["connected_martes", "connected_eliomys"]);
    assert_eq!(
        doc.species_origins.get("martes"),
        Some(&[CellId::new(0, 0), CellId::new(2, 0)][..])
    );

    let c = CellId::new(0, 0);
    assert_eq!(doc.costs[&c]["adaptation_martes"], 4.0);
    assert_eq!(doc.costs[&c]["corridor"], 0.0);
    assert_eq!(doc.suitability_scores[&c]["adaptation_martes"], 0.9);
    assert_eq!(doc.suitability_scores[&c]["adaptation_eliomys"], 0.0);
    // The corridor is never scored.
    assert!(!doc.suitability_scores[&c].contains_key("corridor"));

    let martes = doc.distances("martes").unwrap();
    assert_eq!(martes.row(&CellId::new(1, 1)), Some(&[Some(1), Some(1)][..]));
    assert_eq!(doc.neighbors[&c], vec![CellId::new(0, 1), CellId::new(1, 0), CellId::new(1, 1)]);
}

#[test]
fn test_malformed_record_aborts_build() {
    let dir = tempfile::tempdir().unwrap();
    let ds = strip().with_record(CellRecord::new("cell_3"));
    let err = ModelBuilder::new(ds, table(), config_in(dir.path()))
        .build_document()
        .unwrap_err();
    assert!(matches!(err, Error::MalformedIdentifier(id) if id == "cell_3"));
}

// ============================================================================
// 2. Cache: build if absent, reuse verbatim
// ============================================================================

#[test]
fn test_cache_is_reused_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let first = ModelBuilder::new(strip(), table(), config.clone())
        .load_or_build()
        .unwrap();
    assert!(config.cache_path.is_file());

    // A different dataset must not be looked at once the cache exists.
    let other = MemoryDataset::new().with_record(CellRecord::new("cell_9_9"));
    let second = ModelBuilder::new(other, table(), config).load_or_build().unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// 3. Model files
// ============================================================================

#[test]
fn test_one_file_per_truncation_width() {
    let dir = tempfile::tempdir().unwrap();
    let builder = ModelBuilder::new(strip(), table(), config_in(dir.path()));
    let doc = builder.build_document().unwrap();

    let paths = builder.write_model_files(&doc).unwrap();
    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["opl_model_data_n1.dat", "opl_model_data_n3.dat"]);

    let n1 = DecodedModel::parse(&std::fs::read_to_string(&paths[0]).unwrap()).unwrap();
    n1.check_lengths().unwrap();
    // martes block, cell_1_0: both origins one hop away, the lower index wins.
    assert_eq!(n1.species_distances[0][1], vec![1.0, 1e6]);

    let n3 = DecodedModel::parse(&std::fs::read_to_string(&paths[1]).unwrap()).unwrap();
    assert_eq!(n3.species_distances[0][1], vec![1.0, 1.0]);
    // eliomys has one origin; rows are padded to the widest species.
    assert_eq!(n3.species_distances[1][0], vec![1.0, 1e6]);
}

// ============================================================================
// 4. Solution read-back
// ============================================================================

#[test]
fn test_read_solution_against_document() {
    let dir = tempfile::tempdir().unwrap();
    let builder = ModelBuilder::new(strip(), table(), config_in(dir.path()));
    let doc = builder.build_document().unwrap();

    let path = dir.path().join("solution.dat");
    std::fs::write(
        &path,
        "cor = [0 1 0 0 1 0];\n\
         con = [[1 0] [1 1] [1 0] [0 0] [0 1] [0 0]];\n\
         con_o = [[[1 0] [0]] [[1 1] [1]] [[0 1] [0]] [[0 0] [0]] [[0 0] [1]] [[0 0] [0]]];\n",
    )
    .unwrap();

    let sol = builder.read_solution(&doc, &path).unwrap();
    let summary = sol.summary(&habitat_opl::ModelShape::from_document(&doc));
    assert_eq!(summary.corridor_cells, 2);
    assert_eq!(summary.connections, vec![("martes".to_string(), 3), ("eliomys".to_string(), 2)]);
    assert!(summary.actions.is_empty());

    std::fs::write(&path, "cor = [0 1];\n").unwrap();
    let err = builder.read_solution(&doc, &path).unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { .. }));
}
