//! End-to-end tests for adjacency and hop distances.
//!
//! Each test exercises: identifiers -> GridGraph -> DistanceEngine.

use habitat_opl::{CellId, DistanceEngine, GridGraph, SpeciesOrigins};

fn full_grid(cols: i32, rows: i32) -> Vec<String> {
    (0..rows)
        .flat_map(|r| (0..cols).map(move |c| format!("cell_{c}_{r}")))
        .collect()
}

fn hops(graph: &GridGraph, origin: &str, cell: &str) -> Option<u32> {
    let all = DistanceEngine::new(graph)
        .hops_from(&CellId::parse(origin).unwrap())
        .unwrap();
    all[graph.index_of(&CellId::parse(cell).unwrap()).unwrap()]
}

// ============================================================================
// 1. 3x3 grid, origin in the centre
// ============================================================================

#[test]
fn test_centre_origin_reaches_ring_in_one_hop() {
    let graph = GridGraph::build(full_grid(3, 3)).unwrap();
    assert_eq!(hops(&graph, "cell_1_1", "cell_1_1"), Some(0));
    for id in full_grid(3, 3).iter().filter(|id| *id != "cell_1_1") {
        assert_eq!(hops(&graph, "cell_1_1", id), Some(1), "{id}");
    }
}

// ============================================================================
// 2. Removing a cell reroutes or disconnects
// ============================================================================

#[test]
fn test_removed_cell_keeps_diagonal_paths() {
    let ids: Vec<String> = full_grid(3, 3).into_iter().filter(|id| id != "cell_1_0").collect();
    let graph = GridGraph::build(&ids).unwrap();
    assert!(!graph.contains(&CellId::new(1, 0)));

    // Every remaining cell still touches the centre.
    for id in ids.iter().filter(|id| *id != "cell_1_1") {
        assert_eq!(hops(&graph, "cell_1_1", id), Some(1), "{id}");
    }
    // cell_0_0 -> cell_2_0 used to go through cell_1_0; now through cell_1_1.
    assert_eq!(hops(&graph, "cell_0_0", "cell_2_0"), Some(2));
}

#[test]
fn test_removed_bridge_disconnects() {
    let graph = GridGraph::build(["cell_0_0", "cell_2_0"]).unwrap();
    assert_eq!(hops(&graph, "cell_0_0", "cell_2_0"), None);

    let graph = GridGraph::build(["cell_0_0", "cell_1_0", "cell_2_0"]).unwrap();
    assert_eq!(hops(&graph, "cell_0_0", "cell_2_0"), Some(2));
}

// ============================================================================
// 3. Per-species tables
// ============================================================================

#[test]
fn test_species_tables_follow_origin_order() {
    let graph = GridGraph::build(full_grid(5, 1)).unwrap();
    let origins: SpeciesOrigins = [
        ("martes", vec![CellId::new(4, 0), CellId::new(0, 0)]),
        ("eliomys", vec![CellId::new(2, 0)]),
    ]
    .into_iter()
    .collect();

    let tables = DistanceEngine::new(&graph).compute(&origins).unwrap();
    let species: Vec<&String> = tables.keys().collect();
    assert_eq!(species, vec!["martes", "eliomys"]);

    let martes = &tables["martes"];
    assert_eq!(martes.row(&CellId::new(1, 0)), Some(&[Some(3), Some(1)][..]));
    assert_eq!(martes.row(&CellId::new(4, 0)), Some(&[Some(0), Some(4)][..]));

    let eliomys = &tables["eliomys"];
    assert_eq!(eliomys.row(&CellId::new(0, 0)), Some(&[Some(2)][..]));
}

#[test]
fn test_unreached_cells_are_none_not_zero() {
    let graph = GridGraph::build(["cell_0_0", "cell_1_1", "cell_5_5", "cell_6_5"]).unwrap();
    let origins: SpeciesOrigins = [("atelerix", vec![CellId::new(0, 0), CellId::new(6, 5)])]
        .into_iter()
        .collect();
    let tables = DistanceEngine::new(&graph).compute(&origins).unwrap();
    let t = &tables["atelerix"];

    assert_eq!(t.row(&CellId::new(1, 1)), Some(&[Some(1), None][..]));
    assert_eq!(t.row(&CellId::new(5, 5)), Some(&[None, Some(1)][..]));
    assert_eq!(t.unreachable_count(), 4);
}

#[test]
fn test_negative_coordinates() {
    let graph = GridGraph::build(["cell_-1_-1", "cell_0_0", "cell_1_1"]).unwrap();
    assert_eq!(hops(&graph, "cell_-1_-1", "cell_1_1"), Some(2));
}
