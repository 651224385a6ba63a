//! Per-species hop distance tables.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::CellId;

/// Hop count from one origin, `None` when the origin cannot reach the cell.
///
/// A missing path is never folded into `Some(0)`; only an origin has
/// distance zero to its own index.
pub type Hops = Option<u32>;

/// Distance rows for one species, keyed by cell.
///
/// Every row is aligned index-for-index with the species' origin list and
/// has exactly that many entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistanceTable {
    rows: IndexMap<CellId, Vec<Hops>>,
}

impl DistanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cell: CellId, row: Vec<Hops>) {
        self.rows.insert(cell, row);
    }

    pub fn row(&self, cell: &CellId) -> Option<&[Hops]> {
        self.rows.get(cell).map(Vec::as_slice)
    }

    /// Distance from origin `origin_idx` to `cell`.
    pub fn hops(&self, cell: &CellId, origin_idx: usize) -> Hops {
        self.rows.get(cell)?.get(origin_idx).copied().flatten()
    }

    /// Longest row in the table.
    pub fn max_row_len(&self) -> usize {
        self.rows.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Number of (cell, origin) pairs with no path.
    pub fn unreachable_count(&self) -> usize {
        self.rows.values().flatten().filter(|h| h.is_none()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellId, &[Hops])> {
        self.rows.iter().map(|(c, r)| (c, r.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<(CellId, Vec<Hops>)> for DistanceTable {
    fn from_iter<T: IntoIterator<Item = (CellId, Vec<Hops>)>>(iter: T) -> Self {
        Self { rows: iter.into_iter().collect() }
    }
}

/// Distance tables for every species, in species order.
pub type SpeciesDistances = IndexMap<String, DistanceTable>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hops_lookup() {
        let mut table = DistanceTable::new();
        table.insert(CellId::new(0, 0), vec![Some(0), None]);
        table.insert(CellId::new(1, 0), vec![Some(1), Some(4)]);

        assert_eq!(table.hops(&CellId::new(0, 0), 0), Some(0));
        assert_eq!(table.hops(&CellId::new(0, 0), 1), None);
        assert_eq!(table.hops(&CellId::new(1, 0), 1), Some(4));
        assert_eq!(table.hops(&CellId::new(9, 9), 0), None);
        assert_eq!(table.unreachable_count(), 1);
        assert_eq!(table.max_row_len(), 2);
    }

    #[test]
    fn test_unreached_serializes_as_null() {
        let table: DistanceTable = [(CellId::new(0, 0), vec![Some(2), None])].into_iter().collect();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"cell_0_0":[2,null]}"#);
        let back: DistanceTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
