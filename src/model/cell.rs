//! Cell identifier in the planning grid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

const PREFIX: &str = "cell_";

/// Grid cell identifier, written as `cell_<col>_<row>`.
///
/// Coordinates may be negative and need not be contiguous. Parsing only
/// accepts the canonical integer spelling (no leading zeros, no `+`), so
/// `id.to_string()` always reproduces the identifier it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    pub col: i32,
    pub row: i32,
}

impl CellId {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Parse a `cell_<col>_<row>` identifier.
    pub fn parse(id: &str) -> Result<Self> {
        let malformed = || Error::MalformedIdentifier(id.to_string());
        let rest = id.strip_prefix(PREFIX).ok_or_else(malformed)?;
        let (col, row) = rest.split_once('_').ok_or_else(malformed)?;
        let col = parse_coord(col).ok_or_else(malformed)?;
        let row = parse_coord(row).ok_or_else(malformed)?;
        Ok(Self { col, row })
    }

    /// The cell `(dcol, drow)` away, or `None` if that leaves the `i32` range.
    pub fn offset(&self, dcol: i32, drow: i32) -> Option<Self> {
        Some(Self {
            col: self.col.checked_add(dcol)?,
            row: self.row.checked_add(drow)?,
        })
    }
}

fn parse_coord(s: &str) -> Option<i32> {
    let v: i32 = s.parse().ok()?;
    // Rejects "007", "+3" and "-0" so that formatting round-trips.
    (v.to_string() == s).then_some(v)
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}_{}", self.col, self.row)
    }
}

impl FromStr for CellId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for CellId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
