//! # Planning Model
//!
//! Typed records exchanged between the dataset, the distance engine, the
//! model encoder and the solution reader.
//!
//! Design rule: pure data. No I/O and no solver format here; the `.dat`
//! text lives in [`crate::export`] and [`crate::opl`].

pub mod cell;
pub mod origins;
pub mod distance;
pub mod document;
pub mod solution;

pub use cell::CellId;
pub use origins::SpeciesOrigins;
pub use distance::{DistanceTable, Hops, SpeciesDistances};
pub use document::{CellMatrix, ModelDocument};
pub use solution::{CellSolution, ConnectionLink, ModelShape, SolutionDocument, SolutionSummary};
