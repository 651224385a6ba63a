//! # OPL Data Format
//!
//! Reader for the brace/bracket `.dat` interchange format shared with the
//! external solver. Pure functions, no I/O.
//!
//! Every entry point returns `Ok(None)` when the named declaration is not
//! present ("declaration absent", callers substitute defaults) and
//! `Err(Error::ParseError)` when it is present but not of the requested
//! shape. Row counts are never checked against the Cells set here; that is
//! the caller's job.

pub mod ast;
pub mod decoded;
pub mod lexer;
pub mod parser;

use crate::{Error, Result};
use ast::{Declaration, Literal};

pub use decoded::DecodedModel;
pub use parser::parse_declaration;

/// Inner arity of the per-cell blocks in `con_o`: one row per species in
/// the four-species model.
pub const DEFAULT_SPECIES_ARITY: usize = 4;

/// A scalar that can be read out of a numeric literal.
pub trait Scalar: Sized {
    const EXPECTED: &'static str;
    fn from_literal(lit: &Literal) -> Option<Self>;
}

impl Scalar for i64 {
    const EXPECTED: &'static str = "integer";
    fn from_literal(lit: &Literal) -> Option<Self> {
        lit.as_int()
    }
}

impl Scalar for u32 {
    const EXPECTED: &'static str = "non-negative integer";
    fn from_literal(lit: &Literal) -> Option<Self> {
        lit.as_int().and_then(|i| u32::try_from(i).ok())
    }
}

impl Scalar for f64 {
    const EXPECTED: &'static str = "number";
    fn from_literal(lit: &Literal) -> Option<Self> {
        lit.as_float()
    }
}

/// Binary decision flags: only `0` and `1` are accepted.
impl Scalar for bool {
    const EXPECTED: &'static str = "binary flag (0 or 1)";
    fn from_literal(lit: &Literal) -> Option<Self> {
        match lit.as_int()? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }
}

fn shape_error(decl: &Declaration, path: &str, expected: &str, got: &Literal) -> Error {
    Error::ParseError {
        declaration: decl.name.clone(),
        position: decl.span.start,
        message: format!("{path}: expected {expected}, got {}", got.type_name()),
    }
}

fn scalars<T: Scalar>(decl: &Declaration, path: &str, lit: &Literal) -> Result<Vec<T>> {
    let items = lit.as_array().ok_or_else(|| shape_error(decl, path, "array", lit))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            T::from_literal(item)
                .ok_or_else(|| shape_error(decl, &format!("{path}[{i}]"), T::EXPECTED, item))
        })
        .collect()
}

fn strings(decl: &Declaration, path: &str, lit: &Literal) -> Result<Vec<String>> {
    let items = lit.as_set().ok_or_else(|| shape_error(decl, path, "set", lit))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| shape_error(decl, &format!("{path}[{i}]"), "string", item))
        })
        .collect()
}

fn rows<'l>(decl: &Declaration, lit: &'l Literal) -> Result<&'l [Literal]> {
    lit.as_array().ok_or_else(|| shape_error(decl, &decl.name, "array", lit))
}

/// `name = { "a", "b", ... };`: the quoted members in file order.
pub fn parse_set(content: &str, name: &str) -> Result<Option<Vec<String>>> {
    parse_declaration(content, name)?
        .map(|decl| strings(&decl, name, &decl.value))
        .transpose()
}

/// `name = [ v1 v2 ... ];`
pub fn parse_array<T: Scalar>(content: &str, name: &str) -> Result<Option<Vec<T>>> {
    parse_declaration(content, name)?
        .map(|decl| scalars(&decl, name, &decl.value))
        .transpose()
}

/// `name = [ [..] [..] ... ];`: one row per sub-list, in file order.
pub fn parse_matrix<T: Scalar>(content: &str, name: &str) -> Result<Option<Vec<Vec<T>>>> {
    let Some(decl) = parse_declaration(content, name)? else {
        return Ok(None);
    };
    rows(&decl, &decl.value)?
        .iter()
        .enumerate()
        .map(|(i, row)| scalars(&decl, &format!("{name}[{i}]"), row))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// `name = [ {"a", "b"}, {}, ... ];`
pub fn parse_array_of_sets(content: &str, name: &str) -> Result<Option<Vec<Vec<String>>>> {
    let Some(decl) = parse_declaration(content, name)? else {
        return Ok(None);
    };
    rows(&decl, &decl.value)?
        .iter()
        .enumerate()
        .map(|(i, set)| strings(&decl, &format!("{name}[{i}]"), set))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// `name = [ [[..] [..] ...] ... ];`: blocks of exactly `arity` rows each.
///
/// A block with any other number of rows is a `ParseError`; blocks are
/// never skipped or padded.
pub fn parse_cube<T: Scalar>(
    content: &str,
    name: &str,
    arity: usize,
) -> Result<Option<Vec<Vec<Vec<T>>>>> {
    let Some(decl) = parse_declaration(content, name)? else {
        return Ok(None);
    };
    let mut cube = Vec::new();
    for (i, block) in rows(&decl, &decl.value)?.iter().enumerate() {
        let path = format!("{name}[{i}]");
        let block_rows = block
            .as_array()
            .ok_or_else(|| shape_error(&decl, &path, "array", block))?;
        if block_rows.len() != arity {
            return Err(Error::ParseError {
                declaration: decl.name.clone(),
                position: decl.span.start,
                message: format!("{path}: expected {arity} rows, got {}", block_rows.len()),
            });
        }
        let block = block_rows
            .iter()
            .enumerate()
            .map(|(j, row)| scalars(&decl, &format!("{path}[{j}]"), row))
            .collect::<Result<Vec<_>>>()?;
        cube.push(block);
    }
    Ok(Some(cube))
}
