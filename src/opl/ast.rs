//! OPL data literal tree.

use super::lexer::Span;

/// A named top-level declaration: `name = <literal>;`.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub value: Literal,
    /// From the start of the name to the closing `;`.
    pub span: Span,
}

/// A literal value in a `.dat` document.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    /// `[ ... ]`: separators between items are optional.
    Array(Vec<Literal>),
    /// `{ ... }`
    Set(Vec<Literal>),
}

impl Literal {
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Int(_) => "integer",
            Literal::Float(_) => "float",
            Literal::Str(_) => "string",
            Literal::Array(_) => "array",
            Literal::Set(_) => "set",
        }
    }

    /// Integer view; floats with no fractional part are accepted when they
    /// fit in an `i64`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Literal::Int(i) => Some(*i),
            Literal::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Literal::Float(f) => Some(*f),
            Literal::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Literal]> {
        match self {
            Literal::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&[Literal]> {
        match self {
            Literal::Set(items) => Some(items),
            _ => None,
        }
    }
}
