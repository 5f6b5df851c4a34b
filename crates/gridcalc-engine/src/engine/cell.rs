//! Cell value types.
//!
//! - [`Value`] - The computed (display) value of a cell
//! - [`CellError`] - Error markers a computed value can carry
//! - [`to_numeric_or_zero`] - Coercion used when substituting references

use std::fmt;
use thiserror::Error;

use super::format::format_number;

/// Error markers for computed values.
///
/// `Circular` and `DepthExceeded` abort the whole evaluation chain they
/// occur in. `Malformed` stays local to the cell that produced it.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellError {
    #[error("#ERR")]
    Malformed,

    #[error("#CIRC")]
    Circular,

    #[error("#DEPTH")]
    DepthExceeded,
}

impl CellError {
    /// Whether this error stops the evaluation chain instead of being
    /// coerced to zero by referencing formulas.
    pub fn aborts_chain(&self) -> bool {
        matches!(self, CellError::Circular | CellError::DepthExceeded)
    }
}

/// The computed value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Literal text, returned unchanged from the raw value.
    Text(String),
    /// Result of a formula.
    Number(f64),
    Error(CellError),
}

impl Value {
    /// Computed value of an empty cell.
    pub fn empty() -> Value {
        Value::Text(String::new())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::empty()
    }
}

impl From<CellError> for Value {
    fn from(err: CellError) -> Self {
        Value::Error(err)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Error(e) => write!(f, "{}", e),
        }
    }
}

/// Coerce a computed value to a number for substitution into a formula.
///
/// Numbers pass through. Text counts when it parses as a finite number
/// (surrounding whitespace ignored). Empty cells, other text and error
/// markers are `0`.
pub fn to_numeric_or_zero(value: &Value) -> f64 {
    match value {
        Value::Number(n) if n.is_finite() => *n,
        Value::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// The expression part of a formula raw value, or `None` for literals.
pub fn formula_body(raw: &str) -> Option<&str> {
    raw.strip_prefix('=')
}
