//! Arithmetic evaluation of fully substituted expressions.
//!
//! The recalculation engine never parses arithmetic itself. Once every
//! reference has been replaced by a number, the expression text goes to an
//! [`Arithmetic`] implementation. [`RhaiArithmetic`] is the one shipped
//! here: a Rhai engine run in expression-only mode over text that has been
//! restricted to numbers, `+ - * / ^` and parentheses.

use regex::{Captures, Regex};
use rhai::{Dynamic, Engine};
use std::sync::OnceLock;
use thiserror::Error;

use super::format::float_literal;

const MAX_OPERATIONS: u64 = 100_000;
const MAX_EXPR_DEPTH: usize = 128;

/// Why an expression could not be evaluated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArithError {
    #[error("empty expression")]
    Empty,

    #[error("unsupported character '{0}' in expression")]
    Unsupported(char),

    #[error("evaluation failed: {0}")]
    Eval(String),

    #[error("expression did not produce a number")]
    NotNumeric,

    #[error("expression produced a non-finite number")]
    NonFinite,
}

/// Evaluates infix arithmetic over numeric literals.
pub trait Arithmetic {
    fn evaluate(&self, expr: &str) -> Result<f64, ArithError>;
}

/// [`Arithmetic`] backed by Rhai.
pub struct RhaiArithmetic {
    engine: Engine,
}

impl RhaiArithmetic {
    pub fn new() -> Self {
        RhaiArithmetic {
            engine: create_engine(),
        }
    }
}

impl Default for RhaiArithmetic {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a Rhai engine limited for arithmetic evaluation.
pub fn create_engine() -> Engine {
    let mut engine = Engine::new();
    engine.set_max_operations(MAX_OPERATIONS);
    engine.set_max_expr_depths(MAX_EXPR_DEPTH, MAX_EXPR_DEPTH);
    engine
}

fn number_re() -> &'static Regex {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    NUMBER_RE.get_or_init(|| {
        Regex::new(r"(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
            .expect("numeric literal regex must compile")
    })
}

/// Rewrite an arithmetic expression into Rhai syntax.
///
/// - every numeric literal becomes a plain float literal (`7/2` is `3.5`,
///   not integer division)
/// - `^` becomes Rhai's power operator `**`
///
/// After rewriting only digits, `.`, operators, parentheses and
/// whitespace may remain.
pub fn to_rhai_expression(expr: &str) -> Result<String, ArithError> {
    let widened = number_re().replace_all(expr, |caps: &Captures| {
        let literal = &caps[0];
        match literal.parse::<f64>() {
            Ok(n) if n.is_finite() => float_literal(n),
            _ => literal.to_string(),
        }
    });
    let rewritten = widened.replace('^', "**");

    if let Some(bad) = rewritten
        .chars()
        .find(|c| !(c.is_ascii_digit() || c.is_ascii_whitespace() || "+-*/().".contains(*c)))
    {
        return Err(ArithError::Unsupported(bad));
    }
    if rewritten.trim().is_empty() {
        return Err(ArithError::Empty);
    }
    Ok(rewritten)
}

impl Arithmetic for RhaiArithmetic {
    fn evaluate(&self, expr: &str) -> Result<f64, ArithError> {
        let script = to_rhai_expression(expr)?;
        let result: Dynamic = self
            .engine
            .eval_expression(&script)
            .map_err(|e| ArithError::Eval(e.to_string()))?;

        let n = if let Ok(f) = result.as_float() {
            f
        } else if let Ok(i) = result.as_int() {
            i as f64
        } else {
            return Err(ArithError::NotNumeric);
        };

        if n.is_finite() {
            Ok(n)
        } else {
            Err(ArithError::NonFinite)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> Result<f64, ArithError> {
        RhaiArithmetic::new().evaluate(expr)
    }

    #[test]
    fn test_basic_operators() {
        assert_eq!(eval("1 + 2 * 3"), Ok(7.0));
        assert_eq!(eval("(1 + 2) * 3"), Ok(9.0));
        assert_eq!(eval("10 - 4 - 3"), Ok(3.0));
        assert_eq!(eval("7 / 2"), Ok(3.5));
        assert_eq!(eval("2 ^ 10"), Ok(1024.0));
    }

    #[test]
    fn test_negative_literals() {
        assert_eq!(eval("-3 + 5"), Ok(2.0));
        assert_eq!(eval("2 - (-5.0)"), Ok(7.0));
    }

    #[test]
    fn test_decimal_forms() {
        assert_eq!(eval(".5 + 5."), Ok(5.5));
        assert_eq!(eval("1e3 + 1"), Ok(1001.0));
    }

    #[test]
    fn test_rewrite() {
        assert_eq!(to_rhai_expression("7/2^2").unwrap(), "7.0/2.0**2.0");
        assert_eq!(to_rhai_expression("x+1"), Err(ArithError::Unsupported('x')));
        assert_eq!(to_rhai_expression("  "), Err(ArithError::Empty));
    }

    #[test]
    fn test_failures() {
        assert!(eval("1 +").is_err());
        assert!(eval("(1").is_err());
        assert!(eval("").is_err());
        assert!(eval("1 / 0").is_err());
        assert!(matches!(eval("sqrt(4)"), Err(ArithError::Unsupported('s'))));
    }
}
