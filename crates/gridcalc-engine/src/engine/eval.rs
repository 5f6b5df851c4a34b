//! Formula evaluation with reference substitution.
//!
//! A formula is evaluated by replacing every cell reference with the
//! numeric value of that cell (resolved recursively from its raw text)
//! and handing the resulting text to an [`Arithmetic`] implementation.
//!
//! Cycles are caught with an [`EvalPath`]: the cells currently being
//! resolved on this branch of the evaluation. A reference to a cell that
//! is already on the path fails the chain with `#CIRC`.
//!
//! The path also remembers every number it has already resolved, so a cell
//! shared by several branches is evaluated once per top-level evaluation.

use std::collections::{HashMap, HashSet};

use super::arith::Arithmetic;
use super::cell::{CellError, Value, formula_body, to_numeric_or_zero};
use super::cell_ref::CellRef;
use super::config::{EngineConfig, MAX_ALLOWED_DEPTH};
use super::deps::references;
use super::format::float_literal;
use super::store::CellStore;

/// Cells currently being resolved in one evaluation call chain.
///
/// Scoped to a single top-level evaluation; never stored.
#[derive(Clone, Debug, Default)]
pub struct EvalPath {
    visiting: HashSet<CellRef>,
    chain: Vec<CellRef>,
    /// Levels taken by something that is not a cell (a detached formula).
    base: usize,
    /// Numbers substituted for cells that resolved without aborting.
    resolved: HashMap<CellRef, f64>,
}

impl EvalPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// A path that already contains `cell`, for evaluating that cell.
    pub fn starting_at(cell: &CellRef) -> Self {
        let mut path = Self::new();
        path.enter(cell);
        path
    }

    /// A path for formula text that lives in no cell. The formula takes one
    /// level of depth, the same as a stored formula does.
    pub fn detached() -> Self {
        EvalPath {
            base: 1,
            ..Self::default()
        }
    }

    pub fn contains(&self, cell: &CellRef) -> bool {
        self.visiting.contains(cell)
    }

    pub fn depth(&self) -> usize {
        self.base + self.chain.len()
    }

    /// Number already substituted for `cell` in this evaluation.
    pub fn resolved(&self, cell: &CellRef) -> Option<f64> {
        self.resolved.get(cell).copied()
    }

    /// Cells on the path, outermost first.
    pub fn chain(&self) -> &[CellRef] {
        &self.chain
    }

    fn enter(&mut self, cell: &CellRef) {
        self.visiting.insert(cell.clone());
        self.chain.push(cell.clone());
    }

    fn leave(&mut self, cell: &CellRef) {
        self.visiting.remove(cell);
        if self.chain.last() == Some(cell) {
            self.chain.pop();
        }
    }
}

/// Evaluates raw cell values against a store.
pub struct Evaluator<'a> {
    store: &'a dyn CellStore,
    arithmetic: &'a dyn Arithmetic,
    max_depth: usize,
}

impl<'a> Evaluator<'a> {
    /// `config.max_depth` is capped at [`MAX_ALLOWED_DEPTH`].
    pub fn new(
        store: &'a dyn CellStore,
        arithmetic: &'a dyn Arithmetic,
        config: &EngineConfig,
    ) -> Self {
        Evaluator {
            store,
            arithmetic,
            max_depth: config.max_depth.min(MAX_ALLOWED_DEPTH),
        }
    }

    /// Compute the value of a stored cell, folding errors into the value.
    pub fn compute(&self, cell: &CellRef) -> Value {
        let raw = self.store.get_raw(cell);
        let mut path = EvalPath::starting_at(cell);
        self.evaluate(&raw, &mut path).unwrap_or_else(Value::Error)
    }

    /// Evaluate formula text that is not stored in any cell.
    pub fn evaluate_detached(&self, text: &str) -> Value {
        self.evaluate(text, &mut EvalPath::detached())
            .unwrap_or_else(Value::Error)
    }

    /// Evaluate a raw value.
    ///
    /// Literals come back unchanged as [`Value::Text`]. Formulas have each
    /// reference resolved with the same `path`, so the cycle guard covers
    /// the whole nested chain. A cell leaves the path once its value is
    /// known, so repeated references to one cell in a formula are fine.
    pub fn evaluate(&self, raw: &str, path: &mut EvalPath) -> Result<Value, CellError> {
        let Some(body) = formula_body(raw) else {
            return Ok(Value::Text(raw.to_string()));
        };

        let mut expr = String::with_capacity(body.len());
        let mut last = 0;
        for token in references(body) {
            expr.push_str(&body[last..token.span.start]);
            last = token.span.end;

            let n = match &token.cell {
                Some(cell) => self.resolve(cell, path)?,
                None => 0.0,
            };
            expr.push_str(&float_literal(n));
        }
        expr.push_str(&body[last..]);

        match self.arithmetic.evaluate(&expr) {
            Ok(n) => Ok(Value::Number(n)),
            Err(e) => {
                tracing::debug!(expr = %expr, error = %e, "arithmetic failed");
                Err(CellError::Malformed)
            }
        }
    }

    /// Resolve one referenced cell to the number substituted for it.
    fn resolve(&self, cell: &CellRef, path: &mut EvalPath) -> Result<f64, CellError> {
        if path.contains(cell) {
            tracing::debug!(cell = %cell, depth = path.depth(), "circular reference");
            return Err(CellError::Circular);
        }
        if let Some(n) = path.resolved(cell) {
            return Ok(n);
        }
        if path.depth() >= self.max_depth {
            tracing::warn!(cell = %cell, max_depth = self.max_depth, "evaluation depth exceeded");
            return Err(CellError::DepthExceeded);
        }

        path.enter(cell);
        let raw = self.store.get_raw(cell);
        let result = self.evaluate(&raw, path);
        path.leave(cell);

        let n = match result {
            Ok(value) => to_numeric_or_zero(&value),
            Err(e) if e.aborts_chain() => return Err(e),
            Err(_) => 0.0,
        };
        path.resolved.insert(cell.clone(), n);
        Ok(n)
    }
}
