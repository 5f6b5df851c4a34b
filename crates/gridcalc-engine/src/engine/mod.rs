//! Recalculation engine API.
//!
//! This module provides everything needed to keep computed cell values in
//! step with raw cell text:
//!
//! - [`CellRef`], [`letters_to_index`], [`index_to_letters`] - Cell identifiers (A1 notation ↔ row/col indices)
//! - [`references`], [`referenced_cells`] - Reference tokens in formula text
//! - [`DependencyGraph`] - Which cells reference which
//! - [`Evaluator`], [`EvalPath`] - Formula evaluation with cycle detection
//! - [`Arithmetic`], [`RhaiArithmetic`] - Evaluation of substituted arithmetic
//! - [`propagate`] - Recalculation of everything affected by an edit
//! - [`CellStore`], [`MemoryStore`] - Raw cell text storage
//! - [`Value`], [`CellError`] - Computed values and error markers

mod arith;
mod cell;
mod cell_ref;
mod config;
mod deps;
mod eval;
mod format;
mod graph;
mod propagate;
mod store;

pub use arith::{ArithError, Arithmetic, RhaiArithmetic, create_engine, to_rhai_expression};
pub use cell::{CellError, Value, formula_body, to_numeric_or_zero};
pub use cell_ref::{CellRef, index_to_letters, letters_to_index};
pub use config::{ConfigError, DEFAULT_MAX_DEPTH, EngineConfig, MAX_ALLOWED_DEPTH};
pub use deps::{RefToken, referenced_cells, references};
pub use eval::{EvalPath, Evaluator};
pub use format::{float_literal, format_number};
pub use graph::DependencyGraph;
pub use propagate::{Recalc, affected_cells, propagate};
pub use store::{CellStore, MemoryStore, StoreError};
