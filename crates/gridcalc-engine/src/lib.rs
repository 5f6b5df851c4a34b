//! gridcalc_engine - Cell recalculation engine.

pub mod engine;
