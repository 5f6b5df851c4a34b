//! Sheet state and the edit pipeline (UI-agnostic).

mod ops;
mod state;

pub use state::Sheet;
