//! gridcalc-core - Sheet model, edit pipeline and storage.

pub mod config;
pub mod error;
pub mod sheet;
pub mod storage;

pub use config::Config;
pub use error::{GridcalcError, Result};
pub use sheet::Sheet;
pub use storage::FileStore;

pub use gridcalc_engine::engine::{CellRef, MemoryStore, Recalc, Value};
