//! Raw cell text storage.
//!
//! The engine reads and writes raw values only through [`CellStore`].
//! Whatever sits behind it (a file, a database, an ownership check) is the
//! store's business; the engine only sees success or a [`StoreError`].

use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;

use super::cell_ref::CellRef;

/// Why a raw value could not be written.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store is read-only")]
    ReadOnly,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Access to the raw text of cells.
pub trait CellStore {
    /// Raw value of `cell`; empty when the cell was never written.
    fn get_raw(&self, cell: &CellRef) -> String;

    /// Persist a new raw value. Writing `""` resets the cell.
    fn set_raw(&mut self, cell: &CellRef, raw: &str) -> Result<(), StoreError>;

    /// Every non-empty cell with its raw value, in row-major order.
    fn cells(&self) -> Vec<(CellRef, String)>;
}

/// Thread-safe in-memory store. Clones share the same cells.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    cells: Arc<DashMap<CellRef, String>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses every write.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Seed a cell without going through the write path.
    pub fn insert(&self, cell: CellRef, raw: impl Into<String>) {
        let raw = raw.into();
        if raw.is_empty() {
            self.cells.remove(&cell);
        } else {
            self.cells.insert(cell, raw);
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl CellStore for MemoryStore {
    fn get_raw(&self, cell: &CellRef) -> String {
        self.cells
            .get(cell)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    fn set_raw(&mut self, cell: &CellRef, raw: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.insert(cell.clone(), raw);
        Ok(())
    }

    fn cells(&self) -> Vec<(CellRef, String)> {
        let mut cells: Vec<_> = self
            .cells
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        cells.sort();
        cells
    }
}
