//! A [`CellStore`] that persists raw cell text to a .grd file.

use gridcalc_engine::engine::{CellRef, CellStore, StoreError};
use std::fs;
use std::path::{Path, PathBuf};

use super::parser::{RawCells, parse_grd};
use super::writer::write_grd_content;
use crate::error::Result;

/// Raw cells held in memory and written back to disk on every change.
///
/// A write only lands in memory after the file has been replaced, so a
/// failed write leaves the store exactly as it was.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    cells: RawCells,
    read_only: bool,
}

impl FileStore {
    /// Open a store at `path`. A missing file is an empty sheet; it is
    /// created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cells = if path.exists() {
            parse_grd(&path)?
        } else {
            RawCells::new()
        };
        tracing::debug!(path = %path.display(), cells = cells.len(), "opened sheet file");
        Ok(FileStore {
            path,
            cells,
            read_only: false,
        })
    }

    /// Refuse all writes (the sheet belongs to someone else).
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, cells: &RawCells) -> std::io::Result<()> {
        let tmp = self.path.with_extension("grd.tmp");
        fs::write(&tmp, write_grd_content(cells))?;
        fs::rename(&tmp, &self.path)
    }
}

impl CellStore for FileStore {
    fn get_raw(&self, cell: &CellRef) -> String {
        self.cells.get(cell).cloned().unwrap_or_default()
    }

    fn set_raw(&mut self, cell: &CellRef, raw: &str) -> std::result::Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }

        let mut next = self.cells.clone();
        if raw.is_empty() {
            next.remove(cell);
        } else {
            next.insert(cell.clone(), raw.to_string());
        }

        self.persist(&next)?;
        self.cells = next;
        Ok(())
    }

    fn cells(&self) -> Vec<(CellRef, String)> {
        self.cells
            .iter()
            .map(|(cell, raw)| (cell.clone(), raw.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn r(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("new.grd")).unwrap();
        assert!(store.cells().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_writes_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.grd");

        let mut store = FileStore::open(&path).unwrap();
        store.set_raw(&r("A1"), "10").unwrap();
        store.set_raw(&r("B1"), "=A1*2").unwrap();
        store.set_raw(&r("A1"), "").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.cells(), vec![(r("B1"), "=A1*2".to_string())]);
        assert_eq!(reopened.get_raw(&r("A1")), "");
    }

    #[test]
    fn test_read_only_rejects_and_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.grd");
        fs::write(&path, "A1: 1\n").unwrap();

        let mut store = FileStore::open(&path).unwrap().read_only();
        let err = store.set_raw(&r("A1"), "2").unwrap_err();
        assert!(matches!(err, StoreError::ReadOnly));
        assert_eq!(store.get_raw(&r("A1")), "1");
        assert_eq!(fs::read_to_string(&path).unwrap(), "A1: 1\n");
    }

    #[test]
    fn test_failed_write_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join("sheet.grd");

        let mut store = FileStore::open(&path).unwrap();
        let err = store.set_raw(&r("A1"), "2").unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(store.get_raw(&r("A1")), "");
    }
}
