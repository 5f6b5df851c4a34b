use super::Sheet;
use crate::error::{GridcalcError, Result};
use gridcalc_engine::engine::{CellRef, CellStore, Recalc, Value, propagate};

impl<S: CellStore> Sheet<S> {
    /// Write a cell's raw text and recalculate everything it affects.
    ///
    /// The store write happens first. If it fails nothing else changes and
    /// the error is returned. Otherwise the cell's dependency edges are
    /// replaced, the cell is computed, and its dependents are recomputed.
    /// The returned [`Recalc`] lists the edited cell first, then every
    /// recomputed dependent.
    pub fn set_cell(&mut self, cell: CellRef, raw: &str) -> Result<Recalc> {
        if let Err(e) = self.store.set_raw(&cell, raw) {
            tracing::warn!(cell = %cell, error = %e, "cell write rejected");
            return Err(GridcalcError::Store(e));
        }

        self.graph.set_edges(&cell, raw);

        let (value, mut recalc) = {
            let evaluator = self.evaluator();
            let value = evaluator.compute(&cell);
            let recalc = propagate(&self.graph, &evaluator, &cell);
            (value, recalc)
        };

        self.cache(&cell, &value);
        for (dependent, value) in &recalc.updates {
            self.cache(dependent, value);
        }
        recalc.updates.insert(0, (cell, value));
        Ok(recalc)
    }

    /// Set a cell from `REF` text, e.g. `set_cell_by_name("B2", "=A1")`.
    pub fn set_cell_by_name(&mut self, name: &str, raw: &str) -> Result<Recalc> {
        let cell = CellRef::from_str(name)
            .ok_or_else(|| GridcalcError::InvalidCellRef(name.to_string()))?;
        self.set_cell(cell, raw)
    }

    /// Reset a cell to empty.
    pub fn clear_cell(&mut self, cell: CellRef) -> Result<Recalc> {
        self.set_cell(cell, "")
    }

    fn cache(&mut self, cell: &CellRef, value: &Value) {
        if self.store.get_raw(cell).is_empty() {
            self.values.remove(cell);
        } else {
            self.values.insert(cell.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::GridcalcError;
    use crate::sheet::Sheet;
    use gridcalc_engine::engine::{CellError, CellRef, EngineConfig, MemoryStore, Value};
    use pretty_assertions::assert_eq;

    fn r(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    fn sheet() -> Sheet<MemoryStore> {
        Sheet::new(MemoryStore::new(), EngineConfig::default())
    }

    #[test]
    fn test_set_literal_and_formula() {
        let mut sheet = sheet();
        sheet.set_cell(r("A1"), "10").unwrap();
        let recalc = sheet.set_cell(r("B1"), "=A1*2").unwrap();
        assert_eq!(recalc.updates, vec![(r("B1"), Value::Number(20.0))]);
        assert_eq!(sheet.display(&r("A1")), "10");
        assert_eq!(sheet.display(&r("B1")), "20");
    }

    #[test]
    fn test_edit_propagates() {
        let mut sheet = sheet();
        sheet.set_cell(r("A1"), "10").unwrap();
        sheet.set_cell(r("B1"), "=A1*2").unwrap();
        sheet.set_cell(r("C1"), "=B1+1").unwrap();

        let recalc = sheet.set_cell(r("A1"), "10").unwrap();
        let order: Vec<_> = recalc.cells().cloned().collect();
        assert_eq!(order, vec![r("A1"), r("B1"), r("C1")]);
        assert_eq!(sheet.value(&r("B1")), Value::Number(20.0));
        assert_eq!(sheet.value(&r("C1")), Value::Number(21.0));

        sheet.set_cell(r("A1"), "1.5").unwrap();
        assert_eq!(sheet.display(&r("C1")), "4");
    }

    #[test]
    fn test_store_failure_changes_nothing() {
        let store = MemoryStore::new();
        store.insert(r("A1"), "1");
        store.insert(r("B1"), "=A1+1");
        let mut sheet = Sheet::new(store.read_only(), EngineConfig::default());
        assert_eq!(sheet.display(&r("B1")), "2");

        let err = sheet.set_cell(r("A1"), "=C1").unwrap_err();
        assert!(matches!(err, GridcalcError::Store(_)));
        assert_eq!(sheet.raw(&r("A1")), "1");
        assert_eq!(sheet.display(&r("A1")), "1");
        assert_eq!(sheet.display(&r("B1")), "2");
        assert!(sheet.dependents_of(&r("C1")).is_empty());
    }

    #[test]
    fn test_cycles_show_marker_and_recover() {
        let mut sheet = sheet();
        sheet.set_cell(r("A1"), "=B1").unwrap();
        let recalc = sheet.set_cell(r("B1"), "=A1").unwrap();
        assert_eq!(sheet.value(&r("B1")), Value::Error(CellError::Circular));
        assert_eq!(sheet.value(&r("A1")), Value::Error(CellError::Circular));
        assert_eq!(recalc.updates.len(), 2);

        sheet.set_cell(r("B1"), "3").unwrap();
        assert_eq!(sheet.value(&r("A1")), Value::Number(3.0));
        assert_eq!(sheet.display(&r("B1")), "3");
    }

    #[test]
    fn test_clear_cell() {
        let mut sheet = sheet();
        sheet.set_cell(r("A1"), "4").unwrap();
        sheet.set_cell(r("B1"), "=A1*A1").unwrap();
        let recalc = sheet.clear_cell(r("A1")).unwrap();
        assert_eq!(recalc.value_of(&r("A1")), Some(&Value::empty()));
        assert_eq!(sheet.value(&r("B1")), Value::Number(0.0));
        assert_eq!(sheet.computed_cells(), vec![(r("B1"), Value::Number(0.0))]);
    }

    #[test]
    fn test_set_cell_by_name() {
        let mut sheet = sheet();
        sheet.set_cell_by_name("c3", "=2^3").unwrap();
        assert_eq!(sheet.display(&r("C3")), "8");
        assert!(matches!(
            sheet.set_cell_by_name("3C", "1"),
            Err(GridcalcError::InvalidCellRef(_))
        ));
    }

    #[test]
    fn test_load_computes_existing_cells() {
        let store = MemoryStore::new();
        store.insert(r("A1"), "2");
        store.insert(r("A2"), "=A1*10");
        store.insert(r("A3"), "=A2 +");
        let sheet = Sheet::new(store, EngineConfig::default());
        assert_eq!(sheet.display(&r("A2")), "20");
        assert_eq!(sheet.display(&r("A3")), "#ERR");
        assert_eq!(sheet.dependents_of(&r("A1")), vec![r("A2")]);
    }

    #[test]
    fn test_evaluate_formula() {
        let mut sheet = sheet();
        sheet.set_cell(r("A1"), "6").unwrap();
        assert_eq!(sheet.evaluate_formula("=A1/4"), Value::Number(1.5));
        assert_eq!(sheet.evaluate_formula("plain"), Value::Text("plain".into()));
        assert!(sheet.computed_cells().len() == 1);
    }

    #[test]
    fn test_formula_depth_matches_stored_cell() {
        let store = MemoryStore::new();
        store.insert(r("A1"), "=A2+1");
        store.insert(r("A2"), "=A3+1");
        store.insert(r("A3"), "1");
        let mut sheet = Sheet::new(store, EngineConfig { max_depth: 3 });
        sheet.set_cell(r("B1"), "=A1").unwrap();
        assert_eq!(sheet.value(&r("B1")), Value::Error(CellError::DepthExceeded));
        assert_eq!(
            sheet.evaluate_formula("=A1"),
            Value::Error(CellError::DepthExceeded)
        );
    }

    #[test]
    fn test_shared_chain_loads_and_edits() {
        let store = MemoryStore::new();
        store.insert(r("A1"), "1");
        for row in 2..=40 {
            store.insert(CellRef::new(0, row - 1), format!("=A{}+A{}", row - 1, row - 1));
        }
        let mut sheet = Sheet::new(store, EngineConfig::default());
        assert_eq!(sheet.value(&r("A40")), Value::Number(2f64.powi(39)));

        let recalc = sheet.set_cell(r("A1"), "2").unwrap();
        assert_eq!(recalc.updates.len(), 40);
        assert_eq!(sheet.value(&r("A40")), Value::Number(2f64.powi(40)));
    }
}
