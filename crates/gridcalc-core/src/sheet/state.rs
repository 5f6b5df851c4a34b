use gridcalc_engine::engine::{
    Arithmetic, CellRef, CellStore, DependencyGraph, EngineConfig, Evaluator, RhaiArithmetic,
    Value,
};
use std::collections::HashMap;

/// One sheet: raw text in a [`CellStore`], plus the dependency graph and
/// the computed values derived from it.
pub struct Sheet<S: CellStore> {
    /// Raw cell text; the source of truth
    pub(crate) store: S,
    /// Formula references between cells
    pub(crate) graph: DependencyGraph,
    /// Computed values of non-empty cells
    pub(crate) values: HashMap<CellRef, Value>,
    pub(crate) arithmetic: Box<dyn Arithmetic>,
    pub(crate) config: EngineConfig,
}

impl<S: CellStore> Sheet<S> {
    /// Create a sheet over `store` and compute every stored cell.
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self::with_arithmetic(store, config, Box::new(RhaiArithmetic::new()))
    }

    /// Create a sheet that evaluates arithmetic with `arithmetic`.
    pub fn with_arithmetic(
        store: S,
        config: EngineConfig,
        arithmetic: Box<dyn Arithmetic>,
    ) -> Self {
        let mut sheet = Sheet {
            store,
            graph: DependencyGraph::new(),
            values: HashMap::new(),
            arithmetic,
            config,
        };
        sheet.load();
        sheet
    }

    /// Rebuild the dependency graph and every computed value from the store.
    pub fn load(&mut self) {
        let cells = self.store.cells();
        self.graph.clear();
        for (cell, raw) in &cells {
            self.graph.set_edges(cell, raw);
        }

        let evaluator = self.evaluator();
        let values: HashMap<CellRef, Value> = cells
            .iter()
            .map(|(cell, _)| (cell.clone(), evaluator.compute(cell)))
            .collect();
        self.values = values;
        tracing::debug!(cells = self.values.len(), formulas = self.graph.len(), "sheet loaded");
    }

    pub(crate) fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.store, self.arithmetic.as_ref(), &self.config)
    }

    /// Raw text of a cell.
    pub fn raw(&self, cell: &CellRef) -> String {
        self.store.get_raw(cell)
    }

    /// Cached computed value of a cell.
    pub fn value(&self, cell: &CellRef) -> Value {
        self.values.get(cell).cloned().unwrap_or_default()
    }

    /// Display string of a cell's computed value.
    pub fn display(&self, cell: &CellRef) -> String {
        self.value(cell).to_string()
    }

    /// Cells whose formulas reference `cell` directly.
    pub fn dependents_of(&self, cell: &CellRef) -> Vec<CellRef> {
        self.graph.dependents_of(cell)
    }

    /// Non-empty cells with their computed values, in row-major order.
    pub fn computed_cells(&self) -> Vec<(CellRef, Value)> {
        let mut cells: Vec<_> = self
            .values
            .iter()
            .map(|(cell, value)| (cell.clone(), value.clone()))
            .collect();
        cells.sort_by(|a, b| a.0.cmp(&b.0));
        cells
    }

    /// Evaluate formula text against the sheet without storing it.
    ///
    /// The text gets the same depth budget it would have in a cell.
    pub fn evaluate_formula(&self, text: &str) -> Value {
        self.evaluator().evaluate_detached(text)
    }
}
