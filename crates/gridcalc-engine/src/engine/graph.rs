//! Dependency bookkeeping between cells.
//!
//! Each formula cell maps to the set of cells its text mentions directly.
//! A reverse index (cell -> cells that reference it) is kept in step so
//! that finding dependents does not need a scan of every cell.
//!
//! The graph does no cycle detection; cycles are found by the evaluator
//! and tolerated by the propagator.

use std::collections::{BTreeSet, HashMap};

use super::cell_ref::CellRef;
use super::deps::referenced_cells;
use super::formula_body;

/// Forward and reverse dependency edges for one sheet.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    /// cell -> cells it references
    edges: HashMap<CellRef, BTreeSet<CellRef>>,
    /// cell -> cells that reference it
    dependents: HashMap<CellRef, BTreeSet<CellRef>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the edge set of `cell` from its newly written raw value.
    ///
    /// Literals (anything not starting with `=`) have no edges.
    pub fn set_edges(&mut self, cell: &CellRef, raw: &str) {
        let new_edges = match formula_body(raw) {
            Some(body) => referenced_cells(body),
            None => BTreeSet::new(),
        };

        if let Some(old_edges) = self.edges.remove(cell) {
            for target in &old_edges {
                if let Some(back) = self.dependents.get_mut(target) {
                    back.remove(cell);
                    if back.is_empty() {
                        self.dependents.remove(target);
                    }
                }
            }
        }

        if new_edges.is_empty() {
            return;
        }
        for target in &new_edges {
            self.dependents
                .entry(target.clone())
                .or_default()
                .insert(cell.clone());
        }
        tracing::debug!(cell = %cell, edges = new_edges.len(), "dependency edges updated");
        self.edges.insert(cell.clone(), new_edges);
    }

    /// Cells whose formulas reference `cell` directly, in row-major order.
    pub fn dependents_of(&self, cell: &CellRef) -> Vec<CellRef> {
        self.dependents
            .get(cell)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Cells referenced directly by the formula in `cell`.
    pub fn edges_of(&self, cell: &CellRef) -> Option<&BTreeSet<CellRef>> {
        self.edges.get(cell)
    }

    /// Number of cells with at least one outgoing edge.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.dependents.clear();
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
    fn test_literal_has_no_edges() {
        let mut graph = DependencyGraph::new();
        graph.set_edges(&r("A1"), "B1+C1");
        assert!(graph.edges_of(&r("A1")).is_none());
        assert!(graph.dependents_of(&r("B1")).is_empty());
    }

    #[test]
    fn test_formula_edges_are_distinct() {
        let mut graph = DependencyGraph::new();
        graph.set_edges(&r("A1"), "=B1+B1*c1");
        let edges: Vec<_> = graph.edges_of(&r("A1")).unwrap().iter().cloned().collect();
        assert_eq!(edges, vec![r("B1"), r("C1")]);
    }

    #[test]
    fn test_edge_set_replacement() {
        let mut graph = DependencyGraph::new();
        graph.set_edges(&r("A1"), "=B1+C1");
        graph.set_edges(&r("A1"), "=D1");
        assert!(!graph.dependents_of(&r("B1")).contains(&r("A1")));
        assert!(!graph.dependents_of(&r("C1")).contains(&r("A1")));
        assert_eq!(graph.dependents_of(&r("D1")), vec![r("A1")]);
    }

    #[test]
    fn test_reset_to_empty_clears_edges() {
        let mut graph = DependencyGraph::new();
        graph.set_edges(&r("A1"), "=B1");
        graph.set_edges(&r("A1"), "");
        assert!(graph.is_empty());
        assert!(graph.dependents_of(&r("B1")).is_empty());
    }

    #[test]
    fn test_dependents_are_row_major() {
        let mut graph = DependencyGraph::new();
        graph.set_edges(&r("B2"), "=A1");
        graph.set_edges(&r("C1"), "=A1");
        graph.set_edges(&r("A2"), "=A1");
        assert_eq!(graph.dependents_of(&r("A1")), vec![r("C1"), r("A2"), r("B2")]);
    }

    #[test]
    fn test_self_reference_is_recorded() {
        let mut graph = DependencyGraph::new();
        graph.set_edges(&r("A1"), "=A1+1");
        assert_eq!(graph.dependents_of(&r("A1")), vec![r("A1")]);
    }
}
