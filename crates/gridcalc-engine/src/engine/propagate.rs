//! Recalculation of the cells affected by an edit.
//!
//! A pass runs in two steps. First a worklist walk over the reverse
//! dependency graph collects every cell that transitively depends on the
//! changed cell, each at most once. Then the affected cells are ordered
//! so that a cell is recomputed after the affected cells it references
//! (Kahn's algorithm restricted to the affected set). Cells that never
//! become ready sit on, or behind, a dependency cycle; they are recomputed
//! last and reported in [`Recalc::cycles`].

use std::collections::{HashMap, HashSet, VecDeque};

use super::cell::Value;
use super::cell_ref::CellRef;
use super::eval::Evaluator;
use super::graph::DependencyGraph;

/// The outcome of one propagation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recalc {
    /// Recomputed cells with their new values, in recomputation order.
    pub updates: Vec<(CellRef, Value)>,
    /// Affected cells that could not be ordered because of a cycle.
    pub cycles: Vec<CellRef>,
}

impl Recalc {
    /// New value of `cell` if this pass recomputed it.
    pub fn value_of(&self, cell: &CellRef) -> Option<&Value> {
        self.updates
            .iter()
            .find(|(updated, _)| updated == cell)
            .map(|(_, value)| value)
    }

    /// Recomputed cells in order.
    pub fn cells(&self) -> impl Iterator<Item = &CellRef> {
        self.updates.iter().map(|(cell, _)| cell)
    }
}

/// Cells that transitively depend on `changed`, excluding `changed`
/// itself, in discovery order.
pub fn affected_cells(graph: &DependencyGraph, changed: &CellRef) -> Vec<CellRef> {
    let mut visited: HashSet<CellRef> = HashSet::new();
    visited.insert(changed.clone());
    let mut affected = Vec::new();
    let mut worklist = VecDeque::from([changed.clone()]);

    while let Some(cell) = worklist.pop_front() {
        for dependent in graph.dependents_of(&cell) {
            if visited.insert(dependent.clone()) {
                affected.push(dependent.clone());
                worklist.push_back(dependent);
            }
        }
    }
    affected
}

/// Recompute every cell affected by a change to `changed`.
///
/// Each affected cell is evaluated exactly once, with a fresh evaluation
/// path. Errors stay in the value of the cell that produced them.
pub fn propagate(graph: &DependencyGraph, evaluator: &Evaluator<'_>, changed: &CellRef) -> Recalc {
    let affected = affected_cells(graph, changed);
    if affected.is_empty() {
        return Recalc::default();
    }
    let members: HashSet<&CellRef> = affected.iter().collect();

    // Pending inputs per affected cell: the affected cells it references.
    let mut pending: HashMap<&CellRef, usize> = affected
        .iter()
        .map(|cell| {
            let inputs = graph
                .edges_of(cell)
                .map(|edges| edges.iter().filter(|e| members.contains(e)).count())
                .unwrap_or(0);
            (cell, inputs)
        })
        .collect();

    let mut ready: VecDeque<&CellRef> = affected
        .iter()
        .filter(|cell| pending.get(cell) == Some(&0))
        .collect();

    let mut recalc = Recalc::default();
    let mut done: HashSet<&CellRef> = HashSet::new();

    while let Some(cell) = ready.pop_front() {
        done.insert(cell);
        recalc.updates.push((cell.clone(), evaluator.compute(cell)));

        for dependent in graph.dependents_of(cell) {
            let Some(count) = pending.get_mut(&dependent) else {
                continue;
            };
            *count = count.saturating_sub(1);
            if *count == 0
                && let Some(member) = members.get(&dependent)
            {
                ready.push_back(*member);
            }
        }
    }

    for cell in affected.iter().filter(|cell| !done.contains(cell)) {
        recalc.cycles.push(cell.clone());
        recalc.updates.push((cell.clone(), evaluator.compute(cell)));
    }
    if !recalc.cycles.is_empty() {
        tracing::warn!(
            changed = %changed,
            cells = recalc.cycles.len(),
            "dependency cycle among recalculated cells"
        );
    }

    tracing::debug!(changed = %changed, updated = recalc.updates.len(), "propagation pass done");
    recalc
}
