//! Linear undo/redo over whole-graph snapshots.
//!
//! `past` always holds at least the baseline. Undo moves the newest past
//! entry onto `future` and restores the entry below it; redo moves it back.
//! Any new snapshot discards the redo branch.

use crate::graph::Graph;
use std::collections::VecDeque;
use std::ops::Deref;
use std::rc::Rc;

/// Immutable copy of the graph at one point in time.
///
/// Cheap to clone; the past and future stacks share the same allocation.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphSnapshot(Rc<Graph>);

impl GraphSnapshot {
    pub fn new(graph: Graph) -> Self {
        Self(Rc::new(graph))
    }

    /// An owned, mutable copy of the snapshotted graph.
    pub fn to_graph(&self) -> Graph {
        (*self.0).clone()
    }

    pub fn ptr_eq(a: &GraphSnapshot, b: &GraphSnapshot) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl Deref for GraphSnapshot {
    type Target = Graph;

    fn deref(&self) -> &Graph {
        &self.0
    }
}

impl From<Graph> for GraphSnapshot {
    fn from(graph: Graph) -> Self {
        Self::new(graph)
    }
}

/// Past/future snapshot stacks.
#[derive(Clone, Debug)]
pub struct History {
    past: VecDeque<GraphSnapshot>,
    future: Vec<GraphSnapshot>,
    limit: usize,
}

impl History {
    /// Create a history whose floor is `baseline`.
    ///
    /// `limit` caps the past stack (baseline included) and is raised to 2 so
    /// one undo step always fits.
    pub fn new(baseline: &Graph, limit: usize) -> Self {
        let mut past = VecDeque::new();
        past.push_back(GraphSnapshot::new(baseline.clone()));
        Self { past, future: Vec::new(), limit: limit.max(2) }
    }

    /// Record `graph` as the newest state and discard the redo branch.
    pub fn take_snapshot(&mut self, graph: &Graph) {
        self.past.push_back(GraphSnapshot::new(graph.clone()));
        self.future.clear();
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        tracing::debug!(past = self.past.len(), "snapshot taken");
    }

    /// Step back one snapshot. Returns the state to restore, or `None` when
    /// only the baseline is left.
    pub fn undo(&mut self) -> Option<GraphSnapshot> {
        if self.past.len() < 2 {
            return None;
        }
        let undone = self.past.pop_back()?;
        self.future.push(undone);
        tracing::debug!(past = self.past.len(), future = self.future.len(), "undo");
        self.past.back().cloned()
    }

    /// Re-apply the most recently undone snapshot.
    pub fn redo(&mut self) -> Option<GraphSnapshot> {
        let redone = self.future.pop()?;
        self.past.push_back(redone.clone());
        tracing::debug!(past = self.past.len(), future = self.future.len(), "redo");
        Some(redone)
    }

    /// Drop everything and start over from `baseline`.
    pub fn reset(&mut self, baseline: &Graph) {
        self.past.clear();
        self.future.clear();
        self.past.push_back(GraphSnapshot::new(baseline.clone()));
    }

    /// The state the graph should currently be in.
    pub fn current(&self) -> Option<&GraphSnapshot> {
        self.past.back()
    }

    pub fn can_undo(&self) -> bool {
        self.past.len() >= 2
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
