//! The editing surface: one owner for the graph and everything that mutates it.
//!
//! Every discrete edit ends in a history snapshot. Continuous interactions
//! (node drags, control-point drags) mutate the graph on every frame and
//! snapshot once, when they end.

use crate::alignment::{compute_snap, Bounds, HelperLines, SnapResult};
use crate::clipboard::{Clipboard, PasteOutcome};
use crate::config::EditorConfig;
use crate::control_points::{ControlPoint, ControlPointId};
use crate::error::{EditorError, Result};
use crate::graph::{Connection, Edge, EdgeId, Graph, Node, NodeId, Size, ValidationResult};
use crate::history::{GraphSnapshot, History};
use crate::links::{render_edge, render_edges, RenderedEdge};
use crate::path::{CurveAlgorithm, Point};
use crate::session::{DrawingSession, Interaction};
use crate::state::HandleCache;
use std::collections::HashSet;

/// A node position reported by the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePositionChange {
    pub id: NodeId,
    pub position: Point,
    /// `true` while the user is dragging; only dragging changes snap.
    pub dragging: bool,
}

impl NodePositionChange {
    pub fn dragging(id: impl Into<NodeId>, position: Point) -> Self {
        Self { id: id.into(), position, dragging: true }
    }

    pub fn settled(id: impl Into<NodeId>, position: Point) -> Self {
        Self { id: id.into(), position, dragging: false }
    }
}

pub struct Editor {
    graph: Graph,
    history: History,
    clipboard: Clipboard,
    handles: HandleCache,
    helper_lines: HelperLines,
    interaction: Interaction,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Empty editor; the empty graph is the history baseline.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self::from_graph(Graph::new(), config)
    }

    /// Start from an existing graph, which becomes the history baseline.
    pub fn from_graph(graph: Graph, config: EditorConfig) -> Self {
        let history = History::new(&graph, config.history_limit);
        Self {
            graph,
            history,
            clipboard: Clipboard::new(),
            handles: HandleCache::new(),
            helper_lines: HelperLines::default(),
            interaction: Interaction::Idle,
            config,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn handles(&self) -> &HandleCache {
        &self.handles
    }

    pub fn handles_mut(&mut self) -> &mut HandleCache {
        &mut self.handles
    }

    /// Guide lines to draw for the current drag frame.
    pub fn helper_lines(&self) -> HelperLines {
        self.helper_lines
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Immutable copy of the current graph, for saving.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::new(self.graph.clone())
    }

    /// Replace the graph and restart history from it.
    pub fn load(&mut self, snapshot: &GraphSnapshot) {
        self.graph = snapshot.to_graph();
        self.history.reset(&self.graph);
        self.helper_lines = HelperLines::default();
        self.interaction = Interaction::Idle;
        tracing::debug!(nodes = self.graph.nodes.len(), edges = self.graph.edges.len(), "graph loaded");
    }

    fn commit(&mut self) {
        self.history.take_snapshot(&self.graph);
    }

    // === Nodes ===

    pub fn add_node(&mut self, node: Node) {
        self.graph.add_node(node);
        self.commit();
    }

    /// Size measured by the host after layout. Not an edit; no snapshot.
    pub fn set_node_size(&mut self, id: &NodeId, size: Size) -> Result<()> {
        let node = self.graph.node_mut(id).ok_or_else(|| unknown_node(id))?;
        node.measured = size;
        Ok(())
    }

    /// Delete the selected nodes (with their edges) and the selected edges.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove_selected(&mut self) -> bool {
        let nodes: HashSet<NodeId> = self.graph.selected_node_ids().into_iter().collect();
        let edges: HashSet<EdgeId> = self.graph.edges.iter().filter(|e| e.selected).map(|e| e.id.clone()).collect();
        if nodes.is_empty() && edges.is_empty() {
            return false;
        }
        // handle reports outlive their nodes; undo may bring them back
        self.graph.remove_nodes(&nodes);
        self.graph.remove_edges(&edges);
        self.commit();
        true
    }

    pub fn select_node(&mut self, id: &NodeId, shift_held: bool) {
        self.graph.handle_selection(id, shift_held);
    }

    pub fn select_edge(&mut self, id: &EdgeId) {
        self.graph.select_edge(id);
    }

    pub fn deselect_all(&mut self) {
        self.graph.deselect_all();
    }

    // === Node drags ===

    /// Apply position changes reported by the canvas.
    ///
    /// A single dragging change is snapped to the other nodes and the helper
    /// lines updated; anything else (multi-node drags, settled positions)
    /// is applied verbatim and clears the guides.
    pub fn apply_node_changes(&mut self, changes: &[NodePositionChange]) -> Result<()> {
        if let Some(change) = changes.iter().find(|c| self.graph.node(&c.id).is_none()) {
            return Err(unknown_node(&change.id));
        }

        let mut positions: Vec<Point> = changes.iter().map(|c| c.position).collect();
        match changes {
            [change] if change.dragging && self.config.snap_enabled => {
                let snap = self.snap_for(&change.id, change.position);
                positions[0] = snap.apply(change.position);
                self.helper_lines = snap.lines;
            }
            _ => self.helper_lines = HelperLines::default(),
        }

        for (change, position) in changes.iter().zip(positions) {
            if let Some(node) = self.graph.node_mut(&change.id) {
                node.position = position;
            }
        }

        let ids: Vec<NodeId> = changes.iter().filter(|c| c.dragging).map(|c| c.id.clone()).collect();
        if !ids.is_empty() {
            self.interaction = Interaction::DraggingNodes { ids };
        }
        Ok(())
    }

    /// Drag one node to `pending`; returns the position after snapping.
    pub fn drag_node(&mut self, id: &NodeId, pending: Point) -> Result<Point> {
        self.apply_node_changes(&[NodePositionChange::dragging(id.clone(), pending)])?;
        Ok(self.graph.node(id).map(|n| n.position).unwrap_or(pending))
    }

    fn snap_for(&self, id: &NodeId, pending: Point) -> SnapResult {
        let Some(node) = self.graph.node(id) else {
            return SnapResult::default();
        };
        let dragged = Bounds::new(pending.x, pending.y, node.measured.width, node.measured.height);
        let others = self.graph.nodes.iter().filter(|n| &n.id != id);
        compute_snap(&dragged, others, self.config.snap_threshold)
    }

    /// Finish a node drag: clear guides and snapshot the settled positions.
    ///
    /// Returns `false` if no node drag was in progress.
    pub fn end_drag(&mut self) -> bool {
        self.helper_lines = HelperLines::default();
        if !matches!(self.interaction, Interaction::DraggingNodes { .. }) {
            return false;
        }
        self.interaction = Interaction::Idle;
        self.commit();
        true
    }

    /// Abandon the current interaction without snapshotting.
    ///
    /// Positions already applied stay where they are; nothing is rolled back.
    pub fn cancel_drag(&mut self) {
        self.helper_lines = HelperLines::default();
        self.interaction = Interaction::Idle;
    }

    // === Edges ===

    /// Start drawing a connection from a node handle.
    pub fn begin_connection(
        &mut self,
        session: &mut DrawingSession,
        node: &NodeId,
        handle: Option<String>,
        start: Point,
    ) -> Result<()> {
        if self.graph.node(node).is_none() {
            return Err(unknown_node(node));
        }
        session.begin(node.clone(), handle, start);
        self.interaction = Interaction::Connecting { source: node.clone() };
        Ok(())
    }

    /// Add an edge for `connection`, ending the drawing session.
    ///
    /// The session is cleared whether or not the connection is accepted.
    pub fn connect(&mut self, session: &mut DrawingSession, connection: Connection) -> Result<EdgeId> {
        session.clear();
        self.interaction = Interaction::Idle;

        if let ValidationResult::Invalid(reason) = self.graph.validate_connection(&connection) {
            tracing::debug!(%reason, "connection rejected");
            return Err(EditorError::InvalidConnection(reason));
        }

        let id = EdgeId::fresh();
        let edge = Edge::new(id.clone(), connection.source, connection.target)
            .with_handles(connection.source_handle, connection.target_handle)
            .with_algorithm(self.config.default_algorithm);
        self.graph.add_edge(edge);
        self.commit();
        tracing::debug!(edge = %id, "connected");
        Ok(id)
    }

    pub fn set_edge_algorithm(&mut self, id: &EdgeId, algorithm: CurveAlgorithm) -> Result<()> {
        let edge = self.graph.edge_mut(id).ok_or_else(|| unknown_edge(id))?;
        if edge.algorithm == algorithm {
            return Ok(());
        }
        edge.algorithm = algorithm;
        self.commit();
        Ok(())
    }

    /// Path string and handles of one edge as the canvas should draw them.
    pub fn render_edge(&self, id: &EdgeId) -> Result<RenderedEdge> {
        let edge = self.graph.edge(id).ok_or_else(|| unknown_edge(id))?;
        Ok(render_edge(&self.graph, &self.handles, edge, &self.config.path_options()))
    }

    pub fn render_edges(&self) -> Vec<RenderedEdge> {
        render_edges(&self.graph, &self.handles, &self.config.path_options())
    }

    // === Control points ===

    /// Every drag handle of an edge in path order: stored points, synthesized
    /// points and, for linear edges, the segment midpoints.
    pub fn control_points(&self, id: &EdgeId) -> Result<Vec<ControlPoint>> {
        let edge = self.graph.edge(id).ok_or_else(|| unknown_edge(id))?;
        Ok(crate::links::edge_handles(&self.graph, &self.handles, edge, &self.config.path_options()))
    }

    pub fn insert_control_point(&mut self, edge: &EdgeId, index: usize, point: Point) -> Result<ControlPointId> {
        let target = self.graph.edge_mut(edge).ok_or_else(|| unknown_edge(edge))?;
        let id = target.points.insert(index, point);
        self.commit();
        Ok(id)
    }

    pub fn move_control_point(&mut self, edge: &EdgeId, point: ControlPointId, to: Point) -> Result<()> {
        let target = self.graph.edge_mut(edge).ok_or_else(|| unknown_edge(edge))?;
        if !target.points.move_point(point, to) {
            return Err(unknown_point(edge, point));
        }
        self.commit();
        Ok(())
    }

    pub fn remove_control_point(&mut self, edge: &EdgeId, point: ControlPointId) -> Result<ControlPoint> {
        let target = self.graph.edge_mut(edge).ok_or_else(|| unknown_edge(edge))?;
        let removed = target.points.remove(point).ok_or_else(|| unknown_point(edge, point))?;
        self.commit();
        Ok(removed)
    }

    /// Grab a control-point handle.
    ///
    /// Stored points are dragged as they are. A segment midpoint is promoted
    /// to a stored point inserted at its segment. Other synthesized handles
    /// cannot be dragged and yield `Ok(None)`.
    pub fn begin_control_point_drag(&mut self, edge: &EdgeId, handle: &ControlPoint) -> Result<Option<ControlPointId>> {
        let target = self.graph.edge_mut(edge).ok_or_else(|| unknown_edge(edge))?;
        let id = if handle.active {
            if !target.points.contains(handle.id) {
                return Err(unknown_point(edge, handle.id));
            }
            handle.id
        } else if let Some(index) = handle.insert_at {
            target.points.insert(index, handle.position())
        } else {
            return Ok(None);
        };
        self.interaction = Interaction::DraggingControlPoint { edge: edge.clone(), point: id };
        Ok(Some(id))
    }

    /// Move the grabbed control point. No snapshot.
    pub fn drag_control_point(&mut self, to: Point) -> Result<()> {
        let Interaction::DraggingControlPoint { edge, point } = &self.interaction else {
            return Err(EditorError::NoActiveDrag);
        };
        let target = self.graph.edge_mut(edge).ok_or_else(|| unknown_edge(edge))?;
        if !target.points.move_point(*point, to) {
            return Err(unknown_point(edge, *point));
        }
        Ok(())
    }

    /// Release the grabbed control point and snapshot.
    ///
    /// Returns `false` if no control-point drag was in progress.
    pub fn end_control_point_drag(&mut self) -> bool {
        if !matches!(self.interaction, Interaction::DraggingControlPoint { .. }) {
            return false;
        }
        self.interaction = Interaction::Idle;
        self.commit();
        true
    }

    // === History ===

    /// Returns `true` if the graph changed.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if the graph changed.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, snapshot: &GraphSnapshot) {
        self.graph = snapshot.to_graph();
        self.helper_lines = HelperLines::default();
        self.interaction = Interaction::Idle;
    }

    // === Clipboard ===

    /// Returns the number of nodes copied.
    pub fn copy(&mut self) -> usize {
        self.clipboard.copy(&self.graph)
    }

    /// Returns `true` if anything was cut.
    pub fn cut(&mut self) -> bool {
        if !self.clipboard.cut(&mut self.graph) {
            return false;
        }
        self.commit();
        true
    }

    pub fn paste(&mut self, cursor: Point) -> Option<PasteOutcome> {
        let outcome = self.clipboard.paste(&mut self.graph, cursor)?;
        self.commit();
        Some(outcome)
    }
}

fn unknown_node(id: &NodeId) -> EditorError {
    tracing::warn!(node = %id, "unknown node");
    EditorError::UnknownNode(id.clone())
}

fn unknown_edge(id: &EdgeId) -> EditorError {
    tracing::warn!(edge = %id, "unknown edge");
    EditorError::UnknownEdge(id.clone())
}

fn unknown_point(edge: &EdgeId, point: ControlPointId) -> EditorError {
    tracing::warn!(edge = %edge, point = %point, "unknown control point");
    EditorError::UnknownControlPoint { edge: edge.clone(), point }
}
