use crate::graph::{Edge, Graph, Node, NodeId};
use crate::path::{Point, Side, Sides};
use std::collections::HashMap;

/// Handle position reported by the host, relative to its node's top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StoredHandle {
    pub side: Side,
    pub rel_x: f32,
    pub rel_y: f32,
}

/// Which end of an edge a handle is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleRole {
    Source,
    Target,
}

impl HandleRole {
    /// Side assumed when neither a report nor the handle id names one.
    pub fn default_side(self) -> Side {
        match self {
            HandleRole::Source => Side::Right,
            HandleRole::Target => Side::Left,
        }
    }
}

/// Resolved anchor of an edge end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub position: Point,
    pub side: Side,
}

/// Resolved anchors of both edge ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeAnchors {
    pub source: Anchor,
    pub target: Anchor,
}

impl EdgeAnchors {
    pub fn sides(&self) -> Sides {
        Sides::new(self.source.side, self.target.side)
    }
}

/// Cache of connection-handle geometry reported by the host canvas.
///
/// Node rects come from the graph itself; only handle offsets and sides are
/// cached here. A handle the host never reported falls back to the midpoint
/// of the node side named by its id (`"right"`, `"top"`, ...) or, failing
/// that, the default side for its role.
///
/// Entries outlive their nodes: a node brought back by undo anchors its
/// edges where it did before it was removed.
#[derive(Clone, Debug, Default)]
pub struct HandleCache {
    handles: HashMap<(NodeId, String), StoredHandle>,
}

impl HandleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard handler for handle position reports from Slint
    pub fn handle_report(&mut self, node: NodeId, handle: impl Into<String>, side: Side, rel_x: f32, rel_y: f32) {
        self.handles.insert((node, handle.into()), StoredHandle { side, rel_x, rel_y });
    }

    pub fn get(&self, node: &NodeId, handle: &str) -> Option<&StoredHandle> {
        self.handles.get(&(node.clone(), handle.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Absolute anchor of `handle` on `node`.
    pub fn anchor(&self, node: &Node, handle: Option<&str>, role: HandleRole) -> Anchor {
        if let Some(stored) = handle.and_then(|h| self.get(&node.id, h)) {
            return Anchor {
                position: Point::new(node.position.x + stored.rel_x, node.position.y + stored.rel_y),
                side: stored.side,
            };
        }
        let side = handle
            .and_then(|h| h.parse::<Side>().ok())
            .unwrap_or_else(|| role.default_side());
        Anchor { position: side_midpoint(node, side), side }
    }

    /// Anchors of both ends of `edge`, or `None` if an endpoint node is missing.
    pub fn edge_anchors(&self, graph: &Graph, edge: &Edge) -> Option<EdgeAnchors> {
        let source = graph.node(&edge.source)?;
        let target = graph.node(&edge.target)?;
        Some(EdgeAnchors {
            source: self.anchor(source, edge.source_handle.as_deref(), HandleRole::Source),
            target: self.anchor(target, edge.target_handle.as_deref(), HandleRole::Target),
        })
    }
}

fn side_midpoint(node: &Node, side: Side) -> Point {
    let Point { x, y } = node.position;
    let (w, h) = (node.measured.width, node.measured.height);
    match side {
        Side::Top => Point::new(x + w / 2.0, y),
        Side::Right => Point::new(x + w, y + h / 2.0),
        Side::Bottom => Point::new(x + w / 2.0, y + h),
        Side::Left => Point::new(x, y + h / 2.0),
    }
}
