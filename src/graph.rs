use crate::control_points::ControlPointStore;
use crate::path::{CurveAlgorithm, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// A fresh, collision-resistant id (UUID v4).
            pub fn fresh() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a node on the canvas.
    NodeId
);
string_id!(
    /// Identifier of an edge on the canvas.
    EdgeId
);

/// Size of a node as measured by the host after layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A shape node on the canvas.
///
/// `kind` and `data` are host payload (node type, icon source, title...) and
/// are carried through copy/paste and persistence untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub position: Point,
    #[serde(default)]
    pub measured: Size,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, position: Point, measured: Size) -> Self {
        Self {
            id: id.into(),
            kind: String::new(),
            position,
            measured,
            selected: false,
            data: serde_json::Value::Null,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// An editable edge between two nodes.
///
/// `points` holds only the user-placed control points; the anchors come
/// from the source/target nodes at render time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default)]
    pub algorithm: CurveAlgorithm,
    #[serde(default)]
    pub points: ControlPointStore,
    #[serde(default)]
    pub selected: bool,
}

impl Edge {
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            algorithm: CurveAlgorithm::Default,
            points: ControlPointStore::new(),
            selected: false,
        }
    }

    pub fn with_handles(mut self, source_handle: Option<String>, target_handle: Option<String>) -> Self {
        self.source_handle = source_handle;
        self.target_handle = target_handle;
        self
    }

    pub fn with_algorithm(mut self, algorithm: CurveAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_points<I>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        self.points = ControlPointStore::from_positions(points);
        self
    }
}

/// A request to connect two node handles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn with_handles(mut self, source_handle: Option<String>, target_handle: Option<String>) -> Self {
        self.source_handle = source_handle;
        self.target_handle = target_handle;
        self
    }
}

/// The node/edge graph edited on the canvas.
///
/// This is also the shape of history snapshots and of persisted diagrams.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    pub fn edge_mut(&mut self, id: &EdgeId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| &e.id == id)
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Remove nodes and every edge touching them.
    ///
    /// Returns the ids of the removed edges.
    pub fn remove_nodes(&mut self, ids: &HashSet<NodeId>) -> Vec<EdgeId> {
        self.nodes.retain(|n| !ids.contains(&n.id));
        let mut removed = Vec::new();
        self.edges.retain(|e| {
            let dangling = ids.contains(&e.source) || ids.contains(&e.target);
            if dangling {
                removed.push(e.id.clone());
            }
            !dangling
        });
        removed
    }

    /// Remove edges by id. Returns how many were removed.
    pub fn remove_edges(&mut self, ids: &HashSet<EdgeId>) -> usize {
        let before = self.edges.len();
        self.edges.retain(|e| !ids.contains(&e.id));
        before - self.edges.len()
    }

    /// Check if an edge with the same endpoints and handles already exists
    ///
    /// Prevents duplicate connections between the same handles. Direction matters.
    pub fn duplicate_edge_exists(&self, connection: &Connection) -> bool {
        self.edges.iter().any(|e| {
            e.source == connection.source
                && e.target == connection.target
                && e.source_handle == connection.source_handle
                && e.target_handle == connection.target_handle
        })
    }

    /// Check whether `connection` may be added as a new edge.
    pub fn validate_connection(&self, connection: &Connection) -> ValidationResult {
        if self.node(&connection.source).is_none() {
            return ValidationResult::Invalid(ValidationError::NodeNotFound(connection.source.clone()));
        }
        if self.node(&connection.target).is_none() {
            return ValidationResult::Invalid(ValidationError::NodeNotFound(connection.target.clone()));
        }
        if connection.source == connection.target && connection.source_handle == connection.target_handle {
            return ValidationResult::Invalid(ValidationError::SameHandle);
        }
        if self.duplicate_edge_exists(connection) {
            return ValidationResult::Invalid(ValidationError::DuplicateEdge);
        }
        ValidationResult::Valid
    }

    pub fn selected_node_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id.clone())
            .collect()
    }

    pub fn deselect_all(&mut self) {
        for node in &mut self.nodes {
            node.selected = false;
        }
        for edge in &mut self.edges {
            edge.selected = false;
        }
    }

    /// Handle a click on a node based on interaction modifiers
    ///
    /// Shift toggles the node in or out of the selection; a plain click
    /// replaces the selection with just this node (and deselects edges).
    pub fn handle_selection(&mut self, id: &NodeId, shift_held: bool) {
        if shift_held {
            if let Some(node) = self.node_mut(id) {
                node.selected = !node.selected;
            }
            return;
        }
        if self.node(id).is_none() {
            return;
        }
        self.deselect_all();
        if let Some(node) = self.node_mut(id) {
            node.selected = true;
        }
    }

    /// Select an edge, deselecting everything else.
    pub fn select_edge(&mut self, id: &EdgeId) {
        if self.edge(id).is_none() {
            return;
        }
        self.deselect_all();
        if let Some(edge) = self.edge_mut(id) {
            edge.selected = true;
        }
    }
}

// ============================================================================
// Connection Validation
// ============================================================================

/// Result of connection validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Connection is valid
    Valid,
    /// Connection is invalid with a reason
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Check if the result is valid
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Reasons why a connection was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Endpoint node does not exist in the graph
    NodeNotFound(NodeId),
    /// Cannot connect a handle to itself
    SameHandle,
    /// An edge between these handles already exists
    DuplicateEdge,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "Node {} not found", id),
            Self::SameHandle => write!(f, "Cannot connect a handle to itself"),
            Self::DuplicateEdge => write!(f, "Edge already exists"),
        }
    }
}
