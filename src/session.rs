//! Transient interaction state of the canvas.

use crate::control_points::ControlPointId;
use crate::graph::{EdgeId, NodeId};
use crate::path::Point;

/// What the pointer is currently doing.
///
/// Every state returns to `Idle`; the history snapshot is taken on that
/// transition, not while the interaction is in progress.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    DraggingNodes { ids: Vec<NodeId> },
    DraggingControlPoint { edge: EdgeId, point: ControlPointId },
    Connecting { source: NodeId },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }
}

/// In-progress connection line drawn while the user drags from a handle.
///
/// Owned by the host and handed to [`Editor::connect`](crate::Editor::connect),
/// which clears it once the edge exists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawingSession {
    source: Option<(NodeId, Option<String>)>,
    line: Vec<Point>,
}

impl DrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a connection line from `handle` on `node` at `start`.
    pub fn begin(&mut self, node: NodeId, handle: Option<String>, start: Point) {
        self.source = Some((node, handle));
        self.line.clear();
        self.line.push(start);
    }

    /// Append a pointer position. Ignored when no line was started.
    pub fn extend(&mut self, point: Point) {
        if self.source.is_some() {
            self.line.push(point);
        }
    }

    pub fn clear(&mut self) {
        self.source = None;
        self.line.clear();
    }

    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<&NodeId> {
        self.source.as_ref().map(|(node, _)| node)
    }

    pub fn source_handle(&self) -> Option<&str> {
        self.source.as_ref().and_then(|(_, handle)| handle.as_deref())
    }

    pub fn line(&self) -> &[Point] {
        &self.line
    }
}
