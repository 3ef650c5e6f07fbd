use crate::control_points::ControlPointId;
use crate::graph::{EdgeId, NodeId, ValidationError};

pub type Result<T> = std::result::Result<T, EditorError>;

/// Contract violations by the host layer.
///
/// Geometry and history never fail; these only come out of mutation calls
/// that name something the graph does not contain.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("unknown edge `{0}`")]
    UnknownEdge(EdgeId),

    #[error("unknown node `{0}`")]
    UnknownNode(NodeId),

    #[error("edge `{edge}` has no control point `{point}`")]
    UnknownControlPoint { edge: EdgeId, point: ControlPointId },

    #[error("connection rejected: {0}")]
    InvalidConnection(ValidationError),

    #[error("no control-point drag in progress")]
    NoActiveDrag,

    #[error("no connection is being drawn")]
    NoActiveConnection,

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
