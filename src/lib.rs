//! # Architecture Editor Core
//!
//! The headless core of an architecture-diagram editor: shape nodes
//! connected by editable edges, edited on a Slint canvas.
//!
//! ## Features
//!
//! - **Edge geometry** - Linear, orthogonal, bezier and straight edges from one
//!   polyline, with the matching drag handles
//! - **Stable control points** - Per-edge arena; a point's slot is its identity
//! - **Helper lines** - Alignment guides and snapping while dragging a node
//! - **Undo / redo** - Linear history of whole-graph snapshots
//! - **Clipboard** - Copy, cut and paste of the selected subgraph
//! - **Persistence shape** - `{nodes, edges}` JSON for save, load and autosave
//!
//! ## Quick Start
//!
//! ```ignore
//! use arch_editor_core::{Connection, DrawingSession, Editor, Node, Point, Size};
//!
//! let mut editor = Editor::new();
//! editor.add_node(Node::new("api", Point::new(0.0, 0.0), Size::new(120.0, 60.0)));
//! editor.add_node(Node::new("db", Point::new(300.0, 40.0), Size::new(120.0, 60.0)));
//!
//! let mut session = DrawingSession::new();
//! let edge = editor.connect(&mut session, Connection::new("api", "db"))?;
//! let rendered = editor.render_edge(&edge)?;
//! println!("{}", rendered.path);
//!
//! editor.undo();
//! ```
//!
//! ## Rust Helpers
//!
//! - [`compute_path`] / [`compute_control_points`] - Edge geometry
//! - [`compute_snap`] - Alignment guides for a dragged node
//! - [`History`] - Undo/redo stacks
//! - [`Clipboard`] - Copy / cut / paste
//! - [`EdgeRenderer`] - Rendered edges synced into Slint models
//! - [`EditorController`] - Callback factories for a Slint window

pub mod alignment;
pub mod clipboard;
pub mod config;
pub mod control_points;
pub mod controller;
pub mod editor;
pub mod error;
pub mod graph;
pub mod history;
pub mod links;
pub mod path;
pub mod session;
pub mod state;
pub mod storage;

pub use alignment::{compute_snap, Bounds, HelperLines, NodeGeometry, SnapPosition, SnapResult, DEFAULT_SNAP_THRESHOLD};
pub use clipboard::{Clipboard, ClipboardBuffer, PasteOutcome};
pub use config::EditorConfig;
pub use control_points::{ControlPoint, ControlPointId, ControlPointStore};
pub use controller::{EditorCommand, EditorController};
pub use editor::{Editor, NodePositionChange};
pub use error::{EditorError, Result};
pub use graph::{
    Connection, Edge, EdgeId, Graph, Node, NodeId, Size,
    // Connection validation
    ValidationError, ValidationResult,
};
pub use history::{GraphSnapshot, History};
pub use links::{edge_handles, render_edge, render_edges, EdgeRenderer, RenderedEdge};
pub use path::{
    compute_control_points, compute_control_points_with, compute_path, compute_path_with, drag_handles_with,
    insertion_handles, CubicBezier, CurveAlgorithm, PathOptions, PathPoint, Point, Side, Sides,
};
pub use session::{DrawingSession, Interaction};
pub use state::{Anchor, EdgeAnchors, HandleCache, HandleRole};
