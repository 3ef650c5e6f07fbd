//! High-level controller wiring the editor to a Slint canvas.
//!
//! The [`EditorController`] owns the [`Editor`], the [`EdgeRenderer`], the
//! in-progress [`DrawingSession`] and the last known cursor position, and
//! hands out callbacks for the window.
//!
//! # Example
//!
//! ```ignore
//! use arch_editor_core::EditorController;
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = EditorController::new();
//!
//!     ctrl.renderer().borrow_mut().bind_paths(paths.clone(), |id, path, color, selected| {
//!         EdgePath { id, path, color, selected }
//!     });
//!
//!     window.on_compute_edge_path(ctrl.compute_edge_path_callback());
//!     window.on_node_drag_moved(ctrl.node_drag_moved_callback());
//!     window.on_node_drag_ended(ctrl.drag_ended_callback());
//!     window.on_cursor_moved(ctrl.cursor_moved_callback());
//!     window.on_key_pressed(ctrl.key_pressed_callback());
//!
//!     window.on_handle_position_changed({
//!         let ctrl = ctrl.clone();
//!         move |node, handle, side, x, y| ctrl.handle_handle_position(&node, &handle, &side, x, y)
//!     });
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::error::{EditorError, Result};
use crate::graph::{Connection, EdgeId, NodeId, Size};
use crate::links::EdgeRenderer;
use crate::path::{Point, Side};
use crate::session::DrawingSession;
use slint::SharedString;
use std::cell::RefCell;
use std::rc::Rc;

/// Keyboard commands of the editing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorCommand {
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
}

impl EditorCommand {
    /// Map a key press to a command.
    ///
    /// Ctrl and Cmd (meta) are interchangeable. Undo and redo ignore the
    /// press while Shift is held.
    pub fn from_key(key: &str, ctrl: bool, shift: bool, meta: bool) -> Option<Self> {
        if !(ctrl || meta) {
            return None;
        }
        match key.to_ascii_lowercase().as_str() {
            "z" if !shift => Some(EditorCommand::Undo),
            "y" if !shift => Some(EditorCommand::Redo),
            "c" => Some(EditorCommand::Copy),
            "x" => Some(EditorCommand::Cut),
            "v" => Some(EditorCommand::Paste),
            _ => None,
        }
    }
}

/// Controller that owns the editor state and provides callback implementations.
///
/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct EditorController {
    editor: Rc<RefCell<Editor>>,
    renderer: Rc<RefCell<EdgeRenderer>>,
    session: Rc<RefCell<DrawingSession>>,
    cursor: Rc<RefCell<Point>>,
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorController {
    /// Create a new controller with default settings.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let renderer = EdgeRenderer::with_options(config.path_options());
        Self::from_editor(Editor::with_config(config), renderer)
    }

    pub fn from_editor(editor: Editor, renderer: EdgeRenderer) -> Self {
        Self {
            editor: Rc::new(RefCell::new(editor)),
            renderer: Rc::new(RefCell::new(renderer)),
            session: Rc::new(RefCell::new(DrawingSession::new())),
            cursor: Rc::new(RefCell::new(Point::default())),
        }
    }

    pub fn editor(&self) -> Rc<RefCell<Editor>> {
        self.editor.clone()
    }

    pub fn renderer(&self) -> Rc<RefCell<EdgeRenderer>> {
        self.renderer.clone()
    }

    pub fn session(&self) -> Rc<RefCell<DrawingSession>> {
        self.session.clone()
    }

    /// Last cursor position reported by the canvas; paste lands here.
    pub fn cursor(&self) -> Point {
        *self.cursor.borrow()
    }

    /// Re-render all edges into the bound models.
    pub fn refresh(&self) {
        let editor = self.editor.borrow();
        self.renderer.borrow_mut().update(editor.graph(), editor.handles());
    }

    /// Run a command. Returns `true` if the graph changed.
    pub fn execute(&self, command: EditorCommand) -> bool {
        let changed = {
            let mut editor = self.editor.borrow_mut();
            match command {
                EditorCommand::Undo => editor.undo(),
                EditorCommand::Redo => editor.redo(),
                EditorCommand::Copy => {
                    editor.copy();
                    false
                }
                EditorCommand::Cut => editor.cut(),
                EditorCommand::Paste => editor.paste(*self.cursor.borrow()).is_some(),
            }
        };
        tracing::debug!(?command, changed, "command executed");
        if changed {
            self.refresh();
        }
        changed
    }

    // === Callback factories ===

    /// Returns a callback for `compute-edge-path`.
    ///
    /// The second argument is a version counter the canvas bumps to force
    /// re-evaluation; it is ignored here.
    pub fn compute_edge_path_callback(&self) -> impl Fn(SharedString, i32) -> SharedString {
        let editor = self.editor.clone();
        move |edge_id, _version| {
            editor
                .borrow()
                .render_edge(&EdgeId::new(edge_id.as_str()))
                .map(|rendered| rendered.path)
                .unwrap_or_default()
                .into()
        }
    }

    /// Returns a callback for `node-drag-moved`.
    pub fn node_drag_moved_callback(&self) -> impl Fn(SharedString, f32, f32) {
        let ctrl = self.clone();
        move |node_id, x, y| {
            ctrl.handle_node_drag(&node_id, x, y);
        }
    }

    /// Returns a callback for `node-drag-ended`.
    pub fn drag_ended_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || {
            ctrl.handle_drag_ended();
        }
    }

    /// Returns a callback for `cursor-moved`.
    pub fn cursor_moved_callback(&self) -> impl Fn(f32, f32) {
        let cursor = self.cursor.clone();
        move |x, y| {
            *cursor.borrow_mut() = Point::new(x, y);
        }
    }

    /// Returns a callback for `key-pressed`; it reports whether the key was handled.
    pub fn key_pressed_callback(&self) -> impl Fn(SharedString, bool, bool, bool) -> bool {
        let ctrl = self.clone();
        move |key, control, shift, meta| ctrl.handle_key(&key, control, shift, meta)
    }

    // === Direct handlers ===

    /// Handle handle-position-changed: update the handle cache.
    pub fn handle_handle_position(&self, node: &str, handle: &str, side: &str, rel_x: f32, rel_y: f32) {
        let Ok(side) = side.parse::<Side>() else {
            tracing::warn!(node, handle, side, "ignoring handle report with unknown side");
            return;
        };
        self.editor
            .borrow_mut()
            .handles_mut()
            .handle_report(NodeId::new(node), handle, side, rel_x, rel_y);
        self.refresh();
    }

    /// Handle node-measured: record the laid-out size of a node.
    pub fn handle_node_measured(&self, node: &str, width: f32, height: f32) {
        let result = self.editor.borrow_mut().set_node_size(&NodeId::new(node), Size::new(width, height));
        if result.is_ok() {
            self.refresh();
        }
    }

    /// Handle a drag frame; returns the snapped position.
    pub fn handle_node_drag(&self, node: &str, x: f32, y: f32) -> Option<Point> {
        let settled = self.editor.borrow_mut().drag_node(&NodeId::new(node), Point::new(x, y)).ok()?;
        self.refresh();
        Some(settled)
    }

    /// Handle drag end (node or control point). Returns `true` if a snapshot was taken.
    pub fn handle_drag_ended(&self) -> bool {
        let committed = {
            let mut editor = self.editor.borrow_mut();
            editor.end_drag() || editor.end_control_point_drag()
        };
        self.refresh();
        committed
    }

    pub fn handle_cursor_moved(&self, x: f32, y: f32) {
        *self.cursor.borrow_mut() = Point::new(x, y);
    }

    /// Handle a key press. Returns `true` if it mapped to a command.
    pub fn handle_key(&self, key: &str, ctrl: bool, shift: bool, meta: bool) -> bool {
        match EditorCommand::from_key(key, ctrl, shift, meta) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    // === Connections ===

    pub fn begin_connection(&self, node: &str, handle: Option<&str>, x: f32, y: f32) -> Result<()> {
        self.editor.borrow_mut().begin_connection(
            &mut self.session.borrow_mut(),
            &NodeId::new(node),
            handle.map(str::to_owned),
            Point::new(x, y),
        )
    }

    pub fn extend_connection(&self, x: f32, y: f32) {
        self.session.borrow_mut().extend(Point::new(x, y));
    }

    /// Drop the connection line on a target handle.
    pub fn finish_connection(&self, target: &str, target_handle: Option<&str>) -> Result<EdgeId> {
        let mut session = self.session.borrow_mut();
        let source = session.source().cloned().ok_or(EditorError::NoActiveConnection)?;
        let connection = Connection::new(source, target)
            .with_handles(session.source_handle().map(str::to_owned), target_handle.map(str::to_owned));
        let id = self.editor.borrow_mut().connect(&mut session, connection)?;
        drop(session);
        self.refresh();
        Ok(id)
    }

    pub fn cancel_connection(&self) {
        self.session.borrow_mut().clear();
        self.editor.borrow_mut().cancel_drag();
    }

    // === Control-point handles ===

    /// Grab the handle `point` (as rendered, e.g. `"p0"` or `"s1"`) of an edge.
    ///
    /// Returns `true` if a drag started.
    pub fn handle_control_point_pressed(&self, edge: &str, point: &str) -> bool {
        let edge = EdgeId::new(edge);
        let mut editor = self.editor.borrow_mut();
        let Ok(handles) = editor.control_points(&edge) else {
            return false;
        };
        let Some(handle) = handles.iter().find(|cp| cp.id.to_string() == point) else {
            tracing::warn!(edge = %edge, point, "pressed handle not found");
            return false;
        };
        matches!(editor.begin_control_point_drag(&edge, handle), Ok(Some(_)))
    }

    pub fn handle_control_point_moved(&self, x: f32, y: f32) -> bool {
        let moved = self.editor.borrow_mut().drag_control_point(Point::new(x, y)).is_ok();
        if moved {
            self.refresh();
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Key mapping
    // ========================================================================

    #[test]
    fn test_key_mapping() {
        assert_eq!(EditorCommand::from_key("z", true, false, false), Some(EditorCommand::Undo));
        assert_eq!(EditorCommand::from_key("y", true, false, false), Some(EditorCommand::Redo));
        assert_eq!(EditorCommand::from_key("c", true, false, false), Some(EditorCommand::Copy));
        assert_eq!(EditorCommand::from_key("x", true, false, false), Some(EditorCommand::Cut));
        assert_eq!(EditorCommand::from_key("v", true, false, false), Some(EditorCommand::Paste));
    }

    #[test]
    fn test_meta_counts_as_ctrl() {
        assert_eq!(EditorCommand::from_key("z", false, false, true), Some(EditorCommand::Undo));
        assert_eq!(EditorCommand::from_key("V", false, false, true), Some(EditorCommand::Paste));
    }

    #[test]
    fn test_keys_without_modifier_or_with_shift() {
        assert_eq!(EditorCommand::from_key("z", false, false, false), None);
        assert_eq!(EditorCommand::from_key("z", true, true, false), None);
        assert_eq!(EditorCommand::from_key("y", true, true, false), None);
        assert_eq!(EditorCommand::from_key("c", true, true, false), Some(EditorCommand::Copy));
        assert_eq!(EditorCommand::from_key("q", true, false, false), None);
    }

    // ========================================================================
    // Controller state
    // ========================================================================

    #[test]
    fn test_cursor_callback_updates_paste_target() {
        let ctrl = EditorController::new();
        let callback = ctrl.cursor_moved_callback();
        callback(12.0, 34.0);
        assert_eq!(ctrl.cursor(), Point::new(12.0, 34.0));
    }

    #[test]
    fn test_handle_report_with_unknown_side_is_ignored() {
        let ctrl = EditorController::new();
        ctrl.handle_handle_position("a", "out", "north", 0.0, 0.0);
        assert!(ctrl.editor().borrow().handles().is_empty());
        ctrl.handle_handle_position("a", "out", "Right", 10.0, 5.0);
        assert_eq!(ctrl.editor().borrow().handles().len(), 1);
    }

    #[test]
    fn test_finish_without_begin_is_an_error() {
        let ctrl = EditorController::new();
        assert!(matches!(ctrl.finish_connection("b", None), Err(EditorError::NoActiveConnection)));
    }

    #[test]
    fn test_compute_edge_path_for_unknown_edge_is_empty() {
        let ctrl = EditorController::new();
        let callback = ctrl.compute_edge_path_callback();
        assert_eq!(callback(SharedString::from("nope"), 0).as_str(), "");
    }
}
