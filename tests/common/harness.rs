//! Test harness around [`EditorController`].
//!
//! Binds the renderer to plain `VecModel`s the way a window would, so tests
//! can drive the controller through its handlers and inspect what the canvas
//! would draw.

#![allow(dead_code)]

use arch_editor_core::{EditorController, Node};
use slint::{Color, Model, SharedString, VecModel};
use std::rc::Rc;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgePath {
    pub id: SharedString,
    pub path: SharedString,
    pub color: Color,
    pub selected: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeHandle {
    pub edge: SharedString,
    pub point: SharedString,
    pub x: f32,
    pub y: f32,
    pub active: bool,
}

pub struct ControllerHarness {
    pub ctrl: EditorController,
    pub paths: Rc<VecModel<EdgePath>>,
    pub handles: Rc<VecModel<EdgeHandle>>,
}

impl ControllerHarness {
    pub fn new() -> Self {
        let ctrl = EditorController::new();
        let paths = Rc::new(VecModel::<EdgePath>::default());
        let handles = Rc::new(VecModel::<EdgeHandle>::default());
        {
            let renderer = ctrl.renderer();
            let mut renderer = renderer.borrow_mut();
            renderer.bind_paths(paths.clone(), |id, path, color, selected| EdgePath { id, path, color, selected });
            renderer.bind_handles(handles.clone(), |edge, point, x, y, active| EdgeHandle {
                edge,
                point,
                x,
                y,
                active,
            });
        }
        Self { ctrl, paths, handles }
    }

    /// Harness with the given nodes already added (one snapshot each).
    pub fn with_nodes(nodes: Vec<Node>) -> Self {
        let harness = Self::new();
        {
            let editor = harness.ctrl.editor();
            let mut editor = editor.borrow_mut();
            for node in nodes {
                editor.add_node(node);
            }
        }
        harness.ctrl.refresh();
        harness
    }

    pub fn press(&self, key: &str) -> bool {
        self.ctrl.handle_key(key, true, false, false)
    }

    pub fn node_count(&self) -> usize {
        self.ctrl.editor().borrow().graph().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.ctrl.editor().borrow().graph().edges.len()
    }

    pub fn path_rows(&self) -> Vec<EdgePath> {
        self.paths.iter().collect()
    }

    pub fn handle_rows(&self) -> Vec<EdgeHandle> {
        self.handles.iter().collect()
    }
}
