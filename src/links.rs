//! Edge rendering for the canvas.
//!
//! This module turns graph edges into what the host draws: one SVG path per
//! edge plus the control-point handles of selected edges. [`EdgeRenderer`]
//! keeps the last rendered frame and can push it into Slint models.
//!
//! # Example
//!
//! ```ignore
//! use arch_editor_core::{Editor, EdgeRenderer};
//! use slint::{ModelRc, VecModel};
//! use std::rc::Rc;
//!
//! let mut renderer = EdgeRenderer::new();
//!
//! let paths = Rc::new(VecModel::<EdgePath>::default());
//! renderer.bind_paths(paths.clone(), |id, path, color, selected| EdgePath { id, path, color, selected });
//! window.set_edge_paths(ModelRc::from(paths));
//!
//! let handles = Rc::new(VecModel::<EdgeHandle>::default());
//! renderer.bind_handles(handles.clone(), |edge, point, x, y, active| EdgeHandle { edge, point, x, y, active });
//! window.set_edge_handles(ModelRc::from(handles));
//!
//! // After every edit or drag frame
//! renderer.update(editor.graph(), editor.handles());
//! ```

use crate::control_points::ControlPoint;
use crate::graph::{Edge, EdgeId, Graph};
use crate::path::{
    compute_path_with, drag_handles_with, CurveAlgorithm, PathOptions, PathPoint, Point, Sides,
};
use crate::state::HandleCache;
use slint::{Model, SharedString, VecModel};
use std::rc::Rc;

/// One edge as the canvas draws it.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedEdge {
    pub id: EdgeId,
    /// SVG path commands; empty while an endpoint node is unresolved.
    pub path: String,
    /// Drag handles in path order: the derived control points, plus the
    /// segment midpoints of a linear edge.
    pub handles: Vec<ControlPoint>,
    pub algorithm: CurveAlgorithm,
    pub selected: bool,
}

/// Polyline `[source anchor, ...stored points, target anchor]` of an edge,
/// or `None` if an endpoint node is missing.
fn edge_polyline(graph: &Graph, handles: &HandleCache, edge: &Edge) -> Option<(Vec<PathPoint>, Sides)> {
    let anchors = handles.edge_anchors(graph, edge)?;
    let mut points = Vec::with_capacity(edge.points.len() + 2);
    points.push(PathPoint::Anchor(anchors.source.position));
    points.extend(edge.points.iter().map(PathPoint::Control));
    points.push(PathPoint::Anchor(anchors.target.position));
    Some((points, anchors.sides()))
}

/// Drag handles of `edge`; empty when an endpoint node is missing.
pub fn edge_handles(graph: &Graph, handles: &HandleCache, edge: &Edge, options: &PathOptions) -> Vec<ControlPoint> {
    match edge_polyline(graph, handles, edge) {
        Some((points, sides)) => drag_handles_with(&points, edge.algorithm, sides, options),
        None => Vec::new(),
    }
}

/// Render a single edge. Path and handles always come from the same algorithm.
pub fn render_edge(graph: &Graph, handles: &HandleCache, edge: &Edge, options: &PathOptions) -> RenderedEdge {
    let (path, control_points) = match edge_polyline(graph, handles, edge) {
        Some((points, sides)) => {
            let positions: Vec<Point> = points.iter().map(PathPoint::position).collect();
            (
                compute_path_with(&positions, edge.algorithm, sides, options),
                drag_handles_with(&points, edge.algorithm, sides, options),
            )
        }
        None => (String::new(), Vec::new()),
    };
    RenderedEdge {
        id: edge.id.clone(),
        path,
        handles: control_points,
        algorithm: edge.algorithm,
        selected: edge.selected,
    }
}

/// Render every edge of the graph in graph order.
pub fn render_edges(graph: &Graph, handles: &HandleCache, options: &PathOptions) -> Vec<RenderedEdge> {
    graph.edges.iter().map(|edge| render_edge(graph, handles, edge, options)).collect()
}

/// Internal trait for auto-syncing to Slint models.
trait ModelSyncer {
    fn sync(&self, edges: &[RenderedEdge]);
}

/// Overwrite `model` with `items`, reusing existing rows.
fn sync_rows<P: Clone + 'static>(model: &VecModel<P>, items: impl Iterator<Item = P>) {
    let mut len = 0;
    for (i, item) in items.enumerate() {
        if i < model.row_count() {
            model.set_row_data(i, item);
        } else {
            model.push(item);
        }
        len = i + 1;
    }
    // Remove excess rows
    while model.row_count() > len {
        model.remove(model.row_count() - 1);
    }
}

/// One row per edge: (edge id, path commands, stroke color, selected).
struct PathModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> ModelSyncer for PathModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(SharedString, SharedString, slint::Color, bool) -> P,
{
    fn sync(&self, edges: &[RenderedEdge]) {
        sync_rows(
            &self.model,
            edges.iter().map(|e| {
                (self.constructor)(
                    SharedString::from(e.id.as_str()),
                    SharedString::from(e.path.as_str()),
                    e.algorithm.color(),
                    e.selected,
                )
            }),
        );
    }
}

/// One row per handle of a selected edge: (edge id, point id, x, y, active).
struct HandleModelSyncer<H, F> {
    model: Rc<VecModel<H>>,
    constructor: F,
}

impl<H, F> ModelSyncer for HandleModelSyncer<H, F>
where
    H: Clone + 'static,
    F: Fn(SharedString, SharedString, f32, f32, bool) -> H,
{
    fn sync(&self, edges: &[RenderedEdge]) {
        sync_rows(
            &self.model,
            edges.iter().filter(|e| e.selected).flat_map(|e| {
                e.handles.iter().map(move |cp| {
                    (self.constructor)(
                        SharedString::from(e.id.as_str()),
                        SharedString::from(cp.id.to_string().as_str()),
                        cp.x,
                        cp.y,
                        cp.active,
                    )
                })
            }),
        );
    }
}

/// Keeps the last rendered frame and mirrors it into bound Slint models.
///
/// # Auto-Sync Mode
///
/// Use [`bind_paths`](Self::bind_paths) and [`bind_handles`](Self::bind_handles)
/// to attach `VecModel`s. After binding, every call to [`update`](Self::update)
/// rewrites the models in place.
pub struct EdgeRenderer {
    options: PathOptions,
    rendered: Vec<RenderedEdge>,
    syncers: Vec<Box<dyn ModelSyncer>>,
}

impl Default for EdgeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeRenderer {
    pub fn new() -> Self {
        Self::with_options(PathOptions::default())
    }

    pub fn with_options(options: PathOptions) -> Self {
        Self { options, rendered: Vec::new(), syncers: Vec::new() }
    }

    pub fn set_options(&mut self, options: PathOptions) {
        self.options = options;
    }

    /// Bind a model of edge paths.
    ///
    /// # Arguments
    ///
    /// * `model` - The VecModel to sync to
    /// * `constructor` - Builds a row from (edge id, path commands, color, selected)
    pub fn bind_paths<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(SharedString, SharedString, slint::Color, bool) -> P + 'static,
    {
        self.syncers.push(Box::new(PathModelSyncer { model, constructor }));
    }

    /// Bind a model of control-point handles.
    ///
    /// Only selected edges contribute rows.
    ///
    /// # Arguments
    ///
    /// * `model` - The VecModel to sync to
    /// * `constructor` - Builds a row from (edge id, point id, x, y, active)
    pub fn bind_handles<H, F>(&mut self, model: Rc<VecModel<H>>, constructor: F)
    where
        H: Clone + 'static,
        F: Fn(SharedString, SharedString, f32, f32, bool) -> H + 'static,
    {
        self.syncers.push(Box::new(HandleModelSyncer { model, constructor }));
    }

    /// Re-render every edge and sync bound models.
    ///
    /// Call this after every edit, drag frame and handle report.
    pub fn update(&mut self, graph: &Graph, handles: &HandleCache) {
        self.rendered = render_edges(graph, handles, &self.options);
        for syncer in &self.syncers {
            syncer.sync(&self.rendered);
        }
    }

    pub fn rendered(&self) -> &[RenderedEdge] {
        &self.rendered
    }

    /// Find a rendered edge by ID.
    pub fn find(&self, id: &EdgeId) -> Option<&RenderedEdge> {
        self.rendered.iter().find(|e| &e.id == id)
    }

    /// Path of an edge from the last frame, empty if unknown.
    pub fn path(&self, id: &EdgeId) -> &str {
        self.find(id).map(|e| e.path.as_str()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }
}
