//! Helper-line alignment for single-node drags.
//!
//! On every drag frame the dragged node's pending bounding box is compared
//! against every other node. The closest edge alignment per axis within the
//! threshold wins; its coordinate replaces that axis of the pending position
//! and a guide line is reported for the canvas to draw.

use crate::graph::Node;
use crate::path::Point;

/// Default snapping distance in canvas units.
pub const DEFAULT_SNAP_THRESHOLD: f32 = 5.0;

/// Axis-aligned bounding box of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { left: x, right: x + width, top: y, bottom: y + height }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Trait for node geometry data needed for alignment
pub trait NodeGeometry {
    fn bounds(&self) -> Bounds;
}

impl NodeGeometry for Bounds {
    fn bounds(&self) -> Bounds {
        *self
    }
}

impl NodeGeometry for Node {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.position.x, self.position.y, self.measured.width, self.measured.height)
    }
}

impl<T: NodeGeometry + ?Sized> NodeGeometry for &T {
    fn bounds(&self) -> Bounds {
        (**self).bounds()
    }
}

/// Guide lines shown while dragging.
///
/// `horizontal` is a y coordinate, `vertical` an x coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HelperLines {
    pub horizontal: Option<f32>,
    pub vertical: Option<f32>,
}

impl HelperLines {
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }
}

/// Snapped coordinates; `None` leaves that axis of the pending position alone.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SnapPosition {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SnapResult {
    pub lines: HelperLines,
    pub snap: SnapPosition,
}

impl SnapResult {
    /// Replace the snapped axes of `pending`.
    pub fn apply(&self, pending: Point) -> Point {
        Point::new(self.snap.x.unwrap_or(pending.x), self.snap.y.unwrap_or(pending.y))
    }
}

/// Edge alignments tested between the dragged node (first) and another node (second).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    LeftLeft,
    RightRight,
    LeftRight,
    RightLeft,
    TopTop,
    BottomBottom,
    TopBottom,
    BottomTop,
}

impl Relation {
    /// Evaluation order; on equal distance the earlier relation is kept.
    pub const PRIORITY: [Relation; 8] = [
        Relation::LeftLeft,
        Relation::RightRight,
        Relation::LeftRight,
        Relation::RightLeft,
        Relation::TopTop,
        Relation::BottomBottom,
        Relation::TopBottom,
        Relation::BottomTop,
    ];

    /// `true` for relations on the x axis (drawn as a vertical guide).
    pub fn is_vertical(self) -> bool {
        matches!(
            self,
            Relation::LeftLeft | Relation::RightRight | Relation::LeftRight | Relation::RightLeft
        )
    }

    fn distance(self, a: &Bounds, b: &Bounds) -> f32 {
        match self {
            Relation::LeftLeft => (a.left - b.left).abs(),
            Relation::RightRight => (a.right - b.right).abs(),
            Relation::LeftRight => (a.left - b.right).abs(),
            Relation::RightLeft => (a.right - b.left).abs(),
            Relation::TopTop => (a.top - b.top).abs(),
            Relation::BottomBottom => (a.bottom - b.bottom).abs(),
            Relation::TopBottom => (a.top - b.bottom).abs(),
            Relation::BottomTop => (a.bottom - b.top).abs(),
        }
    }

    /// (snapped position of the dragged node on this axis, guide coordinate)
    fn snap(self, a: &Bounds, b: &Bounds) -> (f32, f32) {
        match self {
            Relation::LeftLeft => (b.left, b.left),
            Relation::RightRight => (b.right - a.width(), b.right),
            Relation::LeftRight => (b.right, b.right),
            Relation::RightLeft => (b.left - a.width(), b.left),
            Relation::TopTop => (b.top, b.top),
            Relation::BottomBottom => (b.bottom - a.height(), b.bottom),
            Relation::TopBottom => (b.bottom, b.bottom),
            Relation::BottomTop => (b.top - a.height(), b.top),
        }
    }
}

/// Compute helper lines and the snapped position for a dragged node.
///
/// # Arguments
/// * `dragged` - Bounds of the dragged node at its pending position
/// * `others` - Every other node (the dragged node must not be included)
/// * `threshold` - A relation qualifies only if its distance is strictly less
///
/// # Returns
/// At most one guide per axis: the closest qualifying relation across all
/// nodes, first match winning ties.
pub fn compute_snap<N, I>(dragged: &Bounds, others: I, threshold: f32) -> SnapResult
where
    N: NodeGeometry,
    I: IntoIterator<Item = N>,
{
    let mut result = SnapResult::default();
    let mut best_vertical = threshold;
    let mut best_horizontal = threshold;

    for other in others {
        let b = other.bounds();
        for relation in Relation::PRIORITY {
            let distance = relation.distance(dragged, &b);
            let best = if relation.is_vertical() { &mut best_vertical } else { &mut best_horizontal };
            if distance < *best {
                *best = distance;
                let (position, guide) = relation.snap(dragged, &b);
                if relation.is_vertical() {
                    result.snap.x = Some(position);
                    result.lines.vertical = Some(guide);
                } else {
                    result.snap.y = Some(position);
                    result.lines.horizontal = Some(guide);
                }
            }
        }
    }

    result
}
