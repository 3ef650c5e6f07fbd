//! Per-edge storage of user-placed control points.
//!
//! The slot id handed out on insert is the point's identity for the life of
//! the edge. The allocator only moves forward, and it is saved alongside the
//! points, so a removed id is never handed out again, not even after a reload.

use crate::path::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Identity of a control point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControlPointId {
    /// Arena slot of a point stored on the edge.
    Slot(u32),
    /// Position in the derived list of a point synthesized by the path algorithm.
    Synthetic(u32),
}

impl fmt::Display for ControlPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlPointId::Slot(i) => write!(f, "p{}", i),
            ControlPointId::Synthetic(i) => write!(f, "s{}", i),
        }
    }
}

impl FromStr for ControlPointId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (Some(tag), Some(index)) = (s.get(..1), s.get(1..)) else {
            return Err(());
        };
        let index: u32 = index.parse().map_err(|_| ())?;
        match tag {
            "p" => Ok(ControlPointId::Slot(index)),
            "s" => Ok(ControlPointId::Synthetic(index)),
            _ => Err(()),
        }
    }
}

/// A point along an edge that the canvas may render as a drag handle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPoint {
    pub id: ControlPointId,
    pub x: f32,
    pub y: f32,
    /// `true` for points the user placed, `false` for synthesized ones.
    pub active: bool,
    /// For synthesized segment midpoints: index in the edge's point list at
    /// which dragging this handle inserts a new point.
    pub insert_at: Option<usize>,
}

impl ControlPoint {
    pub fn active(id: ControlPointId, p: Point) -> Self {
        Self { id, x: p.x, y: p.y, active: true, insert_at: None }
    }

    pub fn synthesized(id: ControlPointId, p: Point) -> Self {
        Self { id, x: p.x, y: p.y, active: false, insert_at: None }
    }

    pub fn midpoint(id: ControlPointId, p: Point, insert_at: usize) -> Self {
        Self { id, x: p.x, y: p.y, active: false, insert_at: Some(insert_at) }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Largest slot id accepted from persisted data.
const MAX_SLOT_ID: u32 = i32::MAX as u32;

/// Persisted form of a stored point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
struct StoredPoint {
    id: u32,
    x: f32,
    y: f32,
}

/// Persisted form of a store: live points plus the allocator position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedStore {
    next_id: u32,
    points: Vec<StoredPoint>,
}

/// Accepted on load: the full form, or a bare list of points.
#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedPoints {
    Tracked(PersistedStore),
    Bare(Vec<StoredPoint>),
}

/// Ordered, identity-stable control points of one edge.
///
/// Order is path traversal order from source to target; the anchors
/// themselves are never stored here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PersistedPoints", into = "PersistedStore")]
pub struct ControlPointStore {
    slots: HashMap<u32, Point>,
    order: Vec<u32>,
    next_id: u32,
}

impl ControlPointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from points in traversal order, assigning fresh slots.
    pub fn from_positions<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        let mut store = Self::new();
        for p in points {
            store.push(p);
        }
        store
    }

    /// Insert a point at `index` in traversal order (clamped to the length).
    ///
    /// Returns the id of the new slot.
    pub fn insert(&mut self, index: usize, point: Point) -> ControlPointId {
        let slot = self.next_id;
        self.next_id += 1;
        self.slots.insert(slot, point);
        let index = index.min(self.order.len());
        self.order.insert(index, slot);
        ControlPointId::Slot(slot)
    }

    /// Append a point just before the target anchor.
    pub fn push(&mut self, point: Point) -> ControlPointId {
        self.insert(self.order.len(), point)
    }

    /// Move a stored point. Returns `false` if `id` is not a live slot.
    pub fn move_point(&mut self, id: ControlPointId, to: Point) -> bool {
        match self.slot_mut(id) {
            Some(p) => {
                *p = to;
                true
            }
            None => false,
        }
    }

    /// Remove a stored point. Its id is retired, not recycled.
    pub fn remove(&mut self, id: ControlPointId) -> Option<ControlPoint> {
        let ControlPointId::Slot(slot) = id else {
            return None;
        };
        let point = self.slots.remove(&slot)?;
        self.order.retain(|&s| s != slot);
        Some(ControlPoint::active(id, point))
    }

    pub fn get(&self, id: ControlPointId) -> Option<ControlPoint> {
        let ControlPointId::Slot(slot) = id else {
            return None;
        };
        let p = self.slots.get(&slot)?;
        Some(ControlPoint::active(id, *p))
    }

    pub fn contains(&self, id: ControlPointId) -> bool {
        self.get(id).is_some()
    }

    /// Index of a live point in traversal order.
    pub fn index_of(&self, id: ControlPointId) -> Option<usize> {
        let ControlPointId::Slot(slot) = id else {
            return None;
        };
        self.order.iter().position(|&s| s == slot)
    }

    /// Points in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = ControlPoint> + '_ {
        self.order.iter().filter_map(move |slot| {
            let p = self.slots.get(slot)?;
            Some(ControlPoint::active(ControlPointId::Slot(*slot), *p))
        })
    }

    /// Shift every stored point by `offset`, keeping ids.
    pub fn translate(&mut self, offset: Point) {
        for p in self.slots.values_mut() {
            p.x += offset.x;
            p.y += offset.y;
        }
    }

    pub fn positions(&self) -> Vec<Point> {
        self.iter().map(|cp| cp.position()).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn slot_mut(&mut self, id: ControlPointId) -> Option<&mut Point> {
        let ControlPointId::Slot(slot) = id else {
            return None;
        };
        self.slots.get_mut(&slot)
    }
}

impl TryFrom<PersistedPoints> for ControlPointStore {
    type Error = String;

    fn try_from(persisted: PersistedPoints) -> Result<Self, Self::Error> {
        let (next_id, points) = match persisted {
            PersistedPoints::Tracked(store) => (store.next_id, store.points),
            PersistedPoints::Bare(points) => (0, points),
        };
        if next_id > MAX_SLOT_ID + 1 {
            return Err(format!("control point allocator {} out of range", next_id));
        }

        let mut store = ControlPointStore { next_id, ..Self::default() };
        for p in points {
            if p.id > MAX_SLOT_ID {
                return Err(format!("control point id {} out of range", p.id));
            }
            if store.slots.insert(p.id, Point::new(p.x, p.y)).is_some() {
                return Err(format!("duplicate control point id {}", p.id));
            }
            store.order.push(p.id);
            store.next_id = store.next_id.max(p.id + 1);
        }
        Ok(store)
    }
}

impl From<ControlPointStore> for PersistedStore {
    fn from(store: ControlPointStore) -> Self {
        let points = store
            .iter()
            .filter_map(|cp| match cp.id {
                ControlPointId::Slot(id) => Some(StoredPoint { id, x: cp.x, y: cp.y }),
                ControlPointId::Synthetic(_) => None,
            })
            .collect();
        PersistedStore { next_id: store.next_id, points }
    }
}
