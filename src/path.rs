//! Edge geometry: turns an anchor-to-anchor polyline into an SVG path string
//! and the list of control points the canvas renders as drag handles.
//!
//! Both functions take the full point list `[source, ...edge points, target]`
//! and must be called with the same [`CurveAlgorithm`] so the handles match the
//! drawn curve.

use crate::control_points::{ControlPoint, ControlPointId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gap kept between a node border and the first/last corner of an orthogonal route.
pub const CORNER_GAP: f32 = 15.0;

/// Horizontal fractions of the anchor span used for the two bezier control points.
pub const BEZIER_SPAN: (f32, f32) = (0.25, 0.75);

/// Vertical fraction of the anchor span used to lift the bezier control points.
pub const BEZIER_LIFT: f32 = 0.1;

/// A point on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `other`.
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// Compass side of a node where an edge leaves or enters it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }
}

impl FromStr for Side {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Side::Top),
            "right" => Ok(Side::Right),
            "bottom" => Ok(Side::Bottom),
            "left" => Ok(Side::Left),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sides at which a path leaves its source and enters its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sides {
    pub from: Side,
    pub to: Side,
}

impl Sides {
    pub const fn new(from: Side, to: Side) -> Self {
        Self { from, to }
    }
}

impl Default for Sides {
    fn default() -> Self {
        Self::new(Side::Right, Side::Left)
    }
}

/// Curve algorithm of an edge.
///
/// Serialized as `"linear"`, `"catmull-rom"`, `"bezier-catmull-rom"` or
/// `"default"`. Unrecognized values read back as [`CurveAlgorithm::Default`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CurveAlgorithm {
    Linear,
    CatmullRom,
    BezierCatmullRom,
    #[default]
    Default,
}

impl CurveAlgorithm {
    pub const ALL: [CurveAlgorithm; 4] = [
        CurveAlgorithm::Default,
        CurveAlgorithm::Linear,
        CurveAlgorithm::CatmullRom,
        CurveAlgorithm::BezierCatmullRom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CurveAlgorithm::Linear => "linear",
            CurveAlgorithm::CatmullRom => "catmull-rom",
            CurveAlgorithm::BezierCatmullRom => "bezier-catmull-rom",
            CurveAlgorithm::Default => "default",
        }
    }

    /// Stroke color used by the canvas for edges drawn with this algorithm.
    pub fn color(self) -> slint::Color {
        match self {
            CurveAlgorithm::Default => slint::Color::from_rgb_u8(0x77, 0x77, 0x77),
            CurveAlgorithm::Linear => slint::Color::from_rgb_u8(0x03, 0x75, 0xff),
            CurveAlgorithm::BezierCatmullRom => slint::Color::from_rgb_u8(0x68, 0xd3, 0x91),
            CurveAlgorithm::CatmullRom => slint::Color::from_rgb_u8(0xff, 0x00, 0x72),
        }
    }

    /// Parse an algorithm name, falling back to `Default` for anything unknown.
    pub fn parse_lossy(name: &str) -> Self {
        match name {
            "linear" => CurveAlgorithm::Linear,
            "catmull-rom" => CurveAlgorithm::CatmullRom,
            "bezier-catmull-rom" => CurveAlgorithm::BezierCatmullRom,
            _ => CurveAlgorithm::Default,
        }
    }
}

impl From<String> for CurveAlgorithm {
    fn from(value: String) -> Self {
        CurveAlgorithm::parse_lossy(&value)
    }
}

impl From<CurveAlgorithm> for String {
    fn from(value: CurveAlgorithm) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for CurveAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunables for path generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathOptions {
    /// Distance of the first/last orthogonal corner from the anchor.
    pub corner_gap: f32,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self { corner_gap: CORNER_GAP }
    }
}

/// A point of the path polyline: either a fixed anchor or a stored control point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathPoint {
    Anchor(Point),
    Control(ControlPoint),
}

impl PathPoint {
    pub fn position(&self) -> Point {
        match self {
            PathPoint::Anchor(p) => *p,
            PathPoint::Control(cp) => cp.position(),
        }
    }
}

impl From<Point> for PathPoint {
    fn from(p: Point) -> Self {
        PathPoint::Anchor(p)
    }
}

impl From<ControlPoint> for PathPoint {
    fn from(cp: ControlPoint) -> Self {
        PathPoint::Control(cp)
    }
}

/// Generate the SVG path for `points` with the default [`PathOptions`].
///
/// # Arguments
/// * `points` - `[source anchor, ...control points, target anchor]`
/// * `algorithm` - Curve algorithm of the edge
/// * `sides` - Side the path leaves the source / enters the target
///
/// # Returns
/// SVG path commands (e.g. `"M 0 0 L 50 0 L 100 100"`), or an empty string
/// when fewer than two points are supplied.
pub fn compute_path(points: &[Point], algorithm: CurveAlgorithm, sides: Sides) -> String {
    compute_path_with(points, algorithm, sides, &PathOptions::default())
}

/// [`compute_path`] with explicit options.
pub fn compute_path_with(
    points: &[Point],
    algorithm: CurveAlgorithm,
    sides: Sides,
    options: &PathOptions,
) -> String {
    if points.len() < 2 {
        return String::new();
    }
    let source = points[0];
    let target = points[points.len() - 1];

    match algorithm {
        CurveAlgorithm::Linear => polyline_path(points),
        CurveAlgorithm::CatmullRom => match orthogonal_corners(source, target, sides, options) {
            Some(corners) => {
                polyline_path(&[source, corners[0], corners[1], corners[2], target])
            }
            None => polyline_path(&[source, target]),
        },
        CurveAlgorithm::BezierCatmullRom => CubicBezier::s_curve(source, target).to_path(),
        CurveAlgorithm::Default => polyline_path(&[source, target]),
    }
}

/// Derive the control points the canvas shows for `points` with the default options.
///
/// Stored (user-placed) points keep their identity and stay `active`;
/// synthesized points are inactive and get deterministic
/// [`ControlPointId::Synthetic`] ids so drag handles stay stable across frames.
pub fn compute_control_points(
    points: &[PathPoint],
    algorithm: CurveAlgorithm,
    sides: Sides,
) -> Vec<ControlPoint> {
    compute_control_points_with(points, algorithm, sides, &PathOptions::default())
}

/// [`compute_control_points`] with explicit options.
pub fn compute_control_points_with(
    points: &[PathPoint],
    algorithm: CurveAlgorithm,
    sides: Sides,
    options: &PathOptions,
) -> Vec<ControlPoint> {
    if points.len() < 2 {
        return Vec::new();
    }
    let source = points[0].position();
    let target = points[points.len() - 1].position();

    match algorithm {
        CurveAlgorithm::Linear => stored_points(points),
        CurveAlgorithm::CatmullRom => orthogonal_corners(source, target, sides, options)
            .map(|corners| synthesized(&corners))
            .unwrap_or_default(),
        CurveAlgorithm::BezierCatmullRom => {
            let curve = CubicBezier::s_curve(source, target);
            synthesized(&[curve.p1, curve.p2])
        }
        CurveAlgorithm::Default => Vec::new(),
    }
}

fn polyline_path(points: &[Point]) -> String {
    let mut commands = String::with_capacity(points.len() * 16);
    for (i, p) in points.iter().enumerate() {
        if i == 0 {
            commands.push_str(&format!("M {} {}", p.x, p.y));
        } else {
            commands.push_str(&format!(" L {} {}", p.x, p.y));
        }
    }
    commands
}

fn stored_points(points: &[PathPoint]) -> Vec<ControlPoint> {
    points
        .iter()
        .filter_map(|p| match p {
            PathPoint::Control(cp) => Some(*cp),
            PathPoint::Anchor(_) => None,
        })
        .collect()
}

/// One inactive midpoint per segment of a linear edge.
///
/// Midpoint `i` sits on the segment between path points `i` and `i + 1`;
/// dragging it inserts a new stored point at index `i` of the edge's list.
/// These are grab targets only; [`compute_control_points`] never includes them.
pub fn insertion_handles(points: &[PathPoint]) -> Vec<ControlPoint> {
    points
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let mid = pair[0].position().midpoint(pair[1].position());
            ControlPoint::midpoint(ControlPointId::Synthetic(i as u32), mid, i)
        })
        .collect()
}

/// Everything the canvas offers as a drag handle for an edge.
///
/// For `Linear` edges this is the stored points interleaved with the
/// [`insertion_handles`] in path order; for the other algorithms it is
/// exactly [`compute_control_points_with`].
pub fn drag_handles_with(
    points: &[PathPoint],
    algorithm: CurveAlgorithm,
    sides: Sides,
    options: &PathOptions,
) -> Vec<ControlPoint> {
    if algorithm != CurveAlgorithm::Linear || points.len() < 2 {
        return compute_control_points_with(points, algorithm, sides, options);
    }
    let mut out = Vec::with_capacity(points.len() * 2);
    for (i, mid) in insertion_handles(points).into_iter().enumerate() {
        if let PathPoint::Control(cp) = points[i] {
            out.push(cp);
        }
        out.push(mid);
    }
    out
}

fn synthesized(points: &[Point]) -> Vec<ControlPoint> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| ControlPoint::synthesized(ControlPointId::Synthetic(i as u32), *p))
        .collect()
}

/// Corner vertices of the orthogonal route, if the side pairing has one.
///
/// Only a source leaving on the right into a target entered from the left is
/// routed; every other pairing is drawn as a straight segment.
fn orthogonal_corners(
    source: Point,
    target: Point,
    sides: Sides,
    options: &PathOptions,
) -> Option<[Point; 3]> {
    match (sides.from, sides.to) {
        (Side::Right, Side::Left) => {
            let out_x = source.x + options.corner_gap;
            let in_x = target.x - options.corner_gap;
            Some([
                Point::new(out_x, source.y),
                Point::new(out_x, target.y),
                Point::new(in_x, target.y),
            ])
        }
        _ => None,
    }
}

/// Cubic bezier segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Point, // Start point
    pub p1: Point, // Control point 1
    pub p2: Point, // Control point 2
    pub p3: Point, // End point
}

impl CubicBezier {
    /// Gentle S-curve between two anchors.
    ///
    /// Control points sit at 25% / 75% of the horizontal span and are pulled
    /// 10% of the vertical span towards their own anchor.
    pub fn s_curve(start: Point, end: Point) -> Self {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        CubicBezier {
            p0: start,
            p1: Point::new(start.x + dx * BEZIER_SPAN.0, start.y + dy * BEZIER_LIFT),
            p2: Point::new(start.x + dx * BEZIER_SPAN.1, end.y - dy * BEZIER_LIFT),
            p3: end,
        }
    }

    /// SVG path: M (move to), C (cubic bezier)
    pub fn to_path(&self) -> String {
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.p0.x, self.p0.y, self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors(a: (f32, f32), b: (f32, f32)) -> Vec<Point> {
        vec![a.into(), b.into()]
    }

    fn as_path_points(points: &[Point]) -> Vec<PathPoint> {
        points.iter().copied().map(PathPoint::from).collect()
    }

    // ========================================================================
    // Degenerate input
    // ========================================================================

    #[test]
    fn test_fewer_than_two_points_yield_empty_results() {
        for algorithm in CurveAlgorithm::ALL {
            assert_eq!(compute_path(&[], algorithm, Sides::default()), "");
            assert_eq!(compute_path(&[Point::new(1.0, 2.0)], algorithm, Sides::default()), "");
            assert!(compute_control_points(&[], algorithm, Sides::default()).is_empty());
            assert!(compute_control_points(
                &[PathPoint::Anchor(Point::new(1.0, 2.0))],
                algorithm,
                Sides::default()
            )
            .is_empty());
        }
    }

    // ========================================================================
    // Linear
    // ========================================================================

    #[test]
    fn test_linear_path_visits_all_points_in_order() {
        let points = [Point::new(0.0, 0.0), Point::new(50.0, 0.0), Point::new(100.0, 100.0)];
        let path = compute_path(&points, CurveAlgorithm::Linear, Sides::default());
        assert_eq!(path, "M 0 0 L 50 0 L 100 100");
    }

    fn linear_with_one_stored_point() -> (ControlPoint, [PathPoint; 3]) {
        let stored = ControlPoint::active(ControlPointId::Slot(7), Point::new(50.0, 0.0));
        let points = [
            PathPoint::Anchor(Point::new(0.0, 0.0)),
            PathPoint::Control(stored),
            PathPoint::Anchor(Point::new(100.0, 100.0)),
        ];
        (stored, points)
    }

    #[test]
    fn test_linear_control_points_are_only_the_stored_points() {
        let (stored, points) = linear_with_one_stored_point();
        let cps = compute_control_points(&points, CurveAlgorithm::Linear, Sides::default());
        assert_eq!(cps, vec![stored]);

        let bare = as_path_points(&anchors((0.0, 0.0), (100.0, 0.0)));
        assert!(compute_control_points(&bare, CurveAlgorithm::Linear, Sides::default()).is_empty());
    }

    #[test]
    fn test_insertion_handles_sit_on_segment_midpoints() {
        let (_, points) = linear_with_one_stored_point();
        let mids = insertion_handles(&points);

        assert_eq!(mids.len(), 2);
        assert_eq!(mids[0].position(), Point::new(25.0, 0.0));
        assert_eq!(mids[0].insert_at, Some(0));
        assert_eq!(mids[1].position(), Point::new(75.0, 50.0));
        assert_eq!(mids[1].insert_at, Some(1));
        assert!(mids.iter().all(|cp| !cp.active));
        assert_eq!(mids[0].id, ControlPointId::Synthetic(0));
        assert_eq!(mids, insertion_handles(&points));
    }

    #[test]
    fn test_linear_drag_handles_interleave_midpoints() {
        let (stored, points) = linear_with_one_stored_point();
        let handles = drag_handles_with(&points, CurveAlgorithm::Linear, Sides::default(), &PathOptions::default());
        let mids = insertion_handles(&points);
        assert_eq!(handles, vec![mids[0], stored, mids[1]]);
    }

    #[test]
    fn test_drag_handles_match_control_points_for_other_algorithms() {
        let points = as_path_points(&anchors((0.0, 0.0), (100.0, 60.0)));
        for algorithm in [CurveAlgorithm::CatmullRom, CurveAlgorithm::BezierCatmullRom, CurveAlgorithm::Default] {
            assert_eq!(
                drag_handles_with(&points, algorithm, Sides::default(), &PathOptions::default()),
                compute_control_points(&points, algorithm, Sides::default())
            );
        }
    }

    // ========================================================================
    // Orthogonal (catmull-rom)
    // ========================================================================

    #[test]
    fn test_orthogonal_right_to_left_routes_three_corners() {
        let points = anchors((0.0, 0.0), (100.0, 60.0));
        let sides = Sides::new(Side::Right, Side::Left);
        let path = compute_path(&points, CurveAlgorithm::CatmullRom, sides);
        assert_eq!(path, "M 0 0 L 15 0 L 15 60 L 85 60 L 100 60");

        let cps = compute_control_points(&as_path_points(&points), CurveAlgorithm::CatmullRom, sides);
        let corners: Vec<Point> = cps.iter().map(|cp| cp.position()).collect();
        assert_eq!(
            corners,
            vec![Point::new(15.0, 0.0), Point::new(15.0, 60.0), Point::new(85.0, 60.0)]
        );
        assert!(cps.iter().all(|cp| !cp.active && cp.insert_at.is_none()));
    }

    #[test]
    fn test_orthogonal_respects_corner_gap_option() {
        let points = anchors((0.0, 0.0), (100.0, 60.0));
        let options = PathOptions { corner_gap: 20.0 };
        let path = compute_path_with(&points, CurveAlgorithm::CatmullRom, Sides::default(), &options);
        assert_eq!(path, "M 0 0 L 20 0 L 20 60 L 80 60 L 100 60");
    }

    #[test]
    fn test_orthogonal_other_sides_fall_back_to_straight_line() {
        let points = anchors((0.0, 0.0), (100.0, 60.0));
        for (from, to) in [(Side::Left, Side::Right), (Side::Top, Side::Bottom), (Side::Right, Side::Top)] {
            let sides = Sides::new(from, to);
            assert_eq!(compute_path(&points, CurveAlgorithm::CatmullRom, sides), "M 0 0 L 100 60");
            assert!(compute_control_points(&as_path_points(&points), CurveAlgorithm::CatmullRom, sides)
                .is_empty());
        }
    }

    // ========================================================================
    // Bezier
    // ========================================================================

    #[test]
    fn test_bezier_path_format() {
        let points = anchors((0.0, 0.0), (100.0, 100.0));
        let path = compute_path(&points, CurveAlgorithm::BezierCatmullRom, Sides::default());
        assert_eq!(path, "M 0 0 C 25 10 75 90 100 100");
    }

    #[test]
    fn test_bezier_control_points_match_path() {
        let points = anchors((0.0, 0.0), (100.0, 100.0));
        let cps = compute_control_points(&as_path_points(&points), CurveAlgorithm::BezierCatmullRom, Sides::default());
        assert_eq!(cps.len(), 2);
        assert_eq!(cps[0].position(), Point::new(25.0, 10.0));
        assert_eq!(cps[1].position(), Point::new(75.0, 90.0));
    }

    #[test]
    fn test_bezier_ignores_intermediate_points() {
        let with_middle = [Point::new(0.0, 0.0), Point::new(500.0, -500.0), Point::new(100.0, 100.0)];
        let without = anchors((0.0, 0.0), (100.0, 100.0));
        assert_eq!(
            compute_path(&with_middle, CurveAlgorithm::BezierCatmullRom, Sides::default()),
            compute_path(&without, CurveAlgorithm::BezierCatmullRom, Sides::default())
        );
    }

    // ========================================================================
    // Default / algorithm names
    // ========================================================================

    #[test]
    fn test_default_is_straight_line_without_handles() {
        let points = [Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(10.0, 0.0)];
        assert_eq!(compute_path(&points, CurveAlgorithm::Default, Sides::default()), "M 0 0 L 10 0");
        assert!(compute_control_points(&as_path_points(&points), CurveAlgorithm::Default, Sides::default())
            .is_empty());
    }

    #[test]
    fn test_algorithm_names_round_trip() {
        for algorithm in CurveAlgorithm::ALL {
            assert_eq!(CurveAlgorithm::parse_lossy(algorithm.as_str()), algorithm);
        }
    }

    #[test]
    fn test_unknown_algorithm_name_falls_back_to_default() {
        assert_eq!(CurveAlgorithm::parse_lossy("smoothstep"), CurveAlgorithm::Default);
        assert_eq!(CurveAlgorithm::parse_lossy(""), CurveAlgorithm::Default);
    }

    #[test]
    fn test_side_parsing_is_case_insensitive() {
        assert_eq!("Right".parse::<Side>(), Ok(Side::Right));
        assert_eq!("top".parse::<Side>(), Ok(Side::Top));
        assert!("north".parse::<Side>().is_err());
    }
}
