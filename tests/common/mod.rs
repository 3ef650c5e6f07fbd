//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use arch_editor_core::{Edge, Editor, EditorConfig, Graph, Node, Point, Side, Sides, Size};

pub fn node(id: &str, x: f32, y: f32, width: f32, height: f32) -> Node {
    Node::new(id, Point::new(x, y), Size::new(width, height))
}

/// Two 100x50 nodes: `a` at the origin, `b` down and to the right.
pub fn two_nodes() -> Graph {
    let mut graph = Graph::new();
    graph.add_node(node("a", 0.0, 0.0, 100.0, 50.0));
    graph.add_node(node("b", 300.0, 200.0, 100.0, 50.0));
    graph
}

/// [`two_nodes`] joined by edge `e`.
pub fn two_nodes_with_edge(edge: impl FnOnce(Edge) -> Edge) -> Graph {
    let mut graph = two_nodes();
    graph.add_edge(edge(Edge::new("e", "a", "b")));
    graph
}

pub fn editor_with(graph: Graph) -> Editor {
    Editor::from_graph(graph, EditorConfig::default())
}

pub const ALL_SIDES: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

pub fn all_side_pairs() -> Vec<Sides> {
    ALL_SIDES
        .iter()
        .flat_map(|&from| ALL_SIDES.iter().map(move |&to| Sides::new(from, to)))
        .collect()
}

/// One command of an SVG path string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo(Point, Point, Point),
}

impl PathCommand {
    /// Where the pen is after this command.
    pub fn end(&self) -> Point {
        match self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => *p,
            PathCommand::CubicTo(_, _, p) => *p,
        }
    }
}

/// Parse the `M` / `L` / `C` subset of SVG path syntax produced by the editor.
pub fn parse_path(path: &str) -> Vec<PathCommand> {
    let tokens: Vec<&str> = path.split_whitespace().collect();
    let mut commands = Vec::new();
    let mut i = 0;
    let number = |t: &str| -> f32 { t.parse().unwrap_or_else(|_| panic!("bad number `{}` in `{}`", t, path)) };
    let point = |i: usize| Point::new(number(tokens[i]), number(tokens[i + 1]));
    while i < tokens.len() {
        match tokens[i] {
            "M" => {
                commands.push(PathCommand::MoveTo(point(i + 1)));
                i += 3;
            }
            "L" => {
                commands.push(PathCommand::LineTo(point(i + 1)));
                i += 3;
            }
            "C" => {
                commands.push(PathCommand::CubicTo(point(i + 1), point(i + 3), point(i + 5)));
                i += 7;
            }
            other => panic!("unexpected token `{}` in `{}`", other, path),
        }
    }
    commands
}

pub fn count_lines(commands: &[PathCommand]) -> usize {
    commands.iter().filter(|c| matches!(c, PathCommand::LineTo(_))).count()
}

pub fn count_cubics(commands: &[PathCommand]) -> usize {
    commands.iter().filter(|c| matches!(c, PathCommand::CubicTo(..))).count()
}
