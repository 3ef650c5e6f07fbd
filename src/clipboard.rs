//! Copy / cut / paste of the selected subgraph.
//!
//! The buffer holds the selected nodes plus the edges whose endpoints are
//! both selected. Pasting clones it with fresh ids, rewires edges through an
//! old-to-new id map and shifts the group so its top-left-most corner lands
//! on the cursor.

use crate::graph::{Edge, EdgeId, Graph, Node, NodeId};
use crate::path::Point;
use std::collections::{HashMap, HashSet};

/// Nodes and edges captured by the last copy or cut.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClipboardBuffer {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl ClipboardBuffer {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Componentwise minimum of the buffered node positions.
    pub fn origin(&self) -> Option<Point> {
        let first = self.nodes.first()?.position;
        Some(self.nodes.iter().fold(first, |min, n| {
            Point::new(min.x.min(n.position.x), min.y.min(n.position.y))
        }))
    }
}

/// Ids created by a paste.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PasteOutcome {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    buffer: ClipboardBuffer,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &ClipboardBuffer {
        &self.buffer
    }

    /// Replace the buffer with the induced subgraph of the current selection.
    ///
    /// Returns the number of nodes copied.
    pub fn copy(&mut self, graph: &Graph) -> usize {
        let nodes: Vec<Node> = graph.nodes.iter().filter(|n| n.selected).cloned().collect();
        let ids: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();
        let edges = graph
            .edges
            .iter()
            .filter(|e| ids.contains(&e.source) && ids.contains(&e.target))
            .cloned()
            .collect();
        self.buffer = ClipboardBuffer { nodes, edges };
        tracing::debug!(nodes = self.buffer.nodes.len(), edges = self.buffer.edges.len(), "copied");
        self.buffer.nodes.len()
    }

    /// Copy, then remove the copied nodes from `graph`.
    ///
    /// Edges touching a removed node go with it, including ones that were
    /// not buffered because their other end was not selected. Returns `true`
    /// if anything was removed.
    pub fn cut(&mut self, graph: &mut Graph) -> bool {
        self.copy(graph);
        if self.buffer.nodes.is_empty() {
            return false;
        }
        let node_ids: HashSet<NodeId> = self.buffer.nodes.iter().map(|n| n.id.clone()).collect();
        let removed_edges = graph.remove_nodes(&node_ids);
        tracing::debug!(nodes = node_ids.len(), edges = removed_edges.len(), "cut");
        true
    }

    /// Paste the buffer with its top-left-most corner at `cursor`.
    ///
    /// Everything already in the graph is deselected; the pasted nodes and
    /// edges end up selected. Returns `None` for an empty buffer.
    pub fn paste(&self, graph: &mut Graph, cursor: Point) -> Option<PasteOutcome> {
        let origin = self.buffer.origin()?;
        let offset = Point::new(cursor.x - origin.x, cursor.y - origin.y);

        graph.deselect_all();

        let mut id_map: HashMap<&NodeId, NodeId> = HashMap::with_capacity(self.buffer.nodes.len());
        let mut outcome = PasteOutcome::default();

        for node in &self.buffer.nodes {
            let id = NodeId::fresh();
            id_map.insert(&node.id, id.clone());
            let mut pasted = node.clone();
            pasted.id = id.clone();
            pasted.position = Point::new(node.position.x + offset.x, node.position.y + offset.y);
            pasted.selected = true;
            graph.add_node(pasted);
            outcome.nodes.push(id);
        }

        for edge in &self.buffer.edges {
            let mut pasted = edge.clone();
            pasted.id = EdgeId::fresh();
            pasted.source = remap(&id_map, &edge.source);
            pasted.target = remap(&id_map, &edge.target);
            pasted.points.translate(offset);
            pasted.selected = true;
            outcome.edges.push(pasted.id.clone());
            graph.add_edge(pasted);
        }

        tracing::debug!(nodes = outcome.nodes.len(), edges = outcome.edges.len(), "pasted");
        Some(outcome)
    }
}

fn remap(id_map: &HashMap<&NodeId, NodeId>, old: &NodeId) -> NodeId {
    match id_map.get(old) {
        Some(new) => new.clone(),
        None => {
            tracing::warn!(node = %old, "pasted edge endpoint not in clipboard, keeping stale id");
            old.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Size;

    fn node(id: &str, x: f32, y: f32) -> Node {
        Node::new(id, Point::new(x, y), Size::new(40.0, 20.0))
    }

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        graph.add_node(node("a", 0.0, 0.0).selected(true));
        graph.add_node(node("b", 50.0, 20.0).selected(true));
        graph.add_node(node("c", 300.0, 300.0));
        graph.add_edge(Edge::new("a-b", "a", "b").with_points([Point::new(25.0, 10.0)]));
        graph.add_edge(Edge::new("b-c", "b", "c"));
        graph
    }

    // ========================================================================
    // copy
    // ========================================================================

    #[test]
    fn test_copy_takes_induced_subgraph() {
        let graph = sample_graph();
        let mut clipboard = Clipboard::new();

        assert_eq!(clipboard.copy(&graph), 2);
        let ids: Vec<&str> = clipboard.buffer().edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a-b"]);
    }

    #[test]
    fn test_copy_without_selection_empties_buffer() {
        let mut graph = sample_graph();
        let mut clipboard = Clipboard::new();
        clipboard.copy(&graph);

        graph.deselect_all();
        assert_eq!(clipboard.copy(&graph), 0);
        assert!(clipboard.buffer().is_empty());
    }

    // ========================================================================
    // cut
    // ========================================================================

    #[test]
    fn test_cut_removes_buffered_nodes_and_dangling_edges() {
        let mut graph = sample_graph();
        let mut clipboard = Clipboard::new();

        assert!(clipboard.cut(&mut graph));
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
        assert_eq!(clipboard.buffer().edges.len(), 1);
    }

    #[test]
    fn test_cut_with_nothing_selected_changes_nothing() {
        let mut graph = sample_graph();
        graph.deselect_all();
        let before = graph.clone();
        let mut clipboard = Clipboard::new();

        assert!(!clipboard.cut(&mut graph));
        assert_eq!(graph, before);
    }

    // ========================================================================
    // paste
    // ========================================================================

    #[test]
    fn test_paste_empty_buffer_is_noop() {
        let mut graph = sample_graph();
        let before = graph.clone();
        assert!(Clipboard::new().paste(&mut graph, Point::new(10.0, 10.0)).is_none());
        assert_eq!(graph, before);
    }

    #[test]
    fn test_paste_offsets_group_to_cursor() {
        let mut graph = sample_graph();
        let mut clipboard = Clipboard::new();
        clipboard.copy(&graph);

        let outcome = clipboard.paste(&mut graph, Point::new(100.0, 100.0)).unwrap();
        let first = graph.node(&outcome.nodes[0]).unwrap();
        let second = graph.node(&outcome.nodes[1]).unwrap();
        assert_eq!(first.position, Point::new(100.0, 100.0));
        assert_eq!(second.position, Point::new(150.0, 120.0));

        let edge = graph.edge(&outcome.edges[0]).unwrap();
        assert_eq!(edge.points.positions(), vec![Point::new(125.0, 110.0)]);
    }

    #[test]
    fn test_paste_uses_fresh_ids_and_remaps_edges() {
        let mut graph = sample_graph();
        let mut clipboard = Clipboard::new();
        clipboard.copy(&graph);

        let outcome = clipboard.paste(&mut graph, Point::new(0.0, 0.0)).unwrap();
        assert_eq!(outcome.nodes.len(), 2);
        assert_ne!(outcome.nodes[0], outcome.nodes[1]);
        assert!(outcome.nodes.iter().all(|id| id.as_str() != "a" && id.as_str() != "b"));

        let edge = graph.edge(&outcome.edges[0]).unwrap();
        assert_ne!(edge.id, EdgeId::new("a-b"));
        assert_eq!(edge.source, outcome.nodes[0]);
        assert_eq!(edge.target, outcome.nodes[1]);
    }

    #[test]
    fn test_paste_selects_only_new_items() {
        let mut graph = sample_graph();
        graph.select_edge(&EdgeId::new("b-c"));
        graph.handle_selection(&NodeId::new("a"), true);
        graph.handle_selection(&NodeId::new("b"), true);
        let mut clipboard = Clipboard::new();
        clipboard.copy(&graph);

        let outcome = clipboard.paste(&mut graph, Point::new(500.0, 0.0)).unwrap();
        let selected = graph.selected_node_ids();
        assert_eq!(selected, outcome.nodes);
        for edge in &graph.edges {
            assert_eq!(edge.selected, outcome.edges.contains(&edge.id));
        }
    }

    #[test]
    fn test_paste_twice_yields_distinct_copies() {
        let mut graph = sample_graph();
        let mut clipboard = Clipboard::new();
        clipboard.copy(&graph);

        let first = clipboard.paste(&mut graph, Point::new(0.0, 0.0)).unwrap();
        let second = clipboard.paste(&mut graph, Point::new(0.0, 0.0)).unwrap();
        assert!(first.nodes.iter().all(|id| !second.nodes.contains(id)));
        assert_eq!(graph.nodes.len(), 7);
    }

    #[test]
    fn test_buffer_origin_is_componentwise_min() {
        let buffer = ClipboardBuffer {
            nodes: vec![node("a", 30.0, 5.0), node("b", 10.0, 40.0)],
            edges: Vec::new(),
        };
        assert_eq!(buffer.origin(), Some(Point::new(10.0, 5.0)));
        assert_eq!(ClipboardBuffer::default().origin(), None);
    }
}
