//! JSON shape of a saved diagram: `{"nodes": [...], "edges": [...]}`.
//!
//! Only (de)serialization lives here; where the bytes go is up to the host.

use crate::error::Result;
use crate::graph::Graph;
use crate::history::GraphSnapshot;

/// Key under which hosts keep the autosaved diagram.
pub const AUTOSAVE_KEY: &str = "autosave.arcio";

/// File extension of saved diagrams.
pub const FILE_EXTENSION: &str = "arcio";

pub fn to_json(graph: &Graph) -> Result<String> {
    Ok(serde_json::to_string(graph)?)
}

pub fn to_json_pretty(graph: &Graph) -> Result<String> {
    Ok(serde_json::to_string_pretty(graph)?)
}

pub fn from_json(json: &str) -> Result<GraphSnapshot> {
    let graph: Graph = serde_json::from_str(json)?;
    Ok(GraphSnapshot::new(graph))
}

/// Restore an autosave if there is a readable one, otherwise an empty graph.
pub fn restore_autosave(stored: Option<&str>) -> GraphSnapshot {
    let Some(json) = stored else {
        return GraphSnapshot::new(Graph::new());
    };
    match from_json(json) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            tracing::warn!(%err, "discarding unreadable autosave");
            GraphSnapshot::new(Graph::new())
        }
    }
}
