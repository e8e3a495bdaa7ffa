use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use log::{info, warn};
use crate::error::TopologyError;
use crate::{Capacity, RouterId};
use super::Topology;

/// Test-graph document: `{ "info": [...], "nodes": [{"id"}], "edges": [{"node_1", "node_2", "capacity"}] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyFile {
    #[serde(default)]
    pub info: Vec<String>,
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: RouterId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub node_1: RouterId,
    pub node_2: RouterId,
    pub capacity: Capacity,
}

impl FromStr for TopologyFile {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl TopologyFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    /// Builds the topology. A duplicated edge is reported and skipped, any other
    /// inconsistency aborts the build.
    pub fn build(&self) -> Result<Topology, TopologyError> {
        let mut topology = Topology::new();

        for node in &self.nodes {
            topology.add_router(node.id)?;
        }

        for edge in &self.edges {
            match topology.add_link(edge.node_1, edge.node_2, edge.capacity) {
                Ok(()) => {}
                Err(e @ TopologyError::DuplicateLink { .. }) => {
                    warn!("Skipping edge: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Topology built: {} routers, {} links",
            topology.router_count(),
            topology.link_count()
        );
        Ok(topology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPH: &str = r#"{
        "info": ["triangle"],
        "nodes": [{"id": 1}, {"id": 2}, {"id": 3}],
        "edges": [
            {"node_1": 1, "node_2": 2, "capacity": 100},
            {"node_1": 2, "node_2": 3, "capacity": 40},
            {"node_1": 3, "node_2": 2, "capacity": 999},
            {"node_1": 3, "node_2": 1, "capacity": 10}
        ]
    }"#;

    #[test]
    fn parses_and_skips_duplicate_edges() {
        let file: TopologyFile = GRAPH.parse().unwrap();
        assert_eq!(file.info, vec!["triangle".to_string()]);
        assert_eq!(file.nodes.len(), 3);

        let topology = file.build().unwrap();
        assert_eq!(topology.router_count(), 3);
        assert_eq!(topology.link_count(), 3);
        assert_eq!(topology.link(3, 2).map(|l| l.capacity), Some(40));
    }

    #[test]
    fn edge_to_missing_node_fails() {
        let file: TopologyFile = r#"{
            "nodes": [{"id": 1}],
            "edges": [{"node_1": 1, "node_2": 2, "capacity": 5}]
        }"#
        .parse()
        .unwrap();
        assert!(matches!(file.build(), Err(TopologyError::UnknownRouter(2))));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let parsed = "{ \"nodes\": 3 }".parse::<TopologyFile>();
        assert!(matches!(parsed, Err(TopologyError::Parse(_))));
    }
}
