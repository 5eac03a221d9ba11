//! Cluster Statistics Module
//!
//! Key distribution figures derived from a cluster view.

use serde::Serialize;

use crate::cluster::ClusterView;

/// Number of keys held by one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeLoad {
    pub name: String,
    pub entries: usize,
}

// == Cluster Stats ==
/// Tracks how keys are spread over the cluster.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterStats {
    /// Number of nodes present in the view
    pub node_count: usize,
    /// Keys summed over all nodes
    pub total_entries: usize,
    /// Per-node key counts in membership order
    pub nodes: Vec<NodeLoad>,
}

impl ClusterStats {
    /// Summarizes `view`.
    pub fn from_view(view: &ClusterView) -> Self {
        let nodes: Vec<NodeLoad> = view
            .nodes
            .iter()
            .map(|node| NodeLoad {
                name: node.name.clone(),
                entries: node.data.len(),
            })
            .collect();

        Self {
            node_count: nodes.len(),
            total_entries: nodes.iter().map(|load| load.entries).sum(),
            nodes,
        }
    }

    // == Imbalance ==
    /// Ratio of the busiest node's key count to the mean.
    ///
    /// Returns 0.0 for an empty cluster or one holding no keys.
    pub fn imbalance(&self) -> f64 {
        if self.node_count == 0 || self.total_entries == 0 {
            return 0.0;
        }

        let max = self.nodes.iter().map(|load| load.entries).max().unwrap_or(0);
        let mean = self.total_entries as f64 / self.node_count as f64;
        max as f64 / mean
    }
}
