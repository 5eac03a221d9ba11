//! Response DTOs for the cluster API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::HashMap;

use serde::Serialize;

use crate::cluster::{ClusterStats, ClusterView, Lookup, NodeLoad, NodeView, Placement, Removal};

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
    /// Node holding the key
    pub node: String,
}

impl From<Lookup> for GetResponse {
    fn from(lookup: Lookup) -> Self {
        Self {
            key: lookup.key,
            value: lookup.value,
            node: lookup.node,
        }
    }
}

/// Response body for POST /set/:key
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
    /// Node the key was routed to
    pub node: String,
}

impl From<Placement> for SetResponse {
    fn from(placement: Placement) -> Self {
        Self {
            message: format!("Key '{}' set on node '{}'", placement.key, placement.node),
            key: placement.key,
            node: placement.node,
        }
    }
}

/// Response body for DELETE /delete/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
    /// Node the key was routed to, absent on an empty cluster
    pub node: Option<String>,
    /// Whether a value was actually removed
    pub removed: bool,
}

impl From<Removal> for DeleteResponse {
    fn from(removal: Removal) -> Self {
        Self {
            message: format!("Key '{}' deleted", removal.key),
            key: removal.key,
            node: removal.node,
            removed: removal.removed,
        }
    }
}

/// Response body for POST and DELETE /nodes/:name
#[derive(Debug, Clone, Serialize)]
pub struct NodeResponse {
    /// Success message
    pub message: String,
    /// Node the operation applied to
    pub node: String,
}

impl NodeResponse {
    /// Acknowledges a node addition
    pub fn added(node: impl Into<String>) -> Self {
        let node = node.into();
        Self {
            message: format!("Node '{}' added", node),
            node,
        }
    }

    /// Acknowledges a node removal
    pub fn removed(node: impl Into<String>) -> Self {
        let node = node.into();
        Self {
            message: format!("Node '{}' removed", node),
            node,
        }
    }
}

/// Response body for GET /data/:name
#[derive(Debug, Clone, Serialize)]
pub struct NodeDataResponse {
    /// Full key/value mapping of the node
    pub data: HashMap<String, String>,
}

/// Response body for GET /cluster
#[derive(Debug, Clone, Serialize)]
pub struct ClusterResponse {
    /// Every node's data in membership order
    pub nodes: Vec<NodeView>,
}

impl From<ClusterView> for ClusterResponse {
    fn from(view: ClusterView) -> Self {
        Self { nodes: view.nodes }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of nodes
    pub node_count: usize,
    /// Keys across all nodes
    pub total_entries: usize,
    /// Busiest node relative to the mean
    pub imbalance: f64,
    /// Per-node key counts
    pub nodes: Vec<NodeLoad>,
}

impl From<ClusterStats> for StatsResponse {
    fn from(stats: ClusterStats) -> Self {
        Self {
            imbalance: stats.imbalance(),
            node_count: stats.node_count,
            total_entries: stats.total_entries,
            nodes: stats.nodes,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
