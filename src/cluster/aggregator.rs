//! Aggregator Module
//!
//! Builds cluster-wide views out of independent per-node snapshots.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::cluster::{MembershipRegistry, Node};
use crate::error::{ClusterError, Result};

// == Cluster View ==
/// One node's contribution to a [`ClusterView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView {
    pub name: String,
    pub data: HashMap<String, String>,
}

/// Every live node's data, in membership order.
///
/// Each node is read at its own instant; the view is not a point-in-time snapshot of the
/// whole cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterView {
    pub nodes: Vec<NodeView>,
}

impl ClusterView {
    /// Node names in view order.
    pub fn names(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.name.as_str()).collect()
    }

    /// Total number of keys across all nodes.
    pub fn total_entries(&self) -> usize {
        self.nodes.iter().map(|node| node.data.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// == Aggregator ==
#[derive(Debug, Clone)]
pub struct Aggregator {
    registry: Arc<MembershipRegistry>,
}

impl Aggregator {
    pub fn new(registry: Arc<MembershipRegistry>) -> Self {
        Self { registry }
    }

    // == Fetch All ==
    /// Snapshots every node listed at call time, concurrently.
    ///
    /// Nodes removed after the listing was taken are left out of the result instead of
    /// failing the whole fetch. No retries are attempted.
    pub async fn fetch_all(&self) -> ClusterView {
        let handles = self.registry.read().await.handles();
        snapshot_handles(handles).await
    }

    // == Fetch Node ==
    /// Full mapping held by one node.
    pub async fn fetch_node(&self, name: &str) -> Result<HashMap<String, String>> {
        let node = self.registry.resolve(name).await?;
        node.snapshot()
            .await
            .ok_or_else(|| ClusterError::NotFound(name.to_string()))
    }
}

/// Snapshots each handle in its own task and reassembles the results in input order.
///
/// Handles that were retired before their snapshot ran are skipped.
async fn snapshot_handles(handles: Vec<Arc<Node>>) -> ClusterView {
    let listed = handles.len();

    let mut tasks = JoinSet::new();
    for (idx, node) in handles.into_iter().enumerate() {
        tasks.spawn(async move {
            let name = node.name().to_string();
            (idx, name, node.snapshot().await)
        });
    }

    let mut fetched: Vec<(usize, NodeView)> = Vec::with_capacity(listed);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, name, Some(data))) => fetched.push((idx, NodeView { name, data })),
            Ok((_, name, None)) => {
                debug!("Node '{}' was removed during fetch, skipping", name);
            }
            Err(e) => warn!("Node fetch task failed: {}", e),
        }
    }

    fetched.sort_by_key(|(idx, _)| *idx);
    ClusterView {
        nodes: fetched.into_iter().map(|(_, view)| view).collect(),
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(names: &[&str]) -> (Arc<MembershipRegistry>, Aggregator) {
        let registry = Arc::new(MembershipRegistry::with_nodes(3, names.iter().copied()).unwrap());
        let aggregator = Aggregator::new(registry.clone());
        (registry, aggregator)
    }

    #[tokio::test]
    async fn test_fetch_all_empty_cluster() {
        let (_, aggregator) = seeded(&[]);
        let view = aggregator.fetch_all().await;
        assert!(view.is_empty());
        assert_eq!(view.total_entries(), 0);
    }

    #[tokio::test]
    async fn test_fetch_all_preserves_membership_order() {
        let names = ["zulu", "alpha", "mike", "bravo", "x-ray"];
        let (registry, aggregator) = seeded(&names);

        registry
            .resolve("mike")
            .await
            .unwrap()
            .set("k".into(), "v".into())
            .await
            .unwrap();

        let view = aggregator.fetch_all().await;
        assert_eq!(view.names(), names.to_vec());
        assert_eq!(view.total_entries(), 1);
        assert_eq!(view.nodes[2].data.get("k").map(String::as_str), Some("v"));
    }

    #[tokio::test]
    async fn test_fetch_node() {
        let (registry, aggregator) = seeded(&["A"]);
        registry
            .resolve("A")
            .await
            .unwrap()
            .set("color".into(), "blue".into())
            .await
            .unwrap();

        let data = aggregator.fetch_node("A").await.unwrap();
        assert_eq!(data.get("color").map(String::as_str), Some("blue"));

        assert_eq!(
            aggregator.fetch_node("B").await,
            Err(ClusterError::NotFound("B".into()))
        );
    }

    #[tokio::test]
    async fn test_fetch_all_after_removal() {
        let (registry, aggregator) = seeded(&["A", "B"]);
        registry.remove_node("A").await.unwrap();

        let view = aggregator.fetch_all().await;
        assert_eq!(view.names(), vec!["B"]);
    }

    #[tokio::test]
    async fn test_retired_handle_is_skipped() {
        let handles: Vec<Arc<Node>> = ["A", "B", "C"]
            .into_iter()
            .map(|name| Arc::new(Node::new(name)))
            .collect();
        for node in &handles {
            node.set("owner".into(), node.name().to_string()).await.unwrap();
        }
        handles[1].retire().await;

        let view = snapshot_handles(handles).await;

        assert_eq!(view.names(), vec!["A", "C"]);
        assert_eq!(view.nodes[0].data.get("owner").map(String::as_str), Some("A"));
        assert_eq!(view.nodes[1].data.get("owner").map(String::as_str), Some("C"));
        assert_eq!(view.total_entries(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_fetch_all_tolerates_concurrent_removal() {
        let names: Vec<String> = (0..16).map(|i| format!("node{}", i)).collect();
        let registry = Arc::new(MembershipRegistry::with_nodes(3, names.clone()).unwrap());
        let aggregator = Aggregator::new(registry.clone());

        let remover = {
            let registry = registry.clone();
            let names = names.clone();
            tokio::spawn(async move {
                for name in names.iter().step_by(2) {
                    registry.remove_node(name).await.unwrap();
                    tokio::task::yield_now().await;
                }
            })
        };

        for _ in 0..20 {
            let view = aggregator.fetch_all().await;
            let got = view.names();
            // Whatever survived must appear in original listing order
            let positions: Vec<usize> = got
                .iter()
                .map(|name| names.iter().position(|n| n == name).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }

        remover.await.unwrap();
        let view = aggregator.fetch_all().await;
        assert_eq!(view.nodes.len(), 8);
    }
}
