//! Mutation Router Module
//!
//! Applies keyed reads and writes to the single node the ring selects.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::cluster::node::validate_key;
use crate::cluster::{MembershipRegistry, Node};
use crate::error::{ClusterError, Result};

/// Where a write landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub key: String,
    pub node: String,
}

/// Outcome of a delete. `node` is `None` when the cluster was empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removal {
    pub key: String,
    pub node: Option<String>,
    pub removed: bool,
}

/// A value read back through the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lookup {
    pub key: String,
    pub value: String,
    pub node: String,
}

// == Mutation Router ==
/// Routes each key to exactly one node.
///
/// The registry's read lock is held only for the ring lookup. The node call runs on the
/// returned handle, so a busy node never holds up membership changes or operations routed
/// elsewhere. If the owner is removed between lookup and call, the key is routed once more
/// against the new membership.
#[derive(Debug, Clone)]
pub struct MutationRouter {
    registry: Arc<MembershipRegistry>,
}

impl MutationRouter {
    pub fn new(registry: Arc<MembershipRegistry>) -> Self {
        Self { registry }
    }

    // == Set Key ==
    /// Stores `value` under `key` on the node responsible for it.
    pub async fn set_key(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Placement> {
        let key = key.into();
        let value = value.into();
        validate_key(&key)?;

        let (node, ()) = self
            .on_owner(&key, |node| {
                let (key, value) = (key.clone(), value.clone());
                async move { node.set(key, value).await }
            })
            .await?;
        debug!("Key '{}' set on node '{}'", key, node.name());

        Ok(Placement {
            key,
            node: node.name().to_string(),
        })
    }

    // == Delete Key ==
    /// Removes `key` from the node responsible for it.
    ///
    /// Succeeds whether or not the key existed, including on an empty cluster.
    pub async fn delete_key(&self, key: impl Into<String>) -> Result<Removal> {
        let key = key.into();
        validate_key(&key)?;

        let routed = self
            .on_owner(&key, |node| {
                let key = key.clone();
                async move { node.delete(&key).await }
            })
            .await;

        let (node, removed) = match routed {
            Ok(outcome) => outcome,
            Err(ClusterError::NoNodesAvailable) => {
                return Ok(Removal {
                    key,
                    node: None,
                    removed: false,
                })
            }
            Err(e) => return Err(e),
        };

        debug!(
            "Key '{}' delete on node '{}' (removed: {})",
            key,
            node.name(),
            removed
        );

        Ok(Removal {
            key,
            node: Some(node.name().to_string()),
            removed,
        })
    }

    // == Get Key ==
    /// Reads `key` from the node responsible for it.
    pub async fn get_key(&self, key: &str) -> Result<Lookup> {
        validate_key(key)?;

        let (node, value) = self
            .on_owner(key, |node| async move { node.get(key).await })
            .await?;
        let value = value.ok_or_else(|| ClusterError::KeyNotFound(key.to_string()))?;

        Ok(Lookup {
            key: key.to_string(),
            value,
            node: node.name().to_string(),
        })
    }

    /// Runs `op` on the node owning `key`, routing again once if that node was retired
    /// after the lookup.
    async fn on_owner<T, F, Fut>(&self, key: &str, op: F) -> Result<(Arc<Node>, T)>
    where
        F: Fn(Arc<Node>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let node = self.owner(key).await?;
        match op(Arc::clone(&node)).await {
            Err(ClusterError::NotFound(_)) => {
                debug!("Node '{}' left while routing '{}', rerouting", node.name(), key);
                let node = self.owner(key).await?;
                let outcome = op(Arc::clone(&node)).await?;
                Ok((node, outcome))
            }
            result => result.map(|outcome| (node, outcome)),
        }
    }

    async fn owner(&self, key: &str) -> Result<Arc<Node>> {
        let membership = self.registry.read().await;
        membership.route(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Aggregator;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn cluster(names: &[&str]) -> (Arc<MembershipRegistry>, MutationRouter, Aggregator) {
        let registry = Arc::new(MembershipRegistry::with_nodes(3, names.iter().copied()).unwrap());
        (
            registry.clone(),
            MutationRouter::new(registry.clone()),
            Aggregator::new(registry),
        )
    }

    async fn key_owned_by(registry: &MembershipRegistry, name: &str) -> String {
        let mut i = 0;
        loop {
            let key = format!("key{}", i);
            if registry.locate(&key).await.unwrap() == name {
                return key;
            }
            i += 1;
        }
    }

    #[tokio::test]
    async fn test_set_on_empty_cluster_fails() {
        let (_, router, _) = cluster(&[]);
        assert_eq!(
            router.set_key("color", "red").await,
            Err(ClusterError::NoNodesAvailable)
        );
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (_, router, _) = cluster(&["node0", "node1", "node2"]);

        let placement = router.set_key("color", "blue").await.unwrap();
        let lookup = router.get_key("color").await.unwrap();

        assert_eq!(lookup.value, "blue");
        assert_eq!(lookup.node, placement.node);
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let (_, router, _) = cluster(&["node0"]);
        assert_eq!(
            router.get_key("nope").await,
            Err(ClusterError::KeyNotFound("nope".into()))
        );
    }

    #[tokio::test]
    async fn test_get_on_empty_cluster() {
        let (_, router, _) = cluster(&[]);
        assert_eq!(
            router.get_key("k").await,
            Err(ClusterError::NoNodesAvailable)
        );
    }

    #[tokio::test]
    async fn test_routing_is_deterministic() {
        let (registry, router, _) = cluster(&["node0", "node1", "node2", "node3"]);

        let first = router.set_key("session", "1").await.unwrap();
        let second = router.set_key("session", "2").await.unwrap();

        assert_eq!(first.node, second.node);
        assert_eq!(registry.locate("session").await.unwrap(), first.node);
    }

    #[tokio::test]
    async fn test_set_touches_exactly_one_node() {
        let (_, router, aggregator) = cluster(&["node0", "node1", "node2"]);

        let placement = router.set_key("k", "v").await.unwrap();
        let view = aggregator.fetch_all().await;

        let holders: Vec<&str> = view
            .nodes
            .iter()
            .filter(|node| node.data.contains_key("k"))
            .map(|node| node.name.as_str())
            .collect();
        assert_eq!(holders, vec![placement.node.as_str()]);
        assert_eq!(view.total_entries(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_, router, aggregator) = cluster(&["node0", "node1"]);
        router.set_key("a", "1").await.unwrap();
        router.set_key("b", "2").await.unwrap();

        let first = router.delete_key("a").await.unwrap();
        let after_first = aggregator.fetch_all().await;
        let second = router.delete_key("a").await.unwrap();
        let after_second = aggregator.fetch_all().await;

        assert!(first.removed);
        assert!(!second.removed);
        assert_eq!(first.node, second.node);
        assert_eq!(after_first, after_second);
        assert_eq!(after_second.total_entries(), 1);
    }

    #[tokio::test]
    async fn test_delete_on_empty_cluster_succeeds() {
        let (_, router, _) = cluster(&[]);
        let removal = router.delete_key("k").await.unwrap();
        assert_eq!(removal.node, None);
        assert!(!removal.removed);
    }

    #[tokio::test]
    async fn test_invalid_keys_rejected() {
        let (_, router, _) = cluster(&["node0"]);
        assert!(matches!(
            router.set_key("", "v").await,
            Err(ClusterError::InvalidRequest(_))
        ));
        assert!(matches!(
            router.get_key("").await,
            Err(ClusterError::InvalidRequest(_))
        ));
        assert!(matches!(
            router.delete_key("").await,
            Err(ClusterError::InvalidRequest(_))
        ));
        assert!(matches!(
            router.delete_key("k".repeat(300)).await,
            Err(ClusterError::InvalidRequest(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_busy_node_does_not_block_other_nodes() {
        let (registry, router, _) = cluster(&["A", "B"]);
        let key_a = key_owned_by(&registry, "A").await;
        let key_b = key_owned_by(&registry, "B").await;

        let node_a = registry.resolve("A").await.unwrap();
        let busy = node_a.hold().await;

        let pending_set = tokio::spawn({
            let router = router.clone();
            async move { router.set_key(key_a, "1").await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        let pending_add = tokio::spawn({
            let registry = Arc::clone(&registry);
            async move { registry.add_node("C").await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let placement = tokio::time::timeout(Duration::from_millis(500), router.set_key(key_b, "2"))
            .await
            .expect("set on an idle node stalled behind a busy one")
            .unwrap();
        assert_ne!(placement.node, "A");
        assert!(!pending_set.is_finished());

        drop(busy);
        assert_eq!(pending_set.await.unwrap().unwrap().node, "A");
        pending_add.await.unwrap().unwrap();
        assert_eq!(registry.list_nodes().await, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_owner_removed_after_lookup_is_rerouted() {
        let (registry, router, _) = cluster(&["A", "B"]);
        let key = key_owned_by(&registry, "A").await;
        let raced = AtomicBool::new(false);

        let (node, ()) = router
            .on_owner(&key, |node| {
                let registry = Arc::clone(&registry);
                let first = !raced.swap(true, Ordering::SeqCst);
                let key = key.clone();
                async move {
                    if first {
                        registry.remove_node(node.name()).await.unwrap();
                    }
                    node.set(key, "v".into()).await
                }
            })
            .await
            .unwrap();

        assert_eq!(node.name(), "B");
        let lookup = router.get_key(&key).await.unwrap();
        assert_eq!(lookup.node, "B");
        assert_eq!(lookup.value, "v");
    }
}
