//! Membership Registry Module
//!
//! Single source of truth for which nodes exist.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::info;

use crate::cluster::{HashRing, Node, MAX_NODE_NAME_LENGTH};
use crate::error::{ClusterError, Result};

// == Membership ==
/// Registry state guarded as a single unit.
///
/// The listing, the handle map and the ring always change together under the registry's
/// write lock, so readers never see a name without its store or ring positions.
#[derive(Debug)]
pub struct Membership {
    /// Names in insertion order
    order: Vec<String>,
    nodes: HashMap<String, Arc<Node>>,
    ring: HashRing,
}

impl Membership {
    fn new(virtual_nodes: usize) -> Self {
        Self {
            order: Vec::new(),
            nodes: HashMap::new(),
            ring: HashRing::new(virtual_nodes),
        }
    }

    /// Node names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Live node handles in insertion order.
    pub fn handles(&self) -> Vec<Arc<Node>> {
        self.order
            .iter()
            .filter_map(|name| self.nodes.get(name).cloned())
            .collect()
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<Node>> {
        self.nodes
            .get(name)
            .cloned()
            .ok_or_else(|| ClusterError::NotFound(name.to_string()))
    }

    /// Selects the node responsible for `key`.
    pub fn route(&self, key: &str) -> Result<Arc<Node>> {
        let name = self
            .ring
            .node_for_key(key)
            .ok_or(ClusterError::NoNodesAvailable)?;
        self.resolve(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// == Membership Registry ==
/// Tracks the live node set and the ring that routes keys onto it.
#[derive(Debug)]
pub struct MembershipRegistry {
    inner: RwLock<Membership>,
}

impl MembershipRegistry {
    // == Constructor ==
    /// Creates an empty registry.
    ///
    /// # Arguments
    /// * `virtual_nodes` - Ring positions per physical node
    pub fn new(virtual_nodes: usize) -> Self {
        Self {
            inner: RwLock::new(Membership::new(virtual_nodes)),
        }
    }

    /// Creates a registry seeded with `names`, in order.
    ///
    /// Fails on the first invalid or duplicate name.
    pub fn with_nodes<I, S>(virtual_nodes: usize, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut membership = Membership::new(virtual_nodes);
        for name in names {
            register(&mut membership, name.into())?;
        }

        Ok(Self {
            inner: RwLock::new(membership),
        })
    }

    // == Add Node ==
    /// Registers a new, empty node.
    pub async fn add_node(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        let mut membership = self.inner.write().await;
        register(&mut membership, name.clone())?;

        info!("Node '{}' added ({} nodes)", name, membership.len());
        Ok(())
    }

    // == Remove Node ==
    /// Unregisters a node and discards its data.
    pub async fn remove_node(&self, name: &str) -> Result<()> {
        let (node, remaining) = {
            let mut membership = self.inner.write().await;
            let node = membership
                .nodes
                .remove(name)
                .ok_or_else(|| ClusterError::NotFound(name.to_string()))?;
            membership.order.retain(|n| n != name);
            membership.ring.remove(name);
            (node, membership.len())
        };

        // Unreachable through the registry from here; handles taken earlier see it retired.
        node.retire().await;

        info!("Node '{}' removed ({} nodes)", name, remaining);
        Ok(())
    }

    // == List Nodes ==
    /// Current membership in insertion order.
    pub async fn list_nodes(&self) -> Vec<String> {
        self.inner.read().await.names().to_vec()
    }

    // == Resolve ==
    /// Returns the handle for `name`, or `NotFound`.
    pub async fn resolve(&self, name: &str) -> Result<Arc<Node>> {
        self.inner.read().await.resolve(name)
    }

    // == Locate ==
    /// Name of the node the ring currently assigns `key` to.
    pub async fn locate(&self, key: &str) -> Result<String> {
        self.inner
            .read()
            .await
            .ring
            .node_for_key(key)
            .map(String::from)
            .ok_or(ClusterError::NoNodesAvailable)
    }

    /// Holds the membership steady for the lifetime of the guard.
    pub async fn read(&self) -> RwLockReadGuard<'_, Membership> {
        self.inner.read().await
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

/// Validates and inserts `name` into every part of the membership.
fn register(membership: &mut Membership, name: String) -> Result<()> {
    validate_node_name(&name)?;

    if membership.nodes.contains_key(&name) {
        return Err(ClusterError::AlreadyExists(name));
    }

    membership.ring.insert(&name);
    membership
        .nodes
        .insert(name.clone(), Arc::new(Node::new(name.clone())));
    membership.order.push(name);
    Ok(())
}

fn validate_node_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ClusterError::InvalidRequest(
            "Node name cannot be empty".to_string(),
        ));
    }
    if name.len() > MAX_NODE_NAME_LENGTH {
        return Err(ClusterError::InvalidRequest(format!(
            "Node name exceeds maximum length of {} bytes",
            MAX_NODE_NAME_LENGTH
        )));
    }
    Ok(())
}
