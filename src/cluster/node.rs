//! Node Store Module
//!
//! Per-node key/value storage and the shared handle the registry hands out.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cluster::{MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{ClusterError, Result};

// == Node Store ==
/// In-memory key/value mapping held by a single node.
#[derive(Debug, Default)]
pub struct NodeStore {
    /// Key-value storage
    entries: HashMap<String, String>,
}

impl NodeStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Get ==
    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    // == Set ==
    /// Stores a key-value pair, overwriting any previous value.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    pub fn set(&mut self, key: String, value: String) -> Result<()> {
        validate_key(&key)?;

        if value.len() > MAX_VALUE_SIZE {
            return Err(ClusterError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        self.entries.insert(key, value);
        Ok(())
    }

    // == Delete ==
    /// Removes `key` if present.
    ///
    /// Returns whether a value was actually removed. Deleting an absent key is not an error.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Snapshot ==
    /// Returns an owned copy of the full mapping.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries.clone()
    }

    // == Length ==
    /// Returns the number of keys held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Checks a key against the length limits.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ClusterError::InvalidRequest(
            "Key cannot be empty".to_string(),
        ));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(ClusterError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

// == Node ==
/// A live cluster member: its immutable name plus a lock-protected store.
///
/// The registry owns the only long-lived handle. Once [`Node::retire`] runs the store is
/// dropped, so any handle that outlived the registry entry observes the node as gone rather
/// than reading or writing discarded data.
#[derive(Debug)]
pub struct Node {
    name: String,
    store: RwLock<Option<NodeStore>>,
}

impl Node {
    /// Creates a live node with an empty store.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store: RwLock::new(Some(NodeStore::new())),
        }
    }

    /// The node's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads a key, or `NotFound` once the node has been retired.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let store = self.store.read().await;
        let store = store.as_ref().ok_or_else(|| self.gone())?;
        Ok(store.get(key))
    }

    /// Stores a key under the node's write lock.
    pub async fn set(&self, key: String, value: String) -> Result<()> {
        let mut store = self.store.write().await;
        let store = store.as_mut().ok_or_else(|| self.gone())?;
        store.set(key, value)
    }

    /// Removes a key, returning whether it was present.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let mut store = self.store.write().await;
        let store = store.as_mut().ok_or_else(|| self.gone())?;
        Ok(store.delete(key))
    }

    /// Copies the node's mapping under its read lock.
    ///
    /// Returns `None` once the node has been retired.
    pub async fn snapshot(&self) -> Option<HashMap<String, String>> {
        self.store.read().await.as_ref().map(NodeStore::snapshot)
    }

    /// Discards the store and its data.
    pub async fn retire(&self) {
        let discarded = self.store.write().await.take();
        if let Some(store) = discarded {
            debug!("Node '{}' retired, discarding {} keys", self.name, store.len());
        }
    }

    /// Holds the store's read lock, keeping the node busy until the guard drops.
    #[cfg(test)]
    pub(crate) async fn hold(&self) -> tokio::sync::RwLockReadGuard<'_, Option<NodeStore>> {
        self.store.read().await
    }

    fn gone(&self) -> ClusterError {
        ClusterError::NotFound(self.name.clone())
    }
}
