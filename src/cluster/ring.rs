//! Hash Ring Module
//!
//! Consistent-hash ring mapping keys to node names.
//!
//! Each physical node owns `virtual_nodes` positions on a `u64` ring, hashed from
//! `"{name}:{i}"` with xxhash64. A key is hashed onto the same ring and belongs to the first
//! position at or clockwise after it, wrapping to the start past the last position. Adding a
//! node only claims the segments preceding its own positions; removing one collapses its
//! segments onto their successors.

use xxhash_rust::xxh64::xxh64;

/// Seed shared by key and position hashing; changing it reshuffles every placement.
const RING_SEED: u64 = 0;

// == Hash Ring ==
#[derive(Debug, Clone)]
pub struct HashRing {
    virtual_nodes: usize,
    /// Positions sorted by (hash, node name)
    positions: Vec<(u64, String)>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring. `virtual_nodes` is clamped to at least one.
    pub fn new(virtual_nodes: usize) -> Self {
        Self {
            virtual_nodes: virtual_nodes.max(1),
            positions: Vec::new(),
        }
    }

    /// Places all of `name`'s virtual nodes on the ring.
    pub fn insert(&mut self, name: &str) {
        for i in 0..self.virtual_nodes {
            let position = (hash_position(name, i), name.to_string());
            let idx = self
                .positions
                .binary_search(&position)
                .unwrap_or_else(|idx| idx);
            self.positions.insert(idx, position);
        }
    }

    /// Removes every position owned by `name`.
    pub fn remove(&mut self, name: &str) {
        self.positions.retain(|(_, owner)| owner != name);
    }

    /// Returns the node responsible for `key`, or `None` if the ring is empty.
    pub fn node_for_key(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }

        let hash = hash_key(key);
        let idx = self.positions.partition_point(|(position, _)| *position < hash);
        let idx = if idx == self.positions.len() { 0 } else { idx };

        Some(self.positions[idx].1.as_str())
    }

    /// Total number of positions on the ring.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn hash_position(name: &str, index: usize) -> u64 {
    xxh64(format!("{}:{}", name, index).as_bytes(), RING_SEED)
}

fn hash_key(key: &str) -> u64 {
    xxh64(key.as_bytes(), RING_SEED)
}
