//! Cluster Module
//!
//! Membership, routing and aggregation over a set of in-memory key-value nodes.

mod aggregator;
mod node;
mod registry;
mod ring;
mod router;
mod stats;


// Re-export public types
pub use aggregator::{Aggregator, ClusterView, NodeView};
pub use node::{Node, NodeStore};
pub use registry::{Membership, MembershipRegistry};
pub use ring::HashRing;
pub use router::{Lookup, MutationRouter, Placement, Removal};
pub use stats::{ClusterStats, NodeLoad};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Maximum allowed node name length in bytes
pub const MAX_NODE_NAME_LENGTH: usize = 64;
