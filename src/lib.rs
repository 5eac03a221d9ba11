//! Cluster Cache - control surface over a consistent-hashed key-value cluster
//!
//! Tracks node membership, routes keyed writes to a single node and aggregates per-node
//! data into cluster-wide views.

pub mod api;
pub mod cluster;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use config::Config;
pub use error::{ClusterError, Result};
