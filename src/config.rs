//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Ring positions owned by each physical node
    pub virtual_nodes: usize,
    /// Nodes registered at startup, in listing order
    pub initial_nodes: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `VIRTUAL_NODES` - Virtual nodes per physical node (default: 3, minimum 1)
    /// - `INITIAL_NODES` - Comma-separated node names (default: `node0,node1,node2`);
    ///   an empty string starts with an empty cluster
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            virtual_nodes: env::var("VIRTUAL_NODES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.virtual_nodes),
            initial_nodes: env::var("INITIAL_NODES")
                .map(|v| parse_node_list(&v))
                .unwrap_or(defaults.initial_nodes),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8000,
            virtual_nodes: 3,
            initial_nodes: (0..3).map(|i| format!("node{}", i)).collect(),
        }
    }
}

/// Splits a comma-separated node list, dropping blanks.
fn parse_node_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}
