//! Error types for the cluster core and server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cluster Error Enum ==
/// Unified error type for the cluster core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    /// Named node is not a member of the cluster
    #[error("Node not found: {0}")]
    NotFound(String),

    /// Key is absent on the node responsible for it
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// A node with this name is already registered
    #[error("Node already exists: {0}")]
    AlreadyExists(String),

    /// Mutation attempted against an empty cluster
    #[error("No nodes available in the cluster")]
    NoNodesAvailable,

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ClusterError {
    fn into_response(self) -> Response {
        let status = match &self {
            ClusterError::NotFound(_) | ClusterError::KeyNotFound(_) => StatusCode::NOT_FOUND,
            ClusterError::AlreadyExists(_) => StatusCode::CONFLICT,
            ClusterError::NoNodesAvailable => StatusCode::SERVICE_UNAVAILABLE,
            ClusterError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cluster core.
pub type Result<T> = std::result::Result<T, ClusterError>;
