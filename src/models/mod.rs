//! Request and Response models for the cluster API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::SetValueRequest;
pub use responses::{
    ClusterResponse, DeleteResponse, GetResponse, HealthResponse, NodeDataResponse, NodeResponse,
    SetResponse, StatsResponse,
};
