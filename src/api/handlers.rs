//! API Handlers
//!
//! HTTP request handlers for each cluster endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cluster::{Aggregator, ClusterStats, MembershipRegistry, MutationRouter};
use crate::error::{ClusterError, Result};
use crate::models::{
    ClusterResponse, DeleteResponse, GetResponse, HealthResponse, NodeDataResponse, NodeResponse,
    SetResponse, SetValueRequest, StatsResponse,
};

/// Application state shared across all handlers.
///
/// All three components share one registry, so each `AppState` is an independent cluster.
#[derive(Clone)]
pub struct AppState {
    /// Cluster membership
    pub registry: Arc<MembershipRegistry>,
    /// Cluster-wide reads
    pub aggregator: Aggregator,
    /// Keyed reads and writes
    pub router: MutationRouter,
}

impl AppState {
    /// Creates a new AppState around the given registry.
    pub fn new(registry: MembershipRegistry) -> Self {
        let registry = Arc::new(registry);
        Self {
            aggregator: Aggregator::new(registry.clone()),
            router: MutationRouter::new(registry.clone()),
            registry,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Seeds the registry with the configured initial nodes.
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        let registry =
            MembershipRegistry::with_nodes(config.virtual_nodes, config.initial_nodes.clone())?;
        Ok(Self::new(registry))
    }
}

/// Handler for GET /nodes
pub async fn list_nodes_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.registry.list_nodes().await)
}

/// Handler for POST /nodes/:name
pub async fn add_node_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<NodeResponse>> {
    state.registry.add_node(name.clone()).await?;
    Ok(Json(NodeResponse::added(name)))
}

/// Handler for DELETE /nodes/:name
pub async fn remove_node_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<NodeResponse>> {
    state.registry.remove_node(&name).await?;
    Ok(Json(NodeResponse::removed(name)))
}

/// Handler for GET /data/:name
pub async fn node_data_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<NodeDataResponse>> {
    let data = state.aggregator.fetch_node(&name).await?;
    Ok(Json(NodeDataResponse { data }))
}

/// Handler for GET /cluster
///
/// Returns every node's data in one round trip.
pub async fn cluster_handler(State(state): State<AppState>) -> Json<ClusterResponse> {
    Json(state.aggregator.fetch_all().await.into())
}

/// Handler for POST /set/:key
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetValueRequest>,
) -> Result<Json<SetResponse>> {
    // Validate request
    if let Some(error_msg) = req.validate(&key) {
        return Err(ClusterError::InvalidRequest(error_msg));
    }

    let placement = state.router.set_key(key, req.value).await?;
    Ok(Json(placement.into()))
}

/// Handler for DELETE /delete/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let removal = state.router.delete_key(key).await?;
    Ok(Json(removal.into()))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let lookup = state.router.get_key(&key).await?;
    Ok(Json(lookup.into()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let view = state.aggregator.fetch_all().await;
    Json(ClusterStats::from_view(&view).into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
