//! API Routes
//!
//! Configures the Axum router with all cluster endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_node_handler, cluster_handler, delete_handler, get_handler, health_handler,
    list_nodes_handler, node_data_handler, remove_node_handler, set_handler, stats_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /nodes` - List node names
/// - `POST /nodes/:name` - Add a node
/// - `DELETE /nodes/:name` - Remove a node and its data
/// - `GET /data/:name` - Full data set of one node
/// - `GET /cluster` - Every node's data in one response
/// - `POST /set/:key` - Store a value on the node the key routes to
/// - `DELETE /delete/:key` - Delete a key (idempotent)
/// - `GET /get/:key` - Read a key
/// - `GET /stats` - Key distribution across nodes
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin, the UI is served separately
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/nodes", get(list_nodes_handler))
        .route(
            "/nodes/:name",
            post(add_node_handler).delete(remove_node_handler),
        )
        .route("/data/:name", get(node_data_handler))
        .route("/cluster", get(cluster_handler))
        .route("/set/:key", post(set_handler))
        .route("/delete/:key", delete(delete_handler))
        .route("/get/:key", get(get_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
