//! API Module
//!
//! HTTP handlers and routing for the cluster control API.
//!
//! # Endpoints
//! - `GET /nodes`, `POST /nodes/:name`, `DELETE /nodes/:name` - Membership
//! - `GET /data/:name`, `GET /cluster` - Node and cluster-wide data
//! - `POST /set/:key`, `DELETE /delete/:key`, `GET /get/:key` - Keyed operations
//! - `GET /stats` - Key distribution
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
