//! # IMS API
//!
//! HTTP surface of the inventory dashboard: catalog management, the
//! sale/refund ledger and the sales report.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           IMS API Server                                │
//! │                                                                         │
//! │  Dashboard ──► axum Router ──► auth_middleware ──► routes/* ──► ims-db  │
//! │                    │                (JWT sub =                    │     │
//! │                    │                 acting user)                 ▼     │
//! │                 /health                                        SQLite   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Layered configuration (`ims.toml`, `IMS_*`)
//! - [`auth`] - Bearer token verification
//! - [`error`] - `ApiError` and the status mapping
//! - [`routes`] - Handlers
//! - [`state`] - Shared handles

use axum::middleware;
use axum::routing::get;
use axum::Router;

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

/// Builds the full router (same one the binary serves and the tests drive).
pub fn build_app(state: AppState) -> Router {
    let api = routes::router().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", api)
        .with_state(state)
}
