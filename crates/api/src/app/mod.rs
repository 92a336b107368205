//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: in-memory stores, bus and listener worker
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs and JSON mapping
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{build_services, AppServices, BreweryServices};

/// Base path of the versioned API.
pub const API_V1: &str = "/api/v1";

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest(API_V1, routes::router())
        .layer(Extension(services))
        .layer(TraceLayer::new_for_http())
}
