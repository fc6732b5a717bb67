//! # REST API
//!
//! Public HTTP surface using axum.
//!
//! # Endpoints
//!
//! - `GET /api/quotes/` - aggregate quote comparison for a corridor
//! - `GET /api/providers/` - registered providers
//! - `GET /api/providers/{id}/` - provider details
//! - `GET /api/health` - liveness check
//!
//! # Usage
//!
//! ```ignore
//! use remitscan::api::rest::{create_router, AppState};
//!
//! let router = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    AppState, ErrorBody, ErrorResponse, ProviderDetail, ProviderInfo, QuotesQuery,
    SurfaceRateLimiter,
};
pub use routes::create_router;
