//! HTTP server layer
//!
//! Axum server with:
//! - CORS (configured origins, or permissive)
//! - Request tracing and timeout
//! - Trailing-slash normalization
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
