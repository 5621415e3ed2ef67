//! Risk scoring HTTP API.
//!
//! Exposes the scoring pipeline over HTTP. The router is composable:
//! `risk_api_router()` returns a `Router` that can be mounted on any axum
//! server instance, and `start_risk_server()` runs it on its own listener.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::risk_api_router;
pub use server::{start_risk_server, RiskServer, ServerError, ServerSession};
pub use types::ApiContext;
