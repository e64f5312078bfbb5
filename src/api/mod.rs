//! HTTP layer: axum router, handlers and server lifecycle.
//!
//! `api_router()` returns a composable `Router`; `start_api_server_on()`
//! binds it and serves it in a background task.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server_on, ApiServer, ServerError};
pub use types::ApiContext;
