//! API endpoint handlers, one module per resource.
//!
//! Handlers lock the database, make one synchronous service call and map
//! the result. Nothing is awaited while the connection is held. Password
//! hashing runs on the blocking pool before the lock is taken.

pub mod appointments;
pub mod auth;
pub mod departments;
pub mod doctors;
pub mod health;
pub mod prescriptions;
pub mod users;

use uuid::Uuid;

use crate::api::error::ApiError;
use crate::services::ServiceError;

/// Parse a path id, answering 400 with the structured body on failure.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid id: {raw}")))
}

/// Run CPU-bound service work on tokio's blocking pool.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
        .map_err(ApiError::from)
}
