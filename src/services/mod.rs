//! Domain services: validation and cross-entity rules on top of the
//! repository layer. Every function takes a `&Connection` and is synchronous.

pub mod appointments;
pub mod departments;
pub mod doctors;
pub mod prescriptions;
pub mod seed;
pub mod users;

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Account is pending admin approval")]
    PendingApproval,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Password hashing error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Database error: {0}")]
    Database(DatabaseError),
}

impl ServiceError {
    pub(crate) fn not_found(entity: &str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => ServiceError::NotFound {
                entity: entity_type,
                id,
            },
            DatabaseError::ConstraintViolation(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Database(other),
        }
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(err: rusqlite::Error) -> Self {
        DatabaseError::from(err).into()
    }
}

/// Reject blank required text fields.
pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}
