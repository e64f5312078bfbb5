pub mod sqlite;
pub mod repository;

pub use sqlite::*;
pub use repository::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Unreadable stored value for {field}: {value}")]
    CorruptValue { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),
}

impl From<rusqlite::Error> for DatabaseError {
    /// UNIQUE / CHECK / FOREIGN KEY failures become `ConstraintViolation`
    /// so callers can tell a conflict from an I/O failure.
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DatabaseError::ConstraintViolation(
                    message.clone().unwrap_or_else(|| err.to_string()),
                )
            }
            _ => DatabaseError::Sqlite(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_failure_maps_to_constraint_violation() {
        let conn = open_memory_database().unwrap();
        conn.execute(
            "INSERT INTO departments (id, name, active) VALUES ('d1', 'Cardiology', 1)",
            [],
        )
        .unwrap();
        let err: DatabaseError = conn
            .execute(
                "INSERT INTO departments (id, name, active) VALUES ('d2', 'Cardiology', 1)",
                [],
            )
            .unwrap_err()
            .into();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn other_failures_stay_sqlite() {
        let conn = open_memory_database().unwrap();
        let err: DatabaseError = conn
            .execute("SELECT * FROM no_such_table", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DatabaseError::Sqlite(_)));
    }
}
