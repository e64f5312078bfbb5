//! Application state shared by every HTTP handler.
//!
//! Holds the single SQLite connection behind a `Mutex`. Handlers lock it
//! for the length of one synchronous service call and never across an
//! `.await`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::db;

pub struct CoreState {
    db: Mutex<Connection>,
}

impl CoreState {
    /// Open (or create) the on-disk database and run migrations.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = db::open_database(path)?;
        Ok(Self::with_connection(conn))
    }

    /// Fresh in-memory database, used by tests.
    pub fn in_memory() -> Result<Self, CoreError> {
        let conn = db::open_memory_database()?;
        Ok(Self::with_connection(conn))
    }

    pub fn with_connection(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Borrow the database connection exclusively.
    pub fn lock_db(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.db.lock().map_err(|_| CoreError::LockPoisoned)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
}
