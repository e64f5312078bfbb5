//! Repository layer: entity-scoped database operations.
//!
//! Each sub-module owns the SQL for one table family. Functions take a plain
//! `&Connection` so they compose inside a caller-managed transaction.

mod appointment;
mod department;
mod doctor;
mod prescription;
mod user;

pub use appointment::*;
pub use department::*;
pub use doctor::*;
pub use prescription::*;
pub use user::*;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use super::DatabaseError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

fn corrupt(field: &str, value: &str) -> DatabaseError {
    DatabaseError::CorruptValue {
        field: field.into(),
        value: value.into(),
    }
}

pub(crate) fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(raw).map_err(|_| corrupt(field, raw))
}

pub(crate) fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, DatabaseError> {
    raw.map(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).map_err(|_| corrupt(field, d)))
        .transpose()
}

pub(crate) fn parse_time(field: &str, raw: Option<&str>) -> Result<Option<NaiveTime>, DatabaseError> {
    raw.map(|t| NaiveTime::parse_from_str(t, TIME_FORMAT).map_err(|_| corrupt(field, t)))
        .transpose()
}

/// Stored timestamps are RFC 3339, or SQLite's `datetime('now')` format
/// for column defaults.
pub(crate) fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|n| n.and_utc())
        })
        .map_err(|_| corrupt(field, raw))
}

/// UUID column read inside a `query_map` closure.
pub(crate) fn uuid_column(row: &rusqlite::Row<'_>, idx: usize) -> Result<Uuid, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
