//! Repository layer — entity-scoped database operations.
//!
//! Free functions over `&rusqlite::Connection` so callers control the
//! transaction scope; the booking workflow runs several of these inside
//! one transaction.

mod appointment;
mod availability;
mod user;

pub use appointment::*;
pub use availability::*;
pub use user::*;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::DatabaseError;

/// Decode a stored `YYYY-MM-DD` column.
fn date_from_column(field: &str, value: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| DatabaseError::MalformedValue {
        field: field.into(),
        value: value.into(),
    })
}

/// Decode a stored `HH:MM:SS` column.
fn time_from_column(field: &str, value: &str) -> Result<NaiveTime, DatabaseError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S").map_err(|_| DatabaseError::MalformedValue {
        field: field.into(),
        value: value.into(),
    })
}

/// Decode a stored `YYYY-MM-DD HH:MM:SS` column.
fn datetime_from_column(field: &str, value: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map_err(|_| {
        DatabaseError::MalformedValue {
            field: field.into(),
            value: value.into(),
        }
    })
}
