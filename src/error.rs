//! Business-rule error taxonomy for the scheduling operations.
//!
//! All variants are recoverable at the caller: a `Parse` or `InvalidRange`
//! means re-prompt, `SlotUnavailable` means refresh the slot list,
//! `NotFound` means the reference went stale. `Forbidden` deliberately
//! carries no detail about the resource.

use chrono::NaiveTime;
use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::AppointmentStatus;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid date or time: {0}")]
    Parse(#[from] chrono::ParseError),

    #[error("Slot start {start} must be before end {end}")]
    InvalidRange { start: NaiveTime, end: NaiveTime },

    #[error("Slot unavailable")]
    SlotUnavailable,

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Forbidden")]
    Forbidden,

    #[error("Appointment is already {}", from.as_str())]
    InvalidTransition { from: AppointmentStatus },

    #[error("Email already registered: {email}")]
    EmailInUse { email: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}
