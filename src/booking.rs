//! Appointment Workflow — booking, cancellation, completion, history.
//!
//! Sole writer of appointment state and the only module allowed to flip a
//! slot's booked flag. State machine per appointment:
//! `Booked -> Completed` or `Booked -> Cancelled`, both terminal.
//!
//! `book` and `cancel` each touch two tables (appointments +
//! availabilities) and wrap the writes in a single transaction so the
//! slot flag and the appointment row can never diverge.

use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{repository, DatabaseError};
use crate::error::ScheduleError;
use crate::models::{Appointment, AppointmentStatus};
use crate::slots;

/// Book a slot for a patient.
///
/// Claims the unbooked slot matching (doctor, date, start_time) and
/// inserts the appointment in one transaction: both rows commit or
/// neither does. A lost race surfaces as `SlotUnavailable`; the caller
/// should re-fetch the slot list and retry.
pub fn book(
    conn: &Connection,
    patient_id: Uuid,
    doctor_id: Uuid,
    date: &str,
    start_time: &str,
) -> Result<Appointment, ScheduleError> {
    let date = slots::parse_date(date)?;
    let time = slots::parse_time(start_time)?;

    let tx = conn.unchecked_transaction().map_err(DatabaseError::from)?;

    let Some(availability_id) = slots::mark_booked(&tx, doctor_id, date, time)? else {
        return Err(ScheduleError::SlotUnavailable);
    };

    let appt = Appointment {
        id: Uuid::new_v4(),
        patient_id,
        doctor_id,
        availability_id,
        date_time: date.and_time(time),
        status: AppointmentStatus::Booked,
        diagnosis: None,
        prescription: None,
    };
    repository::insert_appointment(&tx, &appt)?;
    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(
        appointment_id = %appt.id,
        patient_id = %patient_id,
        doctor_id = %doctor_id,
        date_time = %appt.date_time,
        "Appointment booked"
    );
    Ok(appt)
}

/// Cancel a booked appointment on behalf of its patient.
///
/// The ownership check runs before the status check so an unauthorized
/// caller learns nothing beyond "forbidden". Releasing the slot is
/// best-effort: a missing slot row is logged and tolerated.
pub fn cancel(
    conn: &Connection,
    appointment_id: Uuid,
    requesting_patient_id: Uuid,
) -> Result<Appointment, ScheduleError> {
    let appt = repository::get_appointment(conn, &appointment_id)?.ok_or_else(|| {
        ScheduleError::NotFound {
            entity: "Appointment",
            id: appointment_id.to_string(),
        }
    })?;

    if appt.patient_id != requesting_patient_id {
        return Err(ScheduleError::Forbidden);
    }
    if appt.status.is_terminal() {
        return Err(ScheduleError::InvalidTransition { from: appt.status });
    }

    let tx = conn.unchecked_transaction().map_err(DatabaseError::from)?;
    if !repository::mark_cancelled(&tx, &appointment_id)? {
        // Row changed between the read above and this write.
        return Err(stale_transition_error(&tx, appointment_id)?);
    }
    slots::release(&tx, appt.availability_id)?;
    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(appointment_id = %appointment_id, "Appointment cancelled");
    Ok(Appointment {
        status: AppointmentStatus::Cancelled,
        ..appt
    })
}

/// Record the outcome of a visit on behalf of its doctor.
pub fn complete(
    conn: &Connection,
    appointment_id: Uuid,
    requesting_doctor_id: Uuid,
    diagnosis: Option<&str>,
    prescription: Option<&str>,
) -> Result<Appointment, ScheduleError> {
    let appt = repository::get_appointment(conn, &appointment_id)?.ok_or_else(|| {
        ScheduleError::NotFound {
            entity: "Appointment",
            id: appointment_id.to_string(),
        }
    })?;

    if appt.doctor_id != requesting_doctor_id {
        return Err(ScheduleError::Forbidden);
    }
    if appt.status.is_terminal() {
        return Err(ScheduleError::InvalidTransition { from: appt.status });
    }

    if !repository::mark_completed(conn, &appointment_id, diagnosis, prescription)? {
        return Err(stale_transition_error(conn, appointment_id)?);
    }

    tracing::info!(appointment_id = %appointment_id, "Appointment completed");
    Ok(Appointment {
        status: AppointmentStatus::Completed,
        diagnosis: diagnosis.map(str::to_owned),
        prescription: prescription.map(str::to_owned),
        ..appt
    })
}

/// Diagnose a guarded status write that matched no row: the appointment
/// either reached a terminal status since it was read, or vanished.
fn stale_transition_error(
    conn: &Connection,
    appointment_id: Uuid,
) -> Result<ScheduleError, ScheduleError> {
    match repository::get_appointment(conn, &appointment_id)? {
        Some(current) => Ok(ScheduleError::InvalidTransition {
            from: current.status,
        }),
        None => Ok(ScheduleError::NotFound {
            entity: "Appointment",
            id: appointment_id.to_string(),
        }),
    }
}

/// Completed appointments for a patient, most recent first.
pub fn list_history(
    conn: &Connection,
    patient_id: Uuid,
) -> Result<Vec<Appointment>, ScheduleError> {
    Ok(repository::list_completed_for_patient(conn, &patient_id)?)
}

/// Every appointment for a patient, oldest first (patient dashboard).
pub fn list_for_patient(
    conn: &Connection,
    patient_id: Uuid,
) -> Result<Vec<Appointment>, ScheduleError> {
    Ok(repository::list_for_patient(conn, &patient_id)?)
}

/// Every appointment for a doctor, oldest first (doctor dashboard).
pub fn list_for_doctor(
    conn: &Connection,
    doctor_id: Uuid,
) -> Result<Vec<Appointment>, ScheduleError> {
    Ok(repository::list_for_doctor(conn, &doctor_id)?)
}

/// Every appointment in the system, oldest first (admin dashboard).
pub fn list_all(conn: &Connection) -> Result<Vec<Appointment>, ScheduleError> {
    Ok(repository::list_all_appointments(conn)?)
}
