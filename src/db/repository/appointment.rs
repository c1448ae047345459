use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use super::datetime_from_column;
use crate::db::DatabaseError;
use crate::models::{Appointment, AppointmentStatus};

struct AppointmentRow {
    id: String,
    patient_id: String,
    doctor_id: String,
    availability_id: String,
    date_time: String,
    status: String,
    diagnosis: Option<String>,
    prescription: Option<String>,
}

const APPT_COLUMNS: &str =
    "id, patient_id, doctor_id, availability_id, date_time, status, diagnosis, prescription";

fn appointment_from_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        id: Uuid::parse_str(&row.id).unwrap_or_default(),
        patient_id: Uuid::parse_str(&row.patient_id).unwrap_or_default(),
        doctor_id: Uuid::parse_str(&row.doctor_id).unwrap_or_default(),
        availability_id: Uuid::parse_str(&row.availability_id).unwrap_or_default(),
        date_time: datetime_from_column("appointments.date_time", &row.date_time)?,
        status: AppointmentStatus::from_str(&row.status)?,
        diagnosis: row.diagnosis,
        prescription: row.prescription,
    })
}

fn map_appt_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        availability_id: row.get(3)?,
        date_time: row.get(4)?,
        status: row.get(5)?,
        diagnosis: row.get(6)?,
        prescription: row.get(7)?,
    })
}

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments
         (id, patient_id, doctor_id, availability_id, date_time, status, diagnosis, prescription)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            appt.id.to_string(),
            appt.patient_id.to_string(),
            appt.doctor_id.to_string(),
            appt.availability_id.to_string(),
            appt.date_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            appt.status.as_str(),
            appt.diagnosis,
            appt.prescription,
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Option<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPT_COLUMNS} FROM appointments WHERE id = ?1"
    ))?;

    match stmt.query_row(params![id.to_string()], map_appt_row) {
        Ok(row) => Ok(Some(appointment_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Set a booked appointment to cancelled. The status predicate makes the
/// write a check-and-set like `reserve_slot`: a row that is missing or
/// already terminal updates nothing and returns false.
pub fn mark_cancelled(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET status = 'cancelled' WHERE id = ?1 AND status = 'booked'",
        params![id.to_string()],
    )?;
    Ok(changed > 0)
}

/// Set a booked appointment to completed, storing the visit outcome.
/// Returns false when the row is missing or already terminal.
pub fn mark_completed(
    conn: &Connection,
    id: &Uuid,
    diagnosis: Option<&str>,
    prescription: Option<&str>,
) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET status = 'completed', diagnosis = ?2, prescription = ?3
         WHERE id = ?1 AND status = 'booked'",
        params![id.to_string(), diagnosis, prescription],
    )?;
    Ok(changed > 0)
}

/// Completed appointments for a patient, most recent first.
pub fn list_completed_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPT_COLUMNS} FROM appointments
         WHERE patient_id = ?1 AND status = 'completed'
         ORDER BY date_time DESC"
    ))?;

    let rows = stmt.query_map(params![patient_id.to_string()], map_appt_row)?;

    let mut appts = Vec::new();
    for row in rows {
        appts.push(appointment_from_row(row?)?);
    }
    Ok(appts)
}

/// Every appointment for a patient regardless of status, oldest first.
pub fn list_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPT_COLUMNS} FROM appointments
         WHERE patient_id = ?1
         ORDER BY date_time ASC"
    ))?;

    let rows = stmt.query_map(params![patient_id.to_string()], map_appt_row)?;

    let mut appts = Vec::new();
    for row in rows {
        appts.push(appointment_from_row(row?)?);
    }
    Ok(appts)
}

/// Every appointment for a doctor regardless of status, oldest first.
pub fn list_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPT_COLUMNS} FROM appointments
         WHERE doctor_id = ?1
         ORDER BY date_time ASC"
    ))?;

    let rows = stmt.query_map(params![doctor_id.to_string()], map_appt_row)?;

    let mut appts = Vec::new();
    for row in rows {
        appts.push(appointment_from_row(row?)?);
    }
    Ok(appts)
}

/// Every appointment in the system, oldest first (admin dashboard).
pub fn list_all_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPT_COLUMNS} FROM appointments ORDER BY date_time ASC"
    ))?;

    let rows = stmt.query_map([], map_appt_row)?;

    let mut appts = Vec::new();
    for row in rows {
        appts.push(appointment_from_row(row?)?);
    }
    Ok(appts)
}

pub fn count_appointments(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))?;
    Ok(count)
}
