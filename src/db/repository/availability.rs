use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{date_from_column, time_from_column};
use crate::db::DatabaseError;
use crate::models::Availability;

struct AvailabilityRow {
    id: String,
    doctor_id: String,
    date: String,
    start_time: String,
    end_time: String,
    booked: i64,
}

const SLOT_COLUMNS: &str = "id, doctor_id, date, start_time, end_time, booked";

fn availability_from_row(row: AvailabilityRow) -> Result<Availability, DatabaseError> {
    Ok(Availability {
        id: Uuid::parse_str(&row.id).unwrap_or_default(),
        doctor_id: Uuid::parse_str(&row.doctor_id).unwrap_or_default(),
        date: date_from_column("availabilities.date", &row.date)?,
        start_time: time_from_column("availabilities.start_time", &row.start_time)?,
        end_time: time_from_column("availabilities.end_time", &row.end_time)?,
        booked: row.booked != 0,
    })
}

fn map_slot_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AvailabilityRow> {
    Ok(AvailabilityRow {
        id: row.get(0)?,
        doctor_id: row.get(1)?,
        date: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        booked: row.get(5)?,
    })
}

pub fn insert_availability(conn: &Connection, slot: &Availability) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO availabilities (id, doctor_id, date, start_time, end_time, booked)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            slot.id.to_string(),
            slot.doctor_id.to_string(),
            slot.date.format("%Y-%m-%d").to_string(),
            slot.start_time.format("%H:%M:%S").to_string(),
            slot.end_time.format("%H:%M:%S").to_string(),
            slot.booked as i64,
        ],
    )?;
    Ok(())
}

pub fn get_availability(conn: &Connection, id: &Uuid) -> Result<Option<Availability>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SLOT_COLUMNS} FROM availabilities WHERE id = ?1"
    ))?;

    match stmt.query_row(params![id.to_string()], map_slot_row) {
        Ok(row) => Ok(Some(availability_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Unbooked slots for one doctor on one day, earliest first.
pub fn list_unbooked_slots(
    conn: &Connection,
    doctor_id: &Uuid,
    date: NaiveDate,
) -> Result<Vec<Availability>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SLOT_COLUMNS} FROM availabilities
         WHERE doctor_id = ?1 AND date = ?2 AND booked = 0
         ORDER BY start_time ASC"
    ))?;

    let rows = stmt.query_map(
        params![doctor_id.to_string(), date.format("%Y-%m-%d").to_string()],
        map_slot_row,
    )?;

    let mut slots = Vec::new();
    for row in rows {
        slots.push(availability_from_row(row?)?);
    }
    Ok(slots)
}

/// All slots (booked or not) for one doctor from a date onward.
pub fn list_slots_from_date(
    conn: &Connection,
    doctor_id: &Uuid,
    from: NaiveDate,
) -> Result<Vec<Availability>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SLOT_COLUMNS} FROM availabilities
         WHERE doctor_id = ?1 AND date >= ?2
         ORDER BY date ASC, start_time ASC"
    ))?;

    let rows = stmt.query_map(
        params![doctor_id.to_string(), from.format("%Y-%m-%d").to_string()],
        map_slot_row,
    )?;

    let mut slots = Vec::new();
    for row in rows {
        slots.push(availability_from_row(row?)?);
    }
    Ok(slots)
}

/// Claim the first unbooked slot matching (doctor, date, start_time).
///
/// The `booked = 0` predicate on the UPDATE makes the claim a
/// check-and-set: a second caller racing for the same slot updates zero
/// rows and falls through to the next candidate (of which there are none
/// unless duplicate slots exist). Returns the claimed slot's id, or
/// `None` when no unbooked slot matches.
pub fn reserve_slot(
    conn: &Connection,
    doctor_id: &Uuid,
    date: NaiveDate,
    start_time: NaiveTime,
) -> Result<Option<Uuid>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id FROM availabilities
         WHERE doctor_id = ?1 AND date = ?2 AND start_time = ?3 AND booked = 0
         ORDER BY id ASC",
    )?;

    let candidates: Vec<String> = stmt
        .query_map(
            params![
                doctor_id.to_string(),
                date.format("%Y-%m-%d").to_string(),
                start_time.format("%H:%M:%S").to_string(),
            ],
            |row| row.get::<_, String>(0),
        )?
        .collect::<Result<_, _>>()?;

    for id in candidates {
        let changed = conn.execute(
            "UPDATE availabilities SET booked = 1 WHERE id = ?1 AND booked = 0",
            params![id],
        )?;
        if changed > 0 {
            return Ok(Some(Uuid::parse_str(&id).unwrap_or_default()));
        }
    }
    Ok(None)
}

/// Clear the booked flag on a slot. Returns false when no row matched.
pub fn release_slot(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "UPDATE availabilities SET booked = 0 WHERE id = ?1",
        params![id.to_string()],
    )?;
    Ok(changed > 0)
}
