//! Slot Ledger — doctor-published availability slots.
//!
//! Owns the `availabilities` table state transitions: publish, the
//! booked/unbooked flips, and the two dashboard reads. Only the booking
//! workflow (`crate::booking`) may flip the booked flag; it does so
//! through `mark_booked` / `release` inside its own transactions.

use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::repository;
use crate::error::ScheduleError;
use crate::models::Availability;

/// Parse a `YYYY-MM-DD` form field.
pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, ScheduleError> {
    Ok(NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")?)
}

/// Parse an `HH:MM` form field; seconds are accepted when present.
pub(crate) fn parse_time(input: &str) -> Result<NaiveTime, ScheduleError> {
    let input = input.trim();
    match NaiveTime::parse_from_str(input, "%H:%M") {
        Ok(t) => Ok(t),
        Err(_) => Ok(NaiveTime::parse_from_str(input, "%H:%M:%S")?),
    }
}

/// Publish a new unbooked slot for a doctor.
///
/// No overlap check: duplicate and overlapping slots may coexist, the
/// ledger only guarantees each individual slot is booked at most once.
pub fn publish(
    conn: &Connection,
    doctor_id: Uuid,
    date: &str,
    start_time: &str,
    end_time: &str,
) -> Result<Availability, ScheduleError> {
    let date = parse_date(date)?;
    let start = parse_time(start_time)?;
    let end = parse_time(end_time)?;

    if start >= end {
        return Err(ScheduleError::InvalidRange { start, end });
    }

    let slot = Availability {
        id: Uuid::new_v4(),
        doctor_id,
        date,
        start_time: start,
        end_time: end,
        booked: false,
    };
    repository::insert_availability(conn, &slot)?;

    tracing::info!(slot_id = %slot.id, doctor_id = %doctor_id, %date, "Slot published");
    Ok(slot)
}

/// Unbooked slots for a doctor on a given day, ordered by start time.
/// Feeds the patient-facing slot picker.
pub fn list_available(
    conn: &Connection,
    doctor_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<Availability>, ScheduleError> {
    Ok(repository::list_unbooked_slots(conn, &doctor_id, date)?)
}

/// All slots (booked or not) for a doctor with date >= `from`, ordered by
/// (date, start time). Feeds the doctor dashboard.
pub fn list_upcoming(
    conn: &Connection,
    doctor_id: Uuid,
    from: NaiveDate,
) -> Result<Vec<Availability>, ScheduleError> {
    Ok(repository::list_slots_from_date(conn, &doctor_id, from)?)
}

/// Claim the unbooked slot matching (doctor, date, start_time) and return
/// its id, or `None` when no such slot exists — the caller treats that as
/// "slot unavailable", not a fatal error.
pub fn mark_booked(
    conn: &Connection,
    doctor_id: Uuid,
    date: NaiveDate,
    start_time: NaiveTime,
) -> Result<Option<Uuid>, ScheduleError> {
    Ok(repository::reserve_slot(conn, &doctor_id, date, start_time)?)
}

/// Flip a slot back to unbooked. A release with no matching slot is
/// tolerated and logged, never an error.
pub fn release(conn: &Connection, availability_id: Uuid) -> Result<bool, ScheduleError> {
    let released = repository::release_slot(conn, &availability_id)?;
    if !released {
        tracing::warn!(slot_id = %availability_id, "Release had no matching slot");
    }
    Ok(released)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::testutil::make_doctor;

    #[test]
    fn publish_creates_unbooked_slot() {
        let conn = open_memory_database().unwrap();
        let doctor = make_doctor(&conn);

        let slot = publish(&conn, doctor, "2024-06-01", "09:00", "09:30").unwrap();
        assert!(!slot.booked);
        assert_eq!(slot.date.to_string(), "2024-06-01");
        assert_eq!(slot.start_time.to_string(), "09:00:00");
        assert_eq!(slot.end_time.to_string(), "09:30:00");
    }

    #[test]
    fn publish_rejects_inverted_range() {
        let conn = open_memory_database().unwrap();
        let doctor = make_doctor(&conn);

        let err = publish(&conn, doctor, "2024-06-01", "10:00", "09:30").unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidRange { .. }));

        let err = publish(&conn, doctor, "2024-06-01", "10:00", "10:00").unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidRange { .. }));
    }

    #[test]
    fn publish_rejects_malformed_input() {
        let conn = open_memory_database().unwrap();
        let doctor = make_doctor(&conn);

        assert!(matches!(
            publish(&conn, doctor, "June 1st", "09:00", "09:30"),
            Err(ScheduleError::Parse(_))
        ));
        assert!(matches!(
            publish(&conn, doctor, "2024-06-01", "9am", "09:30"),
            Err(ScheduleError::Parse(_))
        ));
    }

    #[test]
    fn publish_allows_duplicate_slots() {
        let conn = open_memory_database().unwrap();
        let doctor = make_doctor(&conn);

        publish(&conn, doctor, "2024-06-01", "09:00", "09:30").unwrap();
        publish(&conn, doctor, "2024-06-01", "09:00", "09:30").unwrap();
        publish(&conn, doctor, "2024-06-01", "09:15", "09:45").unwrap();

        let date = parse_date("2024-06-01").unwrap();
        assert_eq!(list_available(&conn, doctor, date).unwrap().len(), 3);
    }

    #[test]
    fn list_available_excludes_booked_and_orders_by_start() {
        let conn = open_memory_database().unwrap();
        let doctor = make_doctor(&conn);

        publish(&conn, doctor, "2024-06-01", "11:00", "11:30").unwrap();
        publish(&conn, doctor, "2024-06-01", "09:00", "09:30").unwrap();
        publish(&conn, doctor, "2024-06-01", "10:00", "10:30").unwrap();

        let date = parse_date("2024-06-01").unwrap();
        mark_booked(&conn, doctor, date, parse_time("10:00").unwrap()).unwrap();

        let open = list_available(&conn, doctor, date).unwrap();
        let starts: Vec<String> = open.iter().map(|s| s.start_time.to_string()).collect();
        assert_eq!(starts, ["09:00:00", "11:00:00"]);
    }

    #[test]
    fn list_upcoming_includes_booked_slots() {
        let conn = open_memory_database().unwrap();
        let doctor = make_doctor(&conn);

        publish(&conn, doctor, "2024-06-02", "09:00", "09:30").unwrap();
        publish(&conn, doctor, "2024-06-01", "14:00", "14:30").unwrap();
        publish(&conn, doctor, "2024-05-01", "09:00", "09:30").unwrap();

        let date = parse_date("2024-06-01").unwrap();
        mark_booked(&conn, doctor, date, parse_time("14:00").unwrap()).unwrap();

        let upcoming = list_upcoming(&conn, doctor, date).unwrap();
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].date.to_string(), "2024-06-01");
        assert!(upcoming[0].booked);
        assert_eq!(upcoming[1].date.to_string(), "2024-06-02");
    }

    #[test]
    fn second_mark_booked_returns_none() {
        let conn = open_memory_database().unwrap();
        let doctor = make_doctor(&conn);
        publish(&conn, doctor, "2024-06-01", "09:00", "09:30").unwrap();

        let date = parse_date("2024-06-01").unwrap();
        let time = parse_time("09:00").unwrap();
        assert!(mark_booked(&conn, doctor, date, time).unwrap().is_some());
        assert!(mark_booked(&conn, doctor, date, time).unwrap().is_none());
    }

    #[test]
    fn mark_booked_on_missing_slot_returns_none() {
        let conn = open_memory_database().unwrap();
        let doctor = make_doctor(&conn);

        let date = parse_date("2024-06-01").unwrap();
        let time = parse_time("09:00").unwrap();
        assert!(mark_booked(&conn, doctor, date, time).unwrap().is_none());
    }

    #[test]
    fn release_unknown_slot_is_tolerated() {
        let conn = open_memory_database().unwrap();
        assert!(!release(&conn, Uuid::new_v4()).unwrap());
    }

    #[test]
    fn release_makes_slot_bookable_again() {
        let conn = open_memory_database().unwrap();
        let doctor = make_doctor(&conn);
        publish(&conn, doctor, "2024-06-01", "09:00", "09:30").unwrap();

        let date = parse_date("2024-06-01").unwrap();
        let time = parse_time("09:00").unwrap();
        let slot_id = mark_booked(&conn, doctor, date, time).unwrap().unwrap();

        assert!(release(&conn, slot_id).unwrap());
        assert!(mark_booked(&conn, doctor, date, time).unwrap().is_some());
    }

    #[test]
    fn parse_time_accepts_seconds() {
        assert_eq!(parse_time("09:00:15").unwrap().to_string(), "09:00:15");
        assert_eq!(parse_time(" 09:00 ").unwrap().to_string(), "09:00:00");
    }
}
