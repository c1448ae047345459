use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;

/// Booked visit. `availability_id` references the reserved slot directly
/// so cancellation releases exactly the slot that was taken, even when
/// duplicate or overlapping slots exist for the same time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub availability_id: Uuid,
    pub date_time: NaiveDateTime,
    pub status: AppointmentStatus,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_unset_outcome_as_null() {
        let appt = Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            availability_id: Uuid::new_v4(),
            date_time: "2024-06-01T09:00:00".parse().unwrap(),
            status: AppointmentStatus::Booked,
            diagnosis: None,
            prescription: None,
        };
        let json: serde_json::Value = serde_json::to_value(&appt).unwrap();
        assert_eq!(json["status"], "Booked");
        assert!(json["diagnosis"].is_null());
        assert!(json["prescription"].is_null());
    }
}

