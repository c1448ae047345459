//! Shared test fixtures.

use rusqlite::Connection;
use uuid::Uuid;

use crate::db::repository::insert_user;
use crate::models::{Role, User};

/// Insert a doctor with a unique email, returning the id.
pub fn make_doctor(conn: &Connection) -> Uuid {
    let id = Uuid::new_v4();
    insert_user(
        conn,
        &User {
            id,
            email: format!("doctor-{id}@hospital.test"),
            password_hash: "hash".into(),
            role: Role::Doctor,
            name: "Dr Test".into(),
            specialization: Some("GP".into()),
        },
    )
    .unwrap();
    id
}

/// Insert a patient with a unique email, returning the id.
pub fn make_patient(conn: &Connection) -> Uuid {
    let id = Uuid::new_v4();
    insert_user(
        conn,
        &User {
            id,
            email: format!("patient-{id}@example.test"),
            password_hash: "hash".into(),
            role: Role::Patient,
            name: "Pat Test".into(),
            specialization: None,
        },
    )
    .unwrap();
    id
}
