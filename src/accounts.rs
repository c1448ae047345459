//! User accounts — registration, doctor management, dashboard reads.
//!
//! Password hashing and session handling live outside this crate; callers
//! pass in an already-hashed credential and get back the stored record.

use rusqlite::Connection;
use uuid::Uuid;

use crate::db::repository;
use crate::error::ScheduleError;
use crate::models::{Role, User};

/// Admin dashboard counters.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DashboardStats {
    pub doctors: i64,
    pub patients: i64,
    pub appointments: i64,
}

fn create_user(
    conn: &Connection,
    email: &str,
    name: &str,
    role: Role,
    specialization: Option<&str>,
    password_hash: &str,
) -> Result<User, ScheduleError> {
    if repository::find_user_by_email(conn, email)?.is_some() {
        return Err(ScheduleError::EmailInUse {
            email: email.to_string(),
        });
    }

    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        role,
        name: name.to_string(),
        specialization: specialization.map(str::to_owned),
    };
    repository::insert_user(conn, &user)?;

    tracing::info!(user_id = %user.id, role = role.as_str(), "User created");
    Ok(user)
}

/// Self-service patient registration.
pub fn register_patient(
    conn: &Connection,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<User, ScheduleError> {
    create_user(conn, email, name, Role::Patient, None, password_hash)
}

/// Admin action: create a doctor account with a specialization.
pub fn add_doctor(
    conn: &Connection,
    email: &str,
    name: &str,
    specialization: &str,
    password_hash: &str,
) -> Result<User, ScheduleError> {
    create_user(
        conn,
        email,
        name,
        Role::Doctor,
        Some(specialization),
        password_hash,
    )
}

/// Create the admin account on first run. Idempotent: returns the
/// existing account when the email is already registered.
pub fn seed_admin(
    conn: &Connection,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<User, ScheduleError> {
    if let Some(existing) = repository::find_user_by_email(conn, email)? {
        return Ok(existing);
    }
    create_user(conn, email, name, Role::Admin, None, password_hash)
}

/// Admin action: delete a non-admin account.
///
/// Admin accounts are never deletable. Accounts still referenced by
/// slots or appointments fail the foreign-key check and surface as a
/// database error.
pub fn delete_user(conn: &Connection, user_id: Uuid) -> Result<(), ScheduleError> {
    let user = repository::get_user(conn, &user_id)?.ok_or_else(|| ScheduleError::NotFound {
        entity: "User",
        id: user_id.to_string(),
    })?;

    if user.role == Role::Admin {
        return Err(ScheduleError::Forbidden);
    }

    repository::delete_user(conn, &user_id)?;
    tracing::info!(user_id = %user_id, role = user.role.as_str(), "User deleted");
    Ok(())
}

/// Session support: look up an account by id.
pub fn get_user(conn: &Connection, user_id: Uuid) -> Result<Option<User>, ScheduleError> {
    Ok(repository::get_user(conn, &user_id)?)
}

/// Doctors ordered by name, for the patient browse page and admin list.
pub fn list_doctors(conn: &Connection) -> Result<Vec<User>, ScheduleError> {
    Ok(repository::list_users_by_role(conn, Role::Doctor)?)
}

/// Login support: look up an account by email.
pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<User>, ScheduleError> {
    Ok(repository::find_user_by_email(conn, email)?)
}

/// Counters shown on the admin dashboard.
pub fn dashboard_stats(conn: &Connection) -> Result<DashboardStats, ScheduleError> {
    Ok(DashboardStats {
        doctors: repository::count_users_by_role(conn, Role::Doctor)?,
        patients: repository::count_users_by_role(conn, Role::Patient)?,
        appointments: repository::count_appointments(conn)?,
    })
}
