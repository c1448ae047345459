use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Role, User};

struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    role: String,
    name: String,
    specialization: Option<String>,
}

const USER_COLUMNS: &str = "id, email, password_hash, role, name, specialization";

fn user_from_row(row: UserRow) -> Result<User, DatabaseError> {
    Ok(User {
        id: Uuid::parse_str(&row.id).unwrap_or_default(),
        email: row.email,
        password_hash: row.password_hash,
        role: Role::from_str(&row.role)?,
        name: row.name,
        specialization: row.specialization,
    })
}

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        role: row.get(3)?,
        name: row.get(4)?,
        specialization: row.get(5)?,
    })
}

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, email, password_hash, role, name, specialization)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id.to_string(),
            user.email,
            user.password_hash,
            user.role.as_str(),
            user.name,
            user.specialization,
        ],
    )?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: &Uuid) -> Result<Option<User>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
    ))?;

    match stmt.query_row(params![id.to_string()], map_user_row) {
        Ok(row) => Ok(Some(user_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
    ))?;

    match stmt.query_row(params![email], map_user_row) {
        Ok(row) => Ok(Some(user_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All users with the given role, ordered by name.
pub fn list_users_by_role(conn: &Connection, role: Role) -> Result<Vec<User>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE role = ?1 ORDER BY name ASC"
    ))?;

    let rows = stmt.query_map(params![role.as_str()], map_user_row)?;

    let mut users = Vec::new();
    for row in rows {
        users.push(user_from_row(row?)?);
    }
    Ok(users)
}

/// Delete a user row. Returns false when no row matched. Rows still
/// referenced by slots or appointments fail the foreign-key check.
pub fn delete_user(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM users WHERE id = ?1",
        params![id.to_string()],
    )?;
    Ok(changed > 0)
}

pub fn count_users_by_role(conn: &Connection, role: Role) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE role = ?1",
        params![role.as_str()],
        |row| row.get(0),
    )?;
    Ok(count)
}
