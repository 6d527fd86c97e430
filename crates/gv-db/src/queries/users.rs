//! User operations. Users are created at registration and never modified.

use chrono::{SecondsFormat, Utc};
use gv_core::{Error, Result, Role, UserId};
use rusqlite::Connection;

use crate::models::User;

const COLS: &str = "id, username, password_hash, role, created_at";

/// Create a new user and return it.
///
/// A taken username surfaces as [`Error::Conflict`].
pub fn create_user(
    conn: &Connection,
    username: &str,
    password_hash: &str,
    role: Role,
) -> Result<User> {
    let id = UserId::new();
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    conn.execute(
        "INSERT INTO users (id, username, password_hash, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![id.to_string(), username, password_hash, role.as_str(), created_at],
    )
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            Error::Conflict(format!("Username '{username}' already exists"))
        } else {
            Error::database(e.to_string())
        }
    })?;

    Ok(User {
        id,
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        role,
        created_at,
    })
}

/// Get a user by primary key.
pub fn get_user_by_id(conn: &Connection, id: UserId) -> Result<Option<User>> {
    let q = format!("SELECT {COLS} FROM users WHERE id = ?1");
    let result = conn.query_row(&q, [id.to_string()], User::from_row);
    match result {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get a user by username.
pub fn get_user_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let q = format!("SELECT {COLS} FROM users WHERE username = ?1");
    let result = conn.query_row(&q, [username], User::from_row);
    match result {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Whether a username is already registered.
pub fn username_exists(conn: &Connection, username: &str) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM users WHERE username = ?1",
        [username],
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// List every user holding `role`, ordered by username.
pub fn list_users_by_role(conn: &Connection, role: Role) -> Result<Vec<User>> {
    let q = format!("SELECT {COLS} FROM users WHERE role = ?1 ORDER BY username ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([role.as_str()], User::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}
