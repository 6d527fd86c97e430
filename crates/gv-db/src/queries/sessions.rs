//! Login session operations.
//!
//! `expires_at` is always written as second-precision UTC RFC 3339
//! (`2025-01-01T00:00:00Z`) so string comparison orders it correctly.

use gv_core::{Error, Result, SessionId, UserId};
use rusqlite::Connection;

use crate::models::Session;

const COLS: &str = "id, user_id, token, expires_at";

/// Create a new session for `user_id`.
pub fn create_session(
    conn: &Connection,
    user_id: UserId,
    token: &str,
    expires_at: &str,
) -> Result<Session> {
    let id = SessionId::new();

    conn.execute(
        "INSERT INTO sessions (id, user_id, token, expires_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![id.to_string(), user_id.to_string(), token, expires_at],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Session {
        id,
        user_id,
        token: token.to_string(),
        expires_at: expires_at.to_string(),
    })
}

/// Look up a live session by token. Sessions expiring at or before `now`
/// are treated as absent.
pub fn get_session(conn: &Connection, token: &str, now: &str) -> Result<Option<Session>> {
    let q = format!("SELECT {COLS} FROM sessions WHERE token = ?1 AND expires_at > ?2");
    let result = conn.query_row(&q, [token, now], Session::from_row);
    match result {
        Ok(s) => Ok(Some(s)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Delete a session by token value.
pub fn delete_session(conn: &Connection, token: &str) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM sessions WHERE token = ?1", [token])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Delete all sessions whose `expires_at` is not after `now`.
pub fn delete_expired_sessions(conn: &Connection, now: &str) -> Result<usize> {
    conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", [now])
        .map_err(|e| Error::database(e.to_string()))
}
