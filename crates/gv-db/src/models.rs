//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row` selected in the column order documented on it.

use chrono::NaiveDate;
use gv_core::{Role, SessionId, UserId};
use rusqlite::types::Type;
use uuid::Uuid;

/// Storage format of `attendance.date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

fn conversion_err(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

/// Parse a UUID-based ID from a text column.
pub(crate) fn parse_id<T: From<Uuid>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    let uuid = Uuid::parse_str(&s).map_err(|e| conversion_err(idx, e))?;
    Ok(T::from(uuid))
}

fn parse_role(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Role> {
    let s: String = row.get(idx)?;
    s.parse().map_err(|e: gv_core::Error| conversion_err(idx, e))
}

fn parse_date(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(idx)?;
    NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| conversion_err(idx, e))
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: String,
}

impl User {
    /// Columns: id, username, password_hash, role, created_at
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
            role: parse_role(row, 3)?,
            created_at: row.get(4)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub token: String,
    pub expires_at: String,
}

impl Session {
    /// Columns: id, user_id, token, expires_at
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            user_id: parse_id(row, 1)?,
            token: row.get(2)?,
            expires_at: row.get(3)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Mark
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub id: i64,
    pub student_id: UserId,
    pub subject: String,
    pub score: f64,
}

impl Mark {
    /// Columns: id, student_id, subject, score
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            student_id: parse_id(row, 1)?,
            subject: row.get(2)?,
            score: row.get(3)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: UserId,
    pub date: NaiveDate,
    /// `Present`, or any other free-text status.
    pub status: String,
}

impl AttendanceRecord {
    /// Columns: id, student_id, date, status
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            student_id: parse_id(row, 1)?,
            date: parse_date(row, 2)?,
            status: row.get(3)?,
        })
    }

    pub fn is_present(&self) -> bool {
        self.status == "Present"
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// A student together with every score recorded against them.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentScores {
    pub student_id: UserId,
    pub username: String,
    pub scores: Vec<f64>,
}
