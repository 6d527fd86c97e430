//! Attendance operations. Read-only for the application apart from seeding.

use chrono::NaiveDate;
use gv_core::{Error, Result, UserId};
use rusqlite::Connection;

use crate::models::{AttendanceRecord, DATE_FORMAT};

const COLS: &str = "id, student_id, date, status";

/// Record an attendance entry for a student and return it.
pub fn insert_attendance(
    conn: &Connection,
    student_id: UserId,
    date: NaiveDate,
    status: &str,
) -> Result<AttendanceRecord> {
    conn.execute(
        "INSERT INTO attendance (student_id, date, status) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            student_id.to_string(),
            date.format(DATE_FORMAT).to_string(),
            status
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(AttendanceRecord {
        id: conn.last_insert_rowid(),
        student_id,
        date,
        status: status.to_string(),
    })
}

/// All attendance entries of one student, oldest first.
pub fn list_attendance_for_student(
    conn: &Connection,
    student_id: UserId,
) -> Result<Vec<AttendanceRecord>> {
    let q = format!("SELECT {COLS} FROM attendance WHERE student_id = ?1 ORDER BY date ASC, id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([student_id.to_string()], AttendanceRecord::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}
