//! Marks operations.
//!
//! The web application only reads marks. [`insert_mark`] exists for
//! external seeding and tests.

use gv_core::{Error, Result, UserId};
use rusqlite::Connection;

use crate::models::{Mark, StudentScores};

const COLS: &str = "id, student_id, subject, score";

/// Record a mark for a student and return it.
pub fn insert_mark(conn: &Connection, student_id: UserId, subject: &str, score: f64) -> Result<Mark> {
    conn.execute(
        "INSERT INTO marks (student_id, subject, score) VALUES (?1, ?2, ?3)",
        rusqlite::params![student_id.to_string(), subject, score],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Mark {
        id: conn.last_insert_rowid(),
        student_id,
        subject: subject.to_string(),
        score,
    })
}

/// All marks of one student, in insertion order.
pub fn list_marks_for_student(conn: &Connection, student_id: UserId) -> Result<Vec<Mark>> {
    let q = format!("SELECT {COLS} FROM marks WHERE student_id = ?1 ORDER BY id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([student_id.to_string()], Mark::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Every student with all of their scores, in registration order.
///
/// Students without any marks are included with an empty score list.
pub fn student_scores(conn: &Connection) -> Result<Vec<StudentScores>> {
    let mut stmt = conn
        .prepare(
            "SELECT u.id, u.username, m.score
             FROM users u
             LEFT JOIN marks m ON m.student_id = u.id
             WHERE u.role = 'student'
             ORDER BY u.created_at ASC, u.rowid ASC, m.id ASC",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                crate::models::parse_id::<UserId>(row, 0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<f64>>(2)?,
            ))
        })
        .map_err(|e| Error::database(e.to_string()))?;

    let mut out: Vec<StudentScores> = Vec::new();
    for row in rows {
        let (student_id, username, score) = row.map_err(|e| Error::database(e.to_string()))?;
        match out.last_mut() {
            Some(last) if last.student_id == student_id => last.scores.extend(score),
            _ => out.push(StudentScores {
                student_id,
                username,
                scores: score.into_iter().collect(),
            }),
        }
    }
    Ok(out)
}
