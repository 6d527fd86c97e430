//! Role dashboards.
//!
//! Every handler here sits behind the session middleware and a role guard,
//! so the [`CurrentUser`] extension is always present and already holds the
//! right role.

use axum::extract::{Extension, State};
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use gv_core::grading::{self, attendance_signal, Band, BandedStudents, StudentStanding};
use gv_db::models::{AttendanceRecord, Mark, StudentScores, DATE_FORMAT};
use serde::Serialize;

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::auth::CurrentUser;
use crate::templates::script_json;

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct MarkRow {
    subject: String,
    score: String,
}

#[derive(Debug, Serialize)]
struct AttendanceRow {
    date: String,
    status: String,
    present: bool,
}

/// Parallel series plotted on the student dashboard.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub subjects: Vec<String>,
    pub scores: Vec<f64>,
    pub attendance_dates: Vec<String>,
    pub attendance_signal: Vec<u8>,
}

impl ChartSeries {
    pub fn new(marks: &[Mark], attendance: &[AttendanceRecord]) -> Self {
        Self {
            subjects: marks.iter().map(|m| m.subject.clone()).collect(),
            scores: marks.iter().map(|m| m.score).collect(),
            attendance_dates: attendance
                .iter()
                .map(|a| a.date.format(DATE_FORMAT).to_string())
                .collect(),
            attendance_signal: attendance.iter().map(|a| attendance_signal(&a.status)).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct StudentDashboard {
    marks: Vec<MarkRow>,
    attendance: Vec<AttendanceRow>,
    /// [`ChartSeries`] as JSON, safe to place inside `<script>`.
    chart_json: String,
}

#[derive(Debug, Serialize)]
struct StandingRow {
    username: String,
    avg_score: String,
}

impl From<StudentStanding> for StandingRow {
    fn from(s: StudentStanding) -> Self {
        Self {
            username: s.username,
            avg_score: format!("{:.2}", s.avg_score),
        }
    }
}

fn rows(standings: Vec<StudentStanding>) -> Vec<StandingRow> {
    standings.into_iter().map(StandingRow::from).collect()
}

/// One band's table on the professor dashboard.
#[derive(Debug, Serialize)]
struct BandSection {
    id: &'static str,
    heading: &'static str,
    students: Vec<StandingRow>,
}

impl BandSection {
    fn new(band: Band, standings: Vec<StudentStanding>) -> Self {
        let id = match band {
            Band::AboveAverage => "above-avg",
            Band::Average => "avg",
            Band::BelowAverage => "below-avg",
        };
        Self {
            id,
            heading: band.label(),
            students: rows(standings),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProfessorDashboard {
    students: Vec<String>,
    bands: Vec<BandSection>,
}

#[derive(Debug, Serialize)]
struct DefaultersPage {
    defaulters: Vec<StandingRow>,
}

fn standings(scores: &[StudentScores]) -> Vec<StudentStanding> {
    scores
        .iter()
        .map(|s| StudentStanding::from_scores(s.username.clone(), &s.scores))
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /dashboard_student
pub async fn dashboard_student(
    State(ctx): State<AppContext>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let conn = gv_db::pool::get_conn(&ctx.db)?;
    let marks = gv_db::queries::marks::list_marks_for_student(&conn, user.id)?;
    let attendance = gv_db::queries::attendance::list_attendance_for_student(&conn, user.id)?;
    drop(conn);

    let chart_json = script_json(&ChartSeries::new(&marks, &attendance))?;
    let body = StudentDashboard {
        marks: marks
            .into_iter()
            .map(|m| MarkRow {
                subject: m.subject,
                score: m.score.to_string(),
            })
            .collect(),
        attendance: attendance
            .into_iter()
            .map(|a| AttendanceRow {
                date: a.date.format(DATE_FORMAT).to_string(),
                present: a.is_present(),
                status: a.status,
            })
            .collect(),
        chart_json,
    };

    super::render(&ctx, jar, Some(&user), "dashboard_student", "Student Dashboard", &body)
}

/// GET /dashboard_professor
pub async fn dashboard_professor(
    State(ctx): State<AppContext>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let conn = gv_db::pool::get_conn(&ctx.db)?;
    let scores = gv_db::queries::marks::student_scores(&conn)?;
    drop(conn);

    let students = scores.iter().map(|s| s.username.clone()).collect();
    let banded = BandedStudents::partition(standings(&scores));
    tracing::debug!(
        students = scores.len(),
        above = banded.above_avg.len(),
        average = banded.avg.len(),
        below = banded.below_avg.len(),
        "Computed student bands"
    );

    let body = ProfessorDashboard {
        students,
        bands: vec![
            BandSection::new(Band::AboveAverage, banded.above_avg),
            BandSection::new(Band::Average, banded.avg),
            BandSection::new(Band::BelowAverage, banded.below_avg),
        ],
    };

    super::render(&ctx, jar, Some(&user), "dashboard_professor", "Professor Dashboard", &body)
}

/// GET /defaulters
pub async fn defaulters(
    State(ctx): State<AppContext>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let conn = gv_db::pool::get_conn(&ctx.db)?;
    let scores = gv_db::queries::marks::student_scores(&conn)?;
    drop(conn);

    let body = DefaultersPage {
        defaulters: rows(grading::defaulters(standings(&scores))),
    };

    super::render(&ctx, jar, Some(&user), "defaulters", "Defaulters", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gv_core::UserId;

    fn mark(subject: &str, score: f64) -> Mark {
        Mark {
            id: 0,
            student_id: UserId::new(),
            subject: subject.into(),
            score,
        }
    }

    fn att(date: &str, status: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: 0,
            student_id: UserId::new(),
            date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
            status: status.into(),
        }
    }

    #[test]
    fn chart_series_are_parallel() {
        let chart = ChartSeries::new(
            &[mark("Math", 90.0), mark("Physics", 72.5)],
            &[
                att("2024-03-01", "Present"),
                att("2024-03-02", "Absent"),
                att("2024-03-03", "present"),
            ],
        );
        assert_eq!(chart.subjects, ["Math", "Physics"]);
        assert_eq!(chart.scores, [90.0, 72.5]);
        assert_eq!(chart.attendance_dates, ["2024-03-01", "2024-03-02", "2024-03-03"]);
        assert_eq!(chart.attendance_signal, [1, 0, 0]);
    }

    #[test]
    fn empty_records_give_empty_series() {
        assert_eq!(ChartSeries::new(&[], &[]), ChartSeries::default());
    }

    #[test]
    fn band_sections_use_band_labels() {
        let section = BandSection::new(
            Band::Average,
            vec![StudentStanding::from_scores("edge", &[90.0, 70.0])],
        );
        assert_eq!(section.id, "avg");
        assert_eq!(section.heading, Band::Average.label());
        assert_eq!(section.students[0].avg_score, "80.00");
    }

    #[test]
    fn standings_default_to_zero_without_marks() {
        let scores = vec![StudentScores {
            student_id: UserId::new(),
            username: "new".into(),
            scores: vec![],
        }];
        let s = standings(&scores);
        assert_eq!(s[0].avg_score, 0.0);
        assert_eq!(StandingRow::from(s[0].clone()).avg_score, "0.00");
    }
}
