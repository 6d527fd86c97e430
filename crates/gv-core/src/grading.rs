//! Score arithmetic behind the professor views.
//!
//! A student's standing is the arithmetic mean of their marks, `0` when they
//! have none. Standings fall into three fixed bands:
//!
//! | mean          | band            |
//! |---------------|-----------------|
//! | `> 80`        | above average   |
//! | `60 ..= 80`   | average         |
//! | `< 60`        | below average   |
//!
//! A defaulter is any student whose mean is below 60.

use serde::Serialize;

/// Lower bound (inclusive) of the average band; anything under it defaults.
pub const PASS_THRESHOLD: f64 = 60.0;

/// Upper bound (inclusive) of the average band.
pub const ABOVE_AVERAGE_THRESHOLD: f64 = 80.0;

/// Arithmetic mean of `scores`, or `0.0` when there are none.
pub fn average(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Whether a mean score puts a student on the defaulter list.
pub fn is_defaulter(avg_score: f64) -> bool {
    avg_score < PASS_THRESHOLD
}

/// Numeric chart signal for an attendance status: `1` for `Present`, else `0`.
pub fn attendance_signal(status: &str) -> u8 {
    u8::from(status == "Present")
}

/// Performance band of a student's mean score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    AboveAverage,
    Average,
    BelowAverage,
}

impl Band {
    pub fn classify(avg_score: f64) -> Self {
        if avg_score > ABOVE_AVERAGE_THRESHOLD {
            Band::AboveAverage
        } else if avg_score >= PASS_THRESHOLD {
            Band::Average
        } else {
            Band::BelowAverage
        }
    }

    /// Heading shown above the band's table.
    pub fn label(&self) -> &'static str {
        match self {
            Band::AboveAverage => "Above average (over 80)",
            Band::Average => "Average (60 to 80)",
            Band::BelowAverage => "Below average (under 60)",
        }
    }
}

/// One student's mean score, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentStanding {
    pub username: String,
    pub avg_score: f64,
}

impl StudentStanding {
    /// Build a standing from a student's raw scores.
    pub fn from_scores(username: impl Into<String>, scores: &[f64]) -> Self {
        Self {
            username: username.into(),
            avg_score: average(scores),
        }
    }

    pub fn band(&self) -> Band {
        Band::classify(self.avg_score)
    }
}

/// Standings partitioned into the three bands, each keeping input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BandedStudents {
    pub above_avg: Vec<StudentStanding>,
    pub avg: Vec<StudentStanding>,
    pub below_avg: Vec<StudentStanding>,
}

impl BandedStudents {
    pub fn partition(standings: impl IntoIterator<Item = StudentStanding>) -> Self {
        let mut banded = Self::default();
        for s in standings {
            match s.band() {
                Band::AboveAverage => banded.above_avg.push(s),
                Band::Average => banded.avg.push(s),
                Band::BelowAverage => banded.below_avg.push(s),
            }
        }
        banded
    }
}

/// Keep only the defaulters, in input order.
pub fn defaulters(standings: impl IntoIterator<Item = StudentStanding>) -> Vec<StudentStanding> {
    standings
        .into_iter()
        .filter(|s| is_defaulter(s.avg_score))
        .collect()
}
