//! The four fixed aggregate reports over `room` and `students`.
//!
//! All of them INNER JOIN students to rooms, so a room without students never
//! shows up. Output keys are the query's column names, spelling included
//! (`avarage_age`, `age_diffrence`).

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use dormctl_core::{config::default_reference_date, json};
use serde::Serialize;
use sqlx::FromRow;
use tracing::info;

use crate::error::DbResult;
use crate::session::Session;

const ROOMS_WITH_STUDENT_COUNTS: &str = r#"
    SELECT r.id, r.name, COUNT(*) AS count
    FROM students s
    JOIN room r ON s.room = r.id
    GROUP BY r.id, r.name
    ORDER BY r.id ASC
"#;

// Day counts divided by 365.0; $1 is the reference date standing in for "today".
const YOUNGEST_ROOMS: &str = r#"
    SELECT r.name, (AVG($1::date - s.birthday) / 365.0)::float8 AS avarage_age
    FROM students s
    JOIN room r ON r.id = s.room
    GROUP BY r.id, r.name
    ORDER BY avarage_age ASC, r.id ASC
    LIMIT 5
"#;

// Integer division: whole years only.
const ROOMS_WITH_LARGE_AGE_DIFFERENCE: &str = r#"
    SELECT
        r.name,
        TO_CHAR(MAX(s.birthday), 'YYYY-MM-DD') AS youngest,
        TO_CHAR(MIN(s.birthday), 'YYYY-MM-DD') AS oldest,
        (MAX(s.birthday) - MIN(s.birthday)) / 365 AS age_diffrence
    FROM students s
    JOIN room r ON r.id = s.room
    GROUP BY r.id, r.name
    ORDER BY age_diffrence DESC, r.id ASC
    LIMIT 5
"#;

const MULTISEX_ROOMS: &str = r#"
    SELECT r.name, COUNT(DISTINCT s.sex) AS unique_sexes
    FROM students s
    JOIN room r ON r.id = s.room
    GROUP BY r.id, r.name
    HAVING COUNT(DISTINCT s.sex) = 2
    ORDER BY r.id ASC
"#;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct RoomStudentCount {
    pub id: i32,
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct RoomAverageAge {
    pub name: String,
    #[sqlx(rename = "avarage_age")]
    #[serde(rename = "avarage_age")]
    pub average_age: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct RoomAgeSpread {
    pub name: String,
    /// Latest birthday in the room, `YYYY-MM-DD`
    pub youngest: String,
    /// Earliest birthday in the room, `YYYY-MM-DD`
    pub oldest: String,
    #[sqlx(rename = "age_diffrence")]
    #[serde(rename = "age_diffrence")]
    pub age_difference: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct RoomSexCount {
    pub name: String,
    pub unique_sexes: i64,
}

pub async fn rooms_with_student_counts(session: &mut Session) -> DbResult<Vec<RoomStudentCount>> {
    let rows = sqlx::query_as(ROOMS_WITH_STUDENT_COUNTS)
        .fetch_all(session.connection()?)
        .await?;
    Ok(rows)
}

pub async fn youngest_rooms(
    session: &mut Session,
    reference_date: NaiveDate,
) -> DbResult<Vec<RoomAverageAge>> {
    let rows = sqlx::query_as(YOUNGEST_ROOMS)
        .bind(reference_date)
        .fetch_all(session.connection()?)
        .await?;
    Ok(rows)
}

pub async fn rooms_with_large_age_difference(
    session: &mut Session,
) -> DbResult<Vec<RoomAgeSpread>> {
    let rows = sqlx::query_as(ROOMS_WITH_LARGE_AGE_DIFFERENCE)
        .fetch_all(session.connection()?)
        .await?;
    Ok(rows)
}

pub async fn multisex_rooms(session: &mut Session) -> DbResult<Vec<RoomSexCount>> {
    let rows = sqlx::query_as(MULTISEX_ROOMS)
        .fetch_all(session.connection()?)
        .await?;
    Ok(rows)
}

// ============================================================================
// Report files
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    StudentCounts,
    AgeDifference,
    Multisex,
    Youngest,
}

impl ReportKind {
    /// Every report, in the order a full run writes them.
    pub const ALL: [ReportKind; 4] = [
        ReportKind::StudentCounts,
        ReportKind::AgeDifference,
        ReportKind::Multisex,
        ReportKind::Youngest,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ReportKind::StudentCounts => "rooms_and_students_on_them.json",
            ReportKind::AgeDifference => "rooms_with_large_age_difference.json",
            ReportKind::Multisex => "multisex_rooms.json",
            ReportKind::Youngest => "youngest_rooms.json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::StudentCounts => "counts",
            ReportKind::AgeDifference => "age-difference",
            ReportKind::Multisex => "multisex",
            ReportKind::Youngest => "youngest",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ReportKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown report '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub output_dir: PathBuf,
    pub reference_date: NaiveDate,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            reference_date: default_reference_date(),
        }
    }
}

impl ReportOptions {
    pub fn path_for(&self, kind: ReportKind) -> PathBuf {
        self.output_dir.join(kind.file_name())
    }
}

/// What a single report run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    pub kind: ReportKind,
    pub path: PathBuf,
    pub rows: usize,
}

fn save<T: Serialize>(rows: &[T], path: &Path) -> DbResult<usize> {
    json::save_pretty(rows, path)?;
    Ok(rows.len())
}

/// Run one report and write it to `<output_dir>/<file_name>`.
pub async fn write_report(
    session: &mut Session,
    kind: ReportKind,
    options: &ReportOptions,
) -> DbResult<ReportOutcome> {
    let path = options.path_for(kind);
    let rows = match kind {
        ReportKind::StudentCounts => save(&rooms_with_student_counts(session).await?, &path)?,
        ReportKind::AgeDifference => {
            save(&rooms_with_large_age_difference(session).await?, &path)?
        }
        ReportKind::Multisex => save(&multisex_rooms(session).await?, &path)?,
        ReportKind::Youngest => {
            save(&youngest_rooms(session, options.reference_date).await?, &path)?
        }
    };

    info!(report = %kind, rows, "wrote {}", path.display());
    Ok(ReportOutcome { kind, path, rows })
}

/// Write every report in sequence. Stops at the first failure; files already
/// written stay on disk.
pub async fn write_all_reports(
    session: &mut Session,
    options: &ReportOptions,
) -> DbResult<Vec<ReportOutcome>> {
    let mut outcomes = Vec::with_capacity(ReportKind::ALL.len());
    for kind in ReportKind::ALL {
        outcomes.push(write_report(session, kind, options).await?);
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_file_names() {
        let names: Vec<&str> = ReportKind::ALL.iter().map(|k| k.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "rooms_and_students_on_them.json",
                "rooms_with_large_age_difference.json",
                "multisex_rooms.json",
                "youngest_rooms.json",
            ]
        );
    }

    #[test]
    fn report_kind_parses_its_own_name() {
        for kind in ReportKind::ALL {
            assert_eq!(kind.to_string().parse::<ReportKind>(), Ok(kind));
        }
        let err = "oldest".parse::<ReportKind>().unwrap_err();
        assert!(err.contains("counts, age-difference, multisex, youngest"));
    }

    #[test]
    fn options_place_files_in_output_dir() {
        let options = ReportOptions {
            output_dir: PathBuf::from("/tmp/out"),
            ..ReportOptions::default()
        };
        assert_eq!(
            options.path_for(ReportKind::Multisex),
            PathBuf::from("/tmp/out/multisex_rooms.json")
        );
    }

    #[test]
    fn rows_serialize_with_column_names() {
        let row = RoomAgeSpread {
            name: "Room #3".to_string(),
            youngest: "2012-05-01".to_string(),
            oldest: "1998-02-10".to_string(),
            age_difference: 14,
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Room #3",
                "youngest": "2012-05-01",
                "oldest": "1998-02-10",
                "age_diffrence": 14
            })
        );

        let value = serde_json::to_value(RoomAverageAge {
            name: "Red".to_string(),
            average_age: 20.5,
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"name": "Red", "avarage_age": 20.5}));

        let value = serde_json::to_value(RoomSexCount {
            name: "Red".to_string(),
            unique_sexes: 2,
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"name": "Red", "unique_sexes": 2}));
    }
}
