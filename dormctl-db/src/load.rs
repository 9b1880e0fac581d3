//! Bulk load of rooms and students from JSON.
//!
//! One parameterized INSERT per record, each committed on its own. There is no
//! enclosing transaction: rows inserted before a failure stay.

use std::path::PathBuf;

use dormctl_core::{json, PathsConfig, Room, Student};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::session::Session;

const INSERT_ROOM: &str = "INSERT INTO room (id, name) VALUES ($1, $2)";

const INSERT_STUDENT: &str =
    "INSERT INTO students (birthday, id, name, room, sex) VALUES ($1, $2, $3, $4, $5)";

/// Where the two source collections live.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub rooms: PathBuf,
    pub students: PathBuf,
}

impl From<&PathsConfig> for InputPaths {
    fn from(paths: &PathsConfig) -> Self {
        Self {
            rooms: paths.rooms.clone(),
            students: paths.students.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub rooms: usize,
    pub students: usize,
}

pub async fn insert_rooms(session: &mut Session, rooms: &[Room]) -> DbResult<usize> {
    let conn = session.connection()?;
    for room in rooms {
        sqlx::query(INSERT_ROOM)
            .bind(room.id)
            .bind(&room.name)
            .execute(&mut *conn)
            .await?;
        debug!(id = room.id, "inserted room");
    }
    Ok(rooms.len())
}

pub async fn insert_students(session: &mut Session, students: &[Student]) -> DbResult<usize> {
    let conn = session.connection()?;
    for student in students {
        sqlx::query(INSERT_STUDENT)
            .bind(student.birthday)
            .bind(student.id)
            .bind(&student.name)
            .bind(student.room)
            .bind(&student.sex)
            .execute(&mut *conn)
            .await?;
        debug!(id = student.id, "inserted student");
    }
    Ok(students.len())
}

/// Read and insert rooms, then read and insert students.
///
/// Rooms go first because every student row carries a foreign key into `room`.
/// The students file is only read once all rooms are in.
pub async fn insert_data(session: &mut Session, paths: &InputPaths) -> DbResult<LoadSummary> {
    let rooms: Vec<Room> = json::load_array(&paths.rooms)?;
    let room_count = insert_rooms(session, &rooms).await?;
    info!("inserted {} rooms from {}", room_count, paths.rooms.display());

    let students: Vec<Student> = json::load_array(&paths.students)?;
    let student_count = insert_students(session, &students).await?;
    info!(
        "inserted {} students from {}",
        student_count,
        paths.students.display()
    );

    Ok(LoadSummary {
        rooms: room_count,
        students: student_count,
    })
}
