//! Table creation. Every statement is `IF NOT EXISTS`, so running this against an
//! initialized database leaves the schema untouched.

use tracing::{debug, info};

use crate::error::DbResult;
use crate::session::Session;

pub const CREATE_ROOM_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS room (
        id SERIAL PRIMARY KEY,
        name VARCHAR(128)
    )
"#;

pub const CREATE_STUDENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS students (
        birthday DATE,
        id SERIAL PRIMARY KEY,
        name VARCHAR(128),
        room INT REFERENCES room(id),
        sex VARCHAR(8)
    )
"#;

/// `room` first: `students.room` references it.
const TABLES: [(&str, &str); 2] = [
    ("room", CREATE_ROOM_TABLE),
    ("students", CREATE_STUDENTS_TABLE),
];

/// Create the `room` and `students` tables if absent. Each statement commits on
/// its own; a failure part way leaves earlier tables in place.
pub async fn initialize_tables(session: &mut Session) -> DbResult<()> {
    let conn = session.connection()?;
    for (table, ddl) in TABLES {
        sqlx::query(ddl).execute(&mut *conn).await?;
        debug!(table, "ensured table");
    }
    info!("tables initialized");
    Ok(())
}
