//! Data-access and reporting layer for dormctl.
//!
//! - `session`: one PostgreSQL connection, opened and closed explicitly
//! - `schema` / `load`: idempotent table creation, then rooms before students
//! - `reports`: the four aggregate queries and their JSON files
//! - `pipeline`: runs the stages in order inside a scoped session

pub mod error;
pub mod load;
pub mod pipeline;
pub mod reports;
pub mod schema;
pub mod session;

pub use error::{DbError, DbResult, IntegrityKind};
pub use load::{insert_data, insert_rooms, insert_students, InputPaths, LoadSummary};
pub use pipeline::{execute, run_steps, RunSummary, Step};
pub use reports::{
    multisex_rooms, rooms_with_large_age_difference, rooms_with_student_counts,
    write_all_reports, write_report, youngest_rooms, ReportKind, ReportOptions, ReportOutcome,
};
pub use schema::initialize_tables;
pub use session::Session;
