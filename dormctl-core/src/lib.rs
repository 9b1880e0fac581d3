pub mod config;
pub mod error;
pub mod json;
pub mod models;

pub use config::{DatabaseConfig, DormctlConfig, PathsConfig, ReportsConfig};
pub use error::{DormError, Result};
pub use models::{Room, Student};
