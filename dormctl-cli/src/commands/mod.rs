//! Command implementations for the dormctl CLI

pub mod load;
pub mod report;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use dormctl_core::{DatabaseConfig, DormctlConfig};
use dormctl_db::RunSummary;

pub use load::{run_full, run_init, run_load};
pub use report::run_report;

/// Connection overrides, applied on top of config files and DB_* variables.
#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// Database host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Database port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Database name
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Database user
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Database password
    #[arg(long, global = true)]
    pub password: Option<String>,
}

impl ConnectionArgs {
    pub fn apply(&self, db: &mut DatabaseConfig) {
        if let Some(host) = &self.host {
            db.host = host.clone();
        }
        if let Some(port) = self.port {
            db.port = port;
        }
        if let Some(database) = &self.database {
            db.name = database.clone();
        }
        if let Some(user) = &self.user {
            db.user = user.clone();
        }
        if let Some(password) = &self.password {
            db.password = password.clone();
        }
    }
}

/// Resolve the effective configuration: files, then environment, then flags.
pub fn load_config(config_path: Option<&Path>, connection: &ConnectionArgs) -> Result<DormctlConfig> {
    dormctl_core::config::load_dotenv();
    let mut config = DormctlConfig::load(config_path).context("failed to load configuration")?;
    connection.apply(&mut config.database);
    Ok(config)
}

fn print_summary(summary: &RunSummary) {
    if let Some(load) = summary.load {
        println!("loaded {} rooms, {} students", load.rooms, load.students);
    }
    for outcome in &summary.reports {
        println!("{} ({} rows)", outcome.path.display(), outcome.rows);
    }
}
