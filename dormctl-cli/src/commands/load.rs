//! `run`, `init` and `load`: schema setup and data load, optionally followed by
//! every report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use dormctl_core::DormctlConfig;
use dormctl_db::{InputPaths, ReportOptions, Step};
use tracing::info;

use super::print_summary;

#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Rooms JSON array (default: paths.rooms from config)
    #[arg(long, value_name = "PATH")]
    pub rooms: Option<PathBuf>,

    /// Students JSON array (default: paths.students from config)
    #[arg(long, value_name = "PATH")]
    pub students: Option<PathBuf>,
}

impl InputArgs {
    pub fn resolve(&self, config: &DormctlConfig) -> InputPaths {
        let mut paths = InputPaths::from(&config.paths);
        if let Some(rooms) = &self.rooms {
            paths.rooms = rooms.clone();
        }
        if let Some(students) = &self.students {
            paths.students = students.clone();
        }
        paths
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory for the report files (default: paths.output_dir from config)
    #[arg(long = "out", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Date used as "today" for age calculations (YYYY-MM-DD)
    #[arg(long)]
    pub reference_date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct LoadArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Full run: create tables, load both files, write all four reports.
pub async fn run_full(config: DormctlConfig, args: RunArgs) -> Result<()> {
    let inputs = args.input.resolve(&config);
    let reports = ReportOptions {
        output_dir: args.output.unwrap_or_else(|| config.paths.output_dir.clone()),
        reference_date: args
            .reference_date
            .unwrap_or(config.reports.reference_date),
    };

    info!(
        "loading {:?} and {:?}, reports -> {:?}",
        inputs.rooms, inputs.students, reports.output_dir
    );

    let summary = dormctl_db::execute(config.database, &Step::full_run(inputs, reports))
        .await
        .context("run failed")?;
    print_summary(&summary);
    Ok(())
}

pub async fn run_init(config: DormctlConfig) -> Result<()> {
    dormctl_db::execute(config.database, &[Step::InitTables])
        .await
        .context("failed to initialize tables")?;
    Ok(())
}

pub async fn run_load(config: DormctlConfig, args: LoadArgs) -> Result<()> {
    let inputs = args.input.resolve(&config);
    let summary = dormctl_db::execute(config.database, &[Step::InitTables, Step::Load(inputs)])
        .await
        .context("failed to load data")?;
    print_summary(&summary);
    Ok(())
}
