use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use dormctl_core::DormctlConfig;
use dormctl_db::{ReportKind, ReportOptions, Step};

use super::print_summary;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Directory for the report files (default: paths.output_dir from config)
    #[arg(long = "out", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Date used as "today" for age calculations (YYYY-MM-DD)
    #[arg(long)]
    pub reference_date: Option<NaiveDate>,

    /// Write a single report: counts, age-difference, multisex or youngest
    #[arg(long, value_name = "REPORT")]
    pub only: Option<ReportKind>,
}

/// Write reports against data that is already loaded.
pub async fn run_report(config: DormctlConfig, args: ReportArgs) -> Result<()> {
    let options = ReportOptions {
        output_dir: args.output.unwrap_or(config.paths.output_dir),
        reference_date: args
            .reference_date
            .unwrap_or(config.reports.reference_date),
    };

    let summary = dormctl_db::execute(config.database, &[Step::Report(options, args.only)])
        .await
        .context("failed to write reports")?;
    print_summary(&summary);
    Ok(())
}
