//! Ordered execution of the stages inside one scoped session.

use dormctl_core::DatabaseConfig;
use tracing::{info, warn};

use crate::error::DbResult;
use crate::load::{insert_data, InputPaths, LoadSummary};
use crate::reports::{write_all_reports, write_report, ReportKind, ReportOptions, ReportOutcome};
use crate::schema::initialize_tables;
use crate::session::Session;

#[derive(Debug, Clone)]
pub enum Step {
    InitTables,
    Load(InputPaths),
    /// `None` writes every report.
    Report(ReportOptions, Option<ReportKind>),
}

impl Step {
    /// init, load, then all four reports.
    pub fn full_run(inputs: InputPaths, reports: ReportOptions) -> Vec<Step> {
        vec![
            Step::InitTables,
            Step::Load(inputs),
            Step::Report(reports, None),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub load: Option<LoadSummary>,
    pub reports: Vec<ReportOutcome>,
}

/// Run `steps` against an already open session, stopping at the first error.
pub async fn run_steps(session: &mut Session, steps: &[Step]) -> DbResult<RunSummary> {
    let mut summary = RunSummary::default();
    for step in steps {
        match step {
            Step::InitTables => initialize_tables(session).await?,
            Step::Load(inputs) => summary.load = Some(insert_data(session, inputs).await?),
            Step::Report(options, Some(kind)) => {
                summary.reports.push(write_report(session, *kind, options).await?)
            }
            Step::Report(options, None) => {
                summary.reports.extend(write_all_reports(session, options).await?)
            }
        }
    }
    Ok(summary)
}

/// Open a session, run `steps`, and close the session whether or not they
/// succeeded. A failed open aborts before any step runs.
pub async fn execute(config: DatabaseConfig, steps: &[Step]) -> DbResult<RunSummary> {
    let mut session = Session::new(config);
    session.open().await?;

    let outcome = run_steps(&mut session, steps).await;
    let closed = session.close().await;

    match (outcome, closed) {
        (Ok(summary), Ok(())) => {
            info!(
                reports = summary.reports.len(),
                "run finished"
            );
            Ok(summary)
        }
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), close_result) => {
            if let Err(close_err) = close_result {
                warn!("failed to close session after error: {}", close_err);
            }
            Err(err)
        }
    }
}
