//! dormctl CLI - load room and student datasets into PostgreSQL and write the
//! room reports
//!
//! - `run`: create tables, load rooms.json and students.json, write all reports
//! - `init` / `load` / `report`: the same stages one at a time

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::load::{LoadArgs, RunArgs};
use commands::report::ReportArgs;
use commands::ConnectionArgs;

#[derive(Parser, Debug)]
#[command(
    name = "dormctl",
    author,
    version,
    about = "Load room and student datasets into PostgreSQL and write aggregate reports"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ./dormctl.toml, then ~/.dormctl/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create tables, load both datasets and write every report
    Run(RunArgs),
    /// Create the room and students tables if they do not exist
    Init,
    /// Create tables and load rooms, then students
    Load(LoadArgs),
    /// Write reports from already loaded data
    Report(ReportArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    let config = commands::load_config(cli.config.as_deref(), &cli.connection)?;

    match cli.command {
        Commands::Run(args) => commands::run_full(config, args).await?,
        Commands::Init => commands::run_init(config).await?,
        Commands::Load(args) => commands::run_load(config, args).await?,
        Commands::Report(args) => commands::run_report(config, args).await?,
    }
    Ok(())
}
