use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use showroom_perf::config::AppConfig;
use showroom_perf::error::AppError;
use showroom_perf::telemetry;

use crate::commands;

#[derive(Parser, Debug)]
#[command(
    name = "showroom-perf",
    about = "Track and score salesperson performance per dealership store",
    version
)]
struct Cli {
    /// Store key selecting the roster slot (see `tenants`)
    #[arg(long, global = true, default_value = "")]
    tenant: String,
    /// Open the roster without allowing edits
    #[arg(long, global = true)]
    read_only: bool,
    /// Override the configured data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the scoreboard for the selected store (default command)
    Board,
    /// Show the full evaluation breakdown for one salesperson
    Score {
        /// Record id as shown on the scoreboard
        id: String,
    },
    /// Add a salesperson to the roster
    Add(AddArgs),
    /// Edit fields of an existing salesperson
    Set(SetArgs),
    /// Remove a salesperson from the roster
    Remove {
        /// Record id as shown on the scoreboard
        id: String,
    },
    /// Export the roster as JSON or the scoreboard as CSV
    Export(ExportArgs),
    /// Replace the roster from an exported JSON file
    Import {
        /// Path to a previously exported JSON roster
        file: PathBuf,
    },
    /// List the known store keys and their labels
    Tenants,
}

#[derive(Args, Debug, Default)]
pub(crate) struct AddArgs {
    /// Salesperson name
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Free-form notes
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct SetArgs {
    /// Record id as shown on the scoreboard
    pub(crate) id: String,
    /// Salesperson name
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Store label override
    #[arg(long)]
    pub(crate) store: Option<String>,
    /// Free-form notes
    #[arg(long)]
    pub(crate) notes: Option<String>,
    /// Review-site rating score, e.g. 4.6
    #[arg(long)]
    pub(crate) rating: Option<String>,
    /// Complaint-site rating: Ótimo, Bom, Regular, Ruim, or Péssimo
    #[arg(long)]
    pub(crate) complaint: Option<String>,
    /// Goal assignment `metric=value`, repeatable (e.g. --goal sales=8)
    #[arg(long)]
    pub(crate) goal: Vec<String>,
    /// Actual-result assignment `metric=value`, repeatable (e.g. --actual sales=5)
    #[arg(long)]
    pub(crate) actual: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Output path; defaults to performance_<slot>.json or .csv
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Export format
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub(crate) format: ExportFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ExportFormat {
    Json,
    Csv,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("unknown metric '{0}' (expected sales, featured, dispatcher, financeRate, financeProfitability, or tradeIn)")]
    UnknownMetric(String),
    #[error("expected metric=value, got '{0}'")]
    MalformedAssignment(String),
}

pub(crate) fn run() -> Result<(), CliError> {
    dispatch(Cli::parse())
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    let command = cli.command.unwrap_or(Command::Board);

    let mut config = AppConfig::load().map_err(AppError::from)?;
    telemetry::init(&config.telemetry).map_err(AppError::from)?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    // opened per command; `tenants` never touches the roster
    let session = || commands::open_session(&config, &cli.tenant, cli.read_only);

    match command {
        Command::Board => commands::run_board(&session()?),
        Command::Score { id } => commands::run_score(&session()?, &id),
        Command::Add(args) => commands::run_add(&mut session()?, args),
        Command::Set(args) => commands::run_set(&mut session()?, args),
        Command::Remove { id } => commands::run_remove(&mut session()?, &id),
        Command::Export(args) => commands::run_export(&session()?, args),
        Command::Import { file } => commands::run_import(&mut session()?, &file),
        Command::Tenants => {
            commands::run_tenants();
            Ok(())
        }
    }
}
