//! Command line interface.
//!
//! ```text
//! expense-policy validate request.json [--offline]
//! expense-policy batch expenses.csv [--as-of 2025-03-31]
//! expense-policy serve [--host 0.0.0.0] [--port 8080]
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::api::{self, AppState, ValidationRequest};
use crate::batch::process_file;
use crate::config::{PolicyLoader, Settings};
use crate::error::{EngineError, EngineResult};
use crate::models::Policy;
use crate::rates::{HttpRateProvider, RateProvider};
use crate::report::render_report;
use crate::telemetry;

/// Top-level arguments.
#[derive(Parser, Debug)]
#[command(
    name = "expense-policy",
    about = "Validate expense reimbursements against a company policy",
    version
)]
pub struct Cli {
    /// Policy file; overrides EXPENSE_POLICY_PATH
    #[arg(long, global = true)]
    pub policy: Option<PathBuf>,
    #[command(subcommand)]
    /// What to do.
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one expense described by a JSON request file
    Validate(ValidateArgs),
    /// Validate a CSV of historical expenses and print a report
    Batch(BatchArgs),
    /// Start the HTTP API
    Serve(ServeArgs),
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON file with `expense`, `employee` and optional `rates` / `as_of`
    pub request: PathBuf,
    /// Never call the rate service; the request must carry its own rates
    #[arg(long)]
    pub offline: bool,
}

/// Arguments for `batch`.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// CSV file of expenses
    pub csv: PathBuf,
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD); defaults to now
    #[arg(long, value_parser = parse_as_of)]
    pub as_of: Option<DateTime<Utc>>,
}

/// Arguments for `serve`.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub port: Option<u16>,
}

fn parse_as_of(raw: &str) -> Result<DateTime<Utc>, String> {
    crate::batch::parse_date(raw.trim())
        .ok_or_else(|| format!("'{}' is not an RFC 3339 timestamp or YYYY-MM-DD date", raw))
}

/// Parses the process arguments and runs the selected command.
///
/// # Errors
///
/// Returns any error from settings, logging setup, policy loading or the
/// command itself.
pub async fn run() -> EngineResult<()> {
    let cli = Cli::parse();
    let mut settings = Settings::from_env()?;
    telemetry::init(&settings.log_level)?;

    if let Some(path) = cli.policy.clone() {
        settings.policy_path = path;
    }
    execute(cli.command, settings).await
}

async fn execute(command: Command, settings: Settings) -> EngineResult<()> {
    let policy = PolicyLoader::load(&settings.policy_path)?;

    match command {
        Command::Validate(args) => {
            let provider = if args.offline {
                None
            } else {
                Some(HttpRateProvider::new(&settings.rates, &policy.base_currency)?)
            };
            let request = read_request(&args.request)?;
            let result = request
                .evaluate(&policy, provider.as_ref().map(|p| p as &dyn RateProvider))
                .await?;
            let json = serde_json::to_string_pretty(&result).map_err(|e| EngineError::ServerError {
                message: format!("failed to encode result: {}", e),
            })?;
            println!("{}", json);
        }
        Command::Batch(args) => {
            let provider = HttpRateProvider::new(&settings.rates, &policy.base_currency)?;
            let as_of = args.as_of.unwrap_or_else(Utc::now);
            let report = process_file(&args.csv, &policy, &provider, as_of).await?;
            print!("{}", render_report(&report));
        }
        Command::Serve(args) => {
            let mut server = settings.server.clone();
            if let Some(host) = args.host {
                server.host = host;
            }
            if let Some(port) = args.port {
                server.port = port;
            }
            let state = app_state(policy, &settings)?;
            info!(policy = %settings.policy_path.display(), "starting server");
            api::serve(state, &server).await?;
        }
    }
    Ok(())
}

fn app_state(policy: Policy, settings: &Settings) -> EngineResult<AppState> {
    let provider = HttpRateProvider::new(&settings.rates, &policy.base_currency)?;
    Ok(AppState::new(policy, Arc::new(provider)))
}

fn read_request(path: &Path) -> EngineResult<ValidationRequest> {
    let body = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => EngineError::ConfigNotFound {
            path: path.display().to_string(),
        },
        _ => EngineError::Io(e),
    })?;
    serde_json::from_str(&body).map_err(|e| EngineError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
