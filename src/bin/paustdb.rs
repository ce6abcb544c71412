// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Inspection tool for a paust-db data directory.
//!
//! Usage:
//!   paustdb info
//!   paustdb query --start 1545982882435375000 --end 1545982882435375002 --owner o1
//!   paustdb fetch AAAAAAAAAAEAAg== AAAAAAAAAAEAAw==

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use paustdb::app::{AppConfig, AppError, Application, QueryRequest, DEFAULT_DATA_DIR_NAME};
use paustdb::query::{QueryKind, RangeQuery};

#[derive(Parser)]
#[command(name = "paustdb", version, about = "Inspect a paust-db data directory")]
struct Cli {
    /// Data directory [default: $HOME/.paust-db]
    #[arg(long, global = true, env = "PAUSTDB_DIR")]
    dir: Option<PathBuf>,

    /// Log level: debug, info, warn, error or off. Overrides RUST_LOG.
    #[arg(long, global = true, env = "PAUSTDB_LOG")]
    level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the last committed height and app hash
    Info,
    /// Range query over metadata
    Query(QueryArgs),
    /// Fetch payloads by base64 row key
    Fetch {
        #[arg(required = true)]
        row_keys: Vec<String>,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Inclusive start, unix nanoseconds
    #[arg(long)]
    start: u64,
    /// Exclusive end, unix nanoseconds
    #[arg(long)]
    end: u64,
    #[arg(long)]
    owner: Option<String>,
    #[arg(long)]
    qualifier: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rejected ({code}): {log}")]
    Rejected { code: u32, log: String },
}

fn main() {
    let cli = Cli::parse();

    let filter = match &cli.level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let data_dir = cli.dir.unwrap_or_else(default_data_dir);
    let app = Application::open(AppConfig::new(data_dir))?;

    match cli.command {
        Commands::Info => {
            println!("{}", serde_json::to_string_pretty(&app.info())?);
        }
        Commands::Query(args) => {
            let mut query = RangeQuery::new(args.start, args.end);
            if let Some(owner) = args.owner {
                query = query.with_owner(owner);
            }
            if let Some(qualifier) = args.qualifier {
                query = query.with_qualifier(qualifier.into_bytes());
            }
            let body = serde_json::to_vec(&query)?;
            print_query(&app, QueryRequest::new(QueryKind::Range.path(), body))?;
        }
        Commands::Fetch { row_keys } => {
            let body = serde_json::to_vec(&serde_json::json!({ "rowKeys": row_keys }))?;
            print_query(&app, QueryRequest::new(QueryKind::Fetch.path(), body))?;
        }
    }
    Ok(())
}

fn print_query(app: &Application, request: QueryRequest) -> Result<(), CliError> {
    let resp = app.query(&request)?;
    if !resp.is_ok() {
        return Err(CliError::Rejected {
            code: resp.code.value(),
            log: resp.log,
        });
    }
    println!("{}", String::from_utf8_lossy(&resp.value));
    Ok(())
}

fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(DEFAULT_DATA_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_read_commands() {
        assert!(Cli::try_parse_from(["paustdb", "info"]).is_ok());
        assert!(Cli::try_parse_from(["paustdb", "fetch", "AAAAAAAAAAEAAg=="]).is_ok());
        assert!(Cli::try_parse_from(["paustdb", "query", "--start", "1", "--end", "2"]).is_ok());
        assert!(Cli::try_parse_from(["paustdb", "apply", "tx.json"]).is_err());
    }

    #[test]
    fn test_fetch_needs_a_key() {
        assert!(Cli::try_parse_from(["paustdb", "fetch"]).is_err());
    }
}
