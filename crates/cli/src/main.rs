//! JFA Distribuciones CLI - operator tools over the REST API.
//!
//! # Usage
//!
//! ```bash
//! # Export the general report as a spreadsheet
//! jfa-cli reports export --format xlsx --output reporte.xlsx
//!
//! # Export the printable report
//! jfa-cli reports export --format html --output reporte.html
//!
//! # List products at or below a stock level
//! jfa-cli stock critical --min 3
//! ```
//!
//! # Environment Variables
//!
//! - `JFA_API_URL` - REST API base URL (default `http://localhost:3000/api`)
//! - `JFA_API_TOKEN` - Bearer token of an admin account, or
//! - `JFA_API_EMAIL` / `JFA_API_PASSWORD` - admin credentials to log in with

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use jfa_backend::DEFAULT_API_URL;
use jfa_core::reports::CRITICAL_STOCK_LEVEL;

mod commands;

#[derive(Parser)]
#[command(name = "jfa-cli")]
#[command(author, version, about = "JFA Distribuciones operator tools")]
struct Cli {
    #[command(flatten)]
    connection: Connection,

    #[command(subcommand)]
    command: Commands,
}

/// How to reach and authenticate against the API.
#[derive(Args, Debug)]
pub struct Connection {
    /// REST API base URL
    #[arg(long, env = "JFA_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Bearer token; skips the login when set
    #[arg(long, env = "JFA_API_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Admin email used to log in
    #[arg(long, env = "JFA_API_EMAIL", global = true)]
    pub email: Option<String>,

    /// Admin password used to log in
    #[arg(long, env = "JFA_API_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report exports
    Reports {
        #[command(subcommand)]
        action: ReportsAction,
    },
    /// Stock checks
    Stock {
        #[command(subcommand)]
        action: StockAction,
    },
}

#[derive(Subcommand)]
enum ReportsAction {
    /// Export the general report
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Xlsx)]
        format: ExportFormat,

        /// File to write; defaults to reporte-general-<date>.<ext>
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum StockAction {
    /// List products at or below a stock level
    Critical {
        /// Stock level to report at or below
        #[arg(long, default_value_t = CRITICAL_STOCK_LEVEL)]
        min: u32,
    },
}

/// Report export formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Excel workbook, one worksheet per section
    Xlsx,
    /// Printable HTML document
    Html,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Html => "html",
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jfa_cli=info,jfa_backend=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let session = commands::session::connect(&cli.connection).await?;

    match cli.command {
        Commands::Reports { action } => match action {
            ReportsAction::Export { format, output } => {
                commands::reports::export(&session, format, output).await?;
            }
        },
        Commands::Stock { action } => match action {
            StockAction::Critical { min } => commands::stock::critical(&session, min).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_arguments() {
        let cli = Cli::try_parse_from([
            "jfa-cli",
            "reports",
            "export",
            "--format",
            "html",
            "--output",
            "out.html",
        ])
        .expect("export arguments parse");

        match cli.command {
            Commands::Reports {
                action: ReportsAction::Export { format, output },
            } => {
                assert_eq!(format, ExportFormat::Html);
                assert_eq!(output, Some(PathBuf::from("out.html")));
            }
            Commands::Stock { .. } => panic!("parsed as a stock command"),
        }
    }

    #[test]
    fn test_stock_default_level() {
        let cli = Cli::try_parse_from(["jfa-cli", "stock", "critical"]).expect("stock parses");
        match cli.command {
            Commands::Stock {
                action: StockAction::Critical { min },
            } => assert_eq!(min, CRITICAL_STOCK_LEVEL),
            Commands::Reports { .. } => panic!("parsed as a reports command"),
        }
    }
}
