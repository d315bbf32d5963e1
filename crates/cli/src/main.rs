//! calcweb CLI - Main Entry Point

use calcweb_cli::commands;
use calcweb_cli::output::{self, OutputFormat};
use calcweb_common::{Operation, DEFAULT_BASE_URL, VERSION};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

/// calcweb - four-function calculator client
#[derive(Parser)]
#[command(name = "calcweb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "CALCWEB_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Output format
    #[arg(long, default_value = "plain", global = true)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add two numbers
    Add(Operands),

    /// Subtract B from A
    Subtract(Operands),

    /// Multiply two numbers
    Multiply(Operands),

    /// Divide A by B
    Divide(Operands),

    /// Check backend status
    Status,

    /// Show version information
    Version,
}

/// Raw field text, coerced the same way the page coerces it
#[derive(Args)]
struct Operands {
    #[arg(allow_hyphen_values = true)]
    a: String,

    #[arg(allow_hyphen_values = true)]
    b: String,
}

impl Commands {
    fn operation(&self) -> Option<(Operation, &Operands)> {
        match self {
            Commands::Add(args) => Some((Operation::Add, args)),
            Commands::Subtract(args) => Some((Operation::Subtract, args)),
            Commands::Multiply(args) => Some((Operation::Multiply, args)),
            Commands::Divide(args) => Some((Operation::Divide, args)),
            Commands::Status | Commands::Version => None,
        }
    }
}

#[derive(Serialize)]
struct StatusReport<'a> {
    base_url: &'a str,
    status: String,
}

/// `--verbose` wins over `RUST_LOG`, which wins over the `info` default
fn log_directive(verbose: bool, env: Option<String>) -> String {
    if verbose {
        return "debug".to_string();
    }
    env.filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "info".to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let directive = log_directive(cli.verbose, std::env::var("RUST_LOG").ok());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&directive)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match &cli.command {
        Commands::Status => match commands::check_status(&cli.base_url).await {
            Ok(health) if health.is_ok() => match cli.format {
                OutputFormat::Plain => output::print_success(&format!("Backend is running at {}", cli.base_url)),
                OutputFormat::Json => output::print_item(
                    &StatusReport {
                        base_url: &cli.base_url,
                        status: health.status,
                    },
                    cli.format,
                ),
            },
            Ok(health) => {
                output::print_error(&format!(
                    "Backend at {} reported status {:?}",
                    cli.base_url, health.status
                ));
                std::process::exit(1);
            }
            Err(e) => {
                output::print_error(&format!("Cannot reach backend at {}: {:#}", cli.base_url, e));
                std::process::exit(1);
            }
        },
        Commands::Version => {
            output::print_message(&format!("calcweb v{}", VERSION), cli.format);
        }
        command => {
            if let Some((operation, args)) = command.operation() {
                let outcome =
                    commands::run_operation(&cli.base_url, operation, &args.a, &args.b, cli.format).await?;
                if outcome.is_error() {
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
