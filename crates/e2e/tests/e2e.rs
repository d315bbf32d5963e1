//! E2E test harness entry point
//!
//! This file is the test binary that runs E2E scenarios from YAML specs.
//! Run with: cargo test --package calcweb-e2e --test e2e -- --spawn-server
//!
//! Without `--spawn-server` the scenarios target `BASE_URL`
//! (default `http://localhost:8000`).

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use calcweb_e2e::playwright::{resolve_base_url, PlaywrightConfig, TraceMode};
use calcweb_e2e::runner::{RunnerConfig, TestRunner};
use calcweb_e2e::server::ServerConfig;
use calcweb_e2e::{E2eError, E2eResult};

#[derive(Parser, Debug)]
#[command(name = "calcweb-e2e")]
#[command(about = "E2E test runner for calcweb")]
struct Args {
    /// Path to test specs directory
    #[arg(short, long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/specs"))]
    specs: PathBuf,

    /// Run only tests matching this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Run only a specific test by name
    #[arg(short, long)]
    name: Option<String>,

    /// Base URL of a running server (ignored with --spawn-server)
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,

    /// Spawn the web server on a free port instead of using the base URL
    #[arg(long)]
    spawn_server: bool,

    /// Path to web server binary
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/../../target/debug/calcweb-web"))]
    server_binary: PathBuf,

    /// Port to run server on (0 = auto)
    #[arg(long, default_value = "0")]
    port: u16,

    /// Retries after a failed attempt
    #[arg(long, default_value = "1")]
    retries: u32,

    /// Per-attempt timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Fail instead of skipping when Playwright is not installed
    #[arg(long)]
    require_browser: bool,

    /// Output directory for results
    #[arg(short, long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/../../test-results"))]
    output: PathBuf,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Run async main
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(2);
        }
    };
    let require_browser = args.require_browser;
    let result = rt.block_on(async_main(args));

    match result {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(E2eError::PlaywrightNotFound) if !require_browser => {
            warn!("{}; skipping browser scenarios", E2eError::PlaywrightNotFound);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> E2eResult<bool> {
    let server = args.spawn_server.then(|| ServerConfig {
        binary_path: args.server_binary,
        port: if args.port == 0 { None } else { Some(args.port) },
        ..Default::default()
    });

    let config = RunnerConfig {
        server,
        playwright: PlaywrightConfig {
            base_url: resolve_base_url(args.base_url.as_deref()),
            output_dir: args.output.clone(),
            headless: !args.headed,
            retries: args.retries,
            trace: TraceMode::OnFirstRetry,
            timeout: Duration::from_secs(args.timeout_secs),
            ..Default::default()
        },
        specs_dir: args.specs,
        output_dir: args.output,
    };

    let mut runner = TestRunner::with_config(config);

    // Run tests
    let results = if let Some(name) = args.name {
        runner.run_test(&name).await?
    } else if let Some(tag) = args.tag {
        runner.run_tagged(&tag).await?
    } else {
        runner.run_all().await?
    };

    // Write results
    runner.write_results(&results)?;
    runner.stop_server()?;

    Ok(results.failed == 0)
}
