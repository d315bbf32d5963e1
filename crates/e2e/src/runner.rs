//! Main test runner that orchestrates the server and Playwright

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::playwright::{AttemptResult, PlaywrightConfig, PlaywrightRunner};
use crate::server::{ServerConfig, ServerHandle};
use crate::spec::TestSpec;

/// Result of running a single test, across all of its attempts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    /// Passed only after a retry
    pub flaky: bool,
    pub duration_ms: u64,
    pub attempts: Vec<AttemptResult>,
    pub error: Option<String>,
}

impl TestResult {
    fn from_attempts(name: &str, attempts: Vec<AttemptResult>) -> Self {
        let success = attempts.last().map(|a| a.success).unwrap_or(false);
        let error = if success {
            None
        } else {
            attempts.last().and_then(|a| a.error.clone())
        };
        Self {
            name: name.to_string(),
            success,
            flaky: success && attempts.len() > 1,
            duration_ms: attempts.iter().map(|a| a.duration_ms).sum(),
            attempts,
            error,
        }
    }

    fn errored(name: &str, e: &E2eError) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            flaky: false,
            duration_ms: 0,
            attempts: vec![],
            error: Some(e.to_string()),
        }
    }
}

/// Result of running all tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub base_url: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub flaky: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

/// Main E2E test runner
pub struct TestRunner {
    /// Server configuration; `None` targets the configured base URL as is
    server_config: Option<ServerConfig>,

    /// Playwright configuration
    playwright_config: PlaywrightConfig,

    /// Running server handle (if any)
    server: Option<ServerHandle>,

    /// Test specs directory
    specs_dir: PathBuf,

    /// Output directory for results
    output_dir: PathBuf,
}

impl TestRunner {
    /// Create a new test runner with default configuration
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a test runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            server_config: config.server,
            playwright_config: config.playwright,
            server: None,
            specs_dir: config.specs_dir,
            output_dir: config.output_dir,
        }
    }

    /// URL the scenarios run against
    pub fn base_url(&self) -> &str {
        &self.playwright_config.base_url
    }

    /// Start the server, if this runner spawns one
    pub async fn start_server(&mut self) -> E2eResult<()> {
        if self.server.is_some() {
            return Ok(()); // Already running
        }
        let Some(config) = self.server_config.clone() else {
            return Ok(());
        };

        let server = ServerHandle::spawn(config).await?;

        // Point the scenarios at the spawned server
        self.playwright_config.base_url = server.base_url().to_string();

        self.server = Some(server);
        Ok(())
    }

    /// Stop the server
    pub fn stop_server(&mut self) -> E2eResult<()> {
        if let Some(mut server) = self.server.take() {
            server.stop()?;
        }
        Ok(())
    }

    /// Run all tests in the specs directory
    pub async fn run_all(&mut self) -> E2eResult<TestSuiteResult> {
        let specs = TestSpec::load_all(&self.specs_dir)?;
        self.run_specs(&specs).await
    }

    /// Run tests matching a tag
    pub async fn run_tagged(&mut self, tag: &str) -> E2eResult<TestSuiteResult> {
        let specs = TestSpec::load_all(&self.specs_dir)?;
        let filtered: Vec<TestSpec> = TestSpec::filter_by_tag(&specs, tag).into_iter().cloned().collect();
        self.run_specs(&filtered).await
    }

    /// Run a specific test by name
    pub async fn run_test(&mut self, name: &str) -> E2eResult<TestSuiteResult> {
        let specs = TestSpec::load_all(&self.specs_dir)?;
        let spec = specs
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::SpecParse(format!("Test not found: {}", name)))?;

        self.run_specs(std::slice::from_ref(&spec)).await
    }

    /// Run a list of test specs
    pub async fn run_specs(&mut self, specs: &[TestSpec]) -> E2eResult<TestSuiteResult> {
        let start = Instant::now();

        let mut playwright = PlaywrightRunner::new(self.playwright_config.clone()).await?;

        // Ensure server is running
        self.start_server().await?;
        playwright.set_base_url(self.base_url());

        info!("Running {} test(s) against {}...", specs.len(), self.base_url());

        let mut results = Vec::new();
        for spec in specs {
            let result = match Self::run_spec(&playwright, spec).await {
                Ok(result) => result,
                Err(e) => TestResult::errored(&spec.name, &e),
            };

            if result.success {
                info!(
                    "✓ {} ({} ms{})",
                    result.name,
                    result.duration_ms,
                    if result.flaky { ", flaky" } else { "" }
                );
            } else {
                error!("✗ {} - {}", result.name, result.error.as_deref().unwrap_or("unknown error"));
            }
            results.push(result);
        }

        let passed = results.iter().filter(|r| r.success).count();
        let flaky = results.iter().filter(|r| r.flaky).count();
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Test Results: {} passed, {} failed, {} flaky ({} ms)",
            passed,
            results.len() - passed,
            flaky,
            duration_ms
        );

        Ok(TestSuiteResult {
            base_url: self.base_url().to_string(),
            total: specs.len(),
            passed,
            failed: results.len() - passed,
            flaky,
            duration_ms,
            results,
        })
    }

    /// Run a single test spec, retrying a failed attempt up to the
    /// configured number of times
    async fn run_spec(playwright: &PlaywrightRunner, spec: &TestSpec) -> E2eResult<TestResult> {
        debug!("Running test: {}", spec.name);

        let retries = playwright.config().retries;
        let mut attempts = Vec::new();

        for attempt in 0..=retries {
            let result = playwright.run_spec(spec, attempt).await?;
            let success = result.success;

            if !success && attempt < retries {
                warn!(
                    "{} failed on attempt {}: {}; retrying",
                    spec.name,
                    attempt + 1,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            if let Some(trace) = &result.trace_path {
                info!("Trace for {} written to {}", spec.name, trace.display());
            }

            attempts.push(result);
            if success {
                break;
            }
        }

        Ok(TestResult::from_attempts(&spec.name, attempts))
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestRunner {
    fn drop(&mut self) {
        let _ = self.stop_server();
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub server: Option<ServerConfig>,
    pub playwright: PlaywrightConfig,
    pub specs_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            server: None,
            playwright: PlaywrightConfig::from_env(),
            specs_dir: PathBuf::from("crates/e2e/specs"),
            output_dir: PathBuf::from("test-results"),
        }
    }
}
