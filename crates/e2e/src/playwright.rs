//! Playwright browser automation
//!
//! Each scenario is compiled into a single node script that drives one
//! browser context from the first step to the last. The script reports one
//! JSON line per step on stdout, which is how results get back to Rust.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::spec::{TestSpec, TestStep};

/// Base URL used when `BASE_URL` is not set
pub const DEFAULT_BASE_URL: &str = calcweb_common::DEFAULT_BASE_URL;

/// When to record a Playwright trace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceMode {
    Off,
    On,
    /// Only the first retry of a failed test
    #[default]
    OnFirstRetry,
}

impl TraceMode {
    /// Whether attempt `attempt` (0 is the initial run) records a trace
    pub fn records(&self, attempt: u32) -> bool {
        match self {
            TraceMode::Off => false,
            TraceMode::On => true,
            TraceMode::OnFirstRetry => attempt == 1,
        }
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    /// Screenshots and traces land here
    pub output_dir: PathBuf,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub headless: bool,
    /// Extra attempts after a failed run
    pub retries: u32,
    pub trace: TraceMode,
    /// Wall-clock limit for one attempt
    pub timeout: Duration,
    /// Directories searched for the `playwright` package
    pub node_path: Vec<PathBuf>,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("test-results"),
            viewport_width: 1280,
            viewport_height: 720,
            headless: true,
            retries: 1,
            trace: TraceMode::OnFirstRetry,
            timeout: Duration::from_secs(30),
            node_path: vec![PathBuf::from("node_modules")],
        }
    }
}

impl PlaywrightConfig {
    /// Defaults, with the base URL taken from `BASE_URL`
    pub fn from_env() -> Self {
        Self {
            base_url: resolve_base_url(std::env::var("BASE_URL").ok().as_deref()),
            ..Default::default()
        }
    }
}

/// `BASE_URL` if set and non-empty, else the local default
pub fn resolve_base_url(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

/// Result of executing a test step, as reported by the script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    #[serde(alias = "step")]
    pub index: usize,
    #[serde(alias = "name")]
    pub step_name: String,
    #[serde(alias = "ok")]
    pub success: bool,
    #[serde(alias = "ms")]
    pub duration_ms: u64,
    #[serde(default)]
    pub error: Option<String>,
}

/// One run of a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptResult {
    pub attempt: u32,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
    pub trace_path: Option<PathBuf>,
}

/// Runs scenarios through node
pub struct PlaywrightRunner {
    config: PlaywrightConfig,
    screenshot_dir: PathBuf,
    trace_dir: PathBuf,
}

impl PlaywrightRunner {
    /// Create a runner, checking that node can load `playwright`
    pub async fn new(config: PlaywrightConfig) -> E2eResult<Self> {
        let runner = Self::unchecked(config)?;
        runner.check_playwright_installed().await?;
        Ok(runner)
    }

    /// Create a runner without probing node; output paths are made absolute
    /// so the generated script does not depend on its working directory
    pub fn unchecked(config: PlaywrightConfig) -> E2eResult<Self> {
        let output_dir = absolute(&config.output_dir)?;
        Ok(Self {
            screenshot_dir: output_dir.join("screenshots"),
            trace_dir: output_dir.join("traces"),
            config,
        })
    }

    pub fn config(&self) -> &PlaywrightConfig {
        &self.config
    }

    pub fn set_base_url(&mut self, base_url: &str) {
        self.config.base_url = base_url.to_string();
    }

    async fn check_playwright_installed(&self) -> E2eResult<()> {
        let status = Command::new("node")
            .args(["-e", "require.resolve('playwright')"])
            .env("NODE_PATH", self.node_path()?)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    fn node_path(&self) -> E2eResult<std::ffi::OsString> {
        let mut dirs = Vec::new();
        for dir in &self.config.node_path {
            dirs.push(absolute(dir)?);
        }
        if let Some(existing) = std::env::var_os("NODE_PATH") {
            dirs.extend(std::env::split_paths(&existing));
        }
        std::env::join_paths(dirs).map_err(|e| E2eError::Playwright(e.to_string()))
    }

    /// Where attempt `attempt` of `spec` writes its trace
    pub fn trace_path(&self, spec: &TestSpec, attempt: u32) -> PathBuf {
        self.trace_dir
            .join(format!("{}-retry{}.zip", slug(&spec.name), attempt))
    }

    /// Build the node script for a whole scenario
    pub fn build_script(&self, spec: &TestSpec, trace_path: Option<&Path>) -> String {
        let mut script = String::new();

        script.push_str("const { chromium, devices } = require('playwright');\n\n");
        script.push_str(&format!("const baseUrl = {};\n", js_str(&self.config.base_url)));
        script.push_str(SCRIPT_HELPERS);

        script.push_str("(async () => {\n");
        script.push_str(&format!(
            "  const browser = await chromium.launch({{ headless: {} }});\n",
            self.config.headless
        ));
        script.push_str(&format!(
            "  const context = await browser.newContext({{ ...devices['Desktop Chrome'], viewport: {{ width: {}, height: {} }} }});\n",
            self.config.viewport_width, self.config.viewport_height
        ));
        if trace_path.is_some() {
            script.push_str("  await context.tracing.start({ screenshots: true, snapshots: true });\n");
        }
        script.push_str("  const page = await context.newPage();\n");
        script.push_str("  page.on('console', (msg) => console.error('[browser] ' + msg.text()));\n");
        script.push_str("  let failure = null;\n\n  try {\n");

        for (i, step) in spec.steps.iter().enumerate() {
            script.push_str(&format!(
                "    await step({}, {}, async () => {{\n{}\n    }});\n",
                i + 1,
                js_str(&step.describe()),
                self.step_to_js(spec, step)
            ));
        }

        script.push_str("  } catch (error) {\n    failure = error;\n  } finally {\n");
        if let Some(path) = trace_path {
            script.push_str(&format!(
                "    await context.tracing.stop({{ path: {} }});\n",
                js_str(&path.to_string_lossy())
            ));
        }
        script.push_str("    await browser.close();\n  }\n\n");
        script.push_str(
            "  if (failure) {\n    console.error(JSON.stringify({ success: false, error: failure.message }));\n    process.exit(1);\n  }\n",
        );
        script.push_str("  console.log(JSON.stringify({ success: true }));\n})();\n");

        script
    }

    /// Convert a step to the body of its `step(...)` callback
    fn step_to_js(&self, spec: &TestSpec, step: &TestStep) -> String {
        match step {
            TestStep::Navigate {
                url,
                wait_for_selector,
            } => {
                let target = if url.contains("://") {
                    js_str(url)
                } else {
                    format!("baseUrl + {}", js_str(url))
                };
                let mut js = format!("      await page.goto({});", target);
                if let Some(selector) = wait_for_selector {
                    js.push_str(&format!("\n      await page.waitForSelector({});", js_str(selector)));
                }
                js
            }
            TestStep::Fill { selector, value } => {
                format!("      await page.fill({}, {});", js_str(selector), js_str(value))
            }
            TestStep::Click {
                selector,
                timeout_ms,
            } => {
                format!(
                    "      await page.click({}, {{ timeout: {} }});",
                    js_str(selector),
                    timeout_ms.unwrap_or(5000)
                )
            }
            TestStep::Assert {
                selector,
                visible,
                text,
                text_contains,
                timeout_ms,
            } => {
                let locator = format!("page.locator({})", js_str(selector));
                let mut assertions = Vec::new();

                if let Some(visible) = visible {
                    let state = if *visible { "visible" } else { "hidden" };
                    assertions.push(format!(
                        "      await {}.waitFor({{ state: '{}', timeout: {} }});",
                        locator, state, timeout_ms
                    ));
                }
                if let Some(text) = text {
                    assertions.push(format!(
                        "      await expectText({}, {}, true, {});",
                        locator,
                        js_str(text),
                        timeout_ms
                    ));
                }
                if let Some(text) = text_contains {
                    assertions.push(format!(
                        "      await expectText({}, {}, false, {});",
                        locator,
                        js_str(text),
                        timeout_ms
                    ));
                }

                assertions.join("\n")
            }
            TestStep::Wait {
                selector,
                timeout_ms,
                state,
            } => {
                format!(
                    "      await page.waitForSelector({}, {{ state: '{}', timeout: {} }});",
                    js_str(selector),
                    state.as_str(),
                    timeout_ms
                )
            }
            TestStep::Sleep { ms } => format!("      await page.waitForTimeout({});", ms),
            TestStep::Screenshot {
                name,
                selector,
                full_page,
            } => {
                let path = self
                    .screenshot_dir
                    .join(format!("{}-{}.png", slug(&spec.name), slug(name)));
                let path = js_str(&path.to_string_lossy());
                match selector {
                    Some(selector) => format!(
                        "      await page.locator({}).screenshot({{ path: {} }});",
                        js_str(selector),
                        path
                    ),
                    None => format!(
                        "      await page.screenshot({{ path: {}, fullPage: {} }});",
                        path, full_page
                    ),
                }
            }
            TestStep::Log { message } => {
                format!("      console.log('[TEST] ' + {});", js_str(message))
            }
        }
    }

    /// Run one attempt of a scenario.
    ///
    /// A failing or timed-out script is a failed attempt, not an `Err`;
    /// `Err` means the attempt could not be started at all.
    pub async fn run_spec(&self, spec: &TestSpec, attempt: u32) -> E2eResult<AttemptResult> {
        let trace_path = self
            .config
            .trace
            .records(attempt)
            .then(|| self.trace_path(spec, attempt));

        std::fs::create_dir_all(&self.screenshot_dir)?;
        if trace_path.is_some() {
            std::fs::create_dir_all(&self.trace_dir)?;
        }

        let script = self.build_script(spec, trace_path.as_deref());
        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join(format!("{}.js", slug(&spec.name)));
        std::fs::write(&script_path, &script)?;

        debug!("Running Playwright script: {}", script_path.display());

        let start = Instant::now();
        let mut cmd = Command::new("node");
        cmd.arg(&script_path)
            .env("NODE_PATH", self.node_path()?)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.config.timeout, cmd.output()).await {
            Ok(output) => output?,
            Err(_) => {
                let err = E2eError::Timeout(format!("{} after {:?}", spec.name, self.config.timeout));
                warn!("{}", err);
                return Ok(AttemptResult {
                    attempt,
                    success: false,
                    duration_ms: start.elapsed().as_millis() as u64,
                    steps: vec![],
                    error: Some(err.to_string()),
                    trace_path: None,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stdout.lines() {
            if let Some(message) = line.strip_prefix("[TEST] ") {
                info!("[TEST LOG] {}", message);
            }
        }

        let steps = parse_step_lines(&stdout);
        let success = output.status.success();
        let error = if success {
            None
        } else {
            Some(script_failure(&stderr))
        };

        Ok(AttemptResult {
            attempt,
            success,
            duration_ms: start.elapsed().as_millis() as u64,
            steps,
            error,
            trace_path: trace_path.filter(|p| p.exists()),
        })
    }
}

const SCRIPT_HELPERS: &str = r#"
async function expectText(locator, expected, exact, timeout) {
  const deadline = Date.now() + timeout;
  for (;;) {
    const actual = ((await locator.textContent({ timeout })) || '').trim();
    if (exact ? actual === expected : actual.includes(expected)) return;
    if (Date.now() > deadline) {
      const kind = exact ? 'text' : 'text containing';
      throw new Error(`expected ${kind} ${JSON.stringify(expected)}, got ${JSON.stringify(actual)}`);
    }
    await new Promise((resolve) => setTimeout(resolve, 50));
  }
}

async function step(index, name, body) {
  const started = Date.now();
  try {
    await body();
  } catch (error) {
    console.log(JSON.stringify({ step: index, name, ok: false, ms: Date.now() - started, error: error.message }));
    throw error;
  }
  console.log(JSON.stringify({ step: index, name, ok: true, ms: Date.now() - started }));
}

"#;

/// JavaScript string literal for `s`
pub fn js_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// File-name-safe form of a test or screenshot name
pub fn slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

/// Step result lines from the script's stdout, in order
pub fn parse_step_lines(stdout: &str) -> Vec<StepResult> {
    stdout
        .lines()
        .filter(|line| line.starts_with('{'))
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

fn script_failure(stderr: &str) -> String {
    #[derive(Deserialize)]
    struct Failure {
        error: String,
    }

    stderr
        .lines()
        .rev()
        .find_map(|line| serde_json::from_str::<Failure>(line).ok())
        .map(|f| f.error)
        .unwrap_or_else(|| {
            let trimmed = stderr.trim();
            if trimmed.is_empty() {
                "script failed without output".to_string()
            } else {
                trimmed.to_string()
            }
        })
}

fn absolute(path: &Path) -> E2eResult<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> PlaywrightRunner {
        PlaywrightRunner::unchecked(PlaywrightConfig {
            base_url: "http://127.0.0.1:4321".to_string(),
            output_dir: PathBuf::from("/tmp/calcweb-results"),
            ..Default::default()
        })
        .unwrap()
    }

    fn spec(yaml: &str) -> TestSpec {
        TestSpec::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_harness_defaults() {
        let config = PlaywrightConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!((config.viewport_width, config.viewport_height), (1280, 720));
        assert!(config.headless);
        assert_eq!(config.retries, 1);
        assert_eq!(config.trace, TraceMode::OnFirstRetry);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_resolve_base_url() {
        assert_eq!(resolve_base_url(None), "http://localhost:8000");
        assert_eq!(resolve_base_url(Some("  ")), "http://localhost:8000");
        assert_eq!(resolve_base_url(Some("http://10.0.0.5:9000/")), "http://10.0.0.5:9000");
    }

    #[test]
    fn test_trace_on_first_retry_only() {
        let mode = TraceMode::OnFirstRetry;
        assert!(!mode.records(0));
        assert!(mode.records(1));
        assert!(!mode.records(2));
        assert!(!TraceMode::Off.records(1));
        assert!(TraceMode::On.records(0));
    }

    #[test]
    fn test_script_is_one_context() {
        let spec = spec(
            r##"
name: add
steps:
  - action: navigate
    url: /
  - action: fill
    selector: '#a'
    value: "10"
  - action: click
    selector: '#btn-add'
  - action: assert
    selector: '#result'
    text: 'Result: 14'
"##,
        );
        let script = runner().build_script(&spec, None);

        assert_eq!(script.matches("chromium.launch").count(), 1);
        assert_eq!(script.matches("browser.newContext").count(), 1);
        assert!(script.contains("chromium.launch({ headless: true })"));
        assert!(script.contains(r#"const baseUrl = "http://127.0.0.1:4321";"#));
        assert!(script.contains(r#"await page.goto(baseUrl + "/");"#));
        assert!(script.contains(r##"await page.fill("#a", "10");"##));
        assert!(script.contains(r##"await expectText(page.locator("#result"), "Result: 14", true, 5000);"##));
        assert!(script.contains("await step(4, "));
        assert!(!script.contains("tracing.start"));
    }

    #[test]
    fn test_literals_are_escaped() {
        let spec = spec(
            r##"
name: quoting
steps:
  - action: fill
    selector: "input[name='a']"
    value: "it's \"quoted\"\n"
  - action: log
    message: "can't stop"
"##,
        );
        let script = runner().build_script(&spec, None);

        assert!(script.contains(r#"await page.fill("input[name='a']", "it's \"quoted\"\n");"#));
        assert!(script.contains(r#"console.log('[TEST] ' + "can't stop");"#));
    }

    #[test]
    fn test_trace_recorded_into_output_dir() {
        let runner = runner();
        let spec = spec("name: calc basics\nsteps:\n  - action: sleep\n    ms: 5\n");
        let trace = runner.trace_path(&spec, 1);
        assert_eq!(trace, PathBuf::from("/tmp/calcweb-results/traces/calc-basics-retry1.zip"));

        let script = runner.build_script(&spec, Some(&trace));
        assert!(script.contains("await context.tracing.start({ screenshots: true, snapshots: true });"));
        assert!(script.contains(r#"await context.tracing.stop({ path: "/tmp/calcweb-results/traces/calc-basics-retry1.zip" });"#));
    }

    #[test]
    fn test_screenshot_path() {
        let spec = spec("name: calc\nsteps:\n  - action: screenshot\n    name: after add\n");
        let script = runner().build_script(&spec, None);
        assert!(script.contains(
            r#"await page.screenshot({ path: "/tmp/calcweb-results/screenshots/calc-after-add.png", fullPage: false });"#
        ));
    }

    #[test]
    fn test_parse_step_lines() {
        let stdout = r#"{"step":1,"name":"navigate /","ok":true,"ms":120}
[TEST] hello
{"step":2,"name":"assert #result","ok":false,"ms":5000,"error":"expected text \"Result: 14\", got \"\""}
{"success":false}
"#;
        let steps = parse_step_lines(stdout);
        assert_eq!(steps.len(), 2);
        assert!(steps[0].success);
        assert_eq!(steps[1].index, 2);
        assert_eq!(steps[1].step_name, "assert #result");
        assert!(steps[1].error.as_deref().unwrap().contains("Result: 14"));
    }

    #[test]
    fn test_script_failure_message() {
        let stderr = "[browser] hi\n{\"success\":false,\"error\":\"Timeout 5000ms exceeded\"}\n";
        assert_eq!(script_failure(stderr), "Timeout 5000ms exceeded");
        assert_eq!(script_failure("Error: Cannot find module 'playwright'\n"), "Error: Cannot find module 'playwright'");
        assert_eq!(script_failure(""), "script failed without output");
    }
}
