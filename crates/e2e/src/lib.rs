//! calcweb E2E Test Framework
//!
//! Drives the calculator page in a real browser:
//! - Spawns the web server as a subprocess (or targets `BASE_URL`)
//! - Compiles declarative YAML scenarios into one Playwright script each
//! - Retries a failed scenario once, recording a trace on the retry
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── ServerHandle::spawn() -> base_url                    │
//! │    ├── PlaywrightRunner::run_spec(spec, attempt)            │
//! │    └── write_results() -> test-results.json                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestSpec (YAML)                                            │
//! │    ├── name, description, tags                              │
//! │    └── steps: [Step]                                        │
//! │          ├── navigate { url }                               │
//! │          ├── fill { selector, value }                       │
//! │          ├── click { selector }                             │
//! │          ├── assert { selector, text?, text_contains?,      │
//! │          │            visible? }                            │
//! │          ├── wait { selector | timeout_ms }                 │
//! │          ├── sleep { ms }                                   │
//! │          ├── screenshot { name }                            │
//! │          └── log { message }                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod playwright;
pub mod runner;
pub mod server;
pub mod spec;

pub use error::{E2eError, E2eResult};
pub use playwright::{PlaywrightConfig, PlaywrightRunner};
pub use runner::{RunnerConfig, TestRunner};
pub use server::{ServerConfig, ServerHandle};
pub use spec::{TestSpec, TestStep};
