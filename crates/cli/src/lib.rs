//! calcweb CLI
//!
//! Runs one calculator operation from a terminal through the same
//! interaction cycle the page uses, and checks backend health.

pub mod commands;
pub mod display;
pub mod output;

pub use display::TerminalDisplay;
pub use output::OutputFormat;
