//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Plain text, exactly what the result display shows
    #[default]
    Plain,
    /// JSON format
    Json,
}

/// One rendered display text, as printed in JSON mode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayReport {
    pub display: String,
    pub error: bool,
}

impl DisplayReport {
    pub fn new(text: &str) -> Self {
        Self {
            display: text.to_string(),
            error: text.starts_with("Error: "),
        }
    }
}

/// Render a display text in the requested format
pub fn format_display(text: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Plain => text.to_string(),
        OutputFormat::Json => serde_json::to_string(&DisplayReport::new(text)).unwrap_or_default(),
    }
}

/// Print a serializable item
pub fn print_item<T: Serialize>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(item).unwrap_or_default());
        }
        OutputFormat::Plain => {
            if let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(item) {
                for (key, value) in fields {
                    match value {
                        serde_json::Value::String(s) => println!("{}: {}", key, s),
                        other => println!("{}: {}", key, other),
                    }
                }
            }
        }
    }
}

/// Print a simple message
pub fn print_message(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "message": message }));
        }
        OutputFormat::Plain => {
            println!("{}", message);
        }
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✅".green(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "❌".red(), message.red());
}
