//! Result display backed by the terminal

use calcweb_client::ResultDisplay;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::output::{format_display, OutputFormat};

/// Writes each render to stdout and keeps the last text
#[derive(Debug, Clone, Default)]
pub struct TerminalDisplay {
    format: OutputFormat,
    last: Arc<RwLock<Option<String>>>,
}

impl TerminalDisplay {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            last: Arc::default(),
        }
    }

    /// Last rendered text, `None` until something settles
    pub fn last(&self) -> Option<String> {
        self.last.read().clone()
    }
}

impl ResultDisplay for TerminalDisplay {
    fn render(&self, text: &str) {
        println!("{}", format_display(text, self.format));
        *self.last.write() = Some(text.to_string());
    }
}
