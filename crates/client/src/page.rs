//! Page elements the handler reads from and writes to

use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Source of the two operand fields' current text
pub trait OperandInputs: Send + Sync {
    fn read(&self) -> (String, String);
}

/// The single result display element
pub trait ResultDisplay: Send + Sync {
    fn render(&self, text: &str);
}

/// A shared text input
#[derive(Debug, Clone, Default)]
pub struct TextField {
    value: Arc<RwLock<String>>,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(RwLock::new(value.into())),
        }
    }

    pub fn set(&self, value: impl Into<String>) {
        *self.value.write() = value.into();
    }

    pub fn value(&self) -> String {
        self.value.read().clone()
    }
}

/// The `a` and `b` inputs
#[derive(Debug, Clone, Default)]
pub struct TextFields {
    pub a: TextField,
    pub b: TextField,
}

impl TextFields {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: TextField::new(a),
            b: TextField::new(b),
        }
    }

    /// Replace both values at once
    pub fn fill(&self, a: impl Into<String>, b: impl Into<String>) {
        self.a.set(a);
        self.b.set(b);
    }
}

impl OperandInputs for TextFields {
    fn read(&self) -> (String, String) {
        (self.a.value(), self.b.value())
    }
}

/// In-memory result display; clones share the same text
#[derive(Debug, Clone, Default)]
pub struct TextDisplay {
    text: Arc<RwLock<String>>,
    renders: Arc<AtomicUsize>,
}

impl TextDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.text.read().clone()
    }

    /// Number of renders so far
    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl ResultDisplay for TextDisplay {
    fn render(&self, text: &str) {
        *self.text.write() = text.to_string();
        self.renders.fetch_add(1, Ordering::SeqCst);
    }
}
