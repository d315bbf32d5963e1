//! Declarative YAML test specification

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{E2eError, E2eResult};

/// A complete test specification parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSpec {
    /// Unique name for this test
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering tests
    #[serde(default)]
    pub tags: Vec<String>,

    /// Steps to execute in order
    pub steps: Vec<TestStep>,
}

/// A single step in a test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// Navigate to a URL (relative to base)
    Navigate {
        url: String,
        #[serde(default)]
        wait_for_selector: Option<String>,
    },

    /// Fill an input field, replacing its value
    Fill { selector: String, value: String },

    /// Click an element
    Click {
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Assert something about an element; text checks retry until the
    /// step timeout
    Assert {
        selector: String,
        #[serde(default)]
        visible: Option<bool>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        text_contains: Option<String>,
        #[serde(default = "default_wait_timeout")]
        timeout_ms: u64,
    },

    /// Wait for an element to reach a state
    Wait {
        selector: String,
        #[serde(default = "default_wait_timeout")]
        timeout_ms: u64,
        #[serde(default)]
        state: WaitState,
    },

    /// Wait for a fixed amount of time (use sparingly)
    Sleep { ms: u64 },

    /// Take a screenshot into the output directory
    Screenshot {
        name: String,
        #[serde(default)]
        selector: Option<String>,
        #[serde(default)]
        full_page: bool,
    },

    /// Log a message (for debugging)
    Log { message: String },
}

fn default_wait_timeout() -> u64 {
    5000 // 5 seconds default
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

impl WaitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitState::Visible => "visible",
            WaitState::Hidden => "hidden",
            WaitState::Attached => "attached",
            WaitState::Detached => "detached",
        }
    }
}

impl TestStep {
    /// Short label used in logs and results
    pub fn describe(&self) -> String {
        match self {
            TestStep::Navigate { url, .. } => format!("navigate {}", url),
            TestStep::Fill { selector, value } => format!("fill {} = {:?}", selector, value),
            TestStep::Click { selector, .. } => format!("click {}", selector),
            TestStep::Assert { selector, .. } => format!("assert {}", selector),
            TestStep::Wait { selector, state, .. } => format!("wait {} {}", selector, state.as_str()),
            TestStep::Sleep { ms } => format!("sleep {}ms", ms),
            TestStep::Screenshot { name, .. } => format!("screenshot {}", name),
            TestStep::Log { message } => format!("log {}", message),
        }
    }
}

impl TestSpec {
    /// Parse a test spec from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let spec: Self = serde_yaml::from_str(yaml)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Parse a test spec from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| E2eError::SpecParse(format!("{}: {}", path.display(), e)))
    }

    /// Load all test specs from a directory, in file name order
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut specs = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            let spec = Self::from_file(entry.path())?;
            specs.push(spec);
        }

        Ok(specs)
    }

    /// Filter specs by tag
    pub fn filter_by_tag<'a>(specs: &'a [Self], tag: &str) -> Vec<&'a Self> {
        specs.iter().filter(|s| s.tags.iter().any(|t| t == tag)).collect()
    }

    fn validate(&self) -> E2eResult<()> {
        if self.name.trim().is_empty() {
            return Err(E2eError::SpecParse("spec name is empty".to_string()));
        }
        if self.steps.is_empty() {
            return Err(E2eError::SpecParse(format!("{}: no steps", self.name)));
        }
        for (i, step) in self.steps.iter().enumerate() {
            if let TestStep::Assert {
                selector,
                visible: None,
                text: None,
                text_contains: None,
                ..
            } = step
            {
                return Err(E2eError::SpecParse(format!(
                    "{}: step {} asserts nothing about {}",
                    self.name,
                    i + 1,
                    selector
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calculator_spec() {
        let yaml = r##"
name: add-two-numbers
description: Add 10 and 4
tags:
  - smoke
steps:
  - action: navigate
    url: /
    wait_for_selector: '#a'
  - action: fill
    selector: '#a'
    value: "10"
  - action: fill
    selector: '#b'
    value: "4"
  - action: click
    selector: '#btn-add'
  - action: assert
    selector: '#result'
    text: 'Result: 14'
  - action: screenshot
    name: after-add
"##;
        let spec = TestSpec::from_yaml(yaml).unwrap();
        assert_eq!(spec.name, "add-two-numbers");
        assert_eq!(spec.steps.len(), 6);
        assert_eq!(
            spec.steps[1],
            TestStep::Fill {
                selector: "#a".to_string(),
                value: "10".to_string()
            }
        );
        match &spec.steps[4] {
            TestStep::Assert { text, timeout_ms, .. } => {
                assert_eq!(text.as_deref(), Some("Result: 14"));
                assert_eq!(*timeout_ms, 5000);
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_wait_state_defaults_to_visible() {
        let yaml = r##"
name: wait
steps:
  - action: wait
    selector: '#result'
  - action: wait
    selector: '#spinner'
    state: detached
    timeout_ms: 100
"##;
        let spec = TestSpec::from_yaml(yaml).unwrap();
        assert!(matches!(spec.steps[0], TestStep::Wait { state: WaitState::Visible, .. }));
        assert!(matches!(
            spec.steps[1],
            TestStep::Wait {
                state: WaitState::Detached,
                timeout_ms: 100,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let yaml = r#"
name: bad
steps:
  - action: hover
    selector: button
"#;
        assert!(matches!(TestSpec::from_yaml(yaml), Err(E2eError::Yaml(_))));
    }

    #[test]
    fn test_empty_assert_rejected() {
        let yaml = r##"
name: empty-assert
steps:
  - action: assert
    selector: '#result'
"##;
        assert!(matches!(TestSpec::from_yaml(yaml), Err(E2eError::SpecParse(_))));
    }

    #[test]
    fn test_no_steps_rejected() {
        let yaml = "name: nothing\nsteps: []\n";
        assert!(matches!(TestSpec::from_yaml(yaml), Err(E2eError::SpecParse(_))));
    }

    #[test]
    fn test_filter_by_tag() {
        let specs = vec![
            TestSpec::from_yaml("name: a\ntags: [smoke]\nsteps:\n  - action: sleep\n    ms: 1\n").unwrap(),
            TestSpec::from_yaml("name: b\nsteps:\n  - action: sleep\n    ms: 1\n").unwrap(),
        ];
        let smoke = TestSpec::filter_by_tag(&specs, "smoke");
        assert_eq!(smoke.len(), 1);
        assert_eq!(smoke[0].name, "a");
    }

    #[test]
    fn test_load_all_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.yaml"), "name: second\nsteps:\n  - action: log\n    message: hi\n").unwrap();
        std::fs::write(dir.path().join("a.yml"), "name: first\nsteps:\n  - action: log\n    message: hi\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let specs = TestSpec::load_all(dir.path()).unwrap();
        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
