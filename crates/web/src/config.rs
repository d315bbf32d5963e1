//! Web server configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Web server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address
    pub addr: SocketAddr,

    /// Default tracing filter, used when `RUST_LOG` is not set
    pub log_filter: String,

    /// Also write log lines to a rolling file under `log_dir`
    pub log_to_file: bool,

    /// Directory holding `app.<date>.log` files
    pub log_dir: PathBuf,

    /// Log files kept, the current one included
    pub log_max_files: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: calcweb_common::DEFAULT_LISTEN_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8000))),
            log_filter: "info".to_string(),
            log_to_file: true,
            log_dir: PathBuf::from("logs"),
            log_max_files: 4,
        }
    }
}

impl WebConfig {
    /// Load configuration from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build configuration from the process environment.
    ///
    /// - `CALCWEB_CONFIG`: optional TOML file read first
    /// - `CALCWEB_ADDR`: listen address, overrides the file
    /// - `CALCWEB_LOG_DIR`: log file directory
    /// - `CALCWEB_LOG_FILE`: `false`/`0` turns file logging off
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = match non_empty("CALCWEB_CONFIG") {
            Some(path) => Self::load(Path::new(path.trim()))?,
            None => Self::default(),
        };

        if let Some(addr) = non_empty("CALCWEB_ADDR") {
            config.addr = addr
                .trim()
                .parse()
                .map_err(|e| calcweb_common::Error::InvalidConfig(format!("CALCWEB_ADDR={}: {}", addr, e)))?;
        }

        if let Some(dir) = non_empty("CALCWEB_LOG_DIR") {
            config.log_dir = PathBuf::from(dir.trim());
        }

        if let Some(flag) = non_empty("CALCWEB_LOG_FILE") {
            config.log_to_file = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(calcweb_common::Error::InvalidConfig(format!("CALCWEB_LOG_FILE={}", other)).into())
                }
            };
        }

        if config.log_max_files == 0 {
            return Err(calcweb_common::Error::InvalidConfig("log_max_files must be at least 1".to_string()).into());
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WebConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr.port(), 8000);
        assert_eq!(config.log_filter, "info");
        assert!(config.log_to_file);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.log_max_files, 4);
    }

    #[test]
    fn test_log_file_overrides() {
        let config = WebConfig::from_lookup(lookup(&[
            ("CALCWEB_LOG_DIR", "/var/log/calcweb"),
            ("CALCWEB_LOG_FILE", "off"),
        ]))
        .unwrap();
        assert_eq!(config.log_dir, PathBuf::from("/var/log/calcweb"));
        assert!(!config.log_to_file);

        let err = WebConfig::from_lookup(lookup(&[("CALCWEB_LOG_FILE", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("CALCWEB_LOG_FILE"));
    }

    #[test]
    fn test_zero_log_files_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calcweb.toml");
        std::fs::write(&path, "log_max_files = 0\n").unwrap();
        let path_str = path.to_string_lossy().to_string();

        assert!(WebConfig::from_lookup(lookup(&[("CALCWEB_CONFIG", path_str.as_str())])).is_err());
    }

    #[test]
    fn test_addr_override() {
        let config = WebConfig::from_lookup(lookup(&[("CALCWEB_ADDR", "0.0.0.0:9123")])).unwrap();
        assert_eq!(config.addr, "0.0.0.0:9123".parse().unwrap());
    }

    #[test]
    fn test_invalid_addr() {
        let err = WebConfig::from_lookup(lookup(&[("CALCWEB_ADDR", "not-an-addr")])).unwrap_err();
        assert!(err.to_string().contains("CALCWEB_ADDR"));
    }

    #[test]
    fn test_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calcweb.toml");
        std::fs::write(&path, "addr = \"127.0.0.1:7000\"\nlog_filter = \"debug\"\n").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let config = WebConfig::from_lookup(lookup(&[("CALCWEB_CONFIG", path_str.as_str())])).unwrap();
        assert_eq!(config.addr.port(), 7000);
        assert_eq!(config.log_filter, "debug");

        let config = WebConfig::from_lookup(lookup(&[
            ("CALCWEB_CONFIG", path_str.as_str()),
            ("CALCWEB_ADDR", "127.0.0.1:7001"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 7001);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/calcweb.toml");
        let config = WebConfig {
            addr: "127.0.0.1:8123".parse().unwrap(),
            log_filter: "warn".to_string(),
            log_dir: dir.path().join("logs"),
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(WebConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = WebConfig::load(Path::new("/nonexistent/calcweb.toml")).unwrap();
        assert_eq!(config, WebConfig::default());
    }
}
