use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::progress::ProgressTiming;
use crate::session::FallbackPolicy;

const CONFIG_FILE: &str = ".dpr-assessor.toml";
const BACKEND_URL_ENV: &str = "DPR_BACKEND_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .dpr-assessor.toml.
/// Every field is optional; the tool runs in demo-capable mode with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub progress: ProgressConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the analysis service. Falls back to DPR_BACKEND_URL.
    pub url: Option<String>,

    /// Request timeout; none by default
    pub timeout_secs: Option<u64>,

    /// What to do when the backend fails: "synthetic" or "fail"
    #[serde(default)]
    pub on_failure: FallbackPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_tick_ms() -> u64 {
    200
}

fn default_settle_ms() -> u64 {
    800
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl ProgressConfig {
    pub fn timing(&self) -> ProgressTiming {
        ProgressTiming {
            tick: Duration::from_millis(self.tick_ms.max(1)),
            settle: Duration::from_millis(self.settle_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory the JSON and text exports are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Load configuration from .dpr-assessor.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        if config.backend.url.is_none() {
            if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
                config.backend.url = Some(url);
            }
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Backend base URL, ignoring blank values.
    pub fn backend_url(&self) -> Option<&str> {
        self.backend
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn backend_timeout(&self) -> Option<Duration> {
        self.backend.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.backend_url().is_none());
        assert!(config.backend_timeout().is_none());
        assert_eq!(config.backend.on_failure, FallbackPolicy::Synthetic);
        assert_eq!(config.progress.timing(), ProgressTiming::default());
        assert_eq!(config.export.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[backend]
url = "http://localhost:5000"
timeout_secs = 30
on_failure = "fail"

[progress]
tick_ms = 50

[export]
output_dir = "out/dpr"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend_url(), Some("http://localhost:5000"));
        assert_eq!(config.backend_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.backend.on_failure, FallbackPolicy::Fail);
        assert_eq!(config.progress.tick_ms, 50);
        assert_eq!(config.progress.settle_ms, 800);
        assert_eq!(config.export.output_dir, PathBuf::from("out/dpr"));
    }

    #[test]
    fn test_blank_url_is_ignored() {
        let config: Config = toml::from_str("[backend]\nurl = \"  \"\n").unwrap();
        assert!(config.backend_url().is_none());
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let parsed: Result<Config, _> = toml::from_str("[backend]\non_failure = \"retry\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[progress]\nsettle_ms = 0\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.progress.timing().settle, Duration::ZERO);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::load_from(&dir.path().join("nope.toml")),
            Err(ConfigError::FileRead(_))
        ));
    }
}
