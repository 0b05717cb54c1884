use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analysis::MatchMode;
use crate::client::{RetryConfig, DEFAULT_API_BASE_URL};

/// Configuration for an asset audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the report files are written to
    pub output_dir: PathBuf,

    /// Base name (without extension) of the unused assets reports
    pub unused_assets_filename: String,

    /// Base name (without extension) of the duplicate assets reports
    pub duplicate_assets_filename: String,

    /// Domain of the web app used for asset deep links (`app.<host>`)
    pub app_host: String,

    /// Management API base URL
    pub api_base_url: String,

    /// How element values are searched for asset ids
    pub match_mode: MatchMode,

    /// Indent JSON reports
    pub pretty_json: bool,

    /// HTTP client configuration
    pub client: ClientConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Retries for rate-limited or failed requests
    pub max_retries: u32,

    pub initial_delay_ms: u64,

    pub max_delay_ms: u64,

    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            unused_assets_filename: "_unused-assets".to_string(),
            duplicate_assets_filename: "_duplicate-assets".to_string(),
            app_host: "kontent.ai".to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            match_mode: MatchMode::default(),
            pretty_json: true,
            client: ClientConfig::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let retry = RetryConfig::default();
        Self {
            max_retries: retry.max_retries,
            initial_delay_ms: retry.initial_delay.as_millis() as u64,
            max_delay_ms: retry.max_delay.as_millis() as u64,
            timeout_secs: 60,
        }
    }
}

impl ClientConfig {
    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            ..RetryConfig::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(dir: &Path) -> Result<Self> {
        let default_names = [
            ".assetaudit.yml",
            ".assetaudit.yaml",
            ".assetaudit.toml",
            "assetaudit.yml",
            "assetaudit.yaml",
            "assetaudit.toml",
        ];

        for name in &default_names {
            let path = dir.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    pub fn unused_assets_path(&self, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.unused_assets_filename, extension))
    }

    pub fn duplicate_assets_path(&self, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.duplicate_assets_filename, extension))
    }
}
