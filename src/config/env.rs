//! Credentials sourced from environment variables (and an optional `.env` file)

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub const ENVIRONMENT_ID_VAR: &str = "ENVIRONMENT_ID";
pub const API_KEY_VAR: &str = "API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable '{0}'")]
    MissingVariable(&'static str),

    #[error("Failed to load env file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Load variables from an env file without overriding the process environment.
///
/// With no explicit path, `.env` in the working directory is used if present.
/// Parent directories are never searched.
pub fn load_env_file(path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile {
                path: path.to_path_buf(),
                source,
            })?;
            debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        None => load_optional_env_file(Path::new(DEFAULT_ENV_FILE)).map(|_| ()),
    }
}

const DEFAULT_ENV_FILE: &str = ".env";

/// Load `path` if it exists; returns whether it was loaded
fn load_optional_env_file(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!("Loaded environment from {}", path.display());
            Ok(true)
        }
        Err(e) if e.not_found() => Ok(false),
        Err(source) => Err(ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Identity and secret used to access one environment
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub environment_id: String,
    pub api_key: String,
}

impl Credentials {
    /// Read credentials from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`; empty values count as missing
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::MissingVariable(name))
        };

        Ok(Self {
            environment_id: required(ENVIRONMENT_ID_VAR)?,
            api_key: required(API_KEY_VAR)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("environment_id", &self.environment_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
