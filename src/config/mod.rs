mod env;
mod loader;

pub use env::{load_env_file, ConfigError, Credentials, API_KEY_VAR, ENVIRONMENT_ID_VAR};
pub use loader::{ClientConfig, Config};
