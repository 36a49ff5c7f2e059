use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default name of the optional configuration file.
pub const CONFIG_FILE: &str = "Evote.toml";

/// Prefix of the environment variables that override the file.
pub const ENV_PREFIX: &str = "EVOTE_";

/// Application configuration, derived from `Evote.toml` and `EVOTE_*`
/// environment variables on top of built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    api_base_url: String,
    storage_path: PathBuf,
    request_timeout: u64,
    log_config: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            storage_path: PathBuf::from("evote-store.json"),
            request_timeout: 30,
            log_config: PathBuf::from("log4rs.yaml"),
        }
    }
}

impl Config {
    /// Load the config from the default file and the environment.
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment(CONFIG_FILE))
    }

    /// The layered provider stack: defaults, then `file`, then the environment.
    pub fn figment(file: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }

    /// Base URL every resource path is appended to.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// File backing the persistent key-value store.
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Timeout applied to each HTTP request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Path of the log4rs YAML configuration.
    pub fn log_config(&self) -> &Path {
        &self.log_config
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_apply_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let config = Config::from_figment(Config::figment("missing.toml")).unwrap();
            assert_eq!(config, Config::default());
            assert_eq!(config.request_timeout(), Duration::from_secs(30));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "Evote.toml",
                r#"
                api_base_url = "https://vote.example.edu/api"
                request_timeout = 10
                "#,
            )?;
            jail.set_env("EVOTE_REQUEST_TIMEOUT", "5");

            let config = Config::from_figment(Config::figment("Evote.toml")).unwrap();
            assert_eq!(config.api_base_url(), "https://vote.example.edu/api");
            assert_eq!(config.request_timeout(), Duration::from_secs(5));
            assert_eq!(config.storage_path(), Path::new("evote-store.json"));
            Ok(())
        });
    }

    #[test]
    fn malformed_value_is_a_config_error() {
        Jail::expect_with(|jail| {
            jail.set_env("EVOTE_REQUEST_TIMEOUT", "soon");
            let err = Config::from_figment(Config::figment("Evote.toml")).unwrap_err();
            assert!(matches!(err, crate::Error::Config(_)));
            Ok(())
        });
    }
}
