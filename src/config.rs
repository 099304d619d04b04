use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5005;
const DEFAULT_RUNTIME_BIN: &str = "docker";
const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("No API key configured; set DOCKSTAT_API_KEY or api_key in the config file")]
    MissingApiKey,
}

/// Shared secret checked against the `api_key` query parameter
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Values read from the optional TOML file; every field may be absent
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    api_key: Option<String>,
    runtime_bin: Option<String>,
    command_timeout_secs: Option<u64>,
    log_level: Option<String>,
}

impl FileConfig {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_key: ApiKey,
    pub runtime_bin: String,
    /// `None` lets the runtime command run for as long as it takes
    pub command_timeout: Option<Duration>,
    pub log_level: String,
}

impl Config {
    /// Load from the file named by `DOCKSTAT_CONFIG` (if set), then apply
    /// `DOCKSTAT_*` environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var("DOCKSTAT_CONFIG") {
            Ok(path) => FileConfig::load(Path::new(&path))?,
            Err(_) => FileConfig::default(),
        };

        Self::resolve(file, |key| env::var(key).ok())
    }

    fn resolve(
        file: FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let port = match lookup("DOCKSTAT_PORT") {
            Some(value) => parse_value("DOCKSTAT_PORT", value)?,
            None => file.port.unwrap_or(DEFAULT_PORT),
        };

        let timeout_secs = match lookup("DOCKSTAT_COMMAND_TIMEOUT_SECS") {
            Some(value) => parse_value("DOCKSTAT_COMMAND_TIMEOUT_SECS", value)?,
            None => file.command_timeout_secs.unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS),
        };

        let api_key = lookup("DOCKSTAT_API_KEY")
            .or(file.api_key)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            host: lookup("DOCKSTAT_HOST")
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            api_key: ApiKey::new(api_key),
            runtime_bin: lookup("DOCKSTAT_RUNTIME_BIN")
                .or(file.runtime_bin)
                .unwrap_or_else(|| DEFAULT_RUNTIME_BIN.to_string()),
            command_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            log_level: lookup("DOCKSTAT_LOG_LEVEL")
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    let parsed: Result<T, _> = value.trim().parse();
    parsed.map_err(|_| ConfigError::InvalidValue { key, value })
}
