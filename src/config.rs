//! Configuration layer: typed settings with layered precedence (file → env).

use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const LOCAL_CONFIG_BASENAME: &str = "plauso";
const ENV_PREFIX: &str = "PLAUSO";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_STORAGE_DIR: &str = "./plauso-data";
const DEFAULT_STORAGE_KEY: &str = "likes";
const DEFAULT_REMOTE_BASE_URL: &str = "http://127.0.0.1:3000/";
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("configuration could not be loaded: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid setting `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl SettingsError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Directory the file medium writes under.
    pub storage_dir: PathBuf,
    /// Fixed key the ledger is serialized under.
    pub storage_key: String,
    /// When false, the store runs on an in-memory medium only.
    pub persistence: bool,
}

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub base_url: Url,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub store: StoreSettings,
    pub remote: RemoteSettings,
}

impl Settings {
    /// Load settings from `plauso.toml` (if present), an optional explicit
    /// file, and `PLAUSO__*` environment variables, in that precedence.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder =
            Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }
        let raw: RawSettings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;
        raw.validate()
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawSettings {
    logging: RawLogging,
    store: RawStore,
    remote: RawRemote,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            logging: RawLogging::default(),
            store: RawStore::default(),
            remote: RawRemote::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawLogging {
    level: String,
    format: LogFormat,
}

impl Default for RawLogging {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawStore {
    storage_dir: PathBuf,
    storage_key: String,
    persistence: bool,
}

impl Default for RawStore {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            persistence: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawRemote {
    base_url: String,
    timeout_secs: u64,
}

impl Default for RawRemote {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
            timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }
}

impl RawSettings {
    fn validate(self) -> Result<Settings, SettingsError> {
        let level = LevelFilter::from_str(&self.logging.level).map_err(|_| {
            SettingsError::invalid(
                "logging.level",
                format!("`{}` is not a log level", self.logging.level),
            )
        })?;

        if self.store.storage_key.is_empty() {
            return Err(SettingsError::invalid(
                "store.storage_key",
                "storage key must be non-empty",
            ));
        }

        let base_url = Url::parse(&self.remote.base_url).map_err(|err| {
            SettingsError::invalid("remote.base_url", format!("not a valid URL: {err}"))
        })?;

        if self.remote.timeout_secs == 0 {
            return Err(SettingsError::invalid(
                "remote.timeout_secs",
                "timeout must be at least one second",
            ));
        }

        Ok(Settings {
            logging: LoggingSettings {
                level,
                format: self.logging.format,
            },
            store: StoreSettings {
                storage_dir: self.store.storage_dir,
                storage_key: self.store.storage_key,
                persistence: self.store.persistence,
            },
            remote: RemoteSettings {
                base_url,
                timeout_secs: self.remote.timeout_secs,
            },
        })
    }
}
