//! Configuration manager for customdb.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const DEFAULT_NAME: &str = "customdb";
const DEFAULT_LOG_LEVEL: &str = "info";
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Connection name, as shown on logs.
    #[serde(default = "default_name")]
    pub name: String,
    /// Store backing the scripts.
    #[serde(default)]
    pub store: StoreKind,
    /// Related to logging.
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    version: String,
    #[serde(skip)]
    path: PathBuf,
}

/// Which [`crate::store::UserStore`] to run on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// Log writes, find every email.
    #[default]
    Simulated,
    /// Keep users in process memory.
    Memory,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    /// Default filter, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Full,
    Json,
}

fn default_name() -> String {
    DEFAULT_NAME.into()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.into()
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            name: default_name(),
            store: StoreKind::default(),
            log: Log::default(),
            version: VERSION.to_owned(),
            path: PathBuf::default(),
        }
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// File the configuration was read from, `None` when running on
    /// defaults.
    pub fn loaded_from(&self) -> Option<&Path> {
        Some(self.path.as_path()).filter(|path| !path.as_os_str().is_empty())
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location.
    ///
    /// Falls back on defaults if the file is missing or malformed. An
    /// explicit path is never swapped for the default location.
    pub fn read(self) -> Arc<Self> {
        let file_path = if self.path.as_os_str().is_empty() {
            Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        } else {
            self.path.clone()
        };

        let file = match File::open(&file_path) {
            Ok(file) => file,
            Err(err) => return Arc::new(Self::error(&file_path, err)),
        };

        match serde_yaml::from_reader::<_, Configuration>(file) {
            Ok(mut config) => {
                // set app version.
                config.version = VERSION.to_owned();
                config.path = file_path;
                Arc::new(config)
            },
            Err(err) => Arc::new(Self::error(&file_path, err)),
        }
    }

    /// Return a default configuration as fallback.
    fn error(path: &Path, err: impl std::error::Error) -> Self {
        // Logging may not be set up yet.
        eprintln!("cannot read configuration file {}: {err}", path.display());
        tracing::error!(path = %path.display(), error = %err, "cannot read configuration file");
        Self::default()
    }
}
