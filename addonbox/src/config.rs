//! Configuration file handling.
//!
//! Settings live in an INI file at `~/.config/addonbox/config.ini` (or the
//! platform equivalent). A missing file yields defaults; unknown keys are
//! ignored.
//!
//! ```ini
//! [content]
//! url_base = http://127.0.0.1/content/getzip?id=
//!
//! [storage]
//! data_dir = /var/lib/addonbox
//! blob_format = raw
//!
//! [logging]
//! level = info
//! directory = /var/log/addonbox
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::logging::LoggingConfig;
use crate::manifest::DEFAULT_CONTENT_URL_BASE;
use crate::store::BlobFormat;

/// Directory name under the platform config and data directories.
pub const APP_DIR: &str = "addonbox";

/// Config file name.
pub const CONFIG_FILE: &str = "config.ini";

/// Errors loading or saving the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("invalid value for {section}.{key}: '{value}' ({reason})")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Default location of the config file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

/// Default root of the directory-backed store.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// `[content]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSettings {
    /// Base for manifest retrieval URLs; the content id is appended.
    pub url_base: String,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            url_base: DEFAULT_CONTENT_URL_BASE.to_string(),
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    /// On-disk blob encoding: `raw`, `gzip` or `zip`.
    pub blob_format: BlobFormat,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            blob_format: BlobFormat::Raw,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
    /// Write a daily rolling log file here as well as to stderr.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// The parsed config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub content: ContentSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(e) => ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        Self::from_ini(&ini)
    }

    /// Build from a parsed INI document, falling back to defaults per key.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("content")) {
            if let Some(v) = section.get("url_base") {
                config.content.url_base = v.trim().to_string();
            }
        }

        if let Some(section) = ini.section(Some("storage")) {
            if let Some(v) = non_empty(section.get("data_dir")) {
                config.storage.data_dir = expand_tilde(v);
            }
            if let Some(v) = non_empty(section.get("blob_format")) {
                config.storage.blob_format =
                    v.parse().map_err(|reason| ConfigError::InvalidValue {
                        section: "storage",
                        key: "blob_format",
                        value: v.to_string(),
                        reason,
                    })?;
            }
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(v) = non_empty(section.get("level")) {
                config.logging.level = v.to_string();
            }
            config.logging.directory = non_empty(section.get("directory")).map(expand_tilde);
        }

        Ok(config)
    }

    /// Render as an INI document.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some("content"))
            .set("url_base", &self.content.url_base);
        ini.with_section(Some("storage"))
            .set("data_dir", self.storage.data_dir.to_string_lossy())
            .set("blob_format", self.storage.blob_format.as_str());
        ini.with_section(Some("logging"))
            .set("level", &self.logging.level)
            .set(
                "directory",
                self.logging
                    .directory
                    .as_ref()
                    .map(|d| d.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
        ini
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        self.to_ini().write_to_file(path).map_err(io_err)
    }

    /// Runtime configuration for the package service.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            content_url_base: self.content.url_base.clone(),
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.logging.level.clone(),
            directory: self.logging.directory.clone(),
        }
    }
}

/// Explicit runtime configuration passed into the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub content_url_base: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            content_url_base: DEFAULT_CONTENT_URL_BASE.to_string(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
