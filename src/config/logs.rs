//! `[logging]` section
//!
//! `level` applies to this crate's targets (RUST_LOG replaces the whole
//! filter). The optional `[logging.file]` table adds a rotating JSON log
//! next to the console output.

use serde::Deserialize;
use std::path::PathBuf;
use tracing_appender::rolling::Rotation;

/// When the JSON log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    /// Name as written in the config file
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    pub file: LogFileConfig,
}

/// JSON log file output (off unless enabled)
#[derive(Debug, Clone, PartialEq)]
pub struct LogFileConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    pub rotation: LogRotation,
    /// File name prefix; the appender adds the date suffix
    pub prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: LogFileConfig::default(),
        }
    }
}

impl Default for LogFileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from("./logs"),
            rotation: LogRotation::Daily,
            prefix: "marquee".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file: Option<FileLogFile>,
}

/// `[logging.file]` as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogFile {
    pub enabled: Option<bool>,
    pub dir: Option<PathBuf>,
    pub rotation: Option<LogRotation>,
    pub prefix: Option<String>,
}

impl LoggingConfig {
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            level: file.level.unwrap_or_else(|| Self::default().level),
            file: LogFileConfig::from_file(file.file),
        }
    }
}

impl LogFileConfig {
    fn from_file(file: Option<FileLogFile>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();
        Self {
            enabled: file.enabled.unwrap_or(defaults.enabled),
            dir: file.dir.unwrap_or(defaults.dir),
            rotation: file.rotation.unwrap_or(defaults.rotation),
            prefix: file.prefix.unwrap_or(defaults.prefix),
        }
    }
}
