//! Configuration for the catalog server and front-end
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/marquee/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod cache;
mod logs;
mod network;
mod serialization;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use cache::{CacheConfig, FileCacheConfig, Invalidation};
pub use network::{ClientConfig, FileClientConfig, FileServerConfig, ServerConfig};
pub use logs::{FileLogFile, FileLogging, LogFileConfig, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_API_BASE: &str = "http://127.0.0.1:8080/api";
const DEFAULT_DB_PATH: &str = "./data/marquee.db";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the REST server binds to
    pub bind_addr: SocketAddr,

    /// Base URL of the REST API used by the front-end (ends in `/api`)
    pub api_base: String,

    /// SQLite catalog location
    pub db_path: PathBuf,

    /// Whether to run the terminal front-end (disabled for headless mode)
    pub enable_tui: bool,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Client-side cache invalidation and rollback
    pub cache: CacheConfig,

    /// HTTP client settings
    pub client: ClientConfig,

    /// REST server settings
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            api_base: DEFAULT_API_BASE.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            enable_tui: true,
            logging: LoggingConfig::default(),
            cache: CacheConfig::default(),
            client: ClientConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub bind_addr: Option<String>,
    pub api_base: Option<String>,
    pub db_path: Option<String>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,

    /// Optional [cache] section
    pub cache: Option<FileCacheConfig>,

    /// Optional [client] section
    pub client: Option<FileClientConfig>,

    /// Optional [server] section
    pub server: Option<FileServerConfig>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/marquee/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("marquee").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A config file that exists but cannot be read or parsed ends the
    /// process with an explanation instead of silently using defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n  CONFIG ERROR - Failed to parse configuration file\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  To reset, run `marquee config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n  CONFIG ERROR - Cannot read configuration file\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: file -> env vars -> defaults
    pub fn from_env() -> Self {
        Self::from_sources(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed file config with an environment lookup
    pub(crate) fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        // Bind address: env > file > default
        let bind_raw = env("MARQUEE_BIND")
            .or(file.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind_raw.parse().unwrap_or_else(|_| {
            eprintln!(
                "Warning: invalid bind address {:?}, using {}",
                bind_raw, DEFAULT_BIND
            );
            Config::default().bind_addr
        });

        // API base: env > file > default (trailing slash trimmed)
        let api_base = env("MARQUEE_API_BASE")
            .or(file.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        // Database path: env > file > default
        let db_path = env("MARQUEE_DB_PATH")
            .or(file.db_path)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        // TUI toggle: env only (runtime flag)
        let enable_tui = env("MARQUEE_NO_TUI")
            .map(|v| v != "1" && v.to_lowercase() != "true")
            .unwrap_or(true);

        Self {
            bind_addr,
            api_base,
            db_path,
            enable_tui,
            logging: LoggingConfig::from_file(file.logging),
            cache: CacheConfig::from_file(file.cache),
            client: ClientConfig::from_file(file.client),
            server: ServerConfig::from_file(file.server),
        }
    }
}
