//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize config to a TOML string with explanatory comments
    pub fn to_toml(&self) -> String {
        // Normalize path separators for TOML (backslashes need escaping)
        let db_path = self.db_path.display().to_string().replace('\\', "/");
        let log_file_dir = self
            .logging
            .file
            .dir
            .display()
            .to_string()
            .replace('\\', "/");

        format!(
            r#"# marquee configuration

# REST server bind address (MARQUEE_BIND overrides)
bind_addr = "{bind}"

# Base URL the front-end uses to reach the API (MARQUEE_API_BASE overrides)
api_base = "{api_base}"

# SQLite catalog file (MARQUEE_DB_PATH overrides)
db_path = "{db_path}"

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"

# JSON log file (in addition to TUI buffer or stdout)
[logging.file]
enabled = {log_file_enabled}
dir = "{log_file_dir}"
rotation = "{log_file_rotation}"  # hourly, daily, never
prefix = "{log_file_prefix}"

# Client-side collection cache
[cache]
invalidation = "{invalidation}"  # patch, refetch
# Restore the previous feature order when saving a reorder fails
rollback_on_failure = {rollback}

# HTTP client used by the front-end
[client]
request_timeout_secs = {timeout}  # 0 = no timeout

# REST server
[server]
cors_origins = {cors:?}
"#,
            bind = self.bind_addr,
            api_base = self.api_base,
            db_path = db_path,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file.enabled,
            log_file_dir = log_file_dir,
            log_file_rotation = self.logging.file.rotation.as_str(),
            log_file_prefix = self.logging.file.prefix,
            invalidation = self.cache.invalidation.as_str(),
            rollback = self.cache.rollback_on_failure,
            timeout = self.client.request_timeout_secs,
            cors = self.server.cors_origins,
        )
    }
}
