//! Front-end defaults persisted as JSON
//!
//! The core never reads configuration; these values only fill in CLI options
//! the user left out. A missing or malformed file falls back to defaults.

use crate::core::builder::DEFAULT_LOG_LEVEL;
use crate::core::rule::Table;
use crate::utils::get_config_path;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// How rendered rules are printed
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// One command per line
    #[default]
    Text,
    /// JSON objects with `command` and `tokens`
    Json,
}

/// Complete front-end configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Table used when `--table` is omitted
    #[serde(default)]
    pub default_table: Table,
    /// Log level used when `--log-level` is omitted
    #[serde(default = "default_log_level")]
    pub default_log_level: i64,
    /// Output format used when `--format` is omitted
    #[serde(default)]
    pub output_format: OutputFormat,
    /// Print advisory notes (well-known ports, reserved ranges) to stderr
    #[serde(default = "default_true")]
    pub show_advisories: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_table: Table::default(),
            default_log_level: DEFAULT_LOG_LEVEL,
            output_format: OutputFormat::default(),
            show_advisories: true,
        }
    }
}

fn default_log_level() -> i64 {
    DEFAULT_LOG_LEVEL
}

fn default_true() -> bool {
    true
}

/// Saves the config to `path` using an atomic write pattern.
/// 1. Writes to a temporary file in the same directory.
/// 2. Sets restrictive permissions (0o600).
/// 3. Atomically renames to the target path.
///
/// # Async
/// The blocking temp-file work runs on tokio's blocking pool.
pub async fn save_config_to(config: &AppConfig, path: &Path) -> crate::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    tokio::fs::create_dir_all(&dir).await?;

    let json = serde_json::to_string_pretty(config)?;
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_atomic(&dir, &path, &json))
        .await
        .map_err(std::io::Error::other)??;
    Ok(())
}

fn write_atomic(dir: &Path, path: &Path, json: &str) -> std::io::Result<()> {
    let mut file = tempfile::NamedTempFile::new_in(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(json.as_bytes())?;
    file.as_file().sync_all()?;

    file.persist(path).map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::StorageFull {
            std::io::Error::new(
                std::io::ErrorKind::StorageFull,
                "Disk full: cannot save configuration. Free up space and try again.",
            )
        } else {
            e.error
        }
    })?;
    Ok(())
}

/// Loads the config from `path`, or returns default if missing or invalid.
///
/// # Async
/// Uses `tokio::fs` for non-blocking I/O.
pub async fn load_config_from(path: &Path) -> AppConfig {
    match tokio::fs::read_to_string(path).await {
        Ok(json) => match serde_json::from_str::<AppConfig>(&json) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring malformed config {}: {e}", path.display());
                AppConfig::default()
            }
        },
        Err(e) => {
            tracing::debug!("No config at {}: {e}", path.display());
            AppConfig::default()
        }
    }
}

/// Loads the config from the standard location.
pub async fn load_config() -> AppConfig {
    match get_config_path() {
        Some(path) => load_config_from(&path).await,
        None => AppConfig::default(),
    }
}
