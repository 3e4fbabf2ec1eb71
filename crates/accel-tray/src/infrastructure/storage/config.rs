//! TOML configuration for the tray utility.
//!
//! The file is optional and read-only from the utility's point of view:
//! - Windows:  `%APPDATA%\MouseAccelToggle\config.toml`
//! - Linux:    `~/.config/mouseacceltoggle/config.toml`
//! - macOS:    `~/Library/Application Support/MouseAccelToggle/config.toml`
//!
//! ```toml
//! [tray]
//! log_level = "debug"
//! notification_timeout_ms = 3000
//! ```
//!
//! Only the tray's own behaviour is configurable.  The fallback thresholds
//! restored when no enabled configuration was ever observed are fixed at
//! `AccelerationConfiguration::DEFAULT` and are not read from this file.
//!
//! Every field falls back to a serde default, so a missing file, a missing
//! section and a missing key all behave the same way.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub tray: TrayConfig,
}

/// Behaviour of the notification-area icon.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TrayConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// How long the failure balloon stays visible.
    #[serde(default = "default_notification_timeout_ms")]
    pub notification_timeout_ms: u32,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_notification_timeout_ms() -> u32 {
    5000
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            notification_timeout_ms: default_notification_timeout_ms(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(platform_config_dir()
        .ok_or(ConfigError::NoPlatformConfigDir)?
        .join("config.toml"))
}

/// Loads `AppConfig` from the platform config file, returning
/// `AppConfig::default()` if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`; a missing file yields the defaults.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("MouseAccelToggle"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("mouseacceltoggle"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("MouseAccelToggle")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
