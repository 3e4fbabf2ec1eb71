//! Mouse Acceleration Toggle entry point.
//!
//! Loads the optional configuration file, initialises logging and hands the
//! Windows pointer settings adapter to the tray message loop.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()                 -- optional TOML, defaults on first run
//!  └─ run_tray()
//!       ├─ TrayIndicator::install   -- Shell_NotifyIconW(NIM_ADD)
//!       ├─ SettingsStore::new       -- reads SPI_GETMOUSE once
//!       ├─ ToggleController::new    -- renders the initial state
//!       └─ Win32 message loop       -- left click -> toggle(), Exit -> quit
//! ```

// No console window for release builds.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use accel_tray::infrastructure::storage::config::{load_config, AppConfig};

fn main() -> anyhow::Result<()> {
    let (config, config_error) = match load_config() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.tray.log_level)),
        )
        .init();

    if let Some(e) = config_error {
        warn!("using default configuration: {e}");
    }

    info!("Mouse Acceleration Toggle starting");
    run(&config)?;
    info!("Mouse Acceleration Toggle stopped");
    Ok(())
}

#[cfg(target_os = "windows")]
fn run(config: &AppConfig) -> anyhow::Result<()> {
    use std::sync::Arc;

    use anyhow::Context;

    use accel_tray::infrastructure::{
        pointer_api::windows::WindowsPointerApi, tray::windows::run_tray,
    };

    run_tray(config, Arc::new(WindowsPointerApi::new())).context("tray icon failed")
}

#[cfg(not(target_os = "windows"))]
fn run(_config: &AppConfig) -> anyhow::Result<()> {
    anyhow::bail!("mouse acceleration toggling is only supported on Windows")
}
