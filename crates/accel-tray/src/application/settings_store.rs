//! SettingsStore: saves and restores the user's acceleration configuration.
//!
//! The store owns the *saved configuration*, the most recent configuration
//! that was observed with acceleration turned on.  Disabling first captures
//! the live configuration (when it is enabled) and then writes the canonical
//! `(0, 0, 0)` triple; enabling writes the saved configuration back.
//!
//! OS access goes through the [`PointerSettingsApi`] trait so the state
//! machine can be tested without touching the real pointer settings.  The
//! Windows implementation lives in `infrastructure::pointer_api`.

use std::sync::{Arc, Mutex, MutexGuard};

use accel_core::AccelerationConfiguration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Error reported by a [`PointerSettingsApi`] implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerApiError {
    /// The system call returned failure.
    #[error("{call} failed with OS error {code}")]
    Os { call: &'static str, code: i32 },
    /// The adapter could not reach the OS setting at all.
    #[error("pointer settings unavailable: {0}")]
    Unavailable(String),
}

/// Error type for [`SettingsStore`] operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("failed to read mouse acceleration settings: {0}")]
    Read(#[source] PointerApiError),
    #[error("failed to write mouse acceleration settings: {0}")]
    Write(#[source] PointerApiError),
    /// The saved configuration does not have acceleration enabled, so
    /// restoring it would not turn acceleration on.
    #[error("saved configuration {0} is not an enabled configuration")]
    SavedNotEnabled(AccelerationConfiguration),
}

/// Narrow OS boundary: read and replace the live acceleration triple.
///
/// Each supported OS provides an implementation in the infrastructure layer.
pub trait PointerSettingsApi: Send + Sync {
    /// Reads the configuration currently in effect.
    fn read_current(&self) -> Result<AccelerationConfiguration, PointerApiError>;

    /// Replaces the live configuration, persisting it to the user profile and
    /// broadcasting the change.
    fn write_configuration(&self, config: &AccelerationConfiguration) -> Result<(), PointerApiError>;
}

/// Owns the saved configuration and performs save-on-disable.
pub struct SettingsStore {
    api: Arc<dyn PointerSettingsApi>,
    saved: Mutex<AccelerationConfiguration>,
}

impl SettingsStore {
    /// Creates a store whose saved configuration is the live one if it is
    /// enabled, otherwise `default`.
    ///
    /// A `default` without acceleration enabled is replaced by
    /// [`AccelerationConfiguration::DEFAULT`].
    pub fn new(api: Arc<dyn PointerSettingsApi>, default: AccelerationConfiguration) -> Self {
        let default = if default.is_enabled() {
            default
        } else {
            warn!(
                "configured default {default} is not enabled; using {}",
                AccelerationConfiguration::DEFAULT
            );
            AccelerationConfiguration::DEFAULT
        };

        let initial = match api.read_current() {
            Ok(current) if current.is_enabled() => current,
            Ok(current) => {
                debug!("acceleration currently off ({current}); saved defaults to {default}");
                default
            }
            Err(e) => {
                warn!("could not read initial acceleration settings: {e}; saved defaults to {default}");
                default
            }
        };
        info!("initial saved acceleration configuration: {initial}");

        Self {
            api,
            saved: Mutex::new(initial),
        }
    }

    /// Queries the OS for the live configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Read`] if the OS call fails.
    pub fn read_current(&self) -> Result<AccelerationConfiguration, SettingsError> {
        self.api.read_current().map_err(SettingsError::Read)
    }

    /// `true` when the OS can be read and reports acceleration on.
    pub fn is_enabled(&self) -> bool {
        self.read_current().map(|c| c.is_enabled()).unwrap_or(false)
    }

    /// Captures the live configuration (if enabled) and turns acceleration off.
    ///
    /// A failed read is not fatal: the saved configuration is simply left
    /// as it was and `(0, 0, 0)` is still written.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Write`] if writing the disabled triple fails.
    pub fn disable(&self) -> Result<(), SettingsError> {
        let mut saved = self.lock_saved();

        match self.read_current() {
            Ok(current) if current.is_enabled() => {
                if *saved != current {
                    info!("saving acceleration configuration {current} (was {})", *saved);
                }
                *saved = current;
            }
            Ok(current) => debug!("acceleration already off ({current}); saved unchanged"),
            Err(e) => warn!("{e}; disabling without updating saved configuration"),
        }

        let disabled = AccelerationConfiguration::disabled();
        self.api
            .write_configuration(&disabled)
            .map_err(SettingsError::Write)?;
        info!("mouse acceleration disabled");
        Ok(())
    }

    /// Restores the saved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::SavedNotEnabled`] without touching the OS if
    /// the saved configuration is not enabled, or [`SettingsError::Write`]
    /// if the OS call fails.
    pub fn enable(&self) -> Result<(), SettingsError> {
        let saved = self.lock_saved();

        if !saved.is_enabled() {
            return Err(SettingsError::SavedNotEnabled(*saved));
        }

        self.api
            .write_configuration(&saved)
            .map_err(SettingsError::Write)?;
        info!("mouse acceleration enabled with {}", *saved);
        Ok(())
    }

    /// Returns a copy of the saved configuration.
    pub fn current_saved(&self) -> AccelerationConfiguration {
        *self.lock_saved()
    }

    // The guarded value is `Copy` and replaced in a single assignment, so a
    // poisoned lock still holds a whole configuration.
    fn lock_saved(&self) -> MutexGuard<'_, AccelerationConfiguration> {
        self.saved.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
