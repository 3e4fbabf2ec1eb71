//! ToggleController: the on/off state machine behind the tray icon.
//!
//! A toggle flips the logical state first, then asks the [`SettingsStore`]
//! to make the OS match.  When the OS write fails the logical state is
//! flipped back and the user is notified, so the icon never claims a state
//! the OS is not in.

use std::rc::Rc;

use accel_core::{AccelerationConfiguration, ToggleState};
use tracing::{error, info};

use super::settings_store::{SettingsError, SettingsStore};

/// Title of the failure notification.
pub const FAILURE_TITLE: &str = "Mouse Acceleration";
/// Body of the failure notification.
pub const FAILURE_MESSAGE: &str = "Failed to change mouse acceleration settings";

/// UI collaborator that displays the toggle state.
#[cfg_attr(test, mockall::automock)]
pub trait StatusIndicator {
    /// Re-renders the icon and status text for `state`.
    fn render(&self, state: ToggleState);

    /// Shows a transient error notification.
    fn notify_failure(&self, title: &str, message: &str);
}

/// Lets the tray keep a handle to an indicator it has lent to the controller.
impl<T: StatusIndicator + ?Sized> StatusIndicator for Rc<T> {
    fn render(&self, state: ToggleState) {
        (**self).render(state);
    }

    fn notify_failure(&self, title: &str, message: &str) {
        (**self).notify_failure(title, message);
    }
}

/// Owns the logical toggle state and drives the settings store.
pub struct ToggleController {
    store: SettingsStore,
    indicator: Box<dyn StatusIndicator>,
    state: ToggleState,
}

impl ToggleController {
    /// Creates the controller, taking the initial state from the OS and
    /// rendering it once.
    pub fn new(store: SettingsStore, indicator: Box<dyn StatusIndicator>) -> Self {
        let state = ToggleState::from_enabled(store.is_enabled());
        info!("initial mouse acceleration state: {state:?}");
        indicator.render(state);
        Self {
            store,
            indicator,
            state,
        }
    }

    /// Flips acceleration on or off.
    ///
    /// Returns the new state on success.  On failure the previous state is
    /// kept and a notification is shown.
    ///
    /// # Errors
    ///
    /// Returns the [`SettingsError`] reported by the store.
    pub fn toggle(&mut self) -> Result<ToggleState, SettingsError> {
        let previous = self.state;
        self.state = previous.toggled();

        let result = match self.state {
            ToggleState::Enabled => self.store.enable(),
            ToggleState::Disabled => self.store.disable(),
        };

        if let Err(e) = result {
            self.state = previous;
            error!("toggle to {:?} failed: {e}", previous.toggled());
            self.indicator.notify_failure(FAILURE_TITLE, FAILURE_MESSAGE);
            return Err(e);
        }

        self.indicator.render(self.state);
        Ok(self.state)
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    /// The configuration that the next enable will restore.
    pub fn saved_configuration(&self) -> AccelerationConfiguration {
        self.store.current_saved()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
