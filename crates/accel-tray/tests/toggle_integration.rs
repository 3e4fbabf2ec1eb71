//! Integration tests for the save/restore state machine.
//!
//! These tests exercise the application layer of accel-tray end-to-end:
//! `ToggleController` + `SettingsStore` + `MockPointerApi`, with a recording
//! indicator standing in for the tray icon.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use accel_core::{AccelerationConfiguration, ToggleState};
use accel_tray::application::settings_store::{SettingsError, SettingsStore};
use accel_tray::application::toggle::{StatusIndicator, ToggleController, FAILURE_MESSAGE};
use accel_tray::infrastructure::pointer_api::mock::MockPointerApi;

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum UiEvent {
    Render(ToggleState),
    Failure(String),
}

/// Indicator that records every call; the log is shared with the test.
#[derive(Clone, Default)]
struct RecordingIndicator {
    events: Rc<RefCell<Vec<UiEvent>>>,
}

impl RecordingIndicator {
    fn events(&self) -> Vec<UiEvent> {
        self.events.borrow().clone()
    }
}

impl StatusIndicator for RecordingIndicator {
    fn render(&self, state: ToggleState) {
        self.events.borrow_mut().push(UiEvent::Render(state));
    }

    fn notify_failure(&self, _title: &str, message: &str) {
        self.events
            .borrow_mut()
            .push(UiEvent::Failure(message.to_string()));
    }
}

fn store(api: &Arc<MockPointerApi>) -> SettingsStore {
    SettingsStore::new(api.clone(), AccelerationConfiguration::DEFAULT)
}

const ZERO: AccelerationConfiguration = AccelerationConfiguration::disabled();

// ── Store properties ──────────────────────────────────────────────────────────

#[test]
fn test_enable_disable_enable_round_trip_keeps_saved_configuration() {
    // Arrange
    let saved = AccelerationConfiguration::new(5, 12, 1);
    let api = Arc::new(MockPointerApi::reporting(saved));
    let store = store(&api);

    // Act + Assert
    store.enable().expect("enable");
    assert_eq!(store.current_saved(), saved);
    store.disable().expect("disable");
    assert_eq!(store.current_saved(), saved);
    store.enable().expect("enable again");
    assert_eq!(store.current_saved(), saved);

    assert_eq!(api.writes(), vec![saved, ZERO, saved]);
}

#[test]
fn test_disable_captures_external_change_before_zeroing() {
    // Arrange
    let api = Arc::new(MockPointerApi::reporting(AccelerationConfiguration::DEFAULT));
    let store = store(&api);
    let external = AccelerationConfiguration::new(2, 4, 1);
    api.set_live(external);

    // Act
    store.disable().expect("disable");

    // Assert
    assert_eq!(store.current_saved(), external);
    assert_eq!(api.writes(), vec![ZERO]);
    assert_eq!(api.live(), ZERO);

    store.enable().expect("enable");
    assert_eq!(api.live(), external, "enable must restore the captured configuration");
}

#[test]
fn test_disable_twice_writes_zero_twice_and_keeps_saved() {
    let api = Arc::new(MockPointerApi::reporting(AccelerationConfiguration::DEFAULT));
    let store = store(&api);

    store.disable().expect("first disable");
    store.disable().expect("second disable");

    assert_eq!(api.writes(), vec![ZERO, ZERO]);
    assert_eq!(store.current_saved(), AccelerationConfiguration::DEFAULT);
}

#[test]
fn test_unreadable_os_at_start_falls_back_to_default() {
    let api = Arc::new(MockPointerApi::reporting(AccelerationConfiguration::new(1, 1, 1)));
    api.set_fail_reads(true);

    let store = store(&api);

    assert_eq!(store.current_saved(), AccelerationConfiguration::new(6, 10, 1));
}

#[test]
fn test_store_uses_configured_default_when_os_is_disabled() {
    let api = Arc::new(MockPointerApi::reporting(ZERO));
    let configured = AccelerationConfiguration::enabled_with(8, 16);

    let store = SettingsStore::new(api.clone(), configured);
    store.enable().expect("enable");

    assert_eq!(api.writes(), vec![configured]);
}

// ── Controller properties ─────────────────────────────────────────────────────

#[test]
fn test_scenario_enabled_start_toggle_off_and_on() {
    // Arrange: OS reports (6, 10, 1)
    let api = Arc::new(MockPointerApi::reporting(AccelerationConfiguration::new(6, 10, 1)));
    let indicator = RecordingIndicator::default();
    let mut controller = ToggleController::new(store(&api), Box::new(indicator.clone()));
    assert_eq!(controller.saved_configuration(), AccelerationConfiguration::new(6, 10, 1));
    assert_eq!(controller.state(), ToggleState::Enabled);

    // Act: toggle off
    assert_eq!(controller.toggle(), Ok(ToggleState::Disabled));
    assert_eq!(api.live(), ZERO);
    assert_eq!(controller.saved_configuration(), AccelerationConfiguration::new(6, 10, 1));

    // Act: toggle on
    assert_eq!(controller.toggle(), Ok(ToggleState::Enabled));
    assert_eq!(api.live(), AccelerationConfiguration::new(6, 10, 1));

    // Assert
    assert_eq!(
        indicator.events(),
        vec![
            UiEvent::Render(ToggleState::Enabled),
            UiEvent::Render(ToggleState::Disabled),
            UiEvent::Render(ToggleState::Enabled),
        ]
    );
}

#[test]
fn test_failed_enable_rolls_back_without_render() {
    // Arrange: OS starts disabled and rejects writes
    let api = Arc::new(MockPointerApi::reporting(ZERO));
    let indicator = RecordingIndicator::default();
    let mut controller = ToggleController::new(store(&api), Box::new(indicator.clone()));
    api.set_fail_writes(true);

    // Act
    let result = controller.toggle();

    // Assert
    assert!(matches!(result, Err(SettingsError::Write(_))));
    assert_eq!(controller.state(), ToggleState::Disabled);
    assert_eq!(api.live(), ZERO, "OS state must be unchanged");
    assert_eq!(
        indicator.events(),
        vec![
            UiEvent::Render(ToggleState::Disabled),
            UiEvent::Failure(FAILURE_MESSAGE.to_string()),
        ]
    );
}

#[test]
fn test_controller_recovers_after_transient_failure() {
    let api = Arc::new(MockPointerApi::reporting(AccelerationConfiguration::DEFAULT));
    let indicator = RecordingIndicator::default();
    let mut controller = ToggleController::new(store(&api), Box::new(indicator.clone()));

    api.set_fail_writes(true);
    assert!(controller.toggle().is_err());
    assert_eq!(controller.state(), ToggleState::Enabled);

    api.set_fail_writes(false);
    assert_eq!(controller.toggle(), Ok(ToggleState::Disabled));
    assert_eq!(api.writes(), vec![ZERO]);
}

#[test]
fn test_controller_starts_disabled_when_os_unreadable() {
    let api = Arc::new(MockPointerApi::default());
    api.set_fail_reads(true);

    let controller = ToggleController::new(store(&api), Box::new(RecordingIndicator::default()));

    assert_eq!(controller.state(), ToggleState::Disabled);
    assert_eq!(controller.saved_configuration(), AccelerationConfiguration::DEFAULT);
}
