//! Mock pointer settings API for testing.
//!
//! The real adapter calls `SystemParametersInfoW`, which changes the mouse
//! behaviour of the machine running the tests and only exists on Windows.
//! `MockPointerApi` replaces the OS with a single in-memory configuration and
//! records every write so tests can assert exactly what would have been sent.
//!
//! # Usage in tests
//!
//! ```ignore
//! let api = Arc::new(MockPointerApi::reporting(AccelerationConfiguration::DEFAULT));
//! let store = SettingsStore::new(api.clone(), AccelerationConfiguration::DEFAULT);
//!
//! store.disable().unwrap();
//!
//! assert_eq!(api.writes(), vec![AccelerationConfiguration::disabled()]);
//! ```
//!
//! # Failure injection
//!
//! [`MockPointerApi::set_fail_reads`] and [`MockPointerApi::set_fail_writes`]
//! make the corresponding calls return [`PointerApiError::Unavailable`].

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use accel_core::AccelerationConfiguration;

use crate::application::settings_store::{PointerApiError, PointerSettingsApi};

/// In-memory stand-in for the OS pointer settings.
#[derive(Default)]
pub struct MockPointerApi {
    live: Mutex<AccelerationConfiguration>,
    writes: Mutex<Vec<AccelerationConfiguration>>,
    reads: Mutex<u32>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockPointerApi {
    /// Creates a mock whose live configuration is `live`.
    pub fn reporting(live: AccelerationConfiguration) -> Self {
        Self {
            live: Mutex::new(live),
            ..Default::default()
        }
    }

    /// Changes the live configuration as another program (e.g. the Control
    /// Panel) would.  Not recorded as a write.
    pub fn set_live(&self, config: AccelerationConfiguration) {
        *self.live.lock().expect("lock poisoned") = config;
    }

    pub fn live(&self) -> AccelerationConfiguration {
        *self.live.lock().expect("lock poisoned")
    }

    /// Every configuration written so far, oldest first.
    pub fn writes(&self) -> Vec<AccelerationConfiguration> {
        self.writes.lock().expect("lock poisoned").clone()
    }

    /// Number of `read_current` calls, including failed ones.
    pub fn read_count(&self) -> u32 {
        *self.reads.lock().expect("lock poisoned")
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl PointerSettingsApi for MockPointerApi {
    fn read_current(&self) -> Result<AccelerationConfiguration, PointerApiError> {
        *self.reads.lock().expect("lock poisoned") += 1;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PointerApiError::Unavailable("mock read failure".into()));
        }
        Ok(self.live())
    }

    fn write_configuration(&self, config: &AccelerationConfiguration) -> Result<(), PointerApiError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PointerApiError::Unavailable("mock write failure".into()));
        }
        self.writes.lock().expect("lock poisoned").push(*config);
        self.set_live(*config);
        Ok(())
    }
}
