//! Windows pointer settings via `SystemParametersInfoW`.
//!
//! `SPI_GETMOUSE` / `SPI_SETMOUSE` exchange a buffer of three `i32`s:
//! `[threshold1, threshold2, acceleration]`.  The buffer is a stack array
//! owned by each call, so nothing needs releasing on the error paths.
//!
//! # Safety
//!
//! This module uses `unsafe` code only for the FFI call.  The pointer passed
//! to the OS always refers to a live, correctly sized `[i32; 3]`.

#![cfg(target_os = "windows")]

use std::ffi::c_void;

use accel_core::{domain::configuration::RAW_LEN, AccelerationConfiguration};
use tracing::debug;
use windows::Win32::UI::WindowsAndMessaging::{
    SystemParametersInfoW, SPIF_SENDCHANGE, SPIF_UPDATEINIFILE, SPI_GETMOUSE, SPI_SETMOUSE,
    SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS,
};

use crate::application::settings_store::{PointerApiError, PointerSettingsApi};

/// [`PointerSettingsApi`] backed by the Win32 system parameters API.
pub struct WindowsPointerApi;

impl WindowsPointerApi {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsPointerApi {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerSettingsApi for WindowsPointerApi {
    fn read_current(&self) -> Result<AccelerationConfiguration, PointerApiError> {
        let mut raw = [0i32; RAW_LEN];
        // SAFETY: `raw` is a valid, writable [i32; 3] for the duration of the
        // call, which is the buffer size SPI_GETMOUSE requires.
        unsafe {
            SystemParametersInfoW(
                SPI_GETMOUSE,
                0,
                Some(raw.as_mut_ptr() as *mut c_void),
                SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
            )
        }
        .map_err(|e| os_error("SystemParametersInfoW(SPI_GETMOUSE)", &e))?;

        let config = AccelerationConfiguration::from_array(raw);
        debug!("read mouse parameters {config}");
        Ok(config)
    }

    fn write_configuration(&self, config: &AccelerationConfiguration) -> Result<(), PointerApiError> {
        let mut raw = config.to_array();
        // SAFETY: `raw` is a valid [i32; 3] that outlives the call.
        // SPIF_UPDATEINIFILE persists the change to the user profile and
        // SPIF_SENDCHANGE broadcasts WM_SETTINGCHANGE to other windows.
        unsafe {
            SystemParametersInfoW(
                SPI_SETMOUSE,
                0,
                Some(raw.as_mut_ptr() as *mut c_void),
                SPIF_UPDATEINIFILE | SPIF_SENDCHANGE,
            )
        }
        .map_err(|e| os_error("SystemParametersInfoW(SPI_SETMOUSE)", &e))?;

        debug!("wrote mouse parameters {config}");
        Ok(())
    }
}

fn os_error(call: &'static str, error: &windows::core::Error) -> PointerApiError {
    PointerApiError::Os {
        call,
        code: error.code().0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reading is side-effect free, so it is safe to exercise on a real
    /// desktop.  Writing is not tested here because it would change the
    /// mouse behaviour of the test machine.
    #[test]
    fn test_windows_pointer_api_reads_a_valid_acceleration_level() {
        let api = WindowsPointerApi::new();
        let config = api.read_current().expect("SPI_GETMOUSE must succeed");
        assert!(
            (0..=2).contains(&config.enabled_flag()),
            "unexpected acceleration level {config}"
        );
    }
}
