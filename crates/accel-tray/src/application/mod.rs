//! Application layer use cases for the tray utility.
//!
//! - **`settings_store`** – holds the saved acceleration configuration and
//!   performs save-on-disable / restore-on-enable against a
//!   `PointerSettingsApi` implementation injected at construction time.
//!
//! - **`toggle`** – the two-state controller invoked by a tray click.  It
//!   rolls the logical state back when the OS write fails and reports
//!   through a `StatusIndicator`.

pub mod settings_store;
pub mod toggle;
