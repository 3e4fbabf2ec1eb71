//! accel-tray library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! The utility sits in the Windows notification area.  A left click flips
//! "Enhance pointer precision" (mouse acceleration) on or off; the last
//! configuration seen with acceleration on is remembered in memory so that
//! turning it back on restores the user's own thresholds.

/// Application layer: settings store and toggle controller.
pub mod application;

/// Infrastructure layer: OS adapters, tray UI and configuration file.
pub mod infrastructure;
