//! # accel-core
//!
//! Domain value types shared by the mouse acceleration toggle.
//!
//! The crate has no OS dependencies: it only describes *what* an acceleration
//! configuration is and which logical state the toggle is in.  Reading and
//! writing the live setting is the job of the `accel-tray` infrastructure
//! layer.
//!
//! ## Module structure
//!
//! - [`domain::configuration`] – `AccelerationConfiguration`, the
//!   `(threshold1, threshold2, enabled_flag)` triple the OS works with.
//! - [`domain::state`] – `ToggleState`, the two-state enum shown in the tray.

pub mod domain;

pub use domain::configuration::AccelerationConfiguration;
pub use domain::state::ToggleState;
