//! Infrastructure layer for the tray utility.
//!
//! Contains OS-facing adapters: the pointer settings API, the notification
//! area icon, and the optional configuration file.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `accel_core`, but MUST NOT be imported by the `application` layer.

pub mod pointer_api;
pub mod storage;
pub mod tray;
