//! Pointer settings adapters.
//!
//! The Windows implementation is selected at compile time via
//! `#[cfg(target_os = "windows")]`; `mock` records calls for tests.

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;
