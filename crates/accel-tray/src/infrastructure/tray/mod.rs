//! Notification-area (system tray) user interface.
//!
//! - **`icon`** – renders the two-state icon artwork into an RGBA buffer.
//!   Platform independent and unit tested.
//! - **`windows`** – the Win32 tray icon, context menu and balloon
//!   notifications.  Implements `StatusIndicator` for the toggle controller
//!   and owns the message loop.

pub mod icon;

#[cfg(target_os = "windows")]
pub mod windows;

/// Tooltip shown before the first state is rendered.
pub const APP_TITLE: &str = "Mouse Acceleration Toggle";
