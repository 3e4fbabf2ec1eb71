//! The pointer-acceleration triple exchanged with the OS.
//!
//! Windows describes mouse acceleration with three integers: two speed
//! thresholds and an acceleration level.  This crate only cares whether the
//! third value is `1` (acceleration on); the thresholds are passed through
//! unmodified so that a restored configuration is bit-for-bit what the user
//! had before.

use std::fmt;

/// Number of integers in the raw OS buffer.
pub const RAW_LEN: usize = 3;

/// An immutable pointer-acceleration configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccelerationConfiguration {
    threshold1: i32,
    threshold2: i32,
    enabled_flag: i32,
}

impl AccelerationConfiguration {
    /// Configuration used when nothing better is known: Windows' stock
    /// "Enhance pointer precision" values.
    pub const DEFAULT: Self = Self::new(6, 10, 1);

    /// Creates a configuration from its three raw components.
    pub const fn new(threshold1: i32, threshold2: i32, enabled_flag: i32) -> Self {
        Self {
            threshold1,
            threshold2,
            enabled_flag,
        }
    }

    /// Canonical "acceleration off" value, `(0, 0, 0)`.
    pub const fn disabled() -> Self {
        Self::new(0, 0, 0)
    }

    /// Builds an enabled configuration from a pair of thresholds.
    pub const fn enabled_with(threshold1: i32, threshold2: i32) -> Self {
        Self::new(threshold1, threshold2, 1)
    }

    /// Reinterprets the raw OS buffer.
    pub const fn from_array(raw: [i32; RAW_LEN]) -> Self {
        Self::new(raw[0], raw[1], raw[2])
    }

    /// Returns the raw OS buffer representation.
    pub const fn to_array(self) -> [i32; RAW_LEN] {
        [self.threshold1, self.threshold2, self.enabled_flag]
    }

    pub const fn threshold1(&self) -> i32 {
        self.threshold1
    }

    pub const fn threshold2(&self) -> i32 {
        self.threshold2
    }

    pub const fn enabled_flag(&self) -> i32 {
        self.enabled_flag
    }

    /// `true` when the acceleration flag is exactly `1`.
    pub const fn is_enabled(&self) -> bool {
        self.enabled_flag == 1
    }
}

impl Default for AccelerationConfiguration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for AccelerationConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}] (Enabled: {})",
            self.threshold1,
            self.threshold2,
            self.enabled_flag,
            self.is_enabled()
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
