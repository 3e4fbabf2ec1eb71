//! Logical on/off state of the toggle as perceived by the user.

/// Two-state acceleration toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ToggleState {
    Disabled = 0,
    Enabled = 1,
}

impl ToggleState {
    pub const fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }

    /// Returns the opposite state.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Disabled => Self::Enabled,
            Self::Enabled => Self::Disabled,
        }
    }

    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }

    /// Tooltip text shown next to the tray icon.
    pub const fn status_text(self) -> &'static str {
        match self {
            Self::Disabled => "Mouse Acceleration: OFF",
            Self::Enabled => "Mouse Acceleration: ON",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggled_flips_between_both_states() {
        assert_eq!(ToggleState::Disabled.toggled(), ToggleState::Enabled);
        assert_eq!(ToggleState::Enabled.toggled(), ToggleState::Disabled);
        assert_eq!(ToggleState::Enabled.toggled().toggled(), ToggleState::Enabled);
    }

    #[test]
    fn test_from_enabled_matches_is_enabled() {
        assert!(ToggleState::from_enabled(true).is_enabled());
        assert!(!ToggleState::from_enabled(false).is_enabled());
    }

    #[test]
    fn test_status_text_per_state() {
        assert_eq!(ToggleState::Enabled.status_text(), "Mouse Acceleration: ON");
        assert_eq!(ToggleState::Disabled.status_text(), "Mouse Acceleration: OFF");
    }

    #[test]
    fn test_discriminants_match_flag_values() {
        assert_eq!(ToggleState::Disabled as u8, 0);
        assert_eq!(ToggleState::Enabled as u8, 1);
    }
}
