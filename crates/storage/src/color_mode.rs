//! Color-mode preference and effective-mode types
//!
//! The preference is the user's stored intent, including the option of
//! tracking the OS scheme. The effective mode is the concrete light/dark
//! value actually rendered; `system` never appears there.

use serde::{Deserialize, Serialize};

/// User-facing color mode preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorModePreference {
    /// Always use light mode
    #[default]
    Light,
    /// Always use dark mode
    Dark,
    /// Follow the OS color scheme
    System,
}

impl ColorModePreference {
    /// The concrete mode this preference pins, if it is not system-tracking
    pub fn as_fixed(self) -> Option<EffectiveMode> {
        match self {
            ColorModePreference::Light => Some(EffectiveMode::Light),
            ColorModePreference::Dark => Some(EffectiveMode::Dark),
            ColorModePreference::System => None,
        }
    }

    /// String form matching the persisted layout
    pub fn as_str(self) -> &'static str {
        match self {
            ColorModePreference::Light => "light",
            ColorModePreference::Dark => "dark",
            ColorModePreference::System => "system",
        }
    }
}

impl std::fmt::Display for ColorModePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The concrete light/dark value actually rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveMode {
    /// Light mode
    Light,
    /// Dark mode
    Dark,
}

impl EffectiveMode {
    /// The opposite mode
    pub fn flipped(self) -> Self {
        match self {
            EffectiveMode::Light => EffectiveMode::Dark,
            EffectiveMode::Dark => EffectiveMode::Light,
        }
    }

    /// Marker attribute value, one of `"light"` or `"dark"`
    pub fn as_str(self) -> &'static str {
        match self {
            EffectiveMode::Light => "light",
            EffectiveMode::Dark => "dark",
        }
    }
}

impl std::fmt::Display for EffectiveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EffectiveMode> for ColorModePreference {
    fn from(mode: EffectiveMode) -> Self {
        match mode {
            EffectiveMode::Light => ColorModePreference::Light,
            EffectiveMode::Dark => ColorModePreference::Dark,
        }
    }
}
