//! Platform color-scheme detection for Nightfall
//!
//! Reads the OS-level light/dark signal where the platform exposes one.
//! Hosts that disable OS tracking, and tests, use [`FixedScheme`].

#![warn(missing_docs)]
#![warn(clippy::all)]

/// The OS-reported color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemScheme {
    /// The OS prefers light presentation
    Light,
    /// The OS prefers dark presentation
    Dark,
}

/// Source of the OS color-scheme signal
///
/// `read` returns `None` when the platform does not expose a usable signal;
/// callers must fall back to a configured default.
pub trait SchemeReader: Send + Sync {
    /// Read the live scheme, if the platform exposes one
    fn read(&self) -> Option<SystemScheme>;
}

/// Reader backed by the desktop environment's scheme setting
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopScheme;

impl SchemeReader for DesktopScheme {
    fn read(&self) -> Option<SystemScheme> {
        match dark_light::detect() {
            dark_light::Mode::Dark => Some(SystemScheme::Dark),
            dark_light::Mode::Light => Some(SystemScheme::Light),
            dark_light::Mode::Default => None,
        }
    }
}

/// Reader that always reports the same scheme
///
/// `FixedScheme(None)` models an unsupported platform or a host that turned
/// OS tracking off.
#[derive(Debug, Clone, Copy)]
pub struct FixedScheme(pub Option<SystemScheme>);

impl SchemeReader for FixedScheme {
    fn read(&self) -> Option<SystemScheme> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_scheme_reports_what_it_holds() {
        assert_eq!(FixedScheme(Some(SystemScheme::Dark)).read(), Some(SystemScheme::Dark));
        assert_eq!(FixedScheme(Some(SystemScheme::Light)).read(), Some(SystemScheme::Light));
        assert_eq!(FixedScheme(None).read(), None);
    }

    #[test]
    fn test_desktop_scheme_never_panics() {
        // Headless CI has no scheme signal; any of the three answers is fine.
        let _ = DesktopScheme.read();
    }
}
