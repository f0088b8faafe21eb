//! One-time, pre-paint mode resolution
//!
//! Bootstrap runs before any themed content renders. It combines the stored
//! preference, the OS scheme signal, and the configured default into a
//! definite light/dark value, applies the root marker, and seeds the live
//! controller, all synchronously, so the first painted frame already shows
//! the right mode. Deferring any of this reintroduces the flash it exists to
//! prevent.

use std::sync::Arc;

use platform::{SchemeReader, SystemScheme};
use storage::{ColorModePreference, EffectiveMode, PreferenceStore};

use crate::controller::ModeController;
use crate::marker::MarkerSink;

/// Configuration consumed by [`bootstrap`]
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Preference assumed when nothing has been persisted yet
    pub initial_preference: ColorModePreference,
    /// Whether the OS scheme signal is consulted for `system` preferences
    pub follow_system: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            initial_preference: ColorModePreference::Light,
            follow_system: true,
        }
    }
}

impl BootstrapConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the preference assumed on first run
    pub fn initial_preference(mut self, preference: ColorModePreference) -> Self {
        self.initial_preference = preference;
        self
    }

    /// Enable or disable OS scheme tracking
    pub fn follow_system(mut self, enabled: bool) -> Self {
        self.follow_system = enabled;
        self
    }
}

/// Resolve the initial effective mode
///
/// A total, deterministic function of its inputs: an absent preference falls
/// back to the configured default, an unknown scheme falls back to light, and
/// the result is never `system`. Safe to call repeatedly.
pub fn resolve_initial(
    stored: Option<ColorModePreference>,
    scheme: Option<SystemScheme>,
    config: &BootstrapConfig,
) -> EffectiveMode {
    let preference = stored.unwrap_or(config.initial_preference);
    match preference.as_fixed() {
        Some(mode) => mode,
        None => match scheme {
            Some(SystemScheme::Dark) => EffectiveMode::Dark,
            Some(SystemScheme::Light) | None => EffectiveMode::Light,
        },
    }
}

/// Seeded output of [`bootstrap`]
pub struct Bootstrapped {
    /// The live controller, seeded with the resolved mode
    pub controller: Arc<ModeController>,
    /// The mode applied to the root marker before bootstrap returned
    pub mode: EffectiveMode,
}

/// Resolve the startup mode and seed the engine
///
/// Must run before the host mounts themed content. The root marker is
/// applied before this function returns and the controller starts from the
/// same value, so no observer can see the two disagree. Store and platform
/// failures are absorbed with safe fallbacks: the result is always a definite
/// light/dark value.
pub fn bootstrap(
    store: PreferenceStore,
    reader: &dyn SchemeReader,
    config: BootstrapConfig,
    marker: Arc<dyn MarkerSink>,
) -> Bootstrapped {
    let stored = match store.get() {
        Ok(preference) => preference,
        Err(e) => {
            tracing::warn!("Preference read failed, using configured default: {}", e);
            None
        }
    };

    let wants_system =
        stored.unwrap_or(config.initial_preference) == ColorModePreference::System;
    let scheme = if wants_system && config.follow_system {
        reader.read()
    } else {
        None
    };

    let mode = resolve_initial(stored, scheme, &config);
    tracing::debug!(mode = %mode, "bootstrap resolved color mode");

    marker.apply(mode);
    let controller = ModeController::new(mode, store, marker);
    Bootstrapped { controller, mode }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::RecordingMarker;
    use platform::FixedScheme;

    #[test]
    fn test_resolve_initial_never_returns_system() {
        let config = BootstrapConfig::default();
        let preferences = [
            None,
            Some(ColorModePreference::Light),
            Some(ColorModePreference::Dark),
            Some(ColorModePreference::System),
        ];
        let schemes = [None, Some(SystemScheme::Light), Some(SystemScheme::Dark)];

        for stored in preferences {
            for scheme in schemes {
                // Exhaustive: every combination yields a definite mode.
                let mode = resolve_initial(stored, scheme, &config);
                assert!(matches!(mode, EffectiveMode::Light | EffectiveMode::Dark));
            }
        }
    }

    #[test]
    fn test_concrete_preference_ignores_the_scheme() {
        let config = BootstrapConfig::default();

        let mode = resolve_initial(
            Some(ColorModePreference::Light),
            Some(SystemScheme::Dark),
            &config,
        );
        assert_eq!(mode, EffectiveMode::Light);

        let mode = resolve_initial(
            Some(ColorModePreference::Dark),
            Some(SystemScheme::Light),
            &config,
        );
        assert_eq!(mode, EffectiveMode::Dark);
    }

    #[test]
    fn test_system_preference_follows_the_scheme() {
        let config = BootstrapConfig::default();

        let mode = resolve_initial(
            Some(ColorModePreference::System),
            Some(SystemScheme::Dark),
            &config,
        );
        assert_eq!(mode, EffectiveMode::Dark);

        // Unknown scheme falls back to light
        let mode = resolve_initial(Some(ColorModePreference::System), None, &config);
        assert_eq!(mode, EffectiveMode::Light);
    }

    #[test]
    fn test_absent_preference_uses_configured_default() {
        let config = BootstrapConfig::new().initial_preference(ColorModePreference::Dark);
        assert_eq!(resolve_initial(None, None, &config), EffectiveMode::Dark);

        let config = BootstrapConfig::new().initial_preference(ColorModePreference::System);
        assert_eq!(
            resolve_initial(None, Some(SystemScheme::Dark), &config),
            EffectiveMode::Dark
        );
    }

    #[test]
    fn test_bootstrap_seeds_marker_and_controller_before_returning() {
        let marker = Arc::new(RecordingMarker::new());
        let booted = bootstrap(
            PreferenceStore::in_memory(),
            &FixedScheme(Some(SystemScheme::Dark)),
            BootstrapConfig::new().initial_preference(ColorModePreference::System),
            Arc::clone(&marker) as Arc<dyn MarkerSink>,
        );

        assert_eq!(booted.mode, EffectiveMode::Dark);
        assert_eq!(booted.controller.current(), EffectiveMode::Dark);
        assert_eq!(marker.history(), vec![EffectiveMode::Dark]);
    }

    #[test]
    fn test_bootstrap_without_system_tracking_falls_back_to_light() {
        let marker = Arc::new(RecordingMarker::new());
        let booted = bootstrap(
            PreferenceStore::in_memory(),
            &FixedScheme(Some(SystemScheme::Dark)),
            BootstrapConfig::new()
                .initial_preference(ColorModePreference::System)
                .follow_system(false),
            marker as Arc<dyn MarkerSink>,
        );

        assert_eq!(booted.mode, EffectiveMode::Light);
    }

    #[test]
    fn test_bootstrap_is_idempotent_for_unchanged_inputs() {
        let store = PreferenceStore::in_memory();
        store.set(ColorModePreference::Dark).unwrap();
        let reader = FixedScheme(Some(SystemScheme::Light));

        let first = bootstrap(
            store.clone(),
            &reader,
            BootstrapConfig::default(),
            Arc::new(RecordingMarker::new()),
        );
        let second = bootstrap(
            store,
            &reader,
            BootstrapConfig::default(),
            Arc::new(RecordingMarker::new()),
        );

        assert_eq!(first.mode, second.mode);
        assert_eq!(first.mode, EffectiveMode::Dark);
    }
}
