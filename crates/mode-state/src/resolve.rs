//! Pure light/dark value selection
//!
//! Given a pair of values and a point in the tree, pick the one matching the
//! effective mode visible there. No side effects; the result changes only
//! when the global mode or the point's enclosing frame changes, so
//! memoizing consumers can key on it safely.

use storage::EffectiveMode;

use crate::overrides::{FrameId, OverrideStack};

/// A light/dark value pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeValues<T> {
    /// Value used in light mode
    pub light: T,
    /// Value used in dark mode
    pub dark: T,
}

impl<T> ModeValues<T> {
    /// Create a pair
    pub const fn new(light: T, dark: T) -> Self {
        Self { light, dark }
    }

    /// Select the value for `mode`
    pub fn pick(self, mode: EffectiveMode) -> T {
        match mode {
            EffectiveMode::Light => self.light,
            EffectiveMode::Dark => self.dark,
        }
    }

    /// Select the value for `mode` by reference
    pub fn pick_ref(&self, mode: EffectiveMode) -> &T {
        match mode {
            EffectiveMode::Light => &self.light,
            EffectiveMode::Dark => &self.dark,
        }
    }
}

/// Select between `light` and `dark` using the mode visible at `point`
///
/// Override-aware: the nearest enclosing frame's forced mode wins over the
/// global value.
pub fn resolve_value<T>(
    stack: &OverrideStack,
    point: Option<FrameId>,
    light: T,
    dark: T,
) -> T {
    ModeValues::new(light, dark).pick(stack.resolve(point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ModeController;
    use crate::marker::RecordingMarker;
    use std::sync::Arc;
    use storage::PreferenceStore;

    fn test_stack(initial: EffectiveMode) -> OverrideStack {
        let controller = ModeController::new(
            initial,
            PreferenceStore::in_memory(),
            Arc::new(RecordingMarker::new()),
        );
        OverrideStack::new(controller)
    }

    #[test]
    fn test_pick_matches_mode() {
        let pair = ModeValues::new("white", "black");
        assert_eq!(pair.pick(EffectiveMode::Light), "white");
        assert_eq!(pair.pick(EffectiveMode::Dark), "black");
        assert_eq!(*pair.pick_ref(EffectiveMode::Dark), "black");
    }

    #[test]
    fn test_resolve_value_follows_the_global_mode() {
        let stack = test_stack(EffectiveMode::Light);
        assert_eq!(resolve_value(&stack, None, "white", "black"), "white");

        stack.controller().set(EffectiveMode::Dark);
        assert_eq!(resolve_value(&stack, None, "white", "black"), "black");
    }

    #[test]
    fn test_resolve_value_is_override_aware() {
        let stack = test_stack(EffectiveMode::Light);
        let region = stack.scope(None, EffectiveMode::Dark);

        assert_eq!(resolve_value(&stack, Some(region.id()), "white", "black"), "black");
        // Outside the region the global value still applies
        assert_eq!(resolve_value(&stack, None, "white", "black"), "white");

        let point = region.id();
        drop(region);
        assert_eq!(resolve_value(&stack, Some(point), "white", "black"), "white");
    }

    #[test]
    fn test_repeated_resolution_is_stable() {
        let stack = test_stack(EffectiveMode::Dark);
        let first = resolve_value(&stack, None, 1, 2);
        let second = resolve_value(&stack, None, 1, 2);
        assert_eq!(first, second);
        assert_eq!(first, 2);
    }
}
