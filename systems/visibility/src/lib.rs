#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure visibility policy gating every downstream stage of the overlay.

use minimap_core::DisplayMode;

/// Resolves whether the overlay is enabled for the current frame.
///
/// An unavailable process always disables the overlay; otherwise the display
/// mode decides based on whether the in-game map is open.
#[must_use]
pub const fn resolve(mode: DisplayMode, process_available: bool, map_open: bool) -> bool {
    if !process_available {
        return false;
    }

    match mode {
        DisplayMode::MapClosed => !map_open,
        DisplayMode::MapOpen => map_open,
        DisplayMode::Always => true,
    }
}

/// Edge reported when the resolved visibility is compared with the previous frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisibilityChange {
    /// The overlay became visible on this frame.
    Shown,
    /// The overlay became hidden on this frame.
    Hidden,
    /// The overlay kept its previous state.
    Unchanged,
}

/// Visibility policy that remembers the previous frame's result.
#[derive(Clone, Copy, Debug, Default)]
pub struct Visibility {
    enabled: bool,
}

impl Visibility {
    /// Creates a policy that starts hidden.
    #[must_use]
    pub const fn new() -> Self {
        Self { enabled: false }
    }

    /// Resolves the current frame and reports the transition relative to the previous one.
    pub fn update(
        &mut self,
        mode: DisplayMode,
        process_available: bool,
        map_open: bool,
    ) -> VisibilityChange {
        let enabled = resolve(mode, process_available, map_open);
        let change = match (self.enabled, enabled) {
            (false, true) => VisibilityChange::Shown,
            (true, false) => VisibilityChange::Hidden,
            _ => VisibilityChange::Unchanged,
        };
        self.enabled = enabled;
        change
    }

    /// Result of the most recent update.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}
