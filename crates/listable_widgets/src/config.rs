//! Widget configuration

use std::time::Duration;

use listable_core::EngineConfig;

/// Layout axis of the item list; picks which arrow keys navigate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// ArrowDown/ArrowUp move between items
    #[default]
    Vertical,
    /// ArrowRight/ArrowLeft move between items
    Horizontal,
}

/// Listable widget configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListableConfig {
    /// Engine tunables (typeahead timeout)
    pub engine: EngineConfig,
    /// Whether the widget refuses to open
    pub disabled: bool,
    /// Item list orientation
    pub orientation: Orientation,
}

impl ListableConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the widget is disabled
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the item list orientation
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the typeahead idle interval
    pub fn search_timeout(mut self, timeout: Duration) -> Self {
        self.engine = self.engine.search_timeout(timeout);
        self
    }
}
