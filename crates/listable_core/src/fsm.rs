//! Widget phase state machine
//!
//! Phases transition on numeric events, mirroring the event-constant style
//! used for interaction states elsewhere: a state either answers an event
//! with its successor or with `None` when the event does not apply.

use std::hash::Hash;

/// Trait for state types driven by numeric events
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;
}

/// Phase event types
pub mod phase_events {
    /// Open command (trigger click, trigger key)
    pub const OPEN: u32 = 30001;
    /// Explicit close command
    pub const CLOSE: u32 = 30002;
    /// Escape key pressed
    pub const ESCAPE: u32 = 30003;
    /// Pointer interaction outside the widget
    pub const OUTSIDE_CLICK: u32 = 30004;
    /// An item was committed
    pub const COMMIT: u32 = 30005;
}

/// Open/closed phase of a listable widget
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Closed,
    Open,
}

impl Phase {
    pub fn is_open(&self) -> bool {
        matches!(self, Phase::Open)
    }
}

impl StateTransitions for Phase {
    fn on_event(&self, event: u32) -> Option<Self> {
        use phase_events::*;
        use Phase::*;

        match (self, event) {
            (Closed, OPEN) => Some(Open),
            (Open, CLOSE) | (Open, ESCAPE) | (Open, OUTSIDE_CLICK) | (Open, COMMIT) => Some(Closed),
            _ => None,
        }
    }
}

/// Why a widget is closing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CloseReason {
    #[default]
    Command,
    Escape,
    OutsideClick,
    Commit,
}

impl CloseReason {
    /// The phase event this reason dispatches
    pub fn event(self) -> u32 {
        match self {
            CloseReason::Command => phase_events::CLOSE,
            CloseReason::Escape => phase_events::ESCAPE,
            CloseReason::OutsideClick => phase_events::OUTSIDE_CLICK,
            CloseReason::Commit => phase_events::COMMIT,
        }
    }
}
