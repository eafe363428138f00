//! Keyboard and pointer dispatch
//!
//! Maps raw keys and clicks onto [`Listable`] commands the way menus and
//! select boxes conventionally behave. Adapters translate their platform
//! key events into [`Key`] and act on the returned [`KeyResponse`]
//! (prevent default when `handled`, move focus to the trigger when
//! `focus_trigger`).
//!
//! | Target  | Key                      | Effect                              |
//! |---------|--------------------------|-------------------------------------|
//! | Trigger | Enter, Space, forward    | open at the first eligible item     |
//! | Trigger | backward                 | open at the last eligible item      |
//! | Items   | forward / backward       | next / previous item                |
//! | Items   | Home, PageUp             | first item                          |
//! | Items   | End, PageDown            | last item                           |
//! | Items   | Enter                    | commit the active item              |
//! | Items   | Space                    | search char mid-search, else commit |
//! | Items   | Escape                   | close                               |
//! | Items   | Tab                      | swallowed                           |
//! | Items   | printable character      | typeahead                           |
//!
//! Forward/backward are ArrowDown/ArrowUp for a vertical list and
//! ArrowRight/ArrowLeft for a horizontal one.

use std::time::Instant;

use listable_core::{CloseReason, NavCommand, OpenDirection, Result};

use crate::config::Orientation;
use crate::listable::{Listable, SelectionPolicy};

/// Logical key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Char(char),
}

impl Key {
    /// Key for a typed character
    pub fn from_char(ch: char) -> Self {
        if ch == ' ' {
            Key::Space
        } else {
            Key::Char(ch)
        }
    }
}

/// Pointer button
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// What the adapter should do after a key was dispatched
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyResponse {
    /// The key was consumed; suppress the platform default
    pub handled: bool,
    /// Keyboard focus should return to the trigger
    pub focus_trigger: bool,
}

impl KeyResponse {
    pub const IGNORED: Self = Self {
        handled: false,
        focus_trigger: false,
    };

    pub const HANDLED: Self = Self {
        handled: true,
        focus_trigger: false,
    };

    pub const RESTORE_FOCUS: Self = Self {
        handled: true,
        focus_trigger: true,
    };
}

/// Arrow keys that move forward/backward for an orientation
fn arrows(orientation: Orientation) -> (Key, Key) {
    match orientation {
        Orientation::Vertical => (Key::ArrowDown, Key::ArrowUp),
        Orientation::Horizontal => (Key::ArrowRight, Key::ArrowLeft),
    }
}

impl<T: Clone, P: SelectionPolicy<T>> Listable<T, P> {
    /// Key pressed while the trigger has focus
    pub fn handle_trigger_key(&mut self, key: Key) -> KeyResponse {
        if self.is_open() {
            return KeyResponse::IGNORED;
        }

        let (forward, backward) = arrows(self.config.orientation);
        let direction = match key {
            Key::Enter | Key::Space => OpenDirection::First,
            k if k == forward => OpenDirection::First,
            k if k == backward => OpenDirection::Last,
            _ => return KeyResponse::IGNORED,
        };

        self.open(direction);
        KeyResponse::HANDLED
    }

    /// Key pressed while the item list has focus
    pub fn handle_items_key(&mut self, key: Key) -> Result<KeyResponse> {
        self.handle_items_key_at(key, Instant::now())
    }

    /// Key pressed while the item list has focus, at `now`
    ///
    /// A lapsed typeahead deadline is honored first, so Space after an idle
    /// pause commits even if the adapter never polled the timer.
    pub fn handle_items_key_at(&mut self, key: Key, now: Instant) -> Result<KeyResponse> {
        self.poll_search_timer(now);
        let (forward, backward) = arrows(self.config.orientation);

        let response = match key {
            Key::Space if !self.search_query().is_empty() => {
                self.type_char_at(' ', now)?;
                KeyResponse::HANDLED
            }
            Key::Enter | Key::Space => {
                self.commit_active()?;
                KeyResponse::RESTORE_FOCUS
            }
            Key::Escape => {
                self.require_open("escape")?;
                self.close_with(CloseReason::Escape);
                KeyResponse::RESTORE_FOCUS
            }
            Key::Tab => {
                self.require_open("tab")?;
                KeyResponse::HANDLED
            }
            Key::Home | Key::PageUp => {
                self.navigate(NavCommand::First)?;
                KeyResponse::HANDLED
            }
            Key::End | Key::PageDown => {
                self.navigate(NavCommand::Last)?;
                KeyResponse::HANDLED
            }
            k if k == forward => {
                self.navigate(NavCommand::Next)?;
                KeyResponse::HANDLED
            }
            k if k == backward => {
                self.navigate(NavCommand::Previous)?;
                KeyResponse::HANDLED
            }
            Key::Char(ch) if !ch.is_control() => {
                self.type_char_at(ch, now)?;
                KeyResponse::HANDLED
            }
            _ => {
                tracing::trace!(?key, "key not handled by item list");
                KeyResponse::IGNORED
            }
        };
        Ok(response)
    }

    /// Pointer click on the trigger; only the primary button toggles
    pub fn click_trigger(&mut self, button: PointerButton) -> bool {
        if button != PointerButton::Primary {
            return false;
        }
        self.toggle()
    }

    /// Pointer interaction outside the widget
    pub fn click_outside(&mut self) -> bool {
        self.close_with(CloseReason::OutsideClick)
    }
}
