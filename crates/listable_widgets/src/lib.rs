//! Listable Widgets
//!
//! Headless dropdown menus and listboxes built on `listable_core`.
//!
//! A widget is a [`Listable`] parameterized by a [`SelectionPolicy`]:
//!
//! - [`Dropdown`]: an action menu; picking an item invokes it
//! - [`Listbox`]: a value picker that remembers the committed value
//!
//! Adapters own rendering and focus. They feed keys and pointer events in
//! through the [`keyboard`] dispatchers, mount items through
//! [`ItemHandle`], and observe state through [`Listable::subscribe`].
//!
//! # Example
//!
//! ```rust
//! use listable_core::{ItemData, ItemPosition};
//! use listable_widgets::prelude::*;
//!
//! let mut select = listbox::<&str>(ListableConfig::new());
//! for (at, color) in ["Red", "Green", "Blue"].into_iter().enumerate() {
//!     let id = select.allocate_id();
//!     select.register(id, ItemData::new(color, color), ItemPosition::at(at as u32));
//! }
//!
//! select.handle_trigger_key(Key::ArrowUp);
//! assert_eq!(select.active_item().map(|item| *item.value()), Some("Blue"));
//!
//! select.handle_items_key(Key::Char('g')).unwrap();
//! select.handle_items_key(Key::Enter).unwrap();
//! assert_eq!(select.value(), Some(&"Green"));
//! assert!(!select.is_open());
//! ```

pub mod config;
pub mod dropdown;
pub mod handle;
pub mod keyboard;
pub mod listable;
pub mod listbox;

pub use config::{ListableConfig, Orientation};
pub use dropdown::{dropdown, Dropdown, MenuSelection};
pub use handle::{lock, share, ItemHandle, SharedListable};
pub use keyboard::{Key, KeyResponse, PointerButton};
pub use listable::{Listable, ListableSnapshot, SelectionPolicy};
pub use listbox::{listbox, Listbox, ValueSelection};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{ListableConfig, Orientation};
    pub use crate::dropdown::{dropdown, Dropdown};
    pub use crate::handle::{share, ItemHandle, SharedListable};
    pub use crate::keyboard::{Key, KeyResponse, PointerButton};
    pub use crate::listable::{Listable, ListableSnapshot, SelectionPolicy};
    pub use crate::listbox::{listbox, Listbox};
    pub use listable_core::{CloseReason, ItemId, NavCommand, OpenDirection, Phase};
}
