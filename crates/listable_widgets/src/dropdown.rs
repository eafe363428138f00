//! Dropdown menu
//!
//! An action menu: items are invoked, not remembered. Opening never seeds
//! the active item from a previous pick.

use listable_core::{ItemId, Result};

use crate::config::ListableConfig;
use crate::listable::{Listable, SelectionPolicy};

/// Selection policy that keeps no value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuSelection;

impl<T> SelectionPolicy<T> for MenuSelection {
    fn selected(&self) -> Option<&T> {
        None
    }

    fn matches(&self, _item_value: &T, _selected: &T) -> bool {
        false
    }

    fn commit(&mut self, _value: &T) {}
}

/// Dropdown menu state machine
pub type Dropdown<T> = Listable<T, MenuSelection>;

impl<T> Listable<T, MenuSelection> {
    /// Create a new dropdown
    pub fn new(config: ListableConfig) -> Self {
        Self::with_policy(config, MenuSelection)
    }
}

impl<T: Clone> Listable<T, MenuSelection> {
    /// Invoke the active item; alias of [`commit_active`](Listable::commit_active)
    pub fn invoke_active(&mut self) -> Result<Option<ItemId>> {
        self.commit_active()
    }
}

/// Create a dropdown
pub fn dropdown<T>(config: ListableConfig) -> Dropdown<T> {
    Dropdown::new(config)
}
