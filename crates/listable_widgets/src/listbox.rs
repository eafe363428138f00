//! Listbox (select)
//!
//! A value picker. The committed value is remembered and, on the next open,
//! the item carrying it becomes active. Values are compared with `==` by
//! default, or with a caller-supplied comparator for payloads that have no
//! useful equality (compare by id field, case-insensitively, ...).
//!
//! # Example
//!
//! ```rust
//! use listable_core::{ItemData, ItemPosition, OpenDirection};
//! use listable_widgets::{listbox, ListableConfig};
//!
//! let mut select = listbox::<u32>(ListableConfig::new());
//! let one = select.allocate_id();
//! let two = select.allocate_id();
//! select.register(one, ItemData::new("One", 1), ItemPosition::at(0));
//! select.register(two, ItemData::new("Two", 2), ItemPosition::at(1));
//!
//! select.set_value(Some(2));
//! select.open(OpenDirection::First);
//! assert_eq!(select.active_item_id(), Some(two));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::config::{ListableConfig, Orientation};
use crate::listable::{Listable, SelectionPolicy};

type Comparator<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Selection policy that remembers the committed value
pub struct ValueSelection<T> {
    value: Option<T>,
    eq: Comparator<T>,
}

impl<T: PartialEq + 'static> ValueSelection<T> {
    /// Compare values with `==`
    pub fn new(value: Option<T>) -> Self {
        Self {
            value,
            eq: Arc::new(|a: &T, b: &T| a == b),
        }
    }
}

impl<T: PartialEq + 'static> Default for ValueSelection<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T> ValueSelection<T> {
    /// Compare values with a custom comparator
    pub fn by<F>(value: Option<T>, eq: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self {
            value,
            eq: Arc::new(eq),
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

impl<T: Clone> Clone for ValueSelection<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            eq: Arc::clone(&self.eq),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueSelection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSelection")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl<T: Clone> SelectionPolicy<T> for ValueSelection<T> {
    fn selected(&self) -> Option<&T> {
        self.value.as_ref()
    }

    fn matches(&self, item_value: &T, selected: &T) -> bool {
        (self.eq)(item_value, selected)
    }

    fn commit(&mut self, value: &T) {
        self.value = Some(value.clone());
    }
}

/// Listbox state machine
pub type Listbox<T> = Listable<T, ValueSelection<T>>;

impl<T: Clone + PartialEq + 'static> Listable<T, ValueSelection<T>> {
    /// Create a new listbox comparing values with `==`
    pub fn new(config: ListableConfig) -> Self {
        Self::with_policy(config, ValueSelection::new(None))
    }
}

impl<T: Clone> Listable<T, ValueSelection<T>> {
    /// Create a new listbox with a custom value comparator
    pub fn with_comparator<F>(config: ListableConfig, eq: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self::with_policy(config, ValueSelection::by(None, eq))
    }

    /// The committed value
    pub fn value(&self) -> Option<&T> {
        self.policy.value()
    }

    /// Replace the committed value without emitting a change
    ///
    /// Used when the hosting app owns the value. Takes effect on the next open.
    pub fn set_value(&mut self, value: Option<T>) {
        self.policy.value = value;
    }

    pub fn orientation(&self) -> Orientation {
        self.config.orientation
    }
}

/// Create a listbox
pub fn listbox<T: Clone + PartialEq + 'static>(config: ListableConfig) -> Listbox<T> {
    Listbox::new(config)
}
