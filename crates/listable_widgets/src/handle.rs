//! Shared widget handle and item registrations
//!
//! A widget is shared between its trigger, its item list and each item
//! through a [`SharedListable`]. Every item holds an [`ItemHandle`] for its
//! lifetime: constructing one registers the item, dropping it unregisters,
//! so the collection always mirrors the set of mounted items.
//!
//! # Example
//!
//! ```rust
//! use listable_core::{ItemData, ItemPosition, OpenDirection};
//! use listable_widgets::{dropdown, share, ItemHandle, ListableConfig};
//!
//! let menu = share(dropdown::<&str>(ListableConfig::new()));
//!
//! let copy = ItemHandle::register(&menu, ItemData::new("Copy", "copy"), ItemPosition::at(0));
//! let paste = ItemHandle::register(&menu, ItemData::new("Paste", "paste"), ItemPosition::at(1));
//!
//! menu.lock().unwrap().open(OpenDirection::First);
//! assert!(copy.is_active());
//!
//! drop(copy);
//! assert!(paste.is_active());
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use listable_core::{ItemData, ItemId, ItemPosition, Registration, Result};

use crate::listable::{Listable, SelectionPolicy};

/// Widget shared between its parts
pub type SharedListable<T, P> = Arc<Mutex<Listable<T, P>>>;

/// Wrap a widget for sharing
pub fn share<T, P>(listable: Listable<T, P>) -> SharedListable<T, P> {
    Arc::new(Mutex::new(listable))
}

/// Lock a shared widget, recovering the state from a poisoned lock
///
/// Every command leaves the widget consistent before it returns, so a panic
/// in a subscriber cannot leave it half-updated.
///
/// Subscribers and change listeners run while the guard is held. They must
/// not lock the same widget again; the mutex is not reentrant and the call
/// deadlocks. Read state from the snapshot or value the callback receives.
pub fn lock<T, P>(shared: &SharedListable<T, P>) -> MutexGuard<'_, Listable<T, P>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registration of one mounted item
pub struct ItemHandle<T, P: SelectionPolicy<T>> {
    id: ItemId,
    position: ItemPosition,
    owner: SharedListable<T, P>,
}

impl<T: PartialEq, P: SelectionPolicy<T>> ItemHandle<T, P> {
    /// Allocate an id and register the item
    pub fn register(
        owner: &SharedListable<T, P>,
        data: ItemData<T>,
        position: ItemPosition,
    ) -> Self {
        let id = {
            let mut listable = lock(owner);
            let id = listable.allocate_id();
            listable.register(id, data, position.clone());
            id
        };
        tracing::trace!(%id, "item mounted");

        Self {
            id,
            position,
            owner: Arc::clone(owner),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn position(&self) -> &ItemPosition {
        &self.position
    }

    /// Replace the item's text, value or disabled flag
    pub fn update(&self, data: ItemData<T>) -> Registration {
        lock(&self.owner).register(self.id, data, self.position.clone())
    }

    /// Move the item to a new position, replacing its data
    pub fn move_to(&mut self, data: ItemData<T>, position: ItemPosition) -> Registration {
        self.position = position;
        self.update(data)
    }

    /// Pointer entered the item
    pub fn hover(&self) -> Result<()> {
        lock(&self.owner).hover(self.id)
    }

    /// Pointer left the item
    pub fn leave(&self) -> Result<()> {
        lock(&self.owner).leave(self.id)
    }

    pub fn is_active(&self) -> bool {
        lock(&self.owner).active_item_id() == Some(self.id)
    }
}

impl<T: Clone, P: SelectionPolicy<T>> ItemHandle<T, P> {
    /// Pointer click on the item
    pub fn click(&self) -> Result<bool> {
        lock(&self.owner).click_item(self.id)
    }
}

impl<T, P: SelectionPolicy<T>> Drop for ItemHandle<T, P> {
    fn drop(&mut self) {
        lock(&self.owner).unregister(self.id);
        tracing::trace!(id = %self.id, "item unmounted");
    }
}

impl<T, P: SelectionPolicy<T>> std::fmt::Debug for ItemHandle<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemHandle")
            .field("id", &self.id)
            .field("position", &self.position)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListableConfig;
    use crate::dropdown::{dropdown, MenuSelection};
    use crate::listbox::listbox;
    use listable_core::{OpenDirection, Phase};
    use std::sync::TryLockError;
    use std::thread;

    #[test]
    fn test_drop_unregisters() {
        let menu = share(dropdown::<u8>(ListableConfig::new()));
        let a = ItemHandle::register(&menu, ItemData::new("a", 1), ItemPosition::at(0));
        let b = ItemHandle::register(&menu, ItemData::new("b", 2), ItemPosition::at(1));
        assert_eq!(lock(&menu).items().len(), 2);

        lock(&menu).open(OpenDirection::First);
        assert!(a.is_active());

        drop(a);
        assert_eq!(lock(&menu).items().len(), 1);
        assert!(b.is_active());

        drop(b);
        assert!(lock(&menu).items().is_empty());
        assert_eq!(lock(&menu).active_item_id(), None);
    }

    #[test]
    fn test_mount_order_does_not_matter() {
        let menu = share(dropdown::<&str>(ListableConfig::new()));
        let c = ItemHandle::register(&menu, ItemData::new("c", "c"), ItemPosition::at(2));
        let a = ItemHandle::register(&menu, ItemData::new("a", "a"), ItemPosition::at(0));
        let b = ItemHandle::register(&menu, ItemData::new("b", "b"), ItemPosition::at(1));

        let order: Vec<_> = lock(&menu).items().iter().map(|item| item.id()).collect();
        assert_eq!(order, vec![a.id(), b.id(), c.id()]);
    }

    #[test]
    fn test_update_disables_active_item() {
        let menu = share(dropdown::<u8>(ListableConfig::new()));
        let a = ItemHandle::register(&menu, ItemData::new("a", 1), ItemPosition::at(0));
        let b = ItemHandle::register(&menu, ItemData::new("b", 2), ItemPosition::at(1));
        lock(&menu).open(OpenDirection::First);

        let registration = a.update(ItemData::new("a", 1).disabled(true));
        assert_eq!(
            registration,
            Registration::Updated {
                index: 0,
                became_disabled: true
            }
        );
        assert!(b.is_active());
    }

    #[test]
    fn test_move_to() {
        let menu = share(dropdown::<u8>(ListableConfig::new()));
        let mut a = ItemHandle::register(&menu, ItemData::new("a", 1), ItemPosition::at(0));
        let b = ItemHandle::register(&menu, ItemData::new("b", 2), ItemPosition::at(1));

        a.move_to(ItemData::new("a", 1), ItemPosition::at(5));
        assert_eq!(lock(&menu).collection().index_of(a.id()), Some(1));
        assert_eq!(lock(&menu).collection().index_of(b.id()), Some(0));
        assert_eq!(a.position(), &ItemPosition::at(5));
    }

    #[test]
    fn test_pointer_through_handle() {
        let select = share(listbox::<u8>(ListableConfig::new()));
        let a = ItemHandle::register(&select, ItemData::new("a", 1), ItemPosition::at(0));
        let b = ItemHandle::register(&select, ItemData::new("b", 2), ItemPosition::at(1));

        assert!(b.hover().is_err());
        lock(&select).open(OpenDirection::First);

        b.hover().unwrap();
        assert!(b.is_active());
        b.leave().unwrap();
        assert!(!a.is_active() && !b.is_active());

        assert_eq!(b.click(), Ok(true));
        assert_eq!(lock(&select).value(), Some(&2));
    }

    #[test]
    fn test_callbacks_run_under_the_widget_lock() {
        let menu = share(dropdown::<u8>(ListableConfig::new()));
        let _item = ItemHandle::register(&menu, ItemData::new("a", 1), ItemPosition::default());
        let observed = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&menu);
        let observed_clone = observed.clone();
        lock(&menu).subscribe(move |snapshot| {
            // Re-locking here would deadlock; the lock is visibly held
            let held = weak
                .upgrade()
                .is_some_and(|menu| matches!(menu.try_lock(), Err(TryLockError::WouldBlock)));
            observed_clone.lock().unwrap().push((snapshot.phase, held));
        });

        lock(&menu).open(OpenDirection::First);
        lock(&menu).close();

        assert_eq!(
            *observed.lock().unwrap(),
            vec![(Phase::Open, true), (Phase::Closed, true)]
        );
    }

    #[test]
    fn test_items_mount_from_threads() {
        let menu = share(dropdown::<usize>(ListableConfig::new()));

        let handles: Vec<ItemHandle<usize, MenuSelection>> = thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|n| {
                    let menu = &menu;
                    scope.spawn(move || {
                        let data = ItemData::new(format!("item {n}"), n);
                        ItemHandle::register(menu, data, ItemPosition::at(n as u32))
                    })
                })
                .collect();
            workers.into_iter().map(|worker| worker.join().unwrap()).collect()
        });

        let values: Vec<_> = lock(&menu).items().iter().map(|item| *item.value()).collect();
        assert_eq!(values, (0..8).collect::<Vec<_>>());

        drop(handles);
        assert!(lock(&menu).items().is_empty());
    }
}
