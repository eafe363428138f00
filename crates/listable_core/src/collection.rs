//! Collection registry
//!
//! Keeps the registered items of one widget instance in declaration order.
//! Items usually mount out of order (conditional rendering, re-keyed lists),
//! so the registry never trusts call order: every insert lands at the slot
//! given by the item's [`ItemPosition`], with registration sequence breaking
//! ties.
//!
//! # Example
//!
//! ```rust
//! use listable_core::{Collection, ItemData, ItemPosition};
//!
//! let mut items = Collection::new();
//!
//! let c = items.allocate_id();
//! items.register(c, ItemData::new("Charlie", 'c'), ItemPosition::at(2));
//!
//! let a = items.allocate_id();
//! items.register(a, ItemData::new("Alice", 'a'), ItemPosition::at(0));
//!
//! let order: Vec<_> = items.list().iter().map(|item| item.id()).collect();
//! assert_eq!(order, vec![a, c]);
//! ```

use rustc_hash::FxHashMap;

use crate::error::{ListableError, Result};
use crate::item::{normalize_text, Item, ItemData, ItemId, ItemPosition};

/// Outcome of [`Collection::register`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// A new item was inserted at `index`
    Inserted { index: usize },
    /// The id was already registered with identical data and position
    Unchanged { index: usize },
    /// An existing item was updated in place and now sits at `index`
    Updated {
        index: usize,
        /// The item was enabled before this update and is disabled now
        became_disabled: bool,
    },
}

/// An item removed by [`Collection::unregister`]
#[derive(Clone, Debug)]
pub struct Removed<T> {
    pub item: Item<T>,
    /// Index the item occupied before removal
    pub former_index: usize,
}

/// Ordered registry of the items of one widget instance
#[derive(Clone, Debug)]
pub struct Collection<T> {
    /// Items sorted by (position, registration sequence)
    items: Vec<Item<T>>,
    /// Id -> index into `items`
    index: FxHashMap<ItemId, usize>,
    next_id: u64,
    next_seq: u64,
    revision: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Collection<T> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: FxHashMap::default(),
            next_id: 1,
            next_seq: 0,
            revision: 0,
        }
    }

    /// Allocate a fresh item id
    ///
    /// Ids are handed out monotonically and skip any raw id an adapter has
    /// registered on its own, so an allocated id is never in use.
    pub fn allocate_id(&mut self) -> ItemId {
        loop {
            let id = ItemId::from_raw(self.next_id);
            self.next_id += 1;
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }
}

impl<T: PartialEq> Collection<T> {
    /// Insert a new item or update the existing item with this id
    ///
    /// The text is normalized on the way in. Updating keeps the item's
    /// registration sequence, so an item that re-registers with an unchanged
    /// position keeps its slot. Re-registering identical data and position
    /// leaves the revision untouched.
    pub fn register(
        &mut self,
        id: ItemId,
        mut data: ItemData<T>,
        position: ItemPosition,
    ) -> Registration {
        data.text_value = normalize_text(&data.text_value);

        if let Some(&at) = self.index.get(&id) {
            let current = &self.items[at];
            if current.position == position && current.data == data {
                return Registration::Unchanged { index: at };
            }
            self.revision += 1;

            let was_disabled = self.items[at].data.disabled;
            let became_disabled = !was_disabled && data.disabled;

            if self.items[at].position == position {
                self.items[at].data = data;
                return Registration::Updated {
                    index: at,
                    became_disabled,
                };
            }

            let mut item = self.items.remove(at);
            item.data = data;
            item.position = position;
            let index = self.insert_sorted(item);
            self.reindex(at.min(index));
            tracing::trace!(%id, from = at, to = index, "item moved");
            return Registration::Updated {
                index,
                became_disabled,
            };
        }

        self.revision += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        let index = self.insert_sorted(Item {
            id,
            data,
            position,
            seq,
        });
        self.reindex(index);
        tracing::trace!(%id, index, "item registered");
        Registration::Inserted { index }
    }
}

impl<T> Collection<T> {
    /// Remove an item; `None` when the id is not registered
    pub fn unregister(&mut self, id: ItemId) -> Option<Removed<T>> {
        let former_index = self.index.remove(&id)?;
        let item = self.items.remove(former_index);
        self.reindex(former_index);
        self.revision += 1;
        tracing::trace!(%id, former_index, "item unregistered");
        Some(Removed { item, former_index })
    }

    /// Re-order the collection from an ordered list of ids
    ///
    /// The list must name every registered item exactly once. Each item's
    /// position becomes its index in the list. On error the collection is
    /// left untouched.
    pub fn reorder(&mut self, ids: &[ItemId]) -> Result<()> {
        let mut seen = FxHashMap::default();
        for (order, &id) in ids.iter().enumerate() {
            if !self.index.contains_key(&id) {
                return Err(ListableError::UnknownItem(id));
            }
            if seen.insert(id, order).is_some() {
                return Err(ListableError::DuplicateItem(id));
            }
        }
        if seen.len() != self.items.len() {
            return Err(ListableError::IncompleteOrder {
                given: seen.len(),
                registered: self.items.len(),
            });
        }

        for item in &mut self.items {
            let order = seen[&item.id];
            item.position = ItemPosition::at(order as u32);
        }
        self.items
            .sort_by(|a, b| a.position.cmp(&b.position).then(a.seq.cmp(&b.seq)));
        self.reindex(0);
        self.revision += 1;
        Ok(())
    }

    /// Remove every item
    ///
    /// Id allocation continues where it left off.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.index.clear();
        self.revision += 1;
    }

    /// The items in current order
    pub fn list(&self) -> &[Item<T>] {
        &self.items
    }

    /// Look up an item by id
    pub fn get(&self, id: ItemId) -> Option<&Item<T>> {
        self.index.get(&id).map(|&at| &self.items[at])
    }

    /// Current index of an item
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Counter bumped on every change to the items
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn insert_sorted(&mut self, item: Item<T>) -> usize {
        let at = self
            .items
            .partition_point(|existing| existing.sort_key() < item.sort_key());
        self.items.insert(at, item);
        at
    }

    /// Refresh the id -> index map from `from` onwards
    fn reindex(&mut self, from: usize) {
        for (at, item) in self.items.iter().enumerate().skip(from) {
            self.index.insert(item.id, at);
        }
        debug_assert_eq!(
            self.index.len(),
            self.items.len(),
            "collection index out of sync: duplicate item id"
        );
    }
}
