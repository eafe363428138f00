//! Item model
//!
//! An item is one registrable entry of a collection: a stable id, the
//! searchable text, a disabled flag and an opaque payload. Items carry an
//! [`ItemPosition`] supplied by the adapter so the registry can order them by
//! declaration position rather than by the order in which they mounted.

use std::fmt;

use smallvec::SmallVec;

/// Stable identifier of a registered item
///
/// Ids are allocated by [`Collection::allocate_id`](crate::Collection::allocate_id)
/// and never reused while the collection lives. Adapters that already own a
/// unique numeric id can wrap it with [`ItemId::from_raw`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    /// Wrap a raw id
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id
    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position of an item in the declaration tree
///
/// A path of child indices from the widget root down to the item, compared
/// lexicographically. `[0, 2]` sorts before `[1]`, and `[1]` before `[1, 0]`.
/// The empty path is the default; items that all share it keep registration
/// order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemPosition(SmallVec<[u32; 8]>);

impl ItemPosition {
    /// Create a position from a path of child indices
    pub fn new(path: impl IntoIterator<Item = u32>) -> Self {
        Self(path.into_iter().collect())
    }

    /// Position of the `index`th child of the root
    pub fn at(index: u32) -> Self {
        Self(SmallVec::from_slice(&[index]))
    }

    /// Position of the `index`th child below this position
    pub fn child(&self, index: u32) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }

    /// The path segments
    pub fn path(&self) -> &[u32] {
        &self.0
    }
}

impl From<u32> for ItemPosition {
    fn from(index: u32) -> Self {
        Self::at(index)
    }
}

impl<const N: usize> From<[u32; N]> for ItemPosition {
    fn from(path: [u32; N]) -> Self {
        Self::new(path)
    }
}

/// Normalize text for typeahead matching (trimmed, lower-cased)
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Data an item supplies when it registers
#[derive(Clone, Debug, PartialEq)]
pub struct ItemData<T> {
    /// Searchable text; normalized again when the item registers
    pub text_value: String,
    /// Whether the item can become active
    pub disabled: bool,
    /// Caller-defined payload returned on select
    pub value: T,
}

impl<T> ItemData<T> {
    /// Create enabled item data; the text is normalized
    pub fn new(text: impl AsRef<str>, value: T) -> Self {
        Self {
            text_value: normalize_text(text.as_ref()),
            disabled: false,
            value,
        }
    }

    /// Set the disabled flag
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// A registered item
#[derive(Clone, Debug)]
pub struct Item<T> {
    pub(crate) id: ItemId,
    pub(crate) data: ItemData<T>,
    pub(crate) position: ItemPosition,
    /// Registration sequence, tie-break for equal positions
    pub(crate) seq: u64,
}

impl<T> Item<T> {
    /// Create a standalone item (mainly for driving the engine directly)
    pub fn new(id: ItemId, mut data: ItemData<T>) -> Self {
        data.text_value = normalize_text(&data.text_value);
        Self {
            id,
            data,
            position: ItemPosition::default(),
            seq: id.to_raw(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn text_value(&self) -> &str {
        &self.data.text_value
    }

    pub fn is_disabled(&self) -> bool {
        self.data.disabled
    }

    pub fn value(&self) -> &T {
        &self.data.value
    }

    pub fn data(&self) -> &ItemData<T> {
        &self.data
    }

    pub fn position(&self) -> &ItemPosition {
        &self.position
    }

    /// Whether navigation, search and defaulting may land on this item
    pub fn is_eligible(&self) -> bool {
        !self.data.disabled
    }

    pub(crate) fn sort_key(&self) -> (&ItemPosition, u64) {
        (&self.position, self.seq)
    }
}
