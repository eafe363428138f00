//! Error types for listable_core

use thiserror::Error;

use crate::item::ItemId;

/// Errors raised by the listable engine
///
/// Every variant is a programmer error in the adapter driving the engine.
/// Edge conditions such as navigating past the last item or searching with
/// no match are defined no-ops and never produce an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListableError {
    /// The same id appeared twice where ids must be unique
    #[error("item {0} appears more than once")]
    DuplicateItem(ItemId),

    /// An id that is not registered in the collection
    #[error("item {0} is not registered")]
    UnknownItem(ItemId),

    /// An ordered id list did not name every registered item
    #[error("ordering names {given} of {registered} registered items")]
    IncompleteOrder { given: usize, registered: usize },

    /// A command that requires the widget to be open was issued while closed
    #[error("`{0}` requires the widget to be open")]
    NotOpen(&'static str),
}

/// Result type for listable operations
pub type Result<T> = std::result::Result<T, ListableError>;
