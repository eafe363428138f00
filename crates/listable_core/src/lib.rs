//! Listable Core
//!
//! The behavioral engine behind single-active-item collection widgets
//! (dropdown menus, listboxes). Nothing here renders; adapters feed
//! commands in and read state back out.
//!
//! - **Collection Registry**: ordered items keyed by stable ids, reconciled
//!   to declaration order as items mount and unmount
//! - **Active-Index Engine**: first/last/next/previous/specific navigation,
//!   typeahead search and re-validation after mutation, all with the
//!   disabled-item skip rule
//! - **Phase FSM**: the open/closed state of a widget
//! - **Subscribers**: observer callbacks for committed transitions
//!
//! # Example
//!
//! ```rust
//! use listable_core::engine::{compute_next_active, ActiveIndexState, EngineConfig, NavCommand};
//! use listable_core::{Collection, ItemData, ItemPosition};
//!
//! let mut items = Collection::new();
//! let b = items.allocate_id();
//! let c = items.allocate_id();
//! items.register(b, ItemData::new("Bob", 'b'), ItemPosition::at(1));
//! items.register(c, ItemData::new("Charlie", 'c'), ItemPosition::at(2));
//!
//! let config = EngineConfig::default();
//! let state = compute_next_active(
//!     &ActiveIndexState::default(),
//!     &NavCommand::First,
//!     items.list(),
//!     &config,
//! );
//! assert_eq!(state.active, Some(b));
//!
//! // An item mounting in front does not steal the active slot
//! let a = items.allocate_id();
//! items.register(a, ItemData::new("Alice", 'a'), ItemPosition::at(0));
//! assert_eq!(state.active, Some(b));
//! assert_eq!(items.index_of(b), Some(1));
//! ```

pub mod collection;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod item;
pub mod search;
pub mod store;

pub use collection::{Collection, Registration, Removed};
pub use engine::{ActiveIndexState, EngineConfig, NavCommand, OpenDirection};
pub use error::{ListableError, Result};
pub use fsm::{phase_events, CloseReason, Phase, StateTransitions};
pub use item::{normalize_text, Item, ItemData, ItemId, ItemPosition};
pub use search::{SearchBuffer, DEFAULT_SEARCH_TIMEOUT};
pub use store::{SubscriptionId, Subscribers};
