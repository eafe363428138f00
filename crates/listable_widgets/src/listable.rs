//! Listable widget state machine
//!
//! [`Listable`] composes the phase FSM, the collection registry and the
//! active-index state into the single object a hosting widget drives. It is
//! generic over the item payload `T` and a [`SelectionPolicy`] that supplies
//! the per-family selection semantics: the dropdown keeps no value, the
//! listbox remembers the committed one.
//!
//! Every command runs to completion before returning. Subscribers see one
//! [`ListableSnapshot`] per command that changed observable state; commands
//! that turn out to be no-ops notify nobody.
//!
//! # Example
//!
//! ```rust
//! use listable_core::{ItemData, ItemPosition, NavCommand, OpenDirection};
//! use listable_widgets::{dropdown, ListableConfig};
//!
//! let mut menu = dropdown::<&str>(ListableConfig::new());
//! let edit = menu.allocate_id();
//! let delete = menu.allocate_id();
//! menu.register(edit, ItemData::new("Edit", "edit"), ItemPosition::at(0));
//! menu.register(delete, ItemData::new("Delete", "delete"), ItemPosition::at(1));
//!
//! menu.open(OpenDirection::First);
//! assert_eq!(menu.active_item_id(), Some(edit));
//!
//! menu.navigate(NavCommand::Next).unwrap();
//! assert_eq!(menu.active_item_id(), Some(delete));
//! ```

use std::fmt;
use std::time::Instant;

use listable_core::engine::{
    compute_next_active, default_active, revalidate_after_removal, revalidate_in_place,
};
use listable_core::{
    phase_events, ActiveIndexState, CloseReason, Collection, Item, ItemData, ItemId, ItemPosition,
    ListableError, NavCommand, OpenDirection, Phase, Registration, Result, StateTransitions,
    SubscriptionId, Subscribers,
};

use crate::config::ListableConfig;

/// Per-family selection semantics
pub trait SelectionPolicy<T> {
    /// The currently committed value, used for open-time defaulting
    fn selected(&self) -> Option<&T>;

    /// Whether an item's value equals the committed value
    fn matches(&self, item_value: &T, selected: &T) -> bool;

    /// Record a committed value
    fn commit(&mut self, value: &T);
}

/// Observable state published to subscribers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListableSnapshot {
    pub phase: Phase,
    pub active: Option<ItemId>,
    pub search_query: String,
    pub disabled: bool,
    /// Collection revision; changes whenever items are added, removed or updated
    pub revision: u64,
}

type ChangeCallback<T> = Box<dyn FnMut(&T) + Send>;

/// Single-active-item widget state machine
pub struct Listable<T, P> {
    pub(crate) config: ListableConfig,
    pub(crate) phase: Phase,
    pub(crate) items: Collection<T>,
    pub(crate) state: ActiveIndexState,
    pub(crate) policy: P,
    subscribers: Subscribers<ListableSnapshot>,
    change_listeners: Vec<ChangeCallback<T>>,
}

impl<T, P: fmt::Debug> fmt::Debug for Listable<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listable")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("items", &self.items.len())
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("subscribers", &self.subscribers.len())
            .field("change_listeners", &self.change_listeners.len())
            .finish()
    }
}

impl<T, P: SelectionPolicy<T>> Listable<T, P> {
    /// Create a widget with an explicit selection policy
    pub fn with_policy(config: ListableConfig, policy: P) -> Self {
        Self {
            config,
            phase: Phase::Closed,
            items: Collection::new(),
            state: ActiveIndexState::default(),
            policy,
            subscribers: Subscribers::new(),
            change_listeners: Vec::new(),
        }
    }

    /// Add a change listener (builder form)
    pub fn on_change<F: FnMut(&T) + Send + 'static>(mut self, callback: F) -> Self {
        self.add_change_listener(callback);
        self
    }

    /// Add a change listener, invoked once per [`select`](Self::select)
    ///
    /// Listeners run inside the command; when the widget sits behind a
    /// [`SharedListable`](crate::SharedListable) the lock is held, so a
    /// listener must not lock it again.
    pub fn add_change_listener<F: FnMut(&T) + Send + 'static>(&mut self, callback: F) {
        self.change_listeners.push(Box::new(callback));
    }

    /// Subscribe to committed state transitions
    ///
    /// Like change listeners, subscribers run while any
    /// [`SharedListable`](crate::SharedListable) lock is held.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&ListableSnapshot) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // =========================================================================
    // Readers
    // =========================================================================

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase.is_open()
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    pub fn config(&self) -> &ListableConfig {
        &self.config
    }

    pub fn active_item_id(&self) -> Option<ItemId> {
        self.state.active
    }

    pub fn active_item(&self) -> Option<&Item<T>> {
        self.state.active.and_then(|id| self.items.get(id))
    }

    pub fn search_query(&self) -> &str {
        self.state.search.query()
    }

    /// When the typeahead idle timer is due, if one is armed
    ///
    /// Adapters schedule their [`poll_search_timer`](Self::poll_search_timer)
    /// tick for this instant.
    pub fn search_deadline(&self) -> Option<Instant> {
        self.state.search.deadline()
    }

    /// The registered items in current order
    pub fn items(&self) -> &[Item<T>] {
        self.items.list()
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.items
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn snapshot(&self) -> ListableSnapshot {
        ListableSnapshot {
            phase: self.phase,
            active: self.state.active,
            search_query: self.state.search.query().to_owned(),
            disabled: self.config.disabled,
            revision: self.items.revision(),
        }
    }

    // =========================================================================
    // Phase
    // =========================================================================

    /// Open the widget and compute the default active item
    ///
    /// No-op when the widget is disabled or already open.
    pub fn open(&mut self, direction: OpenDirection) -> bool {
        if self.config.disabled {
            return false;
        }
        let Some(next) = self.phase.on_event(phase_events::OPEN) else {
            return false;
        };

        let before = self.snapshot();
        let active = default_active(
            self.items.list(),
            self.policy.selected(),
            direction,
            |item, selected| self.policy.matches(item, selected),
        );
        self.phase = next;
        self.state.active = active;
        self.state.search.clear();
        tracing::debug!(?direction, ?active, "listable opened");
        self.publish(before);
        true
    }

    /// Close the widget
    pub fn close(&mut self) -> bool {
        self.close_with(CloseReason::Command)
    }

    /// Close the widget for a specific reason
    ///
    /// The search query is cleared and its idle timer cancelled. The active
    /// id survives the close so a commit in the same gesture can still read
    /// it; the next open recomputes it.
    pub fn close_with(&mut self, reason: CloseReason) -> bool {
        let Some(next) = self.phase.on_event(reason.event()) else {
            return false;
        };

        let before = self.snapshot();
        self.phase = next;
        if self.state.search.cancel() {
            tracing::trace!("search timer cancelled");
        }
        tracing::debug!(?reason, "listable closed");
        self.publish(before);
        true
    }

    /// Open with the default direction when closed, close when open
    pub fn toggle(&mut self) -> bool {
        if self.phase.is_open() {
            self.close()
        } else {
            self.open(OpenDirection::First)
        }
    }

    /// Enable or disable the widget
    pub fn set_disabled(&mut self, disabled: bool) {
        if self.config.disabled == disabled {
            return;
        }
        let before = self.snapshot();
        self.config.disabled = disabled;
        self.publish(before);
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Apply a navigation command; requires the widget to be open
    pub fn navigate(&mut self, command: NavCommand) -> Result<()> {
        self.require_open("navigate")?;
        self.apply(command);
        Ok(())
    }

    /// Pointer moved over an item
    pub fn hover(&mut self, id: ItemId) -> Result<()> {
        self.require_open("hover")?;
        self.apply(NavCommand::Specific(id));
        Ok(())
    }

    /// Pointer left an item
    pub fn leave(&mut self, id: ItemId) -> Result<()> {
        self.require_open("leave")?;
        self.apply(NavCommand::Leave(id));
        Ok(())
    }

    /// Typeahead keystroke at the current time
    pub fn type_char(&mut self, ch: char) -> Result<()> {
        self.type_char_at(ch, Instant::now())
    }

    /// Typeahead keystroke at `now`
    pub fn type_char_at(&mut self, ch: char, now: Instant) -> Result<()> {
        self.require_open("type_char")?;
        self.apply(NavCommand::Search { ch, at: now });
        Ok(())
    }

    /// Reset the typeahead query
    pub fn clear_search(&mut self) {
        self.apply(NavCommand::ClearSearch);
    }

    /// Fire the typeahead idle timer if it is due
    pub fn poll_search_timer(&mut self, now: Instant) -> bool {
        let before = self.snapshot();
        let fired = self.state.search.expire(now);
        if fired {
            tracing::trace!("search buffer expired");
            self.publish(before);
        }
        fired
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Allocate an id for an item about to register
    pub fn allocate_id(&mut self) -> ItemId {
        self.items.allocate_id()
    }

    /// Unregister an item; returns whether it was registered
    pub fn unregister(&mut self, id: ItemId) -> bool {
        let before = self.snapshot();
        let Some(removed) = self.items.unregister(id) else {
            return false;
        };

        let active = revalidate_after_removal(
            self.state.active,
            id,
            removed.former_index,
            self.items.list(),
        );
        if active != self.state.active {
            tracing::debug!(%id, ?active, "active item unregistered, moved to neighbor");
            self.state.active = active;
        }

        self.publish(before);
        true
    }

    /// Re-order items from an ordered id list
    pub fn reorder(&mut self, ids: &[ItemId]) -> Result<()> {
        let before = self.snapshot();
        self.items.reorder(ids)?;
        self.publish(before);
        Ok(())
    }

    /// Drop every item, as when the item-hosting region unmounts
    pub fn clear_items(&mut self) {
        let before = self.snapshot();
        self.items.clear();
        self.state.active = None;
        self.publish(before);
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Commit a value and close
    ///
    /// Listeners are notified exactly once. Callers must not select the value
    /// of a disabled item; [`click_item`](Self::click_item) applies that gate.
    pub fn select(&mut self, value: T) {
        let before = self.snapshot();
        self.policy.commit(&value);
        for listener in &mut self.change_listeners {
            listener(&value);
        }
        tracing::debug!("listable value selected");

        if let Some(next) = self.phase.on_event(phase_events::COMMIT) {
            self.phase = next;
            self.state.search.cancel();
        }
        self.publish(before);
    }

    pub(crate) fn require_open(&self, operation: &'static str) -> Result<()> {
        if self.phase.is_open() {
            Ok(())
        } else {
            Err(ListableError::NotOpen(operation))
        }
    }

    fn apply(&mut self, command: NavCommand) {
        let before = self.snapshot();
        let items = self.items.list();
        self.state = compute_next_active(&self.state, &command, items, &self.config.engine);
        self.publish(before);
    }

    fn publish(&self, before: ListableSnapshot) {
        let after = self.snapshot();
        if after != before {
            tracing::trace!(?after, "listable state changed");
            self.subscribers.notify(&after);
        }
    }
}

impl<T: PartialEq, P: SelectionPolicy<T>> Listable<T, P> {
    /// Register an item, or update it in place if the id is known
    ///
    /// Re-registering identical data at the same position is a no-op.
    pub fn register(
        &mut self,
        id: ItemId,
        data: ItemData<T>,
        position: ItemPosition,
    ) -> Registration {
        let before = self.snapshot();
        let registration = self.items.register(id, data, position);

        if let Registration::Updated {
            index,
            became_disabled: true,
        } = registration
        {
            let active = revalidate_in_place(self.state.active, index, self.items.list());
            if active != self.state.active {
                tracing::debug!(%id, ?active, "active item disabled, moved to neighbor");
                self.state.active = active;
            }
        }

        self.publish(before);
        registration
    }
}

impl<T: Clone, P: SelectionPolicy<T>> Listable<T, P> {
    /// Commit the active item (Enter/Space)
    ///
    /// With no active item the widget just closes. Returns the committed id.
    pub fn commit_active(&mut self) -> Result<Option<ItemId>> {
        self.require_open("commit_active")?;
        let Some((id, value)) = self
            .active_item()
            .map(|item| (item.id(), item.value().clone()))
        else {
            self.close();
            return Ok(None);
        };
        self.select(value);
        Ok(Some(id))
    }

    /// Pointer click on an item; disabled and unknown items are no-ops
    pub fn click_item(&mut self, id: ItemId) -> Result<bool> {
        self.require_open("click_item")?;
        let value = match self.items.get(id) {
            Some(item) if item.is_eligible() => item.value().clone(),
            _ => return Ok(false),
        };
        self.select(value);
        Ok(true)
    }
}
