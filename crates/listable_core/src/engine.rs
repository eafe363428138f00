//! Active-index engine
//!
//! Computes which item is active after a navigation command. The engine is a
//! set of pure functions over an ordered item slice: it never owns items and
//! never mutates anything except the state value it returns.
//!
//! # Skip rule
//!
//! Disabled items are never landed on by navigation, search or open-time
//! defaulting, but they do not block traversal past them.
//!
//! # Edges
//!
//! Navigation never wraps. `Next` at the last eligible item and `Previous`
//! at the first eligible item leave the state unchanged.
//!
//! ```rust
//! use listable_core::engine::{compute_next_active, ActiveIndexState, EngineConfig, NavCommand};
//! use listable_core::{Item, ItemData, ItemId};
//!
//! let items = vec![
//!     Item::new(ItemId::from_raw(1), ItemData::new("a", ()).disabled(true)),
//!     Item::new(ItemId::from_raw(2), ItemData::new("b", ())),
//!     Item::new(ItemId::from_raw(3), ItemData::new("c", ())),
//! ];
//! let config = EngineConfig::default();
//!
//! let state = compute_next_active(
//!     &ActiveIndexState::default(),
//!     &NavCommand::First,
//!     &items,
//!     &config,
//! );
//! assert_eq!(state.active, Some(ItemId::from_raw(2)));
//!
//! let state = compute_next_active(&state, &NavCommand::Next, &items, &config);
//! let state = compute_next_active(&state, &NavCommand::Next, &items, &config);
//! assert_eq!(state.active, Some(ItemId::from_raw(3)));
//! ```

use std::time::{Duration, Instant};

use crate::item::{Item, ItemId};
use crate::search::{SearchBuffer, DEFAULT_SEARCH_TIMEOUT};

/// A navigation command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavCommand {
    /// First eligible item, or none
    First,
    /// Last eligible item, or none
    Last,
    /// Next eligible item after the active one, no wraparound
    Next,
    /// Previous eligible item before the active one, no wraparound
    Previous,
    /// A specific item, if it exists and is eligible (keyboard focus, hover)
    Specific(ItemId),
    /// The pointer left an item; clears the active id if it was that item
    Leave(ItemId),
    /// A typeahead keystroke received at `at`
    Search { ch: char, at: Instant },
    /// Reset the typeahead query
    ClearSearch,
}

/// Which end an open-time scan starts from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OpenDirection {
    /// ArrowDown, Enter, Space, pointer
    #[default]
    First,
    /// ArrowUp
    Last,
}

/// Active item plus typeahead buffer
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveIndexState {
    pub active: Option<ItemId>,
    pub search: SearchBuffer,
}

impl ActiveIndexState {
    /// Create a state with the given active item and an empty query
    pub fn with_active(active: Option<ItemId>) -> Self {
        Self {
            active,
            search: SearchBuffer::new(),
        }
    }
}

/// Engine tunables
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Idle interval after which the typeahead query resets
    pub search_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }
}

impl EngineConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the typeahead idle interval
    pub fn search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }
}

/// Apply a navigation command
pub fn compute_next_active<T>(
    current: &ActiveIndexState,
    command: &NavCommand,
    items: &[Item<T>],
    config: &EngineConfig,
) -> ActiveIndexState {
    let mut next = current.clone();
    let active_index = current
        .active
        .and_then(|id| items.iter().position(|item| item.id == id));

    match *command {
        NavCommand::First => next.active = first_eligible(items),
        NavCommand::Last => next.active = last_eligible(items),
        NavCommand::Next => {
            if let Some(id) = next_eligible(items, active_index) {
                next.active = Some(id);
            }
        }
        NavCommand::Previous => {
            if let Some(id) = previous_eligible(items, active_index) {
                next.active = Some(id);
            }
        }
        NavCommand::Specific(id) => {
            if items.iter().any(|item| item.id == id && item.is_eligible()) {
                next.active = Some(id);
            }
        }
        NavCommand::Leave(id) => {
            let leaving_active = current.active == Some(id)
                && items.iter().any(|item| item.id == id && item.is_eligible());
            if leaving_active {
                next.active = None;
            }
        }
        NavCommand::Search { ch, at } => {
            next.search.push(ch, at, config.search_timeout);
            if let Some(id) = search_match(items, next.search.query()) {
                next.active = Some(id);
            }
        }
        NavCommand::ClearSearch => next.search.clear(),
    }

    next
}

/// First eligible item whose text starts with `query`
pub fn search_match<T>(items: &[Item<T>], query: &str) -> Option<ItemId> {
    items
        .iter()
        .find(|item| item.is_eligible() && item.text_value().starts_with(query))
        .map(|item| item.id)
}

pub fn first_eligible<T>(items: &[Item<T>]) -> Option<ItemId> {
    items.iter().find(|item| item.is_eligible()).map(|item| item.id)
}

pub fn last_eligible<T>(items: &[Item<T>]) -> Option<ItemId> {
    items
        .iter()
        .rev()
        .find(|item| item.is_eligible())
        .map(|item| item.id)
}

/// Eligible item after `from` (`None` scans from the start)
pub fn next_eligible<T>(items: &[Item<T>], from: Option<usize>) -> Option<ItemId> {
    let start = from.map_or(0, |at| at + 1);
    items
        .iter()
        .skip(start)
        .find(|item| item.is_eligible())
        .map(|item| item.id)
}

/// Eligible item before `from` (`None` scans from the end)
pub fn previous_eligible<T>(items: &[Item<T>], from: Option<usize>) -> Option<ItemId> {
    let end = from.unwrap_or(items.len());
    items[..end.min(items.len())]
        .iter()
        .rev()
        .find(|item| item.is_eligible())
        .map(|item| item.id)
}

/// Active item to use when the widget opens
///
/// An eligible item whose value matches `selected` under `eq` wins; otherwise
/// the scan runs from the end named by `direction`.
pub fn default_active<T, F>(
    items: &[Item<T>],
    selected: Option<&T>,
    direction: OpenDirection,
    eq: F,
) -> Option<ItemId>
where
    F: Fn(&T, &T) -> bool,
{
    let selected_item = selected.and_then(|value| {
        items
            .iter()
            .find(|item| item.is_eligible() && eq(item.value(), value))
    });
    if let Some(item) = selected_item {
        return Some(item.id);
    }

    match direction {
        OpenDirection::First => first_eligible(items),
        OpenDirection::Last => last_eligible(items),
    }
}

/// Active id after `removed` left the collection from `former_index`
///
/// `items` is the collection after removal. When the removed item was active
/// the nearest eligible neighbor takes over, searching forward from the
/// vacated slot first and then backward.
pub fn revalidate_after_removal<T>(
    active: Option<ItemId>,
    removed: ItemId,
    former_index: usize,
    items: &[Item<T>],
) -> Option<ItemId> {
    if active != Some(removed) {
        return active;
    }
    let former_index = former_index.min(items.len());
    nearest_eligible(items, former_index, former_index)
}

/// Active id after the item at `index` changed in place
///
/// If the active item is still eligible nothing changes; if it was disabled
/// the nearest eligible neighbor takes over, forward first.
pub fn revalidate_in_place<T>(
    active: Option<ItemId>,
    index: usize,
    items: &[Item<T>],
) -> Option<ItemId> {
    let Some(item) = items.get(index) else {
        return active;
    };
    if active != Some(item.id) || item.is_eligible() {
        return active;
    }
    nearest_eligible(items, index + 1, index)
}

/// Eligible item at or after `forward_from`, else the last one before `backward_before`
fn nearest_eligible<T>(
    items: &[Item<T>],
    forward_from: usize,
    backward_before: usize,
) -> Option<ItemId> {
    items
        .iter()
        .skip(forward_from)
        .find(|item| item.is_eligible())
        .or_else(|| {
            items[..backward_before.min(items.len())]
                .iter()
                .rev()
                .find(|item| item.is_eligible())
        })
        .map(|item| item.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemData;

    /// Build items from (text, disabled) pairs; ids are 1-based positions
    fn items(entries: &[(&str, bool)]) -> Vec<Item<usize>> {
        entries
            .iter()
            .enumerate()
            .map(|(at, (text, disabled))| {
                Item::new(
                    ItemId::from_raw(at as u64 + 1),
                    ItemData::new(text, at).disabled(*disabled),
                )
            })
            .collect()
    }

    fn id(raw: u64) -> ItemId {
        ItemId::from_raw(raw)
    }

    fn run(
        state: &ActiveIndexState,
        command: NavCommand,
        items: &[Item<usize>],
    ) -> ActiveIndexState {
        compute_next_active(state, &command, items, &EngineConfig::default())
    }

    #[test]
    fn test_first_next_stop_at_end() {
        let items = items(&[("a", true), ("b", false), ("c", false)]);
        let state = run(&ActiveIndexState::default(), NavCommand::First, &items);
        assert_eq!(state.active, Some(id(2)));

        let state = run(&state, NavCommand::Next, &items);
        assert_eq!(state.active, Some(id(3)));

        let state = run(&state, NavCommand::Next, &items);
        assert_eq!(state.active, Some(id(3)));
    }

    #[test]
    fn test_single_eligible_item_pins_navigation() {
        let items = items(&[("a", false), ("b", true), ("c", true)]);
        let state = run(&ActiveIndexState::default(), NavCommand::Last, &items);
        assert_eq!(state.active, Some(id(1)));

        assert_eq!(run(&state, NavCommand::Previous, &items), state);
        assert_eq!(run(&state, NavCommand::Next, &items), state);
    }

    #[test]
    fn test_next_without_active_starts_at_front() {
        let items = items(&[("a", true), ("b", false)]);
        let state = run(&ActiveIndexState::default(), NavCommand::Next, &items);
        assert_eq!(state.active, Some(id(2)));
    }

    #[test]
    fn test_previous_without_active_starts_at_back() {
        let items = items(&[("a", false), ("b", false), ("c", true)]);
        let state = run(&ActiveIndexState::default(), NavCommand::Previous, &items);
        assert_eq!(state.active, Some(id(2)));
    }

    #[test]
    fn test_previous_skips_disabled() {
        let items = items(&[("a", false), ("b", true), ("c", false)]);
        let state = ActiveIndexState::with_active(Some(id(3)));
        assert_eq!(run(&state, NavCommand::Previous, &items).active, Some(id(1)));
    }

    #[test]
    fn test_empty_collection_yields_none() {
        let items = items(&[]);
        let state = ActiveIndexState::default();
        for command in [
            NavCommand::First,
            NavCommand::Last,
            NavCommand::Next,
            NavCommand::Previous,
        ] {
            assert_eq!(run(&state, command, &items).active, None);
        }
    }

    #[test]
    fn test_specific_ignores_disabled_and_unknown() {
        let items = items(&[("a", false), ("b", true)]);
        let state = ActiveIndexState::with_active(Some(id(1)));

        assert_eq!(run(&state, NavCommand::Specific(id(2)), &items).active, Some(id(1)));
        assert_eq!(run(&state, NavCommand::Specific(id(9)), &items).active, Some(id(1)));

        let state = ActiveIndexState::default();
        assert_eq!(run(&state, NavCommand::Specific(id(1)), &items).active, Some(id(1)));
    }

    #[test]
    fn test_leave_clears_only_the_active_enabled_item() {
        let items = items(&[("a", false), ("b", false), ("c", true)]);
        let state = ActiveIndexState::with_active(Some(id(1)));

        assert_eq!(run(&state, NavCommand::Leave(id(2)), &items).active, Some(id(1)));
        assert_eq!(run(&state, NavCommand::Leave(id(3)), &items).active, Some(id(1)));
        assert_eq!(run(&state, NavCommand::Leave(id(1)), &items).active, None);
    }

    #[test]
    fn test_search_prefix_case_insensitive() {
        let items = items(&[("alice", false), ("bob", false), ("charlie", false)]);
        let now = Instant::now();

        let search = NavCommand::Search { ch: 'B', at: now };
        let state = run(&ActiveIndexState::default(), search, &items);
        let state = run(&state, NavCommand::Search { ch: 'O', at: now }, &items);

        assert_eq!(state.active, Some(id(2)));
        assert_eq!(state.search.query(), "bo");
    }

    #[test]
    fn test_search_matches_unnormalized_literal_text() {
        let data = ItemData {
            text_value: "  Bob".into(),
            disabled: false,
            value: 0,
        };
        let items = vec![Item::new(id(1), data)];

        let search = NavCommand::Search { ch: 'b', at: Instant::now() };
        let state = run(&ActiveIndexState::default(), search, &items);
        assert_eq!(state.active, Some(id(1)));
    }

    #[test]
    fn test_search_skips_disabled_match() {
        let items = items(&[("alice", false), ("bob", true), ("charlie", false)]);
        let now = Instant::now();
        let state = ActiveIndexState::with_active(Some(id(3)));

        let state = run(&state, NavCommand::Search { ch: 'b', at: now }, &items);
        let state = run(&state, NavCommand::Search { ch: 'o', at: now }, &items);

        assert_eq!(state.active, Some(id(3)));
        assert_eq!(state.search.query(), "bo");
    }

    #[test]
    fn test_search_with_spaces() {
        let items = items(&[("value a", false), ("value b", false), ("value c", false)]);
        let now = Instant::now();
        let mut state = ActiveIndexState::default();
        for ch in "value b".chars() {
            state = run(&state, NavCommand::Search { ch, at: now }, &items);
        }
        assert_eq!(state.active, Some(id(2)));
    }

    #[test]
    fn test_search_restarts_after_idle() {
        let items = items(&[("alice", false), ("bob", false)]);
        let start = Instant::now();

        let search = NavCommand::Search { ch: 'b', at: start };
        let state = run(&ActiveIndexState::default(), search, &items);
        assert_eq!(state.active, Some(id(2)));

        let later = start + DEFAULT_SEARCH_TIMEOUT + Duration::from_millis(1);
        let state = run(&state, NavCommand::Search { ch: 'a', at: later }, &items);
        assert_eq!(state.search.query(), "a");
        assert_eq!(state.active, Some(id(1)));
    }

    #[test]
    fn test_clear_search_keeps_active() {
        let items = items(&[("alice", false)]);
        let now = Instant::now();
        let search = NavCommand::Search { ch: 'a', at: now };
        let state = run(&ActiveIndexState::default(), search, &items);

        let state = run(&state, NavCommand::ClearSearch, &items);
        assert_eq!(state.active, Some(id(1)));
        assert!(state.search.is_empty());
        assert_eq!(state.search.deadline(), None);
    }

    #[test]
    fn test_default_active_prefers_selected_value() {
        let items = items(&[("a", false), ("b", false), ("c", false)]);
        let selected = 1usize;
        assert_eq!(
            default_active(&items, Some(&selected), OpenDirection::Last, |a, b| a == b),
            Some(id(2))
        );
    }

    #[test]
    fn test_default_active_falls_back_when_selected_disabled() {
        let items = items(&[("a", false), ("b", true), ("c", false)]);
        let selected = 1usize;
        assert_eq!(
            default_active(&items, Some(&selected), OpenDirection::First, |a, b| a == b),
            Some(id(1))
        );
        assert_eq!(
            default_active(&items, Some(&selected), OpenDirection::Last, |a, b| a == b),
            Some(id(3))
        );
    }

    #[test]
    fn test_default_active_direction() {
        let items = items(&[("a", false), ("b", true), ("c", true)]);
        assert_eq!(
            default_active(&items, None, OpenDirection::Last, |a, b| a == b),
            Some(id(1))
        );
    }

    #[test]
    fn test_revalidate_after_removal_prefers_forward_neighbor() {
        // [a, b, c] with b active; b removed from index 1
        let after = items(&[("a", false), ("c", false)]);
        let removed = id(9);
        assert_eq!(
            revalidate_after_removal(Some(removed), removed, 1, &after),
            Some(after[1].id())
        );
    }

    #[test]
    fn test_revalidate_after_removal_falls_back_backward() {
        let after = items(&[("a", false), ("b", true)]);
        let removed = id(9);
        assert_eq!(
            revalidate_after_removal(Some(removed), removed, 2, &after),
            Some(id(1))
        );
    }

    #[test]
    fn test_revalidate_after_removal_to_none() {
        let after = items(&[("a", true)]);
        let removed = id(9);
        assert_eq!(revalidate_after_removal(Some(removed), removed, 0, &after), None);
    }

    #[test]
    fn test_revalidate_after_removal_of_inactive_item() {
        let after = items(&[("a", false)]);
        assert_eq!(
            revalidate_after_removal(Some(id(1)), id(9), 0, &after),
            Some(id(1))
        );
    }

    #[test]
    fn test_revalidate_in_place() {
        let items = items(&[("a", false), ("b", true), ("c", true)]);
        // b was active and just became disabled; nothing forward, so back to a
        assert_eq!(revalidate_in_place(Some(id(2)), 1, &items), Some(id(1)));
        // a is still enabled
        assert_eq!(revalidate_in_place(Some(id(1)), 0, &items), Some(id(1)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn disabled_flags() -> impl Strategy<Value = Vec<bool>> {
            proptest::collection::vec(any::<bool>(), 0..12)
        }

        fn build(flags: &[bool]) -> Vec<Item<usize>> {
            flags
                .iter()
                .enumerate()
                .map(|(at, disabled)| {
                    Item::new(
                        ItemId::from_raw(at as u64 + 1),
                        ItemData::new(format!("item {at}"), at).disabled(*disabled),
                    )
                })
                .collect()
        }

        proptest! {
            #[test]
            fn all_disabled_never_activates(
                len in 0usize..12,
                ops in proptest::collection::vec(0u8..4, 1..16)
            ) {
                let items = build(&vec![true; len]);
                let mut state = ActiveIndexState::default();
                for op in ops {
                    let command = match op {
                        0 => NavCommand::First,
                        1 => NavCommand::Last,
                        2 => NavCommand::Next,
                        _ => NavCommand::Previous,
                    };
                    state = run(&state, command, &items);
                    prop_assert_eq!(state.active, None);
                }
                for direction in [OpenDirection::First, OpenDirection::Last] {
                    prop_assert_eq!(default_active(&items, None, direction, |a, b| a == b), None);
                }
            }

            #[test]
            fn next_is_terminal_at_last_eligible(flags in disabled_flags()) {
                let items = build(&flags);
                let mut state = run(&ActiveIndexState::default(), NavCommand::First, &items);
                for _ in 0..=items.len() {
                    state = run(&state, NavCommand::Next, &items);
                }
                prop_assert_eq!(state.active, last_eligible(&items));
                prop_assert_eq!(run(&state, NavCommand::Next, &items).active, state.active);
            }

            #[test]
            fn previous_is_terminal_at_first_eligible(flags in disabled_flags()) {
                let items = build(&flags);
                let mut state = run(&ActiveIndexState::default(), NavCommand::Last, &items);
                for _ in 0..=items.len() {
                    state = run(&state, NavCommand::Previous, &items);
                }
                prop_assert_eq!(state.active, first_eligible(&items));
            }

            #[test]
            fn active_is_always_eligible(
                flags in disabled_flags(),
                ops in proptest::collection::vec(0u8..6, 1..24)
            ) {
                let items = build(&flags);
                let mut state = ActiveIndexState::default();
                for (step, op) in ops.into_iter().enumerate() {
                    let command = match op {
                        0 => NavCommand::First,
                        1 => NavCommand::Last,
                        2 => NavCommand::Next,
                        3 => NavCommand::Previous,
                        4 => NavCommand::Specific(ItemId::from_raw(step as u64 % 13)),
                        _ => NavCommand::Leave(ItemId::from_raw(step as u64 % 13)),
                    };
                    state = run(&state, command, &items);
                    if let Some(active) = state.active {
                        let item = items.iter().find(|item| item.id() == active);
                        prop_assert!(item.is_some_and(|item| item.is_eligible()));
                    }
                }
            }

            #[test]
            fn removal_never_dangles(
                flags in disabled_flags(),
                pick in any::<prop::sample::Index>()
            ) {
                let mut items = build(&flags);
                prop_assume!(!items.is_empty());
                let at = pick.index(items.len());
                let removed = items.remove(at);
                let active = revalidate_after_removal(Some(removed.id()), removed.id(), at, &items);
                match active {
                    Some(id) => {
                        prop_assert_ne!(id, removed.id());
                        let eligible = items
                            .iter()
                            .any(|item| item.id() == id && item.is_eligible());
                        prop_assert!(eligible);
                    }
                    None => prop_assert!(items.iter().all(|item| !item.is_eligible())),
                }
            }
        }
    }
}
