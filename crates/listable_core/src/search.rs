//! Typeahead search buffer
//!
//! Typed characters accumulate into a lower-cased query so a user can type
//! more of a word to disambiguate. A single-shot idle timer is re-armed on
//! every keystroke; once it lapses, the next keystroke starts a fresh query
//! instead of appending.
//!
//! The timer is modeled as a deadline rather than a scheduled callback. The
//! host either lets the next keystroke observe the lapsed deadline or drives
//! [`SearchBuffer::expire`] from its own timer tick. Either way there is at
//! most one pending deadline per buffer.

use std::time::{Duration, Instant};

/// Default idle interval after which the query resets
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_millis(350);

/// Accumulated typeahead query plus its idle deadline
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchBuffer {
    query: String,
    deadline: Option<Instant>,
}

impl SearchBuffer {
    /// Create an empty buffer with no pending timer
    pub fn new() -> Self {
        Self::default()
    }

    /// The current query
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// When the pending idle timer fires, if one is armed
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Append a keystroke at `now`, re-arming the idle timer
    ///
    /// If the previous deadline has already passed the query restarts from
    /// this character.
    pub fn push(&mut self, ch: char, now: Instant, timeout: Duration) {
        if self.is_expired(now) {
            self.query.clear();
        }
        self.query.extend(ch.to_lowercase());
        self.deadline = Some(now + timeout);
    }

    /// Fire the idle timer if it is due; returns whether the query was reset
    pub fn expire(&mut self, now: Instant) -> bool {
        if !self.is_expired(now) {
            return false;
        }
        self.query.clear();
        self.deadline = None;
        true
    }

    /// Cancel the pending idle timer and drop the query
    ///
    /// Returns whether a timer was armed. Closing a widget goes through here
    /// so no deadline outlives the session that armed it.
    pub fn cancel(&mut self) -> bool {
        self.query.clear();
        self.deadline.take().is_some()
    }

    /// Clear the query and disarm the timer
    pub fn clear(&mut self) {
        self.query.clear();
        self.deadline = None;
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}
