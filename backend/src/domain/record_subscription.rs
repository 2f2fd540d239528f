//! Fetch status owned by one page instance.
//!
//! [`RecordSubscription`] is the explicit state machine behind the detail
//! page. It is keyed by the route identifier:
//!
//! ```text
//! NotStarted --set_key(Some)--> Pending --settle--> Resolved
//!     ^                            |                   |
//!     +-------set_key(None)--------+-------------------+
//! ```
//!
//! Every key change bumps a generation counter. Outcomes are applied only
//! when their [`FetchTicket`] carries the current generation, so a late reply
//! for a previous identifier can never overwrite the current one.

use crate::domain::RecordKey;

/// Proof that a fetch was requested for a specific key generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: RecordKey,
    generation: u64,
}

impl FetchTicket {
    /// Identifier the fetch must load.
    pub fn key(&self) -> &RecordKey {
        &self.key
    }
}

/// Coarse lifecycle of the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// No identifier, so nothing has been requested.
    NotStarted,
    /// A fetch was requested and has not answered yet.
    Pending,
    /// The fetch answered with data, an error, or both.
    Resolved,
}

/// What the fetch layer reported for a ticket.
///
/// Data and error may both be present when a revalidation of previously
/// loaded data failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome<T, E> {
    /// Loaded record, if any.
    pub data: Option<T>,
    /// Latest failure, if any.
    pub error: Option<E>,
}

impl<T, E> FetchOutcome<T, E> {
    /// Outcome of a successful fetch.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Outcome of a failed fetch with nothing previously loaded.
    pub fn failure(error: E) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }
}

/// Read-only view handed to the renderer.
#[derive(Debug, PartialEq, Eq)]
pub struct FetchSnapshot<'a, T, E> {
    /// Loaded record, if any.
    pub data: Option<&'a T>,
    /// Latest failure, if any.
    pub error: Option<&'a E>,
    /// True only while pending with no data to show.
    pub is_loading: bool,
}

/// Keyed fetch state machine for a single page instance.
///
/// # Examples
/// ```
/// use user_console::domain::{FetchOutcome, RecordKey, RecordSubscription};
///
/// let mut page = RecordSubscription::<&str, String>::new();
/// let ticket = page
///     .set_key(RecordKey::from_route(Some("7")))
///     .expect("a new key issues a fetch");
/// assert!(page.snapshot().is_loading);
///
/// assert!(page.settle(&ticket, FetchOutcome::success("record 7")));
/// assert_eq!(page.snapshot().data, Some(&"record 7"));
/// ```
#[derive(Debug)]
pub struct RecordSubscription<T, E> {
    key: Option<RecordKey>,
    generation: u64,
    status: FetchStatus,
    data: Option<T>,
    error: Option<E>,
}

impl<T, E> Default for RecordSubscription<T, E> {
    fn default() -> Self {
        Self {
            key: None,
            generation: 0,
            status: FetchStatus::NotStarted,
            data: None,
            error: None,
        }
    }
}

impl<T, E> RecordSubscription<T, E> {
    /// Fresh subscription with no identifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the subscription at `key`.
    ///
    /// Returns a ticket only when `key` is present and differs from the
    /// current one; the caller must issue exactly one fetch per ticket.
    /// Re-applying the current key is a no-op.
    pub fn set_key(&mut self, key: Option<RecordKey>) -> Option<FetchTicket> {
        if key == self.key {
            return None;
        }
        self.generation += 1;
        self.key = key.clone();
        self.data = None;
        self.error = None;
        match key {
            Some(key) => {
                self.status = FetchStatus::Pending;
                Some(FetchTicket {
                    key,
                    generation: self.generation,
                })
            }
            None => {
                self.status = FetchStatus::NotStarted;
                None
            }
        }
    }

    /// Apply `outcome` if `ticket` is still current.
    ///
    /// Returns `false` and leaves the state untouched for stale tickets.
    pub fn settle(&mut self, ticket: &FetchTicket, outcome: FetchOutcome<T, E>) -> bool {
        if ticket.generation != self.generation || self.key.as_ref() != Some(&ticket.key) {
            tracing::debug!(key = %ticket.key, "discarding stale fetch outcome");
            return false;
        }
        self.status = FetchStatus::Resolved;
        self.data = outcome.data;
        self.error = outcome.error;
        true
    }

    /// Record the last failure for `ticket` while its retry is still in
    /// flight. The status stays [`FetchStatus::Pending`].
    ///
    /// Returns `false` for stale tickets or once the ticket has resolved.
    pub fn note_error(&mut self, ticket: &FetchTicket, error: Option<E>) -> bool {
        if ticket.generation != self.generation || self.status != FetchStatus::Pending {
            return false;
        }
        self.error = error;
        true
    }

    /// Current identifier.
    pub fn key(&self) -> Option<&RecordKey> {
        self.key.as_ref()
    }

    /// Current lifecycle stage.
    pub fn status(&self) -> FetchStatus {
        self.status
    }

    /// Borrow the state for rendering.
    pub fn snapshot(&self) -> FetchSnapshot<'_, T, E> {
        FetchSnapshot {
            data: self.data.as_ref(),
            error: self.error.as_ref(),
            is_loading: self.status == FetchStatus::Pending && self.data.is_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    type Subscription = RecordSubscription<String, String>;

    fn key(raw: &str) -> Option<RecordKey> {
        RecordKey::from_route(Some(raw))
    }

    #[fixture]
    fn subscription() -> Subscription {
        Subscription::new()
    }

    #[rstest]
    fn absent_key_issues_no_fetch(mut subscription: Subscription) {
        assert!(subscription.set_key(None).is_none());
        assert_eq!(subscription.status(), FetchStatus::NotStarted);
        let snapshot = subscription.snapshot();
        assert!(!snapshot.is_loading);
        assert!(snapshot.data.is_none());
        assert!(snapshot.error.is_none());
    }

    #[rstest]
    fn present_key_is_pending_until_settled(mut subscription: Subscription) {
        let ticket = subscription.set_key(key("1")).expect("ticket");
        assert_eq!(ticket.key().as_ref(), "1");
        assert_eq!(subscription.status(), FetchStatus::Pending);
        assert!(subscription.snapshot().is_loading);
    }

    #[rstest]
    fn same_key_is_requested_once(mut subscription: Subscription) {
        assert!(subscription.set_key(key("1")).is_some());
        assert!(subscription.set_key(key("1")).is_none());
    }

    #[rstest]
    fn failure_exposes_error_without_data(mut subscription: Subscription) {
        let ticket = subscription.set_key(key("1")).expect("ticket");
        assert!(subscription.settle(&ticket, FetchOutcome::failure("boom".to_owned())));
        let snapshot = subscription.snapshot();
        assert!(!snapshot.is_loading);
        assert!(snapshot.data.is_none());
        assert_eq!(snapshot.error.map(String::as_str), Some("boom"));
    }

    #[rstest]
    fn failed_revalidation_keeps_data_and_error(mut subscription: Subscription) {
        let ticket = subscription.set_key(key("1")).expect("ticket");
        let outcome = FetchOutcome {
            data: Some("stale".to_owned()),
            error: Some("boom".to_owned()),
        };
        assert!(subscription.settle(&ticket, outcome));
        let snapshot = subscription.snapshot();
        assert_eq!(snapshot.data.map(String::as_str), Some("stale"));
        assert_eq!(snapshot.error.map(String::as_str), Some("boom"));
    }

    #[rstest]
    fn key_change_issues_one_new_fetch_and_discards_old_result(mut subscription: Subscription) {
        let first = subscription.set_key(key("1")).expect("first ticket");
        let second = subscription.set_key(key("2")).expect("second ticket");
        assert!(subscription.set_key(key("2")).is_none());

        assert!(!subscription.settle(&first, FetchOutcome::success("one".to_owned())));
        assert!(subscription.snapshot().is_loading);

        assert!(subscription.settle(&second, FetchOutcome::success("two".to_owned())));
        assert_eq!(subscription.snapshot().data.map(String::as_str), Some("two"));
    }

    #[rstest]
    fn returning_to_a_previous_key_refetches(mut subscription: Subscription) {
        let first = subscription.set_key(key("1")).expect("first ticket");
        subscription.set_key(key("2"));
        let again = subscription.set_key(key("1")).expect("fresh ticket");
        assert_ne!(first, again);
        assert!(!subscription.settle(&first, FetchOutcome::success("old".to_owned())));
        assert!(subscription.settle(&again, FetchOutcome::success("new".to_owned())));
    }

    #[rstest]
    fn retry_in_flight_keeps_the_previous_error(mut subscription: Subscription) {
        let ticket = subscription.set_key(key("1")).expect("ticket");
        assert!(subscription.note_error(&ticket, Some("down".to_owned())));
        assert_eq!(subscription.status(), FetchStatus::Pending);
        let snapshot = subscription.snapshot();
        assert!(snapshot.is_loading);
        assert_eq!(snapshot.error.map(String::as_str), Some("down"));

        subscription.settle(&ticket, FetchOutcome::success("up".to_owned()));
        assert!(!subscription.note_error(&ticket, Some("late".to_owned())));
        assert!(subscription.snapshot().error.is_none());
    }

    #[rstest]
    fn stale_ticket_cannot_note_an_error(mut subscription: Subscription) {
        let first = subscription.set_key(key("1")).expect("first ticket");
        subscription.set_key(key("2"));
        assert!(!subscription.note_error(&first, Some("down".to_owned())));
        assert!(subscription.snapshot().error.is_none());
    }

    #[rstest]
    fn clearing_the_key_resets_state(mut subscription: Subscription) {
        let ticket = subscription.set_key(key("1")).expect("ticket");
        subscription.settle(&ticket, FetchOutcome::success("one".to_owned()));
        assert!(subscription.set_key(None).is_none());
        assert_eq!(subscription.status(), FetchStatus::NotStarted);
        assert!(subscription.snapshot().data.is_none());
        assert!(!subscription.settle(&ticket, FetchOutcome::success("late".to_owned())));
    }
}
