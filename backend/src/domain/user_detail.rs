//! Domain service behind the user detail page.
//!
//! Each page load owns a [`RecordSubscription`] keyed by the route id. The
//! subscription issues at most one ticket, the ticket is served from the
//! shared [`RecordCache`], and whatever has settled within `render_wait`
//! is rendered.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::ports::UserRecordSourceError;
use crate::domain::{
    AccessOperation, AccessService, GuardChain, RecordCache, RecordKey, RecordSubscription,
    RequireAuthentication, RequirePermission, UserDetailPage, UserRecord, render_user_detail,
};

/// Default time a request waits for the record before rendering the
/// loading state.
pub const DEFAULT_RENDER_WAIT: Duration = Duration::from_millis(1500);

/// Where unauthenticated callers are sent.
pub const SIGN_IN_LOCATION: &str = "/";

/// Guards protecting the detail page: sign-in first, then the
/// `project:user:read` grant.
pub fn user_detail_gate() -> GuardChain {
    GuardChain::new()
        .with(RequireAuthentication::redirect_to(SIGN_IN_LOCATION))
        .with(RequirePermission::new(
            AccessService::Project,
            "user",
            AccessOperation::Read,
        ))
}

/// Loads and renders user detail pages.
#[derive(Clone)]
pub struct UserDetailService {
    cache: Arc<RecordCache>,
    render_wait: Duration,
}

impl UserDetailService {
    /// Service rendering from `cache`, waiting at most `render_wait`.
    pub fn new(cache: Arc<RecordCache>, render_wait: Duration) -> Self {
        Self { cache, render_wait }
    }

    /// Build the page for the raw route segment.
    ///
    /// A missing or malformed segment issues no fetch and renders only the
    /// page chrome.
    pub async fn load(&self, raw_id: Option<&str>) -> UserDetailPage {
        let mut subscription: RecordSubscription<UserRecord, UserRecordSourceError> =
            RecordSubscription::new();
        let Some(ticket) = subscription.set_key(RecordKey::from_route(raw_id)) else {
            debug!(raw_id, "no usable user id; skipping fetch");
            return render_user_detail(&subscription.snapshot());
        };

        let rx = self.cache.request(ticket.key());
        let state = RecordCache::wait_settled(rx, self.render_wait).await;
        if state.is_settled() {
            subscription.settle(&ticket, state.into_outcome());
        } else {
            subscription.note_error(&ticket, state.error);
        }
        render_user_detail(&subscription.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::domain::ports::{FixtureUserRecordSource, MockUserRecordSource, UserRecordSource};
    use crate::domain::{Caller, DetailBody, GuardOutcome, PermissionSet, UserId};
    use rstest::rstest;

    fn service(source: impl UserRecordSource + 'static) -> UserDetailService {
        UserDetailService::new(
            Arc::new(RecordCache::new(Arc::new(source))),
            Duration::from_secs(1),
        )
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("a/b"))]
    #[tokio::test]
    async fn unusable_ids_never_reach_the_source(#[case] raw: Option<&str>) {
        let mut source = MockUserRecordSource::new();
        source.expect_get_user_by_id().never();
        let page = service(source).load(raw).await;
        assert_eq!(page.body, DetailBody::Empty);
        assert!(page.error.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn known_record_renders_panel() {
        let page = service(FixtureUserRecordSource::default())
            .load(Some("1"))
            .await;
        let DetailBody::Panel(panel) = page.body else {
            panic!("expected panel");
        };
        assert_eq!(panel.fields.first().map(|f| f.text.as_str()), Some("ada@example.com"));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_record_renders_error_banner() {
        let page = service(FixtureUserRecordSource::empty())
            .load(Some("9"))
            .await;
        assert_eq!(page.body, DetailBody::Empty);
        assert_eq!(page.error.as_deref(), Some("user 9 was not found"));
    }

    #[rstest]
    #[tokio::test]
    async fn each_load_issues_at_most_one_fetch() {
        let mut source = MockUserRecordSource::new();
        source
            .expect_get_user_by_id()
            .times(1)
            .returning(|_| Ok(UserRecord::default()));
        let service = service(source);
        service.load(Some("5")).await;
        service.load(Some("5")).await;
    }

    /// Fails the first call; every later call never answers.
    struct FailThenStall {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl UserRecordSource for FailThenStall {
        async fn get_user_by_id(
            &self,
            _key: &RecordKey,
        ) -> Result<UserRecord, UserRecordSourceError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(UserRecordSourceError::transport("down"));
            }
            std::future::pending().await
        }
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn retry_in_flight_shows_spinner_and_previous_error() {
        let source = FailThenStall {
            calls: AtomicUsize::new(0),
        };
        let cache = RecordCache::with_settings(
            Arc::new(source),
            Duration::from_millis(10),
            crate::domain::record_cache::DEFAULT_CAPACITY,
        );
        let service = UserDetailService::new(Arc::new(cache), Duration::from_millis(50));

        let first = service.load(Some("1")).await;
        assert_eq!(first.body, DetailBody::Empty);
        tokio::time::sleep(Duration::from_millis(20)).await;

        let second = service.load(Some("1")).await;
        assert_eq!(second.body, DetailBody::Loading);
        assert_eq!(
            second.error.as_deref(),
            Some("user service request failed: down")
        );
    }

    #[rstest]
    fn gate_redirects_then_denies() {
        let gate = user_detail_gate();
        assert_eq!(
            gate.evaluate(&Caller::anonymous()),
            GuardOutcome::Redirect {
                location: SIGN_IN_LOCATION.to_owned()
            }
        );
        let id = UserId::new("123e4567-e89b-12d3-a456-426614174000").expect("valid id");
        let outcome = gate.evaluate(&Caller::authenticated(id, PermissionSet::default()));
        assert!(matches!(outcome, GuardOutcome::Deny { .. }));
    }
}
