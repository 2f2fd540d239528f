//! Test helpers for inbound HTTP components.

use std::sync::Arc;
use std::time::Duration;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use super::state::HttpState;
use crate::domain::ports::{
    FixtureLoginService, FixtureUserRecordSource, StaticPermissionQuery, UserRecordSource,
};
use crate::domain::{RecordCache, UserDetailService};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Session cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// State wired to the fixture accounts and the given record source.
pub fn fixture_state(source: impl UserRecordSource + 'static, render_wait: Duration) -> HttpState {
    let cache = Arc::new(RecordCache::new(Arc::new(source)));
    HttpState::new(
        Arc::new(FixtureLoginService),
        Arc::new(StaticPermissionQuery::fixture().expect("fixture grants")),
        UserDetailService::new(cache, render_wait),
    )
}

/// State serving the seeded fixture records.
pub fn default_fixture_state() -> HttpState {
    fixture_state(FixtureUserRecordSource::default(), Duration::from_secs(1))
}
