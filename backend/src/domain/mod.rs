//! Domain types and services for the user console.
//!
//! Purpose: keep the page's behaviour independent of HTTP and of the
//! upstream user service. Adapters live in `inbound` and `outbound`; the
//! traits they implement live in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - RecordKey / UserRecord: route identifier and the displayed record.
//! - RecordSubscription / RecordCache: per-page fetch state and the shared
//!   deduplicating fetch layer.
//! - GuardChain and friends: access checks run before rendering.
//! - UserDetailService / render_user_detail: page assembly.

pub mod access;
pub mod auth;
pub mod error;
pub mod ports;
pub mod record_cache;
pub mod record_key;
pub mod record_subscription;
pub mod trace_id;
pub mod user;
pub mod user_detail;
pub mod user_detail_view;
pub mod user_record;

pub use self::access::{
    AccessGuard, AccessOperation, AccessService, Caller, GuardChain, GuardOutcome, Permission,
    PermissionSet, RequireAuthentication, RequirePermission,
};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::record_cache::{CacheEntryState, RecordCache};
pub use self::record_key::{RECORD_KEY_MAX, RecordKey};
pub use self::record_subscription::{
    FetchOutcome, FetchSnapshot, FetchStatus, FetchTicket, RecordSubscription,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserIdValidationError};
pub use self::user_detail::{
    DEFAULT_RENDER_WAIT, SIGN_IN_LOCATION, UserDetailService, user_detail_gate,
};
pub use self::user_detail_view::{
    Breadcrumb, DetailBody, DetailField, DetailPanel, UserDetailPage, render_user_detail,
};
pub use self::user_record::UserRecord;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use user_console::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
