//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod permission_query;
mod user_record_source;

#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use permission_query::MockPermissionQuery;
pub use permission_query::{PermissionQuery, StaticPermissionQuery};
#[cfg(test)]
pub use user_record_source::MockUserRecordSource;
pub use user_record_source::{FixtureUserRecordSource, UserRecordSource, UserRecordSourceError};

/// Operator id issued to the fixture `admin` account.
pub const FIXTURE_ADMIN_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
/// Operator id issued to the fixture `guest` account.
pub const FIXTURE_GUEST_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
