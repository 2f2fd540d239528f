//! Driving port authenticating console operators.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

use super::{FIXTURE_ADMIN_ID, FIXTURE_GUEST_ID};

/// Port validating credentials and returning the operator id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Authenticate `credentials`, failing with `unauthorized` on mismatch.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Development authenticator with two built-in accounts.
///
/// `admin` / `password` holds the user read grant; `guest` / `password` is
/// signed in but holds no grants.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let id = match (credentials.username(), credentials.password()) {
            ("admin", "password") => FIXTURE_ADMIN_ID,
            ("guest", "password") => FIXTURE_GUEST_ID,
            _ => return Err(Error::unauthorized("invalid credentials")),
        };
        UserId::new(id).map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
    }
}
