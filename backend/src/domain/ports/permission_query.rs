//! Driving port resolving the grants held by a signed-in operator.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{AccessOperation, AccessService, Error, Permission, PermissionSet, UserId};

use super::{FIXTURE_ADMIN_ID, FIXTURE_GUEST_ID};

/// Port for loading an operator's permissions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionQuery: Send + Sync {
    /// Return every grant held by `user_id`; unknown operators hold none.
    async fn permissions_for(&self, user_id: &UserId) -> Result<PermissionSet, Error>;
}

/// Static grants keyed by operator id.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissionQuery {
    grants: HashMap<String, Vec<Permission>>,
}

impl StaticPermissionQuery {
    /// Add `permission` to the grants held by `user_id`.
    #[must_use]
    pub fn grant(mut self, user_id: &UserId, permission: Permission) -> Self {
        self.grants
            .entry(user_id.as_str().to_owned())
            .or_default()
            .push(permission);
        self
    }

    /// Fixture grants: the admin may read users, the guest holds nothing.
    pub fn fixture() -> Result<Self, Error> {
        let admin = UserId::new(FIXTURE_ADMIN_ID)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
        let guest = UserId::new(FIXTURE_GUEST_ID)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
        let mut query = Self::default().grant(
            &admin,
            Permission::new(AccessService::Project, "user", AccessOperation::Read),
        );
        query.grants.entry(guest.as_str().to_owned()).or_default();
        Ok(query)
    }
}

#[async_trait]
impl PermissionQuery for StaticPermissionQuery {
    async fn permissions_for(&self, user_id: &UserId) -> Result<PermissionSet, Error> {
        Ok(self
            .grants
            .get(user_id.as_str())
            .map(|grants| grants.iter().cloned().collect())
            .unwrap_or_default())
    }
}
