//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! domain ports and services, and stay testable without network I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, PermissionQuery};
use crate::domain::{GuardChain, UserDetailService, user_detail_gate};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub permissions: Arc<dyn PermissionQuery>,
    pub user_detail: UserDetailService,
    pub user_detail_gate: Arc<GuardChain>,
}

impl HttpState {
    /// Bundle the ports with the default detail-page guards.
    pub fn new(
        login: Arc<dyn LoginService>,
        permissions: Arc<dyn PermissionQuery>,
        user_detail: UserDetailService,
    ) -> Self {
        Self {
            login,
            permissions,
            user_detail,
            user_detail_gate: Arc::new(user_detail_gate()),
        }
    }
}
