//! Access gate: ordered guard predicates evaluated before a page renders.
//!
//! A [`GuardChain`] runs its guards in insertion order and stops at the first
//! outcome other than [`GuardOutcome::Proceed`]. Guards only see the resolved
//! [`Caller`]; they never observe the view's own state.

use std::collections::HashSet;
use std::fmt;

use crate::domain::UserId;

/// Access scope a permission is granted within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessService {
    /// Grants scoped to the current project.
    Project,
}

/// Operation a permission allows on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessOperation {
    /// Read existing entities.
    Read,
}

impl AccessService {
    fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
        }
    }
}

impl AccessOperation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
        }
    }
}

/// A single grant: `operation` on `entity` within `service`.
///
/// # Examples
/// ```
/// use user_console::domain::{AccessOperation, AccessService, Permission};
///
/// let read_users = Permission::new(AccessService::Project, "user", AccessOperation::Read);
/// assert_eq!(read_users.to_string(), "project:user:read");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission {
    service: AccessService,
    entity: String,
    operation: AccessOperation,
}

impl Permission {
    /// Build a grant.
    pub fn new(service: AccessService, entity: impl Into<String>, operation: AccessOperation) -> Self {
        Self {
            service,
            entity: entity.into(),
            operation,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.service.as_str(),
            self.entity,
            self.operation.as_str()
        )
    }
}

/// Grants held by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(HashSet<Permission>);

impl PermissionSet {
    /// Whether `permission` is held.
    pub fn grants(&self, permission: &Permission) -> bool {
        self.0.contains(permission)
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Identity and grants of whoever issued the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    user_id: Option<UserId>,
    permissions: PermissionSet,
}

impl Caller {
    /// Caller without a session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Signed-in caller holding `permissions`.
    pub fn authenticated(user_id: UserId, permissions: PermissionSet) -> Self {
        Self {
            user_id: Some(user_id),
            permissions,
        }
    }

    /// Signed-in identity, if any.
    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// Grants held by the caller.
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }
}

/// Result of evaluating one guard or a whole chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Continue to the next guard, or render when none remain.
    Proceed,
    /// Stop and send the caller elsewhere.
    Redirect {
        /// Target location.
        location: String,
    },
    /// Stop without rendering anything of the guarded view.
    Deny {
        /// Operator-facing reason.
        reason: String,
    },
}

/// A predicate able to short-circuit rendering.
pub trait AccessGuard: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Decide whether `caller` may continue.
    fn check(&self, caller: &Caller) -> GuardOutcome;
}

/// Redirects callers without a session.
#[derive(Debug, Clone)]
pub struct RequireAuthentication {
    redirect_to: String,
}

impl RequireAuthentication {
    /// Redirect unauthenticated callers to `redirect_to`.
    pub fn redirect_to(redirect_to: impl Into<String>) -> Self {
        Self {
            redirect_to: redirect_to.into(),
        }
    }
}

impl AccessGuard for RequireAuthentication {
    fn name(&self) -> &'static str {
        "authentication"
    }

    fn check(&self, caller: &Caller) -> GuardOutcome {
        match caller.user_id() {
            Some(_) => GuardOutcome::Proceed,
            None => GuardOutcome::Redirect {
                location: self.redirect_to.clone(),
            },
        }
    }
}

/// Denies callers that do not hold one specific grant.
#[derive(Debug, Clone)]
pub struct RequirePermission {
    permission: Permission,
}

impl RequirePermission {
    /// Require `operation` on `entity` within `service`.
    pub fn new(service: AccessService, entity: impl Into<String>, operation: AccessOperation) -> Self {
        Self {
            permission: Permission::new(service, entity, operation),
        }
    }
}

impl AccessGuard for RequirePermission {
    fn name(&self) -> &'static str {
        "authorization"
    }

    fn check(&self, caller: &Caller) -> GuardOutcome {
        if caller.permissions().grants(&self.permission) {
            GuardOutcome::Proceed
        } else {
            GuardOutcome::Deny {
                reason: format!("missing permission {}", self.permission),
            }
        }
    }
}

/// Ordered composition of guards.
///
/// # Examples
/// ```
/// use user_console::domain::{
///     AccessOperation, AccessService, Caller, GuardChain, GuardOutcome, RequireAuthentication,
///     RequirePermission,
/// };
///
/// let gate = GuardChain::new()
///     .with(RequireAuthentication::redirect_to("/"))
///     .with(RequirePermission::new(AccessService::Project, "user", AccessOperation::Read));
///
/// assert_eq!(
///     gate.evaluate(&Caller::anonymous()),
///     GuardOutcome::Redirect { location: "/".to_owned() }
/// );
/// ```
#[derive(Default)]
pub struct GuardChain {
    guards: Vec<Box<dyn AccessGuard>>,
}

impl GuardChain {
    /// Chain that lets every caller through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `guard`; it runs after every guard already present.
    #[must_use]
    pub fn with(mut self, guard: impl AccessGuard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    /// Evaluate guards in order; the first non-`Proceed` outcome wins.
    pub fn evaluate(&self, caller: &Caller) -> GuardOutcome {
        for guard in &self.guards {
            let outcome = guard.check(caller);
            if outcome != GuardOutcome::Proceed {
                tracing::debug!(guard = guard.name(), ?outcome, "access gate stopped request");
                return outcome;
            }
        }
        GuardOutcome::Proceed
    }
}

impl fmt::Debug for GuardChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.guards.iter().map(|guard| guard.name()))
            .finish()
    }
}
