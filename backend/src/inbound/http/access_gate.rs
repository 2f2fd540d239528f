//! Access gate applied before rendering console pages.
//!
//! The caller is resolved from the session cookie and the permission port,
//! then the page's [`GuardChain`] decides. Redirects become `302 Found`;
//! denials become a `403` HTML page that contains nothing of the guarded
//! view.

use actix_web::HttpResponse;
use actix_web::http::header;
use tracing::info;

use crate::domain::ports::PermissionQuery;
use crate::domain::{Caller, Error, GuardChain, GuardOutcome};
use crate::inbound::http::html::render_denied_page;
use crate::inbound::http::session::SessionContext;

/// Identify the caller behind `session`.
pub async fn resolve_caller(
    session: &SessionContext,
    permissions: &dyn PermissionQuery,
) -> Result<Caller, Error> {
    match session.user_id()? {
        Some(user_id) => {
            let grants = permissions.permissions_for(&user_id).await?;
            Ok(Caller::authenticated(user_id, grants))
        }
        None => Ok(Caller::anonymous()),
    }
}

/// Evaluate `gate` for `caller`, returning the short-circuit response when
/// rendering must not proceed.
pub fn enforce(gate: &GuardChain, caller: &Caller) -> Option<HttpResponse> {
    match gate.evaluate(caller) {
        GuardOutcome::Proceed => None,
        GuardOutcome::Redirect { location } => {
            info!(%location, "redirecting unauthenticated caller");
            Some(
                HttpResponse::Found()
                    .insert_header((header::LOCATION, location))
                    .insert_header((header::CACHE_CONTROL, "no-store"))
                    .finish(),
            )
        }
        GuardOutcome::Deny { reason } => {
            info!(
                user_id = caller.user_id().map(ToString::to_string).as_deref(),
                %reason,
                "denying access"
            );
            Some(
                HttpResponse::Forbidden()
                    .content_type("text/html; charset=utf-8")
                    .insert_header((header::CACHE_CONTROL, "no-store"))
                    .body(render_denied_page(&reason)),
            )
        }
    }
}
