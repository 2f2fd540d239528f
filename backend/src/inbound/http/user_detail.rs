//! User detail page.
//!
//! ```text
//! GET /users/view/{id}
//! GET /users/view
//! ```
//!
//! When the record has not arrived within the render wait, the loading page
//! is returned with a `Refresh` header; the fetch keeps running in the
//! shared cache and the next poll picks up its result.

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};

use crate::domain::UserDetailPage;
use crate::inbound::http::ApiResult;
use crate::inbound::http::access_gate::{enforce, resolve_caller};
use crate::inbound::http::html::render_user_detail_page;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Seconds the browser waits before polling a pending page again.
pub const REFRESH_SECONDS: u32 = 1;

/// Show one user record.
#[utoipa::path(
    get,
    path = "/users/view/{id}",
    params(("id" = String, Path, description = "Identifier of the user to show")),
    responses(
        (status = 200, description = "Detail page, loading page, or error banner", content_type = "text/html"),
        (status = 302, description = "Not signed in; redirected to /"),
        (status = 403, description = "Missing project:user:read", content_type = "text/html")
    ),
    tags = ["pages"],
    operation_id = "viewUser"
)]
#[get("/users/view/{id}")]
pub async fn view_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    render(&state, &session, Some(path.as_str())).await
}

/// Detail page reached without an identifier: chrome only, no fetch.
#[get("/users/view")]
pub async fn view_user_without_id(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    render(&state, &session, None).await
}

async fn render(
    state: &HttpState,
    session: &SessionContext,
    raw_id: Option<&str>,
) -> ApiResult<HttpResponse> {
    let caller = resolve_caller(session, state.permissions.as_ref()).await?;
    if let Some(response) = enforce(&state.user_detail_gate, &caller) {
        return Ok(response);
    }
    let page = state.user_detail.load(raw_id).await;
    Ok(page_response(&page))
}

fn page_response(page: &UserDetailPage) -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    builder
        .content_type("text/html; charset=utf-8")
        .insert_header((header::CACHE_CONTROL, "no-store"));
    if page.is_loading() {
        builder.insert_header(("Refresh", REFRESH_SECONDS.to_string()));
    }
    builder.body(render_user_detail_page(page))
}
