//! Behaviour tests for the user detail page served through the full
//! middleware stack: trace ids, cookie sessions, login and the access gate.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::sync::Arc;
use std::time::Duration;

use actix_rt::SystemRunner;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;

use user_console::Trace;
use user_console::domain::ports::{
    FixtureLoginService, FixtureUserRecordSource, StaticPermissionQuery,
};
use user_console::domain::{RecordCache, TRACE_ID_HEADER, UserDetailService};
use user_console::inbound::http::state::HttpState;
use user_console::inbound::http::user_detail::{view_user, view_user_without_id};
use user_console::inbound::http::users::{login, logout};

/// What a visitor observed after one request.
struct Visit {
    status: StatusCode,
    location: Option<String>,
    trace_id: Option<String>,
    session: Option<Cookie<'static>>,
    body: String,
}

/// Console state shared by every request in a scenario.
///
/// Each request builds a fresh app around the same state and session key,
/// so cookies issued by one step are honoured by the next.
struct PageWorld {
    runner: SystemRunner,
    state: web::Data<HttpState>,
    key: Key,
    session: Option<Cookie<'static>>,
    last: Option<Visit>,
}

#[fixture]
fn world() -> PageWorld {
    let cache = Arc::new(RecordCache::new(Arc::new(FixtureUserRecordSource::default())));
    let state = HttpState::new(
        Arc::new(FixtureLoginService),
        Arc::new(StaticPermissionQuery::fixture().expect("fixture grants")),
        UserDetailService::new(cache, Duration::from_secs(1)),
    );
    PageWorld {
        runner: actix_rt::System::new(),
        state: web::Data::new(state),
        key: Key::generate(),
        session: None,
        last: None,
    }
}

fn console_app(
    state: web::Data<HttpState>,
    key: Key,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new().app_data(state).wrap(Trace).service(
        web::scope("")
            .wrap(session)
            .service(web::scope("/api/v1").service(login).service(logout))
            .service(view_user)
            .service(view_user_without_id),
    )
}

async fn record_visit<B: MessageBody>(res: ServiceResponse<B>) -> Visit {
    let header_text = |name: &str| {
        res.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    let status = res.status();
    let location = header_text(header::LOCATION.as_str());
    let trace_id = header_text(TRACE_ID_HEADER);
    let session = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned);
    let bytes = actix_test::read_body(res).await;
    Visit {
        status,
        location,
        trace_id,
        session,
        body: String::from_utf8(bytes.to_vec()).expect("utf8 body"),
    }
}

/// Send `request` with the current session cookie and remember the result.
fn dispatch(world: &mut PageWorld, request: actix_test::TestRequest) {
    let request = match world.session.clone() {
        Some(cookie) => request.cookie(cookie),
        None => request,
    };
    let state = world.state.clone();
    let key = world.key.clone();
    let visit = world.runner.block_on(async move {
        let app = actix_test::init_service(console_app(state, key)).await;
        record_visit(actix_test::call_service(&app, request.to_request()).await).await
    });
    if let Some(cookie) = &visit.session {
        world.session = Some(cookie.clone());
    }
    world.last = Some(visit);
}

fn sign_in(world: &mut PageWorld, username: &str) {
    dispatch(
        world,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": username, "password": "password" })),
    );
    assert_eq!(world.last.as_ref().map(|visit| visit.status), Some(StatusCode::OK));
    assert!(world.session.is_some(), "login issues a session cookie");
}

fn open(world: &mut PageWorld, path: &str) {
    dispatch(world, actix_test::TestRequest::get().uri(path));
}

fn last_visit(world: &PageWorld) -> &Visit {
    world.last.as_ref().expect("a request was made")
}

#[given("an operator signed in as admin")]
fn an_operator_signed_in_as_admin(world: &mut PageWorld) {
    sign_in(world, "admin");
}

#[given("an operator signed in as guest")]
fn an_operator_signed_in_as_guest(world: &mut PageWorld) {
    sign_in(world, "guest");
}

#[given("an anonymous visitor")]
fn an_anonymous_visitor(world: &mut PageWorld) {
    world.session = None;
}

#[when("the first user's page is opened")]
fn the_first_users_page_is_opened(world: &mut PageWorld) {
    open(world, "/users/view/1");
}

#[when("a missing user's page is opened")]
fn a_missing_users_page_is_opened(world: &mut PageWorld) {
    open(world, "/users/view/9");
}

#[when("the page is opened without an identifier")]
fn the_page_is_opened_without_an_identifier(world: &mut PageWorld) {
    open(world, "/users/view");
}

#[when("the operator signs out")]
fn the_operator_signs_out(world: &mut PageWorld) {
    dispatch(world, actix_test::TestRequest::post().uri("/api/v1/logout"));
    assert_eq!(
        world.last.as_ref().map(|visit| visit.status),
        Some(StatusCode::NO_CONTENT)
    );
}

#[then("the page lists the record fields in order")]
fn the_page_lists_the_record_fields_in_order(world: &mut PageWorld) {
    let visit = last_visit(world);
    assert_eq!(visit.status, StatusCode::OK);
    let expected = [
        "<strong>Email:</strong> <span>ada@example.com</span>",
        "<strong>First Name:</strong> <span>Ada</span>",
        "<strong>First Name:</strong> <span>Lovelace</span>",
        "<strong>Created At:</strong> <span>2024-01-01T09:00:00Z</span>",
        "<strong>Updated At:</strong> <span>2024-03-15T17:30:00Z</span>",
    ];
    let positions: Vec<usize> = expected
        .iter()
        .map(|needle| visit.body.find(needle).expect("field present"))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(visit.body.contains("<h2>Menu Item Details</h2>"));
}

#[then("the response carries a trace id")]
fn the_response_carries_a_trace_id(world: &mut PageWorld) {
    assert!(last_visit(world).trace_id.is_some());
}

#[then("the visitor is sent to the sign-in page")]
fn the_visitor_is_sent_to_the_sign_in_page(world: &mut PageWorld) {
    let visit = last_visit(world);
    assert_eq!(visit.status, StatusCode::FOUND);
    assert_eq!(visit.location.as_deref(), Some("/"));
}

#[then("access is refused")]
fn access_is_refused(world: &mut PageWorld) {
    let visit = last_visit(world);
    assert_eq!(visit.status, StatusCode::FORBIDDEN);
    assert!(visit.body.contains("Access denied"));
    assert!(!visit.body.contains("class=\"fields\""));
}

#[then("the page shows the not-found banner without fields")]
fn the_page_shows_the_not_found_banner_without_fields(world: &mut PageWorld) {
    let visit = last_visit(world);
    assert_eq!(visit.status, StatusCode::OK);
    assert!(visit.body.contains("role=\"alert\">user 9 was not found</div>"));
    assert!(!visit.body.contains("class=\"fields\""));
}

#[then("only the page chrome is shown")]
fn only_the_page_chrome_is_shown(world: &mut PageWorld) {
    let visit = last_visit(world);
    assert_eq!(visit.status, StatusCode::OK);
    assert!(visit.body.contains("<a href=\"/Users\">Users</a>"));
    assert!(visit.body.contains("aria-current=\"page\">User Details</li>"));
    assert!(!visit.body.contains("class=\"fields\""));
    assert!(!visit.body.contains("role=\"alert\""));
    assert!(!visit.body.contains("role=\"progressbar\""));
}

#[scenario(
    path = "tests/features/user_detail_page.feature",
    name = "Signed-in administrator sees the user record"
)]
fn signed_in_administrator_sees_the_user_record(world: PageWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_detail_page.feature",
    name = "Anonymous visitor is sent to sign in"
)]
fn anonymous_visitor_is_sent_to_sign_in(world: PageWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_detail_page.feature",
    name = "Operator without the read grant is refused"
)]
fn operator_without_the_read_grant_is_refused(world: PageWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_detail_page.feature",
    name = "Missing record shows a banner"
)]
fn missing_record_shows_a_banner(world: PageWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_detail_page.feature",
    name = "Page without an identifier shows only the chrome"
)]
fn page_without_an_identifier_shows_only_the_chrome(world: PageWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_detail_page.feature",
    name = "Signing out closes the page"
)]
fn signing_out_closes_the_page(world: PageWorld) {
    drop(world);
}
