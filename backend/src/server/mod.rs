//! Server assembly: session cookie, routes and health checks.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite, time::Duration as CookieDuration};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use user_console::Trace;
#[cfg(debug_assertions)]
use user_console::doc::ApiDoc;
use user_console::inbound::http::health::{HealthState, live, ready};
use user_console::inbound::http::state::HttpState;
use user_console::inbound::http::user_detail::{view_user, view_user_without_id};
use user_console::inbound::http::users::{login, logout};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// Cookie policy shared by every worker.
#[derive(Clone)]
struct SessionCookie {
    key: Key,
    secure: bool,
    same_site: SameSite,
}

impl SessionCookie {
    /// Encrypted cookie session expiring after [`SESSION_TTL_HOURS`].
    fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(CookieDuration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

fn build_app(
    health: web::Data<HealthState>,
    state: web::Data<HttpState>,
    cookie: SessionCookie,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health)
        .app_data(state)
        .wrap(Trace)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // The empty scope matches every remaining path, so it is registered last.
    app.service(
        web::scope("")
            .wrap(cookie.middleware())
            .service(web::scope("/api/v1").service(login).service(logout))
            .service(view_user)
            .service(view_user_without_id),
    )
}

/// Bind the console and mark it ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when building adapters or binding fails.
pub fn create_server(
    health: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let state = web::Data::new(build_http_state(&config)?);
    let cookie = SessionCookie {
        key: config.key,
        secure: config.cookie_secure,
        same_site: config.same_site,
    };

    let worker_health = health.clone();
    let server = HttpServer::new(move || {
        build_app(worker_health.clone(), state.clone(), cookie.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health.mark_ready();
    Ok(server)
}
