//! HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use url::Url;

use user_console::inbound::http::session_config::SessionSettings;
use user_console::settings::{ConsoleSettings, SettingsError};

/// Everything needed to assemble and bind the server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) user_api_url: Option<Url>,
    pub(crate) request_timeout: Duration,
    pub(crate) dedupe_interval: Duration,
    pub(crate) render_wait: Duration,
    pub(crate) cache_capacity: usize,
}

impl ServerConfig {
    /// Combine validated session settings with the console settings.
    pub fn from_settings(
        session: SessionSettings,
        settings: &ConsoleSettings,
    ) -> Result<Self, SettingsError> {
        Ok(Self {
            key: session.key,
            cookie_secure: session.cookie_secure,
            same_site: session.same_site,
            bind_addr: settings.bind_addr()?,
            user_api_url: settings.user_api_url()?,
            request_timeout: settings.request_timeout(),
            dedupe_interval: settings.dedupe_interval(),
            render_wait: settings.render_wait(),
            cache_capacity: settings.cache_capacity(),
        })
    }
}
