//! Builders wiring ports and services into the HTTP state.

use std::sync::Arc;

use tracing::{info, warn};

use user_console::domain::ports::{
    FixtureLoginService, FixtureUserRecordSource, StaticPermissionQuery, UserRecordSource,
};
use user_console::domain::{RecordCache, UserDetailService};
use user_console::inbound::http::state::HttpState;
use user_console::outbound::user_api::HttpUserRecordSource;

use super::ServerConfig;

/// Pick the record source: the upstream user service when a URL is
/// configured, otherwise in-memory fixtures.
fn build_record_source(config: &ServerConfig) -> std::io::Result<Arc<dyn UserRecordSource>> {
    match &config.user_api_url {
        Some(url) => {
            info!(%url, "using upstream user service");
            let source = HttpUserRecordSource::new(url.clone(), config.request_timeout)
                .map_err(|e| std::io::Error::other(format!("user service client: {e}")))?;
            Ok(Arc::new(source))
        }
        None => {
            warn!("CONSOLE_USER_API_URL not set; serving fixture user records");
            Ok(Arc::new(FixtureUserRecordSource::default()))
        }
    }
}

/// Build the shared HTTP state for every worker.
pub fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let cache = Arc::new(RecordCache::with_settings(
        build_record_source(config)?,
        config.dedupe_interval,
        config.cache_capacity,
    ));
    let permissions = StaticPermissionQuery::fixture()
        .map_err(|e| std::io::Error::other(format!("permission fixtures: {e}")))?;
    Ok(HttpState::new(
        Arc::new(FixtureLoginService),
        Arc::new(permissions),
        UserDetailService::new(cache, config.render_wait),
    ))
}
