//! Console entry-point: loads settings, wires adapters and serves the pages.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use user_console::inbound::http::health::HealthState;
use user_console::inbound::http::session_config::{BuildMode, session_settings_from_env};
use user_console::settings::ConsoleSettings;

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ConsoleSettings::load().map_err(|e| eyre!("failed to load console settings: {e}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    let config =
        ServerConfig::from_settings(session, &settings).wrap_err("invalid console settings")?;

    let bind_addr = config.bind_addr;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    info!(%bind_addr, "user console listening");
    server.await.wrap_err("server terminated with an error")
}
