//! Casework entry point: loads configuration, wires the services and runs
//! the HTTP server.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use casework::inbound::http::health::HealthState;
use casework::inbound::http::session_config::{BuildMode, session_settings_from_env};
use server::{AppSettings, ServerConfig, build_http_state, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|error| std::io::Error::other(format!("configuration error: {error}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let http_state = build_http_state(&settings)
        .await
        .map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let bind_addr = settings.bind_addr();
    let server = create_server(
        health_state.clone(),
        http_state,
        ServerConfig::new(session, bind_addr),
    )?;
    info!(%bind_addr, "casework listening");

    let result = server.await;
    health_state.mark_draining();
    result
}
