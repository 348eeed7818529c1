use anyhow::Result;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use soul_agents_backend::config::Config;
use soul_agents_backend::routes;
use soul_agents_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("soul_agents_backend=debug,tower_http=debug")),
        )
        .init();

    let (config, loaded_from) = Config::discover()?;
    match &loaded_from {
        Some(path) => info!("Loaded configuration from: {}", path),
        None => info!("No configuration file found, using defaults"),
    }
    config.validate()?;

    let addr: SocketAddr = format!("{}:{}", config.server_config.host, config.server_config.port)
        .parse()?;

    let app_state = AppState::new(config);
    info!(
        "Agent runtime at {}",
        app_state.agent_service.base_url()
    );
    let app = routes::build_app(app_state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
