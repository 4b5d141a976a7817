use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use krishi_backend::config::Config;
use krishi_backend::routes;
use krishi_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    let dotenv_path = dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("krishi_backend=debug,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(path) = dotenv_path {
        info!("Loaded environment from: {}", path.display());
    }

    let config = Config::load()?;
    info!(
        "Model: {} (api key {})",
        config.model_config.model,
        if config.model_config.api_key().is_some() { "set" } else { "missing" }
    );

    let host = config.system_config.host.clone();
    let port = config.system_config.port;
    let app = routes::build_app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("Starting server on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
