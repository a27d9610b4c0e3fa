use anyhow::Result;
use testimonial_sync::{config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("testimonial_sync=info".parse()?),
        )
        .init();

    info!("Starting testimonial sync service");

    // Load configuration from environment
    let config = config::Config::from_env()?;
    info!(
        "Translation provider: {}, privileged role: {}",
        config.translation_api_url, config.privileged_role
    );

    let state = server::AppState::from_config(&config);
    server::serve(&config, state).await
}
