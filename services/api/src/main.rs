use anyhow::Context;
use debate_api::completion::{ChatClient, Completion};
use debate_api::config::Config;
use debate_api::routes::{self, AppState};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load server configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .init();
    info!("Loaded configuration: {:?}", config);

    // Without a key the server still starts; `/debate` then answers 500.
    let completion: Option<Arc<dyn Completion>> = match &config.api_key {
        Some(key) => Some(Arc::new(ChatClient::new(
            config.api_base.clone(),
            key.clone(),
            config.chat_model.clone(),
        ))),
        None => {
            warn!("GROQ_API_KEY not found in environment variables.");
            None
        }
    };

    let app = routes::router(AppState { completion });

    info!("Starting debate server, listening on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
