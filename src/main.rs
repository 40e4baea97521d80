use std::sync::Arc;

use anyhow::Context;

use cocktail_assistant::config::Settings;
use cocktail_assistant::services::ai::AiClient;
use cocktail_assistant::{AppState, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    let settings = Settings::from_env();
    init_tracing(&settings);

    tracing::info!(
        app = %settings.app_name,
        version = %settings.app_version,
        model = %settings.openai_model,
        screen_replies = settings.screen_replies,
        "Starting server"
    );

    if !settings.provider_configured() {
        tracing::warn!("OPENAI_API_KEY is not set; chat requests will fail");
    }

    let provider = AiClient::openai(&settings).context("Failed to build provider client")?;
    let state = Arc::new(AppState::new(settings.clone(), Arc::new(provider)));

    tracing::info!(
        approved = state.assistant.approved().len(),
        blocked = state.assistant.blocked().len(),
        "Static lists ready"
    );

    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", settings.host, settings.port);
    tracing::info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn init_tracing(settings: &Settings) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    if settings.log_format == "json" {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }
}
