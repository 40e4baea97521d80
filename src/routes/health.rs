use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use crate::AppState;
use crate::models::responses::{HealthResponse, ProviderHealth};

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, body = String, content_type = "text/plain", description = "Service banner")),
    tag = "Health"
)]
pub async fn root(State(state): State<Arc<AppState>>) -> String {
    format!("{} is running.", state.settings.app_name)
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, body = HealthResponse, description = "Service health check")),
    tag = "Health"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let assistant = &state.assistant;
    let provider = assistant.provider();

    let status = if provider.is_configured() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        service: state.settings.app_name.clone(),
        version: state.settings.app_version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        provider: ProviderHealth {
            configured: provider.is_configured(),
            model: provider.model().to_string(),
        },
        approved_products: assistant.approved().len(),
        blocked_brands: assistant.blocked().len(),
        screen_replies: assistant.screens_replies(),
        timestamp: Utc::now().naive_utc(),
    })
}
