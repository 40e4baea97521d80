pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::http::{Method, header};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use config::Settings;
use services::ai::CompletionProvider;
use services::assistant::RecipeAssistant;
use services::catalog::{ApprovedCatalog, BlockedList, BrandList};

pub struct AppState {
    pub settings: Settings,
    pub start_time: Instant,
    pub assistant: RecipeAssistant,
}

impl AppState {
    /// Build state with the static lists named in `settings`. Unreadable
    /// list files are logged and leave that list empty.
    pub fn new(settings: Settings, provider: Arc<dyn CompletionProvider>) -> Self {
        let approved =
            BrandList::load_or_empty(settings.approved_products_file.as_deref(), "approved");
        let blocked = BrandList::load_or_empty(settings.blocked_brands_file.as_deref(), "blocked");
        Self::with_lists(settings, provider, approved, blocked)
    }

    pub fn with_lists(
        settings: Settings,
        provider: Arc<dyn CompletionProvider>,
        approved: ApprovedCatalog,
        blocked: BlockedList,
    ) -> Self {
        let assistant = RecipeAssistant::new(provider, approved, blocked, &settings);
        Self {
            settings,
            start_time: Instant::now(),
            assistant,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    use axum::routing::{get, post};
    use routes::{chat, health, openapi};

    let cors = build_cors(&state.settings);

    Router::new()
        // Health
        .route("/", get(health::root))
        .route("/health", get(health::health))
        // Chat
        .route("/chat", post(chat::chat))
        // Docs
        .merge(openapi::swagger_ui())
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

fn build_cors(settings: &Settings) -> CorsLayer {
    let origins = settings.cors_origins_list();

    if origins.contains(&"*".to_string()) {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
    }
}
