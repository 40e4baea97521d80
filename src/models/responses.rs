use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub reply: String,
}

// ── Health ──

#[derive(Debug, Serialize, ToSchema)]
pub struct ProviderHealth {
    pub configured: bool,
    pub model: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub provider: ProviderHealth,
    pub approved_products: usize,
    pub blocked_brands: usize,
    pub screen_replies: bool,
    pub timestamp: NaiveDateTime,
}
