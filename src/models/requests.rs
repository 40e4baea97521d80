use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use super::entities::ConversationTurn;
use crate::error::AppError;
use crate::services::catalog::{ApprovedCatalog, BlockedList, BrandList};

pub const NO_MESSAGE: &str = "No message";

/// Wire shape of `POST /chat`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChatRequestBody {
    #[validate(length(min = 1, message = "No message"))]
    pub message: String,
    #[serde(default)]
    pub history: Option<Vec<ConversationTurn>>,
    /// Overrides the static approved catalog for this request.
    #[serde(default)]
    pub catalog: Option<Vec<String>>,
    /// Overrides the static blocked list for this request.
    #[serde(default)]
    pub blocked: Option<Vec<String>>,
}

/// A validated chat request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ConversationTurn>,
    pub catalog: Option<ApprovedCatalog>,
    pub blocked: Option<BlockedList>,
}

impl ChatRequest {
    /// Validate a raw JSON body. A missing or non-string `message` is rejected
    /// before the other fields are looked at; an empty one fails validation.
    pub fn from_json(value: Value) -> Result<Self, AppError> {
        if value.get("message").and_then(Value::as_str).is_none() {
            return Err(AppError::validation_error(NO_MESSAGE));
        }

        let body: ChatRequestBody = serde_json::from_value(value)
            .map_err(|e| AppError::bad_request(format!("Invalid request body: {e}")))?;
        body.validate()
            .map_err(|_| AppError::validation_error(NO_MESSAGE))?;

        Ok(body.into())
    }
}

impl From<ChatRequestBody> for ChatRequest {
    fn from(body: ChatRequestBody) -> Self {
        Self {
            message: body.message,
            history: body.history.unwrap_or_default(),
            catalog: body.catalog.map(BrandList::new),
            blocked: body.blocked.map(BrandList::new),
        }
    }
}
