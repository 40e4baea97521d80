use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::Value;

use crate::AppState;
use crate::error::AppError;
use crate::models::requests::ChatRequest;
use crate::models::responses::ChatResponse;

#[utoipa::path(
    post,
    path = "/chat",
    request_body = crate::models::requests::ChatRequestBody,
    responses(
        (status = 200, body = ChatResponse, description = "Generated recipe"),
        (status = 400, body = crate::error::ErrorBody, description = "Missing or invalid message"),
        (status = 500, body = crate::error::ErrorBody, description = "Provider failure"),
    ),
    tag = "Chat"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    // An unreadable body is treated like an empty one.
    let value = match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unparseable chat body");
            Value::Null
        }
    };

    let request = ChatRequest::from_json(value)?;

    let reply = state
        .assistant
        .reply(&request)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Completion provider call failed"))?;

    Ok(Json(ChatResponse { reply }))
}
