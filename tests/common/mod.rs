#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::FutureExt;
use futures::future::BoxFuture;
use tower::util::ServiceExt;

use cocktail_assistant::config::Settings;
use cocktail_assistant::error::AppError;
use cocktail_assistant::models::entities::ConversationTurn;
use cocktail_assistant::services::ai::CompletionProvider;
use cocktail_assistant::services::catalog::BrandList;
use cocktail_assistant::{AppState, build_router};

/// Canned provider outcome.
#[derive(Clone)]
pub enum Outcome {
    Reply(String),
    Fail(String),
}

/// Provider double that records every message list it is sent.
pub struct StubProvider {
    outcome: Outcome,
    pub calls: Mutex<Vec<Vec<ConversationTurn>>>,
}

impl StubProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Outcome::Reply(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Outcome::Fail(detail.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Vec<ConversationTurn> {
        self.calls.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl CompletionProvider for StubProvider {
    fn complete<'a>(
        &'a self,
        messages: &'a [ConversationTurn],
    ) -> BoxFuture<'a, Result<String, AppError>> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let outcome = self.outcome.clone();
        async move {
            match outcome {
                Outcome::Reply(text) => Ok(text),
                Outcome::Fail(detail) => Err(AppError::provider(detail)),
            }
        }
        .boxed()
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

pub fn app_with(provider: Arc<StubProvider>) -> Router {
    app_with_lists(provider, Settings::default(), BrandList::default(), BrandList::default())
}

pub fn app_with_lists(
    provider: Arc<StubProvider>,
    settings: Settings,
    approved: BrandList,
    blocked: BrandList,
) -> Router {
    let state = AppState::with_lists(settings, provider, approved, blocked);
    build_router(Arc::new(state))
}

pub fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Send one request and return its status and JSON body.
pub async fn send_json(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

pub async fn send_text(app: Router, req: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}
