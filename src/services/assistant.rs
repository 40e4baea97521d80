use std::sync::Arc;

use crate::config::Settings;
use crate::error::AppError;
use crate::models::requests::ChatRequest;

use super::ai::CompletionProvider;
use super::catalog::{ApprovedCatalog, BlockedList, BrandList};
use super::guardrail::screen_reply;
use super::prompt::{assemble_messages, build_system_prompt};

/// Prompt & guardrail engine: builds the system prompt, calls the provider
/// once and optionally annotates the reply.
pub struct RecipeAssistant {
    provider: Arc<dyn CompletionProvider>,
    approved: ApprovedCatalog,
    blocked: BlockedList,
    history_window: usize,
    screen_replies: bool,
}

impl RecipeAssistant {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        approved: ApprovedCatalog,
        blocked: BlockedList,
        settings: &Settings,
    ) -> Self {
        Self {
            provider,
            approved,
            blocked,
            history_window: settings.history_window,
            screen_replies: settings.screen_replies,
        }
    }

    pub fn provider(&self) -> &dyn CompletionProvider {
        self.provider.as_ref()
    }

    pub fn approved(&self) -> &ApprovedCatalog {
        &self.approved
    }

    pub fn blocked(&self) -> &BlockedList {
        &self.blocked
    }

    pub fn screens_replies(&self) -> bool {
        self.screen_replies
    }

    pub async fn reply(&self, request: &ChatRequest) -> Result<String, AppError> {
        let approved = select(request.catalog.as_ref(), &self.approved);
        let blocked = select(request.blocked.as_ref(), &self.blocked);

        tracing::debug!(
            history = request.history.len(),
            approved = approved.len(),
            blocked = blocked.len(),
            catalog_override = request.catalog.is_some(),
            "Building prompt"
        );

        let system_prompt = build_system_prompt(approved, blocked);
        let messages = assemble_messages(
            &system_prompt,
            &request.history,
            &request.message,
            self.history_window,
        );

        let reply = self.provider.complete(&messages).await?;

        if !self.screen_replies {
            return Ok(reply);
        }

        let screened = screen_reply(&reply, approved, blocked);
        if !screened.flagged.is_empty() {
            tracing::warn!(flagged = ?screened.flagged, "Reply mentions unapproved names");
        }
        Ok(screened.text)
    }
}

/// A per-request list wins unless it is empty after normalization.
fn select<'a>(requested: Option<&'a BrandList>, fallback: &'a BrandList) -> &'a BrandList {
    requested.filter(|list| !list.is_empty()).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::FutureExt;
    use futures::future::BoxFuture;

    use super::*;
    use crate::models::entities::{ConversationTurn, MessageRole};

    /// Records the messages it receives and answers with a fixed reply.
    struct Recorder {
        reply: String,
        seen: Mutex<Vec<ConversationTurn>>,
    }

    impl Recorder {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl CompletionProvider for Recorder {
        fn complete<'a>(
            &'a self,
            messages: &'a [ConversationTurn],
        ) -> BoxFuture<'a, Result<String, AppError>> {
            *self.seen.lock().unwrap() = messages.to_vec();
            let reply = self.reply.clone();
            async move { Ok(reply) }.boxed()
        }

        fn model(&self) -> &str {
            "recorder"
        }
    }

    fn request(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            history: Vec::new(),
            catalog: None,
            blocked: None,
        }
    }

    #[tokio::test]
    async fn per_request_catalog_overrides_static_list() {
        let recorder = Recorder::new("Hello");
        let assistant = RecipeAssistant::new(
            recorder.clone(),
            BrandList::new(["Static Spirit"]),
            BrandList::default(),
            &Settings::default(),
        );

        let mut req = request("hi");
        req.catalog = Some(BrandList::new(["Ponche Kuba"]));
        assistant.reply(&req).await.unwrap();

        let seen = recorder.seen.lock().unwrap().clone();
        assert_eq!(seen[0].role, MessageRole::System);
        assert!(seen[0].content.contains("- Ponche Kuba"));
        assert!(!seen[0].content.contains("Static Spirit"));
        assert_eq!(seen.last().unwrap(), &ConversationTurn::user("hi"));
    }

    #[tokio::test]
    async fn empty_override_falls_back_to_static_list() {
        let recorder = Recorder::new("Hello");
        let assistant = RecipeAssistant::new(
            recorder.clone(),
            BrandList::new(["Static Spirit"]),
            BrandList::default(),
            &Settings::default(),
        );

        let mut req = request("hi");
        req.catalog = Some(BrandList::new(["", "  "]));
        assistant.reply(&req).await.unwrap();

        let seen = recorder.seen.lock().unwrap().clone();
        assert!(seen[0].content.contains("- Static Spirit"));
    }

    #[tokio::test]
    async fn screening_annotates_when_enabled() {
        let settings = Settings {
            screen_replies: true,
            ..Settings::default()
        };
        let assistant = RecipeAssistant::new(
            Recorder::new("Use 2 oz Absolut."),
            BrandList::default(),
            BrandList::new(["Absolut"]),
            &settings,
        );

        let reply = assistant.reply(&request("vodka drink")).await.unwrap();
        assert!(reply.starts_with("Use 2 oz Absolut."));
        assert!(reply.contains("Note:"));
    }

    #[tokio::test]
    async fn screening_off_returns_reply_verbatim() {
        let assistant = RecipeAssistant::new(
            Recorder::new("Use 2 oz Absolut."),
            BrandList::default(),
            BrandList::new(["Absolut"]),
            &Settings::default(),
        );

        let reply = assistant.reply(&request("vodka drink")).await.unwrap();
        assert_eq!(reply, "Use 2 oz Absolut.");
    }
}
