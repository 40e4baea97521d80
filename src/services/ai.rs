use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
    CreateChatCompletionResponse,
};
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::config::Settings;
use crate::error::AppError;
use crate::models::entities::{ConversationTurn, MessageRole};

pub const EMPTY_REPLY: &str = "Empty response from model.";

/// The external chat-completion API. One call per chat request, no retries.
pub trait CompletionProvider: Send + Sync {
    /// Generate a reply for the ordered message list. The returned text is
    /// trimmed and never blank.
    fn complete<'a>(
        &'a self,
        messages: &'a [ConversationTurn],
    ) -> BoxFuture<'a, Result<String, AppError>>;

    fn model(&self) -> &str;

    fn is_configured(&self) -> bool {
        true
    }
}

#[derive(Clone)]
pub struct AiClient {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    configured: bool,
}

impl AiClient {
    pub fn openai(settings: &Settings) -> anyhow::Result<Self> {
        let config = OpenAIConfig::new()
            .with_api_key(&settings.openai_api_key)
            .with_api_base(&settings.openai_base_url);

        // The only timeout on the provider call.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.openai_timeout))
            .build()?;

        let client = Client::with_config(config).with_http_client(http);

        Ok(Self {
            client,
            model: settings.openai_model.clone(),
            max_tokens: settings.openai_max_tokens,
            temperature: settings.openai_temperature,
            configured: settings.provider_configured(),
        })
    }

    async fn generate_response(&self, messages: &[ConversationTurn]) -> Result<String, AppError> {
        if !self.configured {
            return Err(AppError::provider("OPENAI_API_KEY is not set"));
        }

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages.iter().map(to_request_message).collect::<Vec<_>>())
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| AppError::provider(format!("Failed to build request: {e}")))?;

        tracing::debug!(model = %self.model, messages = messages.len(), "Requesting completion");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::provider(provider_detail(e)))?;

        if let Some(usage) = &response.usage {
            tracing::debug!(total_tokens = usage.total_tokens, "Completion usage");
        }

        reply_text(&response)
    }
}

impl CompletionProvider for AiClient {
    fn complete<'a>(
        &'a self,
        messages: &'a [ConversationTurn],
    ) -> BoxFuture<'a, Result<String, AppError>> {
        self.generate_response(messages).boxed()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

fn to_request_message(turn: &ConversationTurn) -> ChatCompletionRequestMessage {
    match turn.role {
        MessageRole::System => {
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: turn.content.as_str().into(),
                name: None,
            })
        }
        MessageRole::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(turn.content.clone()),
            name: None,
        }),
        MessageRole::Assistant => {
            ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                content: Some(turn.content.clone().into()),
                name: None,
                ..Default::default()
            })
        }
    }
}

/// Trimmed content of the first choice. Blank or absent content is an error.
fn reply_text(response: &CreateChatCompletionResponse) -> Result<String, AppError> {
    let text = response
        .choices
        .first()
        .and_then(|c| c.message.content.as_deref())
        .map(str::trim)
        .unwrap_or_default();

    if text.is_empty() {
        return Err(AppError::provider(EMPTY_REPLY));
    }
    Ok(text.to_string())
}

/// Prefer the provider's own error message over the transport description.
fn provider_detail(err: OpenAIError) -> String {
    match err {
        OpenAIError::ApiError(api) => api.message,
        other => other.to_string(),
    }
}
