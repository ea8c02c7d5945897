//! Chat-completion client.
//!
//! The orchestrator talks to the model through `CompletionService` only, so
//! tests can substitute a scripted implementation. `OpenAiClient` is the
//! production implementation built on `async-openai` and works against any
//! OpenAI-compatible endpoint.

use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    config::Config,
    models::study::{ChatRole, ChatTurn},
};

/// One outbound completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    /// Prior conversation turns placed between the system and user messages.
    pub history: Vec<ChatTurn>,
    pub temperature: f32,
    /// Ask the model for a strict JSON object.
    pub json_output: bool,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Error)]
pub enum CompletionError {
    /// The service answered with an error (or couldn't be reached).
    #[error("{message}")]
    Api { status: Option<u16>, message: String },

    /// The service answered without any content.
    #[error("No response from the model")]
    EmptyReply,

    /// The request couldn't be built locally.
    #[error("invalid completion request: {0}")]
    Request(String),
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns the trimmed text content of the first choice.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl OpenAiClient {
    /// Builds a client from the configuration, or `None` without a credential.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.openai_api_key.as_ref()?;

        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&config.openai_api_base);

        Some(OpenAiClient {
            client: Client::with_config(openai_config),
            model_name: config.openai_model.clone(),
        })
    }

    fn build_messages(
        request: &CompletionRequest,
    ) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
        let mut messages = Vec::with_capacity(request.history.len() + 2);

        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system.as_str())
            .build()?;
        messages.push(ChatCompletionRequestMessage::System(system));

        for turn in &request.history {
            let message = match turn.role {
                ChatRole::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(turn.content.as_str())
                        .build()?,
                ),
                ChatRole::Assistant => ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessageArgs::default()
                        .content(turn.content.as_str())
                        .build()?,
                ),
            };
            messages.push(message);
        }

        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user.as_str())
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user));

        Ok(messages)
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        debug!(
            "Calling completion API, model: {}, temperature: {}, json: {}",
            self.model_name, request.temperature, request.json_output
        );
        debug!("User message length: {} chars", request.user.len());

        let messages = Self::build_messages(&request)
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model_name)
            .messages(messages)
            .temperature(request.temperature);
        if request.json_output {
            args.response_format(ResponseFormat::JsonObject);
        }
        if let Some(max_tokens) = request.max_tokens {
            args.max_tokens(max_tokens);
        }
        let chat_request = args
            .build()
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            warn!("Completion API call failed: {}", e);
            classify(e)
        })?;

        debug!("Completion API call succeeded");

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(CompletionError::EmptyReply);
        }
        Ok(content)
    }
}

/// Maps a client error to a status (when the transport knows one) and message.
fn classify(err: OpenAIError) -> CompletionError {
    match err {
        OpenAIError::ApiError(api) => CompletionError::Api {
            status: api.code.as_deref().and_then(status_for_code),
            message: api.message,
        },
        OpenAIError::Reqwest(e) => CompletionError::Api {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        },
        other => CompletionError::Api {
            status: None,
            message: other.to_string(),
        },
    }
}

/// HTTP status implied by the OpenAI error codes that carry one.
fn status_for_code(code: &str) -> Option<u16> {
    match code {
        "invalid_api_key" => Some(401),
        "insufficient_quota" | "rate_limit_exceeded" => Some(429),
        "model_not_found" => Some(404),
        "context_length_exceeded" => Some(400),
        _ => None,
    }
}
