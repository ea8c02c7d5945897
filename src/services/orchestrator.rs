//! Request orchestrator: one method per request kind.
//!
//! Every method follows the same sequence: validate the input, make sure a
//! completion service is configured, send the kind's fixed instruction with
//! the user's content, then check the reply against the kind's schema.
//! Nothing is retried or cached.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::{
    clients::llm_client::{CompletionRequest, CompletionService},
    config::ABSTRACT_FALLBACK_CHARS,
    error::AppError,
    models::{
        flashcard::Flashcard,
        question::{Question, QuestionType},
        study::{
            AdvancedQuizReply, ChatTurn, FlashcardsReply, QuizReply, SummaryReply, SummaryResponse,
        },
    },
    services::prompts,
    utils::text::{char_length, compression_rate, estimated_read_time, excerpt},
};

const TEXT_REQUIRED: &str = "Text is required and must be a string";
const MESSAGE_REQUIRED: &str = "Message is required and must be a string";
const ABSTRACT_REQUIRED: &str = "Abstract is required and must be a string";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Summarize,
    Flashcards,
    Quiz,
    AdvancedQuiz,
    PaperSummary,
    TutorChat,
}

impl RequestKind {
    pub fn label(self) -> &'static str {
        match self {
            RequestKind::Summarize => "summarize",
            RequestKind::Flashcards => "flashcards",
            RequestKind::Quiz => "quiz",
            RequestKind::AdvancedQuiz => "advanced-quiz",
            RequestKind::PaperSummary => "paper-summary",
            RequestKind::TutorChat => "tutor-chat",
        }
    }

    pub fn temperature(self) -> f32 {
        match self {
            RequestKind::PaperSummary => 0.5,
            _ => 0.7,
        }
    }

    /// Kinds whose reply must be a JSON object.
    pub fn json_output(self) -> bool {
        !matches!(self, RequestKind::PaperSummary | RequestKind::TutorChat)
    }

    pub fn max_tokens(self) -> Option<u32> {
        match self {
            RequestKind::PaperSummary => Some(200),
            RequestKind::TutorChat => Some(500),
            _ => None,
        }
    }

    /// User-facing message for a reply that couldn't be used.
    pub fn failure_message(self) -> &'static str {
        match self {
            RequestKind::Summarize => "Failed to summarize text. Please try again.",
            RequestKind::Flashcards => "Failed to generate flashcards. Please try again.",
            RequestKind::Quiz | RequestKind::AdvancedQuiz => {
                "Failed to generate quiz. Please try again."
            }
            RequestKind::PaperSummary => "Failed to summarize paper. Please try again.",
            RequestKind::TutorChat => "Failed to get tutor response. Please try again.",
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    llm: Option<Arc<dyn CompletionService>>,
}

impl Orchestrator {
    /// `None` means no credential is configured.
    pub fn new(llm: Option<Arc<dyn CompletionService>>) -> Self {
        Orchestrator { llm }
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_some()
    }

    pub async fn summarize(&self, text: &str) -> Result<SummaryResponse, AppError> {
        require(text, TEXT_REQUIRED)?;

        let kind = RequestKind::Summarize;
        let reply: SummaryReply = self.request_json(kind, prompts::SUMMARIZE, text).await?;

        let original_length = char_length(text);
        let summary_length = char_length(&reply.summary);

        Ok(SummaryResponse {
            compression_rate: compression_rate(original_length, summary_length),
            estimated_read_time: estimated_read_time(&reply.summary),
            summary: reply.summary,
            key_points: reply.key_points,
            original_length,
            summary_length,
        })
    }

    pub async fn flashcards(&self, text: &str) -> Result<Vec<Flashcard>, AppError> {
        require(text, TEXT_REQUIRED)?;

        let reply: FlashcardsReply = self
            .request_json(RequestKind::Flashcards, prompts::FLASHCARDS, text)
            .await?;
        Ok(reply.flashcards)
    }

    /// Ten multiple-choice questions.
    pub async fn quiz(&self, text: &str) -> Result<Vec<Question>, AppError> {
        require(text, TEXT_REQUIRED)?;

        let kind = RequestKind::Quiz;
        let reply: QuizReply = self.request_json(kind, prompts::QUIZ, text).await?;
        checked(kind, reply.questions.into_iter().map(Question::from).collect())
    }

    /// A mix of the requested question types.
    pub async fn advanced_quiz(
        &self,
        text: &str,
        types: &[QuestionType],
    ) -> Result<Vec<Question>, AppError> {
        require(text, TEXT_REQUIRED)?;

        let kind = RequestKind::AdvancedQuiz;
        let types = if types.is_empty() {
            &QuestionType::ALL[..]
        } else {
            types
        };
        let system = prompts::advanced_quiz(types);
        let reply: AdvancedQuizReply = self.request_json(kind, &system, text).await?;
        checked(kind, reply.questions)
    }

    pub async fn summarize_paper(&self, abstract_text: &str) -> Result<String, AppError> {
        require(abstract_text, ABSTRACT_REQUIRED)?;

        self.request_text(
            RequestKind::PaperSummary,
            prompts::PAPER_SUMMARY,
            abstract_text,
            Vec::new(),
        )
        .await
    }

    /// Paper summary for search results: degrades to an excerpt of the
    /// abstract instead of failing the whole search.
    pub async fn summarize_paper_or_excerpt(&self, abstract_text: &str) -> String {
        if !self.is_configured() {
            return excerpt(abstract_text, ABSTRACT_FALLBACK_CHARS);
        }
        match self.summarize_paper(abstract_text).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Falling back to abstract excerpt: {}", e);
                excerpt(abstract_text, ABSTRACT_FALLBACK_CHARS)
            }
        }
    }

    pub async fn tutor_chat(
        &self,
        message: &str,
        context: Option<&str>,
        history: &[ChatTurn],
    ) -> Result<String, AppError> {
        require(message, MESSAGE_REQUIRED)?;

        let system = prompts::tutor(context);
        self.request_text(RequestKind::TutorChat, &system, message, history.to_vec())
            .await
    }

    async fn call(
        &self,
        kind: RequestKind,
        system: &str,
        user: &str,
        history: Vec<ChatTurn>,
    ) -> Result<String, AppError> {
        let llm = self.llm.as_ref().ok_or(AppError::Configuration)?;

        info!("Dispatching {} request ({} chars)", kind.label(), user.len());
        let request = CompletionRequest {
            system: system.to_string(),
            user: user.to_string(),
            history,
            temperature: kind.temperature(),
            json_output: kind.json_output(),
            max_tokens: kind.max_tokens(),
        };

        llm.complete(request)
            .await
            .map_err(|e| AppError::from_completion(e, kind.failure_message()))
    }

    async fn request_text(
        &self,
        kind: RequestKind,
        system: &str,
        user: &str,
        history: Vec<ChatTurn>,
    ) -> Result<String, AppError> {
        let reply = self.call(kind, system, user, history).await?;
        if reply.trim().is_empty() {
            return Err(AppError::UpstreamParse(kind.failure_message().to_string()));
        }
        Ok(reply)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        kind: RequestKind,
        system: &str,
        user: &str,
    ) -> Result<T, AppError> {
        let reply = self.call(kind, system, user, Vec::new()).await?;
        serde_json::from_str(&reply).map_err(|e| {
            warn!("Unusable {} reply: {}", kind.label(), e);
            AppError::UpstreamParse(kind.failure_message().to_string())
        })
    }
}

fn require(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

fn checked(kind: RequestKind, questions: Vec<Question>) -> Result<Vec<Question>, AppError> {
    for question in &questions {
        if let Err(reason) = question.check() {
            warn!("Rejecting {} reply: {}", kind.label(), reason);
            return Err(AppError::UpstreamParse(kind.failure_message().to_string()));
        }
    }
    Ok(questions)
}
