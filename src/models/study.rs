// src/models/study.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    flashcard::Flashcard,
    question::{Question, QuestionKind, QuestionType},
};

/// DTO for the text-only endpoints (summarize, flashcards, quiz).
#[derive(Debug, Deserialize, Validate)]
pub struct TextRequest {
    #[serde(default)]
    #[validate(custom(
        function = validate_not_blank,
        message = "Text is required and must be a string"
    ))]
    pub text: String,
}

/// DTO for the advanced quiz generator.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedQuizRequest {
    #[serde(default)]
    #[validate(custom(
        function = validate_not_blank,
        message = "Text is required and must be a string"
    ))]
    pub text: String,

    /// Defaults to every question type when absent or empty.
    pub question_types: Option<Vec<QuestionType>>,
}

impl AdvancedQuizRequest {
    pub fn types(&self) -> Vec<QuestionType> {
        match &self.question_types {
            Some(types) if !types.is_empty() => types.clone(),
            _ => QuestionType::ALL.to_vec(),
        }
    }
}

/// DTO for summarizing a single paper abstract.
#[derive(Debug, Deserialize, Validate)]
pub struct PaperSummaryRequest {
    #[serde(default, rename = "abstract")]
    #[validate(custom(
        function = validate_not_blank,
        message = "Abstract is required and must be a string"
    ))]
    pub abstract_text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchPapersRequest {
    #[serde(default)]
    #[validate(custom(
        function = validate_not_blank,
        message = "Query is required and must be a string"
    ))]
    pub query: String,
}

/// Role of a prior turn in a tutor conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TutorChatRequest {
    #[serde(default)]
    #[validate(custom(
        function = validate_not_blank,
        message = "Message is required and must be a string"
    ))]
    pub message: String,

    /// Excerpt of the student's material, added to the tutor instruction.
    pub context: Option<String>,

    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub summary: String,
    pub key_points: Vec<String>,
    pub original_length: usize,
    pub summary_length: usize,
    pub compression_rate: i64,
    pub estimated_read_time: usize,
}

#[derive(Debug, Serialize)]
pub struct FlashcardsResponse {
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub struct PaperSummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct TutorChatResponse {
    pub response: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractTextResponse {
    pub text: String,
    pub file_name: String,
    /// Lowercased extension of the upload.
    pub file_type: String,
}

/// Reply schema of the summarize request.
#[derive(Debug, Deserialize)]
pub struct SummaryReply {
    pub summary: String,
    #[serde(rename = "keyPoints")]
    pub key_points: Vec<String>,
}

/// Reply schema of the flashcard request.
#[derive(Debug, Deserialize)]
pub struct FlashcardsReply {
    pub flashcards: Vec<Flashcard>,
}

/// Reply schema of the plain quiz request: multiple choice only, no type tag.
#[derive(Debug, Deserialize)]
pub struct QuizReply {
    pub questions: Vec<MultipleChoiceReply>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceReply {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
}

impl From<MultipleChoiceReply> for Question {
    fn from(reply: MultipleChoiceReply) -> Self {
        Question {
            prompt: reply.question,
            kind: QuestionKind::MultipleChoice {
                options: reply.options,
                correct_answer: reply.correct_answer,
            },
            explanation: reply.explanation,
        }
    }
}

/// Reply schema of the advanced quiz request: questions carry a type tag.
#[derive(Debug, Deserialize)]
pub struct AdvancedQuizReply {
    pub questions: Vec<Question>,
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}
