// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{
        question::{Answer, PublicQuestion, Question},
        study::validate_not_blank,
    },
    quiz::session::{Phase, QuizSession},
};

/// Summary of a completed quiz, kept in the persisted history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizHistoryEntry {
    pub date: DateTime<Utc>,
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
}

/// DTO for starting a quiz session from study material.
#[derive(Debug, Deserialize, Validate)]
pub struct StartQuizRequest {
    #[serde(default)]
    #[validate(custom(
        function = validate_not_blank,
        message = "Text is required and must be a string"
    ))]
    pub text: String,

    /// Mixed question types instead of multiple choice only.
    #[serde(default)]
    pub advanced: bool,
}

/// DTO for choosing an answer to the current question.
#[derive(Debug, Deserialize, Validate)]
pub struct AnswerRequest {
    pub answer: Answer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Loading,
    InProgress,
    Completed,
    Error,
}

/// What the quiz page needs to render a session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub status: SessionStatus,
    pub current_question: usize,
    pub total_questions: usize,
    pub time_left: u32,
    pub selected_answer: Option<Answer>,
    pub answers: Vec<Option<Answer>>,
    pub score: usize,
    /// The question at the current position, without its answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<PublicQuestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<QuizResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub passed: bool,
    pub review: Vec<ReviewItem>,
}

/// One reviewed question of a completed session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    #[serde(flatten)]
    pub question: Question,
    pub your_answer: Option<Answer>,
    pub correct: bool,
}

impl SessionView {
    pub fn new(id: Uuid, session: &QuizSession) -> Self {
        let status = match session.phase() {
            Phase::Loading => SessionStatus::Loading,
            Phase::InProgress => SessionStatus::InProgress,
            Phase::Completed => SessionStatus::Completed,
            Phase::Error(_) => SessionStatus::Error,
        };

        let question = session
            .is_in_progress()
            .then(|| session.current_question().map(PublicQuestion::from))
            .flatten();

        let result = session.result().map(|summary| QuizResult {
            score: summary.score,
            total: summary.total,
            percentage: summary.percentage,
            passed: session.passed(),
            review: session
                .questions()
                .iter()
                .zip(session.answers())
                .map(|(question, answer)| ReviewItem {
                    question: question.clone(),
                    your_answer: answer.clone(),
                    correct: answer.as_ref().is_some_and(|a| question.is_correct(a)),
                })
                .collect(),
        });

        SessionView {
            id,
            status,
            current_question: session.position(),
            total_questions: session.questions().len(),
            time_left: session.time_left(),
            selected_answer: session.tentative().cloned(),
            answers: session.answers().to_vec(),
            score: session.score(),
            question,
            result,
        }
    }
}
