// src/models/question.rs

use serde::{Deserialize, Serialize};

/// A generated quiz question. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// The question text shown to the student.
    #[serde(rename = "question")]
    pub prompt: String,

    #[serde(flatten)]
    pub kind: QuestionKind,

    /// Why the correct answer is correct.
    pub explanation: String,
}

/// Shape of a question and its correct answer.
/// Serialized with a `type` tag using the model's vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice {
        options: Vec<String>,
        #[serde(rename = "correctAnswer")]
        correct_answer: usize,
    },
    TrueFalse {
        #[serde(rename = "correctAnswer")]
        correct_answer: bool,
    },
    FillBlank {
        #[serde(rename = "correctAnswer")]
        correct_answer: String,
    },
}

/// Question types a caller may ask the advanced quiz generator for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    FillBlank,
}

impl QuestionType {
    pub const ALL: [QuestionType; 3] = [
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::FillBlank,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::TrueFalse => "true-false",
            QuestionType::FillBlank => "fill-blank",
        }
    }
}

/// A student's answer: an option index, a boolean or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Choice(usize),
    Bool(bool),
    Text(String),
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        match self.kind {
            QuestionKind::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionKind::TrueFalse { .. } => QuestionType::TrueFalse,
            QuestionKind::FillBlank { .. } => QuestionType::FillBlank,
        }
    }

    /// Whether `answer` is the correct answer to this question.
    /// An answer of the wrong shape never matches.
    pub fn is_correct(&self, answer: &Answer) -> bool {
        match (&self.kind, answer) {
            (QuestionKind::MultipleChoice { correct_answer, .. }, Answer::Choice(choice)) => {
                choice == correct_answer
            }
            (QuestionKind::TrueFalse { correct_answer }, Answer::Bool(value)) => {
                value == correct_answer
            }
            (QuestionKind::FillBlank { correct_answer }, Answer::Text(text)) => {
                text.trim().to_lowercase() == correct_answer.trim().to_lowercase()
            }
            _ => false,
        }
    }

    /// Checks the invariants a generated question must satisfy before it can
    /// be used in a session.
    pub fn check(&self) -> Result<(), String> {
        if self.prompt.trim().is_empty() {
            return Err("question text is empty".to_string());
        }
        if let QuestionKind::MultipleChoice {
            options,
            correct_answer,
        } = &self.kind
        {
            if options.is_empty() {
                return Err(format!("question '{}' has no options", self.prompt));
            }
            if *correct_answer >= options.len() {
                return Err(format!(
                    "question '{}' points at option {} of {}",
                    self.prompt,
                    correct_answer,
                    options.len()
                ));
            }
        }
        Ok(())
    }

    /// The correct answer expressed as an `Answer`.
    pub fn correct_answer(&self) -> Answer {
        match &self.kind {
            QuestionKind::MultipleChoice { correct_answer, .. } => Answer::Choice(*correct_answer),
            QuestionKind::TrueFalse { correct_answer } => Answer::Bool(*correct_answer),
            QuestionKind::FillBlank { correct_answer } => Answer::Text(correct_answer.clone()),
        }
    }
}

/// DTO for sending a question to the client while the quiz is running
/// (excludes the correct answer and the explanation).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl From<&Question> for PublicQuestion {
    fn from(question: &Question) -> Self {
        let options = match &question.kind {
            QuestionKind::MultipleChoice { options, .. } => Some(options.clone()),
            QuestionKind::TrueFalse { .. } | QuestionKind::FillBlank { .. } => None,
        };
        PublicQuestion {
            prompt: question.prompt.clone(),
            question_type: question.question_type(),
            options,
        }
    }
}
