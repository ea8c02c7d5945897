// src/quiz/session.rs

//! Quiz session state machine.
//!
//! A session moves `Loading -> InProgress -> Completed`, or `Loading -> Error`
//! when no usable questions arrive. Every transition is a plain function of
//! the current session, the event and the clock reading passed in, so the
//! machine carries no timers or storage of its own. The caller persists the
//! history entry a transition hands back.

use chrono::{DateTime, Utc};

use crate::{
    config::PASSING_SCORE_PERCENTAGE,
    models::{
        question::{Answer, Question},
        quiz::QuizHistoryEntry,
    },
    utils::text::percentage,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Loading,
    InProgress,
    Completed,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizEvent {
    /// Question generation finished.
    Loaded(Vec<Question>),
    /// Question generation failed with a user-facing message.
    LoadFailed(String),
    /// Tentative choice for the current question.
    Select(Answer),
    Advance,
    Retreat,
    /// One time unit elapsed.
    Tick,
    Retry,
}

/// Result of applying one event.
#[derive(Debug)]
pub struct Transition {
    pub session: QuizSession,
    /// Set only on the transition that enters `Completed`.
    pub completed: Option<QuizHistoryEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    phase: Phase,
    questions: Vec<Question>,
    position: usize,
    tentative: Option<Answer>,
    answers: Vec<Option<Answer>>,
    score: usize,
    time_left: u32,
    time_limit: u32,
    result: Option<QuizHistoryEntry>,
}

impl QuizSession {
    /// A session waiting for its questions.
    pub fn new(time_limit: u32) -> Self {
        QuizSession {
            phase: Phase::Loading,
            questions: Vec::new(),
            position: 0,
            tentative: None,
            answers: Vec::new(),
            score: 0,
            time_left: time_limit,
            time_limit,
            result: None,
        }
    }

    pub fn apply(mut self, event: QuizEvent, now: DateTime<Utc>) -> Transition {
        let mut completed = None;

        match event {
            QuizEvent::Loaded(questions) if self.phase == Phase::Loading => {
                if questions.is_empty() {
                    self.phase = Phase::Error(
                        "No questions were generated. Please try again.".to_string(),
                    );
                } else {
                    self.answers = vec![None; questions.len()];
                    self.questions = questions;
                    self.restart();
                }
            }
            QuizEvent::LoadFailed(message) if self.phase == Phase::Loading => {
                self.phase = Phase::Error(message);
            }
            QuizEvent::Select(answer) if self.phase == Phase::InProgress => {
                self.tentative = Some(answer);
            }
            QuizEvent::Advance if self.phase == Phase::InProgress => {
                completed = self.advance(now);
            }
            QuizEvent::Tick if self.phase == Phase::InProgress => {
                self.time_left = self.time_left.saturating_sub(1);
                if self.time_left == 0 {
                    completed = self.advance(now);
                }
            }
            QuizEvent::Retreat if self.phase == Phase::InProgress => {
                if self.position > 0 {
                    self.position -= 1;
                    self.tentative = self.answers[self.position].clone();
                    self.time_left = self.time_limit;
                }
            }
            QuizEvent::Retry if self.phase == Phase::Completed => {
                self.answers = vec![None; self.questions.len()];
                self.restart();
            }
            // Anything else doesn't apply to the current phase.
            _ => {}
        }

        Transition {
            session: self,
            completed,
        }
    }

    fn restart(&mut self) {
        self.phase = Phase::InProgress;
        self.position = 0;
        self.tentative = None;
        self.score = 0;
        self.time_left = self.time_limit;
        self.result = None;
    }

    /// Commits the tentative answer and moves on, completing the session after
    /// the last question.
    fn advance(&mut self, now: DateTime<Utc>) -> Option<QuizHistoryEntry> {
        self.answers[self.position] = self.tentative.take();
        self.score = self
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(question, answer)| answer.as_ref().is_some_and(|a| question.is_correct(a)))
            .count();

        if self.position + 1 < self.questions.len() {
            self.position += 1;
            self.time_left = self.time_limit;
            return None;
        }

        let total = self.questions.len();
        let entry = QuizHistoryEntry {
            date: now,
            score: self.score,
            total,
            percentage: percentage(self.score, total),
        };
        self.phase = Phase::Completed;
        self.result = Some(entry.clone());
        Some(entry)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase == Phase::InProgress
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.position)
    }

    pub fn tentative(&self) -> Option<&Answer> {
        self.tentative.as_ref()
    }

    pub fn answers(&self) -> &[Option<Answer>] {
        &self.answers
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Summary of the completed run, if the session is completed.
    pub fn result(&self) -> Option<&QuizHistoryEntry> {
        self.result.as_ref()
    }

    pub fn passed(&self) -> bool {
        self.result
            .as_ref()
            .is_some_and(|r| r.percentage >= PASSING_SCORE_PERCENTAGE)
    }
}
