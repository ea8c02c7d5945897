// src/quiz/registry.rs

//! Live quiz sessions, keyed by id.
//!
//! The registry owns every running `QuizSession` and is the only place that
//! feeds events into them. Mutations of all sessions serialize on one mutex.
//! When a transition completes a session the entry is written to the history
//! store after the lock is released. Sessions whose client stopped polling
//! are expired by the ticker and never reach the history.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use chrono::Utc;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    config::COMPLETED_SESSION_TTL,
    error::AppError,
    models::{
        question::Question,
        quiz::{QuizHistoryEntry, SessionView},
    },
    quiz::session::{Phase, QuizEvent, QuizSession, Transition},
    storage::{HistoryStore, StorageError},
};

/// A hosted session plus the number of ticks since a client last touched it.
struct Slot {
    session: QuizSession,
    idle_ticks: u32,
}

impl Slot {
    fn new(session: QuizSession) -> Self {
        Slot {
            session,
            idle_ticks: 0,
        }
    }

    fn touch(&mut self) {
        self.idle_ticks = 0;
    }

    fn step(&mut self, event: QuizEvent) -> Option<QuizHistoryEntry> {
        let session = std::mem::replace(&mut self.session, QuizSession::new(0));
        let Transition { session, completed } = session.apply(event, Utc::now());
        self.session = session;
        completed
    }
}

#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, Slot>>>,
    history: HistoryStore,
    time_limit: u32,
}

impl SessionRegistry {
    pub fn new(history: HistoryStore, time_limit: u32) -> Self {
        SessionRegistry {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            history,
            time_limit,
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<Uuid, Slot>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ticks without a request after which a session counts as abandoned.
    /// A running session goes stale after one full question period, before
    /// an untouched countdown could finish the quiz on its own.
    fn idle_limit(&self, session: &QuizSession) -> u32 {
        if session.is_in_progress() {
            self.time_limit.max(1)
        } else {
            COMPLETED_SESSION_TTL
        }
    }

    /// Opens a session over freshly generated questions.
    /// A set the session can't run is reported as an error and not kept.
    pub fn start(&self, questions: Vec<Question>) -> Result<SessionView, AppError> {
        let Transition { session, .. } =
            QuizSession::new(self.time_limit).apply(QuizEvent::Loaded(questions), Utc::now());

        if let Phase::Error(message) = session.phase() {
            return Err(AppError::UpstreamParse(message.clone()));
        }

        let id = Uuid::new_v4();
        let view = SessionView::new(id, &session);
        self.sessions().insert(id, Slot::new(session));
        info!(
            "Quiz session {} started with {} questions",
            id, view.total_questions
        );
        Ok(view)
    }

    pub fn view(&self, id: Uuid) -> Result<SessionView, AppError> {
        let mut sessions = self.sessions();
        let slot = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        slot.touch();
        Ok(SessionView::new(id, &slot.session))
    }

    /// Feeds one event to a session and returns its new state.
    pub fn apply(&self, id: Uuid, event: QuizEvent) -> Result<SessionView, AppError> {
        let (view, completed) = {
            let mut sessions = self.sessions();
            let slot = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
            slot.touch();
            let completed = slot.step(event);
            (SessionView::new(id, &slot.session), completed)
        };

        if let Some(entry) = completed {
            self.persist(id, entry);
        }
        Ok(view)
    }

    /// Drops a session. Leaving mid-quiz records nothing.
    pub fn leave(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions().remove(&id).ok_or_else(|| not_found(id))?;
        info!("Quiz session {} closed", id);
        Ok(())
    }

    /// Advances every running session's countdown by one unit.
    ///
    /// Sessions nobody has touched for their idle limit are dropped first,
    /// without recording anything.
    pub fn tick_all(&self) {
        let mut completed: Vec<(Uuid, QuizHistoryEntry)> = Vec::new();
        {
            let mut sessions = self.sessions();
            sessions.retain(|id, slot| {
                slot.idle_ticks += 1;
                if slot.idle_ticks >= self.idle_limit(&slot.session) {
                    info!("Quiz session {} expired after {} idle ticks", id, slot.idle_ticks);
                    return false;
                }
                if slot.session.is_in_progress() {
                    if let Some(entry) = slot.step(QuizEvent::Tick) {
                        completed.push((*id, entry));
                    }
                }
                true
            });
        }

        for (id, entry) in completed {
            self.persist(id, entry);
        }
    }

    pub fn history(&self) -> Result<Vec<QuizHistoryEntry>, StorageError> {
        self.history.load()
    }

    pub fn clear_history(&self) -> Result<(), StorageError> {
        self.history.clear()
    }

    fn persist(&self, id: Uuid, entry: QuizHistoryEntry) {
        info!(
            "Quiz session {} completed: {}/{} ({}%)",
            id, entry.score, entry.total, entry.percentage
        );
        // The session already completed; a storage failure only loses the log line.
        if let Err(e) = self.history.record(entry) {
            error!("Failed to record quiz history for session {}: {}", id, e);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.sessions().len()
    }
}

/// Starts the countdown task that ticks every session once per `period`.
pub fn spawn_ticker(registry: SessionRegistry, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick fires immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            registry.tick_all();
        }
    })
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Quiz session {} not found", id))
}
