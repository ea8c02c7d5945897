// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{papers, quiz, study, upload},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Study tools (summaries, flashcards, quizzes, tutor) under `/api`.
/// * Live quiz sessions and their history under `/api/quiz`.
/// * Applies global middleware (Trace, CORS, body limit).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let study_routes = Router::new()
        .route("/summarize", post(study::summarize))
        .route("/generate-flashcards", post(study::generate_flashcards))
        .route(
            "/flashcards",
            get(study::get_flashcards).delete(study::clear_flashcards),
        )
        .route("/generate-quiz", post(study::generate_quiz))
        .route("/generate-advanced-quiz", post(study::generate_advanced_quiz))
        .route("/summarize-paper", post(study::summarize_paper))
        .route("/tutor-chat", post(study::tutor_chat))
        .route("/search-papers", post(papers::search_papers))
        .route("/extract-text", post(upload::extract_text));

    let quiz_routes = Router::new()
        .route("/sessions", post(quiz::start_session))
        .route(
            "/sessions/{id}",
            get(quiz::get_session).delete(quiz::leave_session),
        )
        .route("/sessions/{id}/answer", post(quiz::select_answer))
        .route("/sessions/{id}/next", post(quiz::next_question))
        .route("/sessions/{id}/previous", post(quiz::previous_question))
        .route("/sessions/{id}/retry", post(quiz::retry_session))
        .route(
            "/history",
            get(quiz::get_history).delete(quiz::clear_history),
        );

    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .nest("/api", study_routes.nest("/quiz", quiz_routes))
        // Global Middleware (applied from outside in)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
