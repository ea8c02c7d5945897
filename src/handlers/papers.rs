// src/handlers/papers.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    error::AppError,
    models::{
        paper::{ResearchPaper, SearchPapersResponse},
        study::SearchPapersRequest,
    },
    state::AppState,
    utils::validated_json::ValidatedJson,
};

const SEARCH_FAILED: &str = "Failed to search papers. Please try again.";
const NO_PAPERS: &str = "No papers found for your query.";

/// Searches arXiv and attaches a short AI summary to every hit.
///
/// Summaries are generated one paper at a time. A paper whose summary can't
/// be generated gets the start of its abstract instead.
pub async fn search_papers(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SearchPapersRequest>,
) -> Result<impl IntoResponse, AppError> {
    let query = payload.query.trim();

    let entries = state.papers.search(query).await.map_err(|e| {
        tracing::error!("Paper search for {:?} failed: {}", query, e);
        AppError::UpstreamParse(SEARCH_FAILED.to_string())
    })?;

    tracing::info!("Paper search for {:?} returned {} entries", query, entries.len());

    if entries.is_empty() {
        return Ok(Json(SearchPapersResponse {
            papers: Vec::new(),
            message: Some(NO_PAPERS.to_string()),
        }));
    }

    let mut papers = Vec::with_capacity(entries.len());
    for entry in entries {
        let summary = state
            .orchestrator
            .summarize_paper_or_excerpt(&entry.abstract_text)
            .await;
        papers.push(ResearchPaper::new(entry, summary));
    }

    Ok(Json(SearchPapersResponse {
        papers,
        message: None,
    }))
}
