// src/handlers/upload.rs

use std::path::Path;

use axum::{
    Json,
    extract::{Multipart, State},
    response::IntoResponse,
};

use crate::{
    clients::extractor::{DocumentKind, ExtractionError},
    error::AppError,
    models::study::ExtractTextResponse,
    state::AppState,
};

/// Extracts plain text from an uploaded PDF, DOCX or TXT file.
///
/// Expects a multipart form with the document in the `file` field.
pub async fn extract_text(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    let file_type = Path::new(&file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    tracing::info!("Extracting text from {:?} ({} bytes)", file_name, bytes.len());

    // PDF parsing is CPU bound.
    let extractor = state.extractor.clone();
    let extension = file_type.clone();
    let text = tokio::task::spawn_blocking(move || extractor.extract(&bytes, &extension))
        .await
        .map_err(|e| {
            tracing::error!("Extraction task for {:?} failed: {}", file_name, e);
            match DocumentKind::from_extension(&file_type) {
                Some(kind) => AppError::Extraction(ExtractionError::Parse {
                    kind,
                    detail: e.to_string(),
                }),
                None => AppError::Extraction(ExtractionError::UnsupportedType(file_type.clone())),
            }
        })??;

    Ok(Json(ExtractTextResponse {
        text,
        file_name,
        file_type,
    }))
}
