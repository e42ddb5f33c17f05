//! Axum route handlers for the Extraction API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::document::extract_text_blocking;
use crate::errors::AppError;
use crate::extraction::ResumeRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub record: ResumeRecord,
    pub text_length: usize,
}

/// POST /api/v1/extract
///
/// Extracts a structured record from raw resume text. Blank text is valid
/// input and yields an empty record.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ResumeRecord>, AppError> {
    Ok(Json(state.extractor.extract(&request.text).await))
}

/// POST /api/v1/extract/upload
///
/// Multipart upload with a `file` field (PDF, DOCX or plain text). Unreadable
/// documents produce an empty record rather than an error.
pub async fn handle_extract_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let text = extract_text_blocking(file_name.clone(), content_type, data).await;
        info!(
            "Extracted {} characters from upload {:?}",
            text.chars().count(),
            file_name
        );

        let record = state.extractor.extract(&text).await;
        return Ok(Json(UploadResponse {
            record,
            text_length: text.chars().count(),
        }));
    }

    Err(AppError::Validation(
        "multipart body must contain a 'file' field".to_string(),
    ))
}
