use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::extract::DocumentFormat;
use crate::resume::ingest::{ingest_resume, reparse_stored_resume, ResumeIngestResponse};
use crate::state::AppState;
use crate::storage::resume_key;

/// POST /api/v1/students/:id/resume
/// Multipart upload with a single `file` field (PDF or DOCX).
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ResumeIngestResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let format = DocumentFormat::from_filename(&file_name)?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some((format, data));
    }

    let (format, data) =
        upload.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if data.len() > state.max_resume_bytes {
        return Err(AppError::Validation(format!(
            "File too large. Maximum size is {} bytes",
            state.max_resume_bytes
        )));
    }

    // Profile must exist before anything is written to storage.
    state.store.get_student(student_id).await?;

    let key = resume_key(student_id, format.extension());
    state
        .documents
        .put(&key, data.clone(), format.content_type())
        .await?;
    state.store.set_resume_key(student_id, &key).await?;
    info!("Stored resume for student {student_id} ({} bytes)", data.len());

    let response = ingest_resume(
        state.store.as_ref(),
        &state.annotator,
        student_id,
        data,
        format.extension(),
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/students/:id/resume/parse
/// Re-runs extraction on the stored resume.
pub async fn handle_reparse_resume(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<ResumeIngestResponse>, AppError> {
    reparse_stored_resume(
        state.store.as_ref(),
        state.documents.as_ref(),
        &state.annotator,
        student_id,
    )
    .await?
    .map(Json)
    .ok_or_else(|| AppError::NotFound(format!("No resume uploaded for student {student_id}")))
}
