use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::readiness::scoring::refresh_readiness;
use crate::resume::annotator::{SharedAnnotator, TextAnnotator};
use crate::resume::extract::{extract_text, DocumentFormat};
use crate::resume::fields::{parse_resume_text, ParsedFields};
use crate::resume::ResumeError;
use crate::storage::DocumentStore;
use crate::store::PlacementStore;

#[derive(Debug, Serialize)]
pub struct ResumeIngestResponse {
    pub student_id: Uuid,
    pub fields: ParsedFields,
    pub readiness_score: f64,
}

/// Document bytes → structured fields. The extension hint picks the extractor;
/// anything but PDF or DOCX is rejected before any parsing happens.
pub fn extract_resume_fields(
    bytes: &[u8],
    extension_hint: &str,
    annotator: Option<&dyn TextAnnotator>,
) -> Result<ParsedFields, ResumeError> {
    let format = DocumentFormat::from_extension(extension_hint)?;
    let text = extract_text(bytes, format);
    Ok(parse_resume_text(&text, annotator))
}

/// Parses a resume and merges the extracted fields into the student's profile,
/// then recomputes readiness.
///
/// Extraction and regex work run on the blocking pool. An unsupported format
/// fails before the profile is touched.
pub async fn ingest_resume(
    store: &dyn PlacementStore,
    annotator: &SharedAnnotator,
    student_id: Uuid,
    bytes: Bytes,
    extension_hint: &str,
) -> Result<ResumeIngestResponse, AppError> {
    let format = DocumentFormat::from_extension(extension_hint)?;
    // 404 before doing any document work
    store.get_student(student_id).await?;

    let annotator = annotator.clone();
    let fields = tokio::task::spawn_blocking(move || {
        let text = extract_text(&bytes, format);
        parse_resume_text(&text, annotator.as_deref())
    })
    .await
    .map_err(|e| anyhow::anyhow!("Resume parsing task failed: {e}"))?;

    let update = fields.to_profile_update();
    if update.is_empty() {
        info!("No fields extracted from resume of student {student_id}");
    } else {
        store.save_profile_update(student_id, &update).await?;
    }

    let readiness_score = refresh_readiness(store, student_id).await?;

    Ok(ResumeIngestResponse {
        student_id,
        fields,
        readiness_score,
    })
}

/// Re-runs ingestion on the student's stored resume. `Ok(None)` when no
/// resume has been uploaded.
pub async fn reparse_stored_resume(
    store: &dyn PlacementStore,
    documents: &dyn DocumentStore,
    annotator: &SharedAnnotator,
    student_id: Uuid,
) -> Result<Option<ResumeIngestResponse>, AppError> {
    let profile = store.get_student(student_id).await?;
    let Some(key) = profile.resume_key else {
        return Ok(None);
    };
    let format = DocumentFormat::from_filename(&key)?;
    let data = documents.get(&key).await?;
    let response = ingest_resume(store, annotator, student_id, data, format.extension()).await?;
    Ok(Some(response))
}
