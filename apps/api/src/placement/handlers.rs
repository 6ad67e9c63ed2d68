use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::ApplicationRow;
use crate::placement::apply::apply_for_job;
use crate::placement::board::{student_job_board, JobBoard, JobBoardQuery};
use crate::placement::review::{
    rank_all_applications, review_applications, ApplicationReview, RankedApplication,
    ReviewFilters, ReviewQuery,
};
use crate::placement::students::{student_directory, DirectoryQuery, StudentDirectory};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub student_id: Uuid,
}

/// GET /api/v1/students/:id/jobs?filter=all|eligible&q=
pub async fn handle_job_board(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Query(query): Query<JobBoardQuery>,
) -> Result<Json<JobBoard>, AppError> {
    let today = Utc::now().date_naive();
    let board = student_job_board(
        state.store.as_ref(),
        state.documents.as_ref(),
        &state.annotator,
        student_id,
        &query,
        today,
    )
    .await?;
    Ok(Json(board))
}

/// POST /api/v1/jobs/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let row = apply_for_job(state.store.as_ref(), req.student_id, job_id).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/jobs/:id/applications
pub async fn handle_review_applications(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<ApplicationReview>, AppError> {
    let filters = ReviewFilters::try_from(&query)?;
    let review = review_applications(state.store.as_ref(), job_id, &filters).await?;
    Ok(Json(review))
}

/// GET /api/v1/applications
/// Every application across all jobs, best match first.
pub async fn handle_rank_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<RankedApplication>>, AppError> {
    let ranked = rank_all_applications(state.store.as_ref()).await?;
    Ok(Json(ranked))
}

/// GET /api/v1/students?q=&branch=&min_cgpa=&max_backlogs=
pub async fn handle_student_directory(
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> Result<Json<StudentDirectory>, AppError> {
    let students = student_directory(state.store.as_ref(), &query).await?;
    Ok(Json(students))
}
