use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::readiness::prediction::predict_overall;
use crate::readiness::scoring::refresh_readiness;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub student_id: Uuid,
    pub readiness_score: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub readiness_score: Option<f64>,
    pub placement_chance: f64,
}

/// POST /api/v1/students/:id/readiness
pub async fn handle_refresh_readiness(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<ReadinessResponse>, AppError> {
    let readiness_score = refresh_readiness(state.store.as_ref(), student_id).await?;
    Ok(Json(ReadinessResponse {
        student_id,
        readiness_score,
    }))
}

/// GET /api/v1/students/:id/prediction
/// Readiness is refreshed first when both CGPA and backlogs are known.
pub async fn handle_prediction(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<PredictionResponse>, AppError> {
    let profile = state.store.get_student(student_id).await?;
    let readiness_score = if profile.cgpa.is_some() && profile.backlogs.is_some() {
        Some(refresh_readiness(state.store.as_ref(), student_id).await?)
    } else {
        profile.placement_readiness_score
    };
    Ok(Json(PredictionResponse {
        readiness_score,
        placement_chance: predict_overall(readiness_score),
    }))
}
