use axum::Json;
use serde::Deserialize;

use crate::eligibility::evaluator::{evaluate_eligibility, EvaluationMode, StudentAttributes};
use crate::eligibility::match_score::MatchResult;

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub eligibility_criteria: String,
    pub student: StudentAttributes,
    #[serde(default)]
    pub mode: EvaluationMode,
}

/// POST /api/v1/eligibility/evaluate
/// Stateless: scores the posted student against the posted criteria text.
pub async fn handle_evaluate(Json(req): Json<EvaluateRequest>) -> Json<MatchResult> {
    Json(evaluate_eligibility(
        &req.eligibility_criteria,
        &req.student,
        req.mode,
    ))
}
