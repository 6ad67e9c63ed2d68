//! Readiness Scorer: 0–100 profile completeness/quality score per student.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::eligibility::evaluator::StudentAttributes;
use crate::errors::AppError;
use crate::store::PlacementStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessWeights {
    pub cgpa: f64,
    pub backlogs: f64,
    pub skills: f64,
    pub resume: f64,
    pub experience: f64,
}

impl Default for ReadinessWeights {
    fn default() -> Self {
        Self {
            cgpa: 30.0,
            backlogs: 30.0,
            skills: 20.0,
            resume: 10.0,
            experience: 10.0,
        }
    }
}

const MAX_READINESS: f64 = 100.0;

/// Weighted readiness, each component capped at its weight, total capped at
/// 100 and rounded to 2 decimals.
///
/// - CGPA: `cgpa / 10 * 30`
/// - Backlogs: 0 → 30, 1 → 15, 2+ → 3, unknown → 0
/// - Skills non-empty: 20
/// - Resume uploaded: 10
/// - Experience non-empty: 10
pub fn compute_readiness(student: &StudentAttributes) -> f64 {
    let w = ReadinessWeights::default();
    let mut score = 0.0;

    if let Some(cgpa) = student.cgpa {
        score += (cgpa / 10.0 * w.cgpa).min(w.cgpa);
    }

    score += match student.backlogs {
        Some(0) => w.backlogs,
        Some(1) => w.backlogs * 0.5,
        Some(_) => w.backlogs * 0.1,
        None => 0.0,
    };

    if !student.skills.is_empty() {
        score += w.skills;
    }
    if student.resume_present {
        score += w.resume;
    }
    if student.experience_present {
        score += w.experience;
    }

    round2(score.min(MAX_READINESS))
}

/// Recomputes readiness from the stored profile and persists only the score.
pub async fn refresh_readiness(
    store: &dyn PlacementStore,
    student_id: Uuid,
) -> Result<f64, AppError> {
    let profile = store.get_student(student_id).await?;
    let score = compute_readiness(&profile.attributes());
    store.update_readiness_score(student_id, score).await?;
    info!("Readiness for student {student_id} set to {score}");
    Ok(score)
}

/// Rounds the exact binary value to 2 decimals, ties to even. `7.125` is
/// `7.12`, while `2.675` (stored just below) is `2.67`.
pub(crate) fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
