//! Placement "predictions". There is no trained model behind these: they are
//! fixed linear rescalings of the readiness score and the job match percentage.

use crate::readiness::scoring::round2;

/// Overall placement chance: `readiness * 0.95`, capped at 100. Unknown → 0.
pub fn predict_overall(readiness: Option<f64>) -> f64 {
    match readiness {
        Some(score) => round2((score * 0.95).min(100.0)),
        None => 0.0,
    }
}

/// Job-specific placement chance from a match percentage in 0–100.
pub fn predict_for_match(match_percentage: f64) -> f64 {
    let m = match_percentage;
    if m >= 100.0 {
        98.0
    } else if m >= 75.0 {
        round2(m * 0.90 + 10.0)
    } else if m >= 50.0 {
        round2(m * 0.70 + 10.0)
    } else {
        round2(m * 0.50)
    }
}
