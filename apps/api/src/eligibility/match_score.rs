//! Match Scorer: turns per-criterion hits into a percentage and a triage tag.

use serde::{Deserialize, Serialize};

/// Categorical label for admin review triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    NoCriteria,
    StrongFit,
    AverageMatch,
    LowMatch,
}

impl Recommendation {
    /// Bands are inclusive at their lower bound: >=90 strong, >=60 average.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Recommendation::StrongFit
        } else if percentage >= 60.0 {
            Recommendation::AverageMatch
        } else {
            Recommendation::LowMatch
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::NoCriteria => "No Criteria",
            Recommendation::StrongFit => "Strong Fit",
            Recommendation::AverageMatch => "Average Match",
            Recommendation::LowMatch => "Low Match",
        }
    }

    /// Lower-case slug used for styling badges ("Strong Fit" -> "strong").
    pub fn slug(&self) -> String {
        self.label()
            .to_lowercase()
            .replace(" fit", "")
            .replace(" match", "")
    }
}

/// Outcome of scoring one student against one job's criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_score: u32,
    pub max_score: u32,
    pub match_percentage: f64,
    pub recommendation: Recommendation,
    pub hard_eligible: bool,
}

impl MatchResult {
    /// Builds the result from criterion counts. `max_score == 0` means no
    /// criterion was parsed, reported as 0% / `NoCriteria`.
    pub fn from_counts(match_score: u32, max_score: u32, hard_eligible: bool) -> Self {
        if max_score == 0 {
            return MatchResult {
                match_score,
                max_score,
                match_percentage: 0.0,
                recommendation: Recommendation::NoCriteria,
                hard_eligible,
            };
        }
        let match_percentage =
            (match_score as f64 / max_score as f64 * 100.0).round_ties_even();
        MatchResult {
            match_score,
            max_score,
            match_percentage,
            recommendation: Recommendation::from_percentage(match_percentage),
            hard_eligible,
        }
    }
}
