//! Eligibility Evaluator: checks a student against parsed criteria.
//!
//! The same criteria are read two ways:
//! - `AdminReview`: informational. Unknown CGPA/backlogs drop that criterion
//!   from scoring, unmet ones only lower the percentage.
//! - `ApplicationGate`: blocking. Unknown CGPA/backlogs still count toward
//!   `max_score`, and any unmet or unknown requirement clears `hard_eligible`.
//!
//! `hard_eligible` is computed identically in both modes.

use serde::{Deserialize, Serialize};

use crate::eligibility::criteria::{parse_criteria, EligibilityCriteria};
use crate::eligibility::match_score::MatchResult;

/// Student attributes read by scoring. Owned by the profile store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentAttributes {
    pub branch: String,
    pub cgpa: Option<f64>,
    pub backlogs: Option<u32>,
    /// Comma-joined skill tokens.
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub resume_present: bool,
    #[serde(default)]
    pub experience_present: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    #[default]
    AdminReview,
    ApplicationGate,
}

/// Parses `criteria_text` and evaluates the student against it.
pub fn evaluate_eligibility(
    criteria_text: &str,
    student: &StudentAttributes,
    mode: EvaluationMode,
) -> MatchResult {
    evaluate_criteria(&parse_criteria(criteria_text), student, mode)
}

pub fn evaluate_criteria(
    criteria: &EligibilityCriteria,
    student: &StudentAttributes,
    mode: EvaluationMode,
) -> MatchResult {
    let gate = mode == EvaluationMode::ApplicationGate;
    let mut tally = Tally::default();

    if criteria.has_branch_criterion() {
        tally.record(criteria.admits_branch(&student.branch));
    }

    if let Some(min_cgpa) = criteria.min_cgpa {
        match student.cgpa {
            Some(cgpa) => tally.record(cgpa >= min_cgpa),
            None => tally.unknown(gate),
        }
    }

    if let Some(policy) = criteria.backlog_policy {
        match student.backlogs {
            Some(backlogs) => tally.record(policy.permits(backlogs)),
            None => tally.unknown(gate),
        }
    }

    MatchResult::from_counts(tally.satisfied, tally.applicable, tally.hard_eligible)
}

struct Tally {
    satisfied: u32,
    applicable: u32,
    hard_eligible: bool,
}

impl Default for Tally {
    fn default() -> Self {
        Self {
            satisfied: 0,
            applicable: 0,
            hard_eligible: true,
        }
    }
}

impl Tally {
    fn record(&mut self, satisfied: bool) {
        self.applicable += 1;
        if satisfied {
            self.satisfied += 1;
        } else {
            self.hard_eligible = false;
        }
    }

    /// A required attribute the student has not provided.
    fn unknown(&mut self, counts: bool) {
        if counts {
            self.applicable += 1;
        }
        self.hard_eligible = false;
    }
}
