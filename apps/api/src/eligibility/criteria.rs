//! Criteria Parser: pulls branch, minimum-CGPA and backlog constraints out of a
//! free-text eligibility line such as `"Min CGPA 7.0, CSE/IT branches, No backlogs"`.
//!
//! Each constraint is independently optional. Absence means the text did not
//! mention it, never "zero". A numeric capture that fails to parse drops that
//! constraint entirely.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Branch codes recognised in eligibility text.
pub const BRANCH_CODES: &[&str] = &["cse", "it", "ece", "eee", "mech", "civil"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "codes")]
pub enum BranchConstraint {
    /// "all branches" / "any branch": open to everyone, not a scored criterion.
    Any,
    /// Branch codes found verbatim in the text.
    Listed(BTreeSet<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "n")]
pub enum BacklogPolicy {
    NoneAllowed,
    MaxN(u32),
}

impl BacklogPolicy {
    pub fn permits(&self, backlogs: u32) -> bool {
        match self {
            BacklogPolicy::NoneAllowed => backlogs == 0,
            BacklogPolicy::MaxN(n) => backlogs <= *n,
        }
    }
}

/// Structured view of a job's eligibility text. Recomputed per evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    /// Lower-cased source text. Branch satisfaction is checked against this.
    pub text: String,
    pub branch: Option<BranchConstraint>,
    pub min_cgpa: Option<f64>,
    pub backlog_policy: Option<BacklogPolicy>,
}

impl EligibilityCriteria {
    /// True when the branch constraint lists explicit codes (and so is scored).
    pub fn has_branch_criterion(&self) -> bool {
        matches!(self.branch, Some(BranchConstraint::Listed(_)))
    }

    /// Literal substring test of the student's branch against the whole text,
    /// not against the matched codes. `"it"` for instance matches "eligibility".
    pub fn admits_branch(&self, student_branch: &str) -> bool {
        self.text.contains(&student_branch.to_lowercase())
    }
}

fn min_cgpa_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:min(?:imum)?\s*)?cgpa\s*(\d+\.?\d*)").expect("valid min cgpa regex")
    })
}

fn backlog_any_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(no\s+backlogs|max(?:imum)?\s+backlogs\s+(\d+))")
            .expect("valid backlog regex")
    })
}

fn no_backlogs_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"no\s+backlogs").expect("valid no-backlogs regex"))
}

fn max_backlogs_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"max(?:imum)?\s+backlogs\s+(\d+)").expect("valid max-backlogs regex")
    })
}

/// Parses raw eligibility text (any case) into [`EligibilityCriteria`].
pub fn parse_criteria(raw: &str) -> EligibilityCriteria {
    let text = raw.to_lowercase();

    EligibilityCriteria {
        branch: parse_branch(&text),
        min_cgpa: parse_min_cgpa(&text),
        backlog_policy: parse_backlog_policy(&text),
        text,
    }
}

fn parse_branch(text: &str) -> Option<BranchConstraint> {
    if text.contains("all branches") || text.contains("any branch") {
        return Some(BranchConstraint::Any);
    }
    let codes: BTreeSet<String> = BRANCH_CODES
        .iter()
        .filter(|code| text.contains(*code))
        .map(|code| code.to_string())
        .collect();
    if codes.is_empty() {
        None
    } else {
        Some(BranchConstraint::Listed(codes))
    }
}

fn parse_min_cgpa(text: &str) -> Option<f64> {
    min_cgpa_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn parse_backlog_policy(text: &str) -> Option<BacklogPolicy> {
    if !backlog_any_re().is_match(text) {
        return None;
    }
    // "no backlogs" wins whenever it appears anywhere in the text.
    if no_backlogs_re().is_match(text) {
        return Some(BacklogPolicy::NoneAllowed);
    }
    max_backlogs_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map(BacklogPolicy::MaxN)
}
