use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::eligibility::evaluator::StudentAttributes;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentProfileRow {
    pub id: Uuid,
    pub roll_number: String,
    pub branch: String,
    pub cgpa: Option<f64>,
    pub backlogs: Option<i32>,
    /// Comma-joined skill tokens.
    pub skills: String,
    /// Newline-joined institution/degree lines.
    pub education: String,
    /// Newline-joined experience sentences.
    pub experience: String,
    pub phone_number: String,
    /// Object key of the uploaded resume, if any.
    pub resume_key: Option<String>,
    pub placement_readiness_score: Option<f64>,
}

impl StudentProfileRow {
    /// Scoring view of the profile. A negative stored backlog count is
    /// treated as unknown.
    pub fn attributes(&self) -> StudentAttributes {
        StudentAttributes {
            branch: self.branch.clone(),
            cgpa: self.cgpa,
            backlogs: self.backlogs.and_then(|b| u32::try_from(b).ok()),
            skills: self.skills.clone(),
            resume_present: self.resume_key.is_some(),
            experience_present: !self.experience.is_empty(),
        }
    }
}
