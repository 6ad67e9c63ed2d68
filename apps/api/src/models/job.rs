use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub company_name: String,
    pub job_role: String,
    pub description: String,
    pub salary_package: Option<String>,
    /// Free text, e.g. "Min CGPA 7.0, CSE/IT branches, No backlogs".
    pub eligibility_criteria: String,
    pub application_deadline: NaiveDate,
    pub posted_at: DateTime<Utc>,
}

impl JobRow {
    /// Case-insensitive search over the job's descriptive fields.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        [
            &self.company_name,
            &self.job_role,
            &self.description,
            &self.eligibility_criteria,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&q))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Rejected,
    InterviewScheduled,
    Selected,
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applied" => Ok(ApplicationStatus::Applied),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "interview_scheduled" => Ok(ApplicationStatus::InterviewScheduled),
            "selected" => Ok(ApplicationStatus::Selected),
            other => Err(format!("unknown application status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub job_id: Uuid,
    pub status: ApplicationStatus,
    pub admin_comments: Option<String>,
    pub applied_at: DateTime<Utc>,
}
