//! Admin review: applications for a job, filtered and ranked by match, and
//! the cross-job ranking of every application.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::eligibility::criteria::{parse_criteria, EligibilityCriteria};
use crate::eligibility::evaluator::{evaluate_criteria, EvaluationMode};
use crate::eligibility::match_score::MatchResult;
use crate::errors::AppError;
use crate::models::job::{ApplicationRow, ApplicationStatus, JobRow};
use crate::models::student::StudentProfileRow;
use crate::placement::query::{non_blank, parse_param};
use crate::store::{ApplicationWithStudent, PlacementStore};

/// Raw query string. Every field is a string so that blank values from an
/// empty filter form are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewQuery {
    pub min_cgpa: Option<String>,
    pub branch: Option<String>,
    pub max_backlogs: Option<String>,
    pub skills: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<&ReviewQuery> for ReviewFilters {
    type Error = AppError;

    fn try_from(query: &ReviewQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            min_cgpa: parse_param("min_cgpa", &query.min_cgpa)?,
            branch: non_blank(&query.branch).map(str::to_string),
            max_backlogs: parse_param("max_backlogs", &query.max_backlogs)?,
            skills: non_blank(&query.skills).map(str::to_string),
            status: parse_param("status", &query.status)?,
        })
    }
}

#[derive(Debug, Default)]
pub struct ReviewFilters {
    pub min_cgpa: Option<f64>,
    /// Case-insensitive substring of the student's branch.
    pub branch: Option<String>,
    pub max_backlogs: Option<i32>,
    /// Comma-separated; every item must appear in the student's skills.
    pub skills: Option<String>,
    pub status: Option<ApplicationStatus>,
}

impl ReviewFilters {
    /// Students with unknown CGPA or backlogs never pass the numeric filters.
    pub fn admits(&self, row: &ApplicationWithStudent) -> bool {
        let student = &row.student;
        if let Some(min) = self.min_cgpa {
            if !student.cgpa.is_some_and(|c| c >= min) {
                return false;
            }
        }
        if let Some(branch) = non_blank(&self.branch) {
            if !student.branch.to_lowercase().contains(&branch.to_lowercase()) {
                return false;
            }
        }
        if let Some(max) = self.max_backlogs {
            if !student.backlogs.is_some_and(|b| b <= max) {
                return false;
            }
        }
        if let Some(skills) = non_blank(&self.skills) {
            let have = student.skills.to_lowercase();
            if !skills
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .all(|s| have.contains(&s))
            {
                return false;
            }
        }
        if let Some(status) = self.status {
            if row.application.status != status {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredApplication {
    pub application: ApplicationRow,
    pub student: StudentProfileRow,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
    pub recommendation_label: &'static str,
    pub recommendation_slug: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicationReview {
    pub job: JobRow,
    pub total_applications: usize,
    pub applications: Vec<ScoredApplication>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedApplication {
    pub application: ApplicationRow,
    pub student: StudentProfileRow,
    pub job: JobRow,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
    pub recommendation_label: &'static str,
    pub recommendation_slug: String,
}

fn score(criteria: &EligibilityCriteria, student: &StudentProfileRow) -> MatchResult {
    evaluate_criteria(criteria, &student.attributes(), EvaluationMode::AdminReview)
}

/// Scores every application that passes `filters` in `AdminReview` mode and
/// ranks them best first. Ties keep newest-first application order.
pub async fn review_applications(
    store: &dyn PlacementStore,
    job_id: Uuid,
    filters: &ReviewFilters,
) -> Result<ApplicationReview, AppError> {
    let job = store.get_job(job_id).await?;
    let rows = store.applications_for_job(job_id).await?;
    let total_applications = rows.len();
    let criteria = parse_criteria(&job.eligibility_criteria);

    let mut applications: Vec<ScoredApplication> = rows
        .into_iter()
        .filter(|row| filters.admits(row))
        .map(|row| {
            let match_result = score(&criteria, &row.student);
            ScoredApplication {
                recommendation_label: match_result.recommendation.label(),
                recommendation_slug: match_result.recommendation.slug(),
                application: row.application,
                student: row.student,
                match_result,
            }
        })
        .collect();

    applications.sort_by(|a, b| {
        b.match_result
            .match_percentage
            .total_cmp(&a.match_result.match_percentage)
    });

    Ok(ApplicationReview {
        job,
        total_applications,
        applications,
    })
}

/// Every application across all jobs, each scored against its own job's
/// criteria and ranked best first. Criteria are parsed once per job.
pub async fn rank_all_applications(
    store: &dyn PlacementStore,
) -> Result<Vec<RankedApplication>, AppError> {
    let rows = store.all_applications().await?;
    let mut criteria_by_job: HashMap<Uuid, EligibilityCriteria> = HashMap::new();

    let mut ranked: Vec<RankedApplication> = rows
        .into_iter()
        .map(|row| {
            let criteria = criteria_by_job
                .entry(row.job.id)
                .or_insert_with(|| parse_criteria(&row.job.eligibility_criteria));
            let match_result = score(criteria, &row.student);
            RankedApplication {
                recommendation_label: match_result.recommendation.label(),
                recommendation_slug: match_result.recommendation.slug(),
                application: row.application,
                student: row.student,
                job: row.job,
                match_result,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.match_result
            .match_percentage
            .total_cmp(&a.match_result.match_percentage)
    });
    Ok(ranked)
}
