//! Student job board: open jobs scored against one student.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::eligibility::criteria::parse_criteria;
use crate::eligibility::evaluator::{evaluate_criteria, EvaluationMode};
use crate::eligibility::match_score::MatchResult;
use crate::errors::AppError;
use crate::models::job::JobRow;
use crate::models::student::StudentProfileRow;
use crate::readiness::prediction::predict_for_match;
use crate::readiness::scoring::refresh_readiness;
use crate::resume::annotator::SharedAnnotator;
use crate::resume::ingest::reparse_stored_resume;
use crate::storage::DocumentStore;
use crate::store::PlacementStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoardFilter {
    #[default]
    All,
    Eligible,
}

#[derive(Debug, Default, Deserialize)]
pub struct JobBoardQuery {
    /// `eligible` keeps only jobs the student can apply to. Anything else
    /// shows every open job.
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

impl JobBoardQuery {
    pub fn board_filter(&self) -> BoardFilter {
        match self.filter.as_deref() {
            Some("eligible") => BoardFilter::Eligible,
            _ => BoardFilter::All,
        }
    }

    fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// A job with its score for the requesting student.
#[derive(Debug, Clone, Serialize)]
pub struct JobBoardEntry {
    pub job: JobRow,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
    pub placement_chance: f64,
    pub applied: bool,
}

#[derive(Debug, Serialize)]
pub struct JobBoard {
    pub student_id: Uuid,
    /// `None` until readiness has been computed for this student.
    pub readiness_score: Option<f64>,
    pub jobs: Vec<JobBoardEntry>,
}

/// A stored readiness of exactly zero is treated as stale: the stored resume
/// (if any) is parsed again and readiness recomputed. A missing score is left
/// alone. Re-parse failures are logged and do not fail the board.
async fn refresh_stale_profile(
    store: &dyn PlacementStore,
    documents: &dyn DocumentStore,
    annotator: &SharedAnnotator,
    student: StudentProfileRow,
) -> Result<StudentProfileRow, AppError> {
    if student.placement_readiness_score != Some(0.0) {
        return Ok(student);
    }
    let student_id = student.id;
    if let Err(e) = reparse_stored_resume(store, documents, annotator, student_id).await {
        warn!("Resume re-parse for student {student_id} failed: {e}");
    }
    refresh_readiness(store, student_id).await?;
    store.get_student(student_id).await
}

/// Builds the job board for a student as of `today`.
///
/// Jobs are scored in `ApplicationGate` mode so the board agrees with what
/// `apply_for_job` will accept. Sorted by match percentage, highest first;
/// equal percentages keep the store's newest-first order.
pub async fn student_job_board(
    store: &dyn PlacementStore,
    documents: &dyn DocumentStore,
    annotator: &SharedAnnotator,
    student_id: Uuid,
    query: &JobBoardQuery,
    today: NaiveDate,
) -> Result<JobBoard, AppError> {
    let student = store.get_student(student_id).await?;
    let student = refresh_stale_profile(store, documents, annotator, student).await?;
    let readiness_score = student.placement_readiness_score;

    let attributes = student.attributes();
    let applied: HashSet<Uuid> = store.applied_job_ids(student_id).await?.into_iter().collect();
    let filter = query.board_filter();
    let search = query.search();

    let mut jobs: Vec<JobBoardEntry> = store
        .list_open_jobs(today)
        .await?
        .into_iter()
        .filter(|job| search.map_or(true, |q| job.matches_query(q)))
        .map(|job| {
            let criteria = parse_criteria(&job.eligibility_criteria);
            let match_result =
                evaluate_criteria(&criteria, &attributes, EvaluationMode::ApplicationGate);
            JobBoardEntry {
                placement_chance: predict_for_match(match_result.match_percentage),
                applied: applied.contains(&job.id),
                job,
                match_result,
            }
        })
        .filter(|entry| filter == BoardFilter::All || entry.match_result.hard_eligible)
        .collect();

    jobs.sort_by(|a, b| {
        b.match_result
            .match_percentage
            .total_cmp(&a.match_result.match_percentage)
    });

    Ok(JobBoard {
        student_id,
        readiness_score,
        jobs,
    })
}
