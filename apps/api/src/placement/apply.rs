use tracing::info;
use uuid::Uuid;

use crate::eligibility::evaluator::{evaluate_eligibility, EvaluationMode};
use crate::errors::AppError;
use crate::models::job::ApplicationRow;
use crate::store::PlacementStore;

pub const NOT_ELIGIBLE_MESSAGE: &str = "You do not meet the eligibility criteria for this job.";

/// Creates an application if the student passes every hard requirement of
/// the job. Unknown CGPA or backlogs count as unmet when the job asks for them.
pub async fn apply_for_job(
    store: &dyn PlacementStore,
    student_id: Uuid,
    job_id: Uuid,
) -> Result<ApplicationRow, AppError> {
    let job = store.get_job(job_id).await?;
    let student = store.get_student(student_id).await?;

    if store.applied_job_ids(student_id).await?.contains(&job_id) {
        return Err(AppError::AlreadyApplied(job_id));
    }

    let result = evaluate_eligibility(
        &job.eligibility_criteria,
        &student.attributes(),
        EvaluationMode::ApplicationGate,
    );
    if !result.hard_eligible {
        info!("Student {student_id} rejected for job {job_id}: criteria not met");
        return Err(AppError::NotEligible(NOT_ELIGIBLE_MESSAGE.to_string()));
    }

    store.create_application(student_id, job_id).await
}
