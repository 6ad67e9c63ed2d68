//! Persistence seam for profiles, jobs and applications.
//!
//! Handlers and the scoring pipeline only see `PlacementStore`; `AppState`
//! carries an `Arc<dyn PlacementStore>` backed by Postgres in production.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{ApplicationRow, JobRow};
use crate::models::student::StudentProfileRow;

/// Resume-derived profile fields. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub skills: Option<String>,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub phone_number: Option<String>,
    pub cgpa: Option<f64>,
    pub backlogs: Option<i32>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ProfileUpdate::default()
    }

    pub fn apply_to(&self, profile: &mut StudentProfileRow) {
        if let Some(v) = &self.skills {
            profile.skills = v.clone();
        }
        if let Some(v) = &self.education {
            profile.education = v.clone();
        }
        if let Some(v) = &self.experience {
            profile.experience = v.clone();
        }
        if let Some(v) = &self.phone_number {
            profile.phone_number = v.clone();
        }
        if let Some(v) = self.cgpa {
            profile.cgpa = Some(v);
        }
        if let Some(v) = self.backlogs {
            profile.backlogs = Some(v);
        }
    }
}

/// An application joined with the applying student.
#[derive(Debug, Clone)]
pub struct ApplicationWithStudent {
    pub application: ApplicationRow,
    pub student: StudentProfileRow,
}

/// An application joined with both its student and its job.
#[derive(Debug, Clone)]
pub struct ApplicationDetail {
    pub application: ApplicationRow,
    pub student: StudentProfileRow,
    pub job: JobRow,
}

#[async_trait]
pub trait PlacementStore: Send + Sync {
    async fn get_student(&self, id: Uuid) -> Result<StudentProfileRow, AppError>;

    /// Every profile, ordered by roll number.
    async fn list_students(&self) -> Result<Vec<StudentProfileRow>, AppError>;

    async fn save_profile_update(&self, id: Uuid, update: &ProfileUpdate)
        -> Result<(), AppError>;

    /// Writes `placement_readiness_score` and nothing else.
    async fn update_readiness_score(&self, id: Uuid, score: f64) -> Result<(), AppError>;

    async fn set_resume_key(&self, id: Uuid, key: &str) -> Result<(), AppError>;

    /// Jobs whose deadline is on or after `today`, newest first.
    async fn list_open_jobs(&self, today: NaiveDate) -> Result<Vec<JobRow>, AppError>;

    async fn get_job(&self, id: Uuid) -> Result<JobRow, AppError>;

    /// Applications for a job with their students, newest first.
    async fn applications_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationWithStudent>, AppError>;

    /// Applications across all jobs with student and job, newest first.
    async fn all_applications(&self) -> Result<Vec<ApplicationDetail>, AppError>;

    async fn applied_job_ids(&self, student_id: Uuid) -> Result<Vec<Uuid>, AppError>;

    /// Fails with `AlreadyApplied` if the pair already exists.
    async fn create_application(
        &self,
        student_id: Uuid,
        job_id: Uuid,
    ) -> Result<ApplicationRow, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres backend
// ────────────────────────────────────────────────────────────────────────────

pub struct PgPlacementStore {
    pool: PgPool,
}

impl PgPlacementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn students_by_id(
        &self,
        applications: &[ApplicationRow],
    ) -> Result<HashMap<Uuid, StudentProfileRow>, AppError> {
        let student_ids: Vec<Uuid> = applications.iter().map(|a| a.student_id).collect();
        let students = sqlx::query_as::<_, StudentProfileRow>(
            "SELECT * FROM student_profiles WHERE id = ANY($1)",
        )
        .bind(&student_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(students.into_iter().map(|s| (s.id, s)).collect())
    }
}

#[async_trait]
impl PlacementStore for PgPlacementStore {
    async fn get_student(&self, id: Uuid) -> Result<StudentProfileRow, AppError> {
        sqlx::query_as::<_, StudentProfileRow>("SELECT * FROM student_profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student {id} not found")))
    }

    async fn list_students(&self) -> Result<Vec<StudentProfileRow>, AppError> {
        let students = sqlx::query_as::<_, StudentProfileRow>(
            "SELECT * FROM student_profiles ORDER BY roll_number",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    async fn save_profile_update(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE student_profiles SET
                skills = COALESCE($2, skills),
                education = COALESCE($3, education),
                experience = COALESCE($4, experience),
                phone_number = COALESCE($5, phone_number),
                cgpa = COALESCE($6, cgpa),
                backlogs = COALESCE($7, backlogs)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&update.skills)
        .bind(&update.education)
        .bind(&update.experience)
        .bind(&update.phone_number)
        .bind(update.cgpa)
        .bind(update.backlogs)
        .execute(&self.pool)
        .await?;
        info!("Saved resume-derived fields for student {id}");
        Ok(())
    }

    async fn update_readiness_score(&self, id: Uuid, score: f64) -> Result<(), AppError> {
        sqlx::query("UPDATE student_profiles SET placement_readiness_score = $2 WHERE id = $1")
            .bind(id)
            .bind(score)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_resume_key(&self, id: Uuid, key: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE student_profiles SET resume_key = $2 WHERE id = $1")
            .bind(id)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_open_jobs(&self, today: NaiveDate) -> Result<Vec<JobRow>, AppError> {
        let jobs = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE application_deadline >= $1 ORDER BY posted_at DESC",
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn get_job(&self, id: Uuid) -> Result<JobRow, AppError> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
    }

    async fn applications_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationWithStudent>, AppError> {
        let applications = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE job_id = $1 ORDER BY applied_at DESC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        let students = self.students_by_id(&applications).await?;

        Ok(applications
            .into_iter()
            .filter_map(|application| {
                let student = students.get(&application.student_id)?.clone();
                Some(ApplicationWithStudent {
                    application,
                    student,
                })
            })
            .collect())
    }

    async fn all_applications(&self) -> Result<Vec<ApplicationDetail>, AppError> {
        let applications = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications ORDER BY applied_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let students = self.students_by_id(&applications).await?;
        let job_ids: Vec<Uuid> = applications.iter().map(|a| a.job_id).collect();
        let jobs: HashMap<Uuid, JobRow> =
            sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ANY($1)")
                .bind(&job_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|j| (j.id, j))
                .collect();

        Ok(applications
            .into_iter()
            .filter_map(|application| {
                let student = students.get(&application.student_id)?.clone();
                let job = jobs.get(&application.job_id)?.clone();
                Some(ApplicationDetail {
                    application,
                    student,
                    job,
                })
            })
            .collect())
    }

    async fn applied_job_ids(&self, student_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar("SELECT job_id FROM applications WHERE student_id = $1")
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn create_application(
        &self,
        student_id: Uuid,
        job_id: Uuid,
    ) -> Result<ApplicationRow, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (id, student_id, job_id, status)
            VALUES ($1, $2, $3, 'applied')
            ON CONFLICT (student_id, job_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::AlreadyApplied(job_id))?;
        info!("Student {student_id} applied to job {job_id}");
        Ok(row)
    }
}
