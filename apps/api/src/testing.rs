//! In-memory stores and fixtures for unit and router tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{ApplicationRow, ApplicationStatus, JobRow};
use crate::models::student::StudentProfileRow;
use crate::storage::DocumentStore;
use crate::store::{ApplicationDetail, ApplicationWithStudent, PlacementStore, ProfileUpdate};

#[derive(Default)]
pub struct InMemoryStore {
    students: Mutex<HashMap<Uuid, StudentProfileRow>>,
    jobs: Mutex<Vec<JobRow>>,
    applications: Mutex<Vec<ApplicationRow>>,
}

impl InMemoryStore {
    pub fn with_students(students: Vec<StudentProfileRow>) -> Self {
        let store = Self::default();
        store
            .students
            .lock()
            .unwrap()
            .extend(students.into_iter().map(|s| (s.id, s)));
        store
    }

    pub fn add_job(&self, job: JobRow) {
        self.jobs.lock().unwrap().push(job);
    }

    pub fn add_application(
        &self,
        student_id: Uuid,
        job_id: Uuid,
        status: ApplicationStatus,
    ) -> ApplicationRow {
        let row = ApplicationRow {
            id: Uuid::new_v4(),
            student_id,
            job_id,
            status,
            admin_comments: None,
            applied_at: Utc::now(),
        };
        self.applications.lock().unwrap().push(row.clone());
        row
    }

    pub fn applications(&self) -> Vec<ApplicationRow> {
        self.applications.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlacementStore for InMemoryStore {
    async fn get_student(&self, id: Uuid) -> Result<StudentProfileRow, AppError> {
        self.students
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Student {id} not found")))
    }

    async fn list_students(&self) -> Result<Vec<StudentProfileRow>, AppError> {
        let mut students: Vec<StudentProfileRow> =
            self.students.lock().unwrap().values().cloned().collect();
        students.sort_by(|a, b| a.roll_number.cmp(&b.roll_number));
        Ok(students)
    }

    async fn save_profile_update(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<(), AppError> {
        if let Some(profile) = self.students.lock().unwrap().get_mut(&id) {
            update.apply_to(profile);
        }
        Ok(())
    }

    async fn update_readiness_score(&self, id: Uuid, score: f64) -> Result<(), AppError> {
        if let Some(profile) = self.students.lock().unwrap().get_mut(&id) {
            profile.placement_readiness_score = Some(score);
        }
        Ok(())
    }

    async fn set_resume_key(&self, id: Uuid, key: &str) -> Result<(), AppError> {
        if let Some(profile) = self.students.lock().unwrap().get_mut(&id) {
            profile.resume_key = Some(key.to_string());
        }
        Ok(())
    }

    async fn list_open_jobs(&self, today: NaiveDate) -> Result<Vec<JobRow>, AppError> {
        let mut jobs: Vec<JobRow> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.application_deadline >= today)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        Ok(jobs)
    }

    async fn get_job(&self, id: Uuid) -> Result<JobRow, AppError> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
    }

    async fn applications_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationWithStudent>, AppError> {
        let students = self.students.lock().unwrap();
        let mut rows: Vec<ApplicationWithStudent> = self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.job_id == job_id)
            .filter_map(|a| {
                Some(ApplicationWithStudent {
                    application: a.clone(),
                    student: students.get(&a.student_id)?.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.application.applied_at.cmp(&a.application.applied_at));
        Ok(rows)
    }

    async fn all_applications(&self) -> Result<Vec<ApplicationDetail>, AppError> {
        let students = self.students.lock().unwrap();
        let jobs = self.jobs.lock().unwrap();
        let mut rows: Vec<ApplicationDetail> = self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter_map(|a| {
                Some(ApplicationDetail {
                    application: a.clone(),
                    student: students.get(&a.student_id)?.clone(),
                    job: jobs.iter().find(|j| j.id == a.job_id)?.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.application.applied_at.cmp(&a.application.applied_at));
        Ok(rows)
    }

    async fn applied_job_ids(&self, student_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.student_id == student_id)
            .map(|a| a.job_id)
            .collect())
    }

    async fn create_application(
        &self,
        student_id: Uuid,
        job_id: Uuid,
    ) -> Result<ApplicationRow, AppError> {
        let exists = self
            .applications
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.student_id == student_id && a.job_id == job_id);
        if exists {
            return Err(AppError::AlreadyApplied(job_id));
        }
        Ok(self.add_application(student_id, job_id, ApplicationStatus::Applied))
    }
}

#[derive(Default)]
pub struct InMemoryDocuments {
    objects: Mutex<HashMap<String, Bytes>>,
}

impl InMemoryDocuments {
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocuments {
    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> Result<(), AppError> {
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, AppError> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Document {key} not found")))
    }
}

/// Profile with only branch, CGPA and backlogs set.
pub fn sample_student(branch: &str, cgpa: Option<f64>, backlogs: Option<i32>) -> StudentProfileRow {
    StudentProfileRow {
        id: Uuid::new_v4(),
        roll_number: format!("R-{}", &Uuid::new_v4().simple().to_string()[..6]),
        branch: branch.to_string(),
        cgpa,
        backlogs,
        skills: String::new(),
        education: String::new(),
        experience: String::new(),
        phone_number: String::new(),
        resume_key: None,
        placement_readiness_score: None,
    }
}

/// Open job (deadline 30 days out) with the given criteria text.
pub fn sample_job(company: &str, criteria: &str) -> JobRow {
    JobRow {
        id: Uuid::new_v4(),
        company_name: company.to_string(),
        job_role: "Graduate Engineer Trainee".to_string(),
        description: "Campus hiring drive".to_string(),
        salary_package: Some("6 LPA".to_string()),
        eligibility_criteria: criteria.to_string(),
        application_deadline: Utc::now().date_naive() + Duration::days(30),
        posted_at: Utc::now(),
    }
}
