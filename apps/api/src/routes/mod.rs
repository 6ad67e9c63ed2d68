pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::eligibility::handlers as eligibility;
use crate::placement::handlers as placement;
use crate::readiness::handlers as readiness;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Multipart framing on top of the raw document bytes.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_resume_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health::health_handler))
        // Eligibility engine
        .route(
            "/api/v1/eligibility/evaluate",
            post(eligibility::handle_evaluate),
        )
        // Students
        .route("/api/v1/students", get(placement::handle_student_directory))
        .route("/api/v1/students/:id/jobs", get(placement::handle_job_board))
        .route(
            "/api/v1/students/:id/readiness",
            post(readiness::handle_refresh_readiness),
        )
        .route(
            "/api/v1/students/:id/prediction",
            get(readiness::handle_prediction),
        )
        .route(
            "/api/v1/students/:id/resume",
            post(resume::handle_upload_resume),
        )
        .route(
            "/api/v1/students/:id/resume/parse",
            post(resume::handle_reparse_resume),
        )
        // Jobs and applications
        .route(
            "/api/v1/applications",
            get(placement::handle_rank_applications),
        )
        .route("/api/v1/jobs/:id/apply", post(placement::handle_apply))
        .route(
            "/api/v1/jobs/:id/applications",
            get(placement::handle_review_applications),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::models::job::ApplicationStatus;
    use crate::resume::annotator::{AnnotatorModel, HeuristicAnnotator};
    use crate::resume::extract::tests::build_docx;
    use crate::store::PlacementStore;
    use crate::testing::{sample_job, sample_student, InMemoryDocuments, InMemoryStore};

    struct Harness {
        store: Arc<InMemoryStore>,
        documents: Arc<InMemoryDocuments>,
        router: Router,
    }

    fn harness(store: InMemoryStore) -> Harness {
        let store = Arc::new(store);
        let documents = Arc::new(InMemoryDocuments::default());
        let state = AppState {
            store: store.clone(),
            documents: documents.clone(),
            annotator: Some(Arc::new(HeuristicAnnotator::new(AnnotatorModel::builtin()))),
            max_resume_bytes: 1024 * 1024,
        };
        Harness {
            store,
            documents,
            router: build_router(state),
        }
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(uri: &str, file_name: &str, data: &[u8]) -> Request<Body> {
        let boundary = "placement-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(InMemoryStore::default());
        let response = h
            .router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["service"], "placement-api");
    }

    #[tokio::test]
    async fn test_evaluate_endpoint_modes() {
        let h = harness(InMemoryStore::default());
        let body = json!({
            "eligibility_criteria": "Min CGPA 7.0, CSE/IT branches, No backlogs",
            "student": {"branch": "mech", "cgpa": 8.2, "backlogs": 0},
        });
        let response = h
            .router
            .clone()
            .oneshot(json_request("POST", "/api/v1/eligibility/evaluate", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let result = read_json(response).await;
        assert_eq!(result["match_score"], 2);
        assert_eq!(result["max_score"], 3);
        assert_eq!(result["match_percentage"], 67.0);
        assert_eq!(result["recommendation"], "AverageMatch");
        assert_eq!(result["hard_eligible"], false);

        let gate = json!({
            "eligibility_criteria": "No backlogs",
            "student": {"branch": "cse", "cgpa": null, "backlogs": null},
            "mode": "application_gate",
        });
        let response = h
            .router
            .oneshot(json_request("POST", "/api/v1/eligibility/evaluate", gate))
            .await
            .unwrap();
        let result = read_json(response).await;
        assert_eq!(result["max_score"], 1);
        assert_eq!(result["match_score"], 0);
        assert_eq!(result["hard_eligible"], false);
    }

    #[tokio::test]
    async fn test_apply_flow_statuses() {
        let eligible = sample_student("cse", Some(8.2), Some(0));
        let ineligible = sample_student("mech", Some(8.2), Some(0));
        let (ok_id, bad_id) = (eligible.id, ineligible.id);
        let store = InMemoryStore::with_students(vec![eligible, ineligible]);
        let job = sample_job("Acme", "Min CGPA 7.0, CSE/IT branches, No backlogs");
        let job_id = job.id;
        store.add_job(job);
        let h = harness(store);
        let uri = format!("/api/v1/jobs/{job_id}/apply");

        let response = h
            .router
            .clone()
            .oneshot(json_request("POST", &uri, json!({"student_id": ok_id})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(read_json(response).await["status"], "applied");

        let response = h
            .router
            .clone()
            .oneshot(json_request("POST", &uri, json!({"student_id": ok_id})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(read_json(response).await["error"]["code"], "ALREADY_APPLIED");

        let response = h
            .router
            .oneshot(json_request("POST", &uri, json!({"student_id": bad_id})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            read_json(response).await["error"]["message"],
            "You do not meet the eligibility criteria for this job."
        );
        assert_eq!(h.store.applications().len(), 1);
    }

    #[tokio::test]
    async fn test_job_board_and_review_endpoints() {
        let student = sample_student("cse", Some(8.2), Some(0));
        let sid = student.id;
        let store = InMemoryStore::with_students(vec![student]);
        let job = sample_job("Acme", "CSE, No backlogs");
        let job_id = job.id;
        store.add_job(job);
        store.add_application(sid, job_id, ApplicationStatus::Applied);
        let h = harness(store);

        let response = h
            .router
            .clone()
            .oneshot(
                Request::get(format!("/api/v1/students/{sid}/jobs?filter=eligible&q=acme"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let board = read_json(response).await;
        assert_eq!(board["jobs"][0]["job"]["company_name"], "Acme");
        assert_eq!(board["jobs"][0]["applied"], true);
        assert_eq!(board["jobs"][0]["placement_chance"], 98.0);

        let response = h
            .router
            .oneshot(
                Request::get(format!("/api/v1/jobs/{job_id}/applications?min_cgpa=8&status=applied"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let review = read_json(response).await;
        assert_eq!(review["applications"][0]["recommendation_slug"], "strong");
    }

    #[tokio::test]
    async fn test_unknown_student_is_404() {
        let h = harness(InMemoryStore::default());
        let response = h
            .router
            .oneshot(
                Request::post(format!("/api/v1/students/{}/readiness", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_prediction_refreshes_readiness() {
        let student = sample_student("cse", Some(10.0), Some(0));
        let sid = student.id;
        let h = harness(InMemoryStore::with_students(vec![student]));

        let response = h
            .router
            .oneshot(
                Request::get(format!("/api/v1/students/{sid}/prediction"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = read_json(response).await;
        assert_eq!(body["readiness_score"], 60.0);
        assert_eq!(body["placement_chance"], 57.0);
    }

    #[tokio::test]
    async fn test_resume_upload_and_reparse() {
        let student = sample_student("cse", None, None);
        let sid = student.id;
        let h = harness(InMemoryStore::with_students(vec![student]));
        let docx = build_docx(&["CGPA: 9.1", "Backlogs: 0", "Skills: Rust, Linux, Git"]);

        let response = h
            .router
            .clone()
            .oneshot(multipart_request(
                &format!("/api/v1/students/{sid}/resume"),
                "resume.docx",
                &docx,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["fields"]["cgpa"], 9.1);

        let stored = h.store.get_student(sid).await.unwrap();
        let key = format!("resumes/{sid}/resume.docx");
        assert_eq!(stored.resume_key.as_deref(), Some(key.as_str()));
        assert_eq!(stored.backlogs, Some(0));
        assert_eq!(h.documents.keys(), vec![key]);

        let response = h
            .router
            .oneshot(
                Request::post(format!("/api/v1/students/{sid}/resume/parse"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        // 27.3 + 30 + 20 + 10
        assert_eq!(read_json(response).await["readiness_score"], 87.3);
    }

    #[tokio::test]
    async fn test_resume_upload_rejects_txt() {
        let student = sample_student("cse", Some(7.0), Some(0));
        let sid = student.id;
        let h = harness(InMemoryStore::with_students(vec![student]));

        let response = h
            .router
            .oneshot(multipart_request(
                &format!("/api/v1/students/{sid}/resume"),
                "resume.txt",
                b"CGPA 9.9",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            read_json(response).await["error"]["message"],
            "Unsupported file type: .txt. Only PDF and DOCX are supported."
        );

        let stored = h.store.get_student(sid).await.unwrap();
        assert_eq!(stored.cgpa, Some(7.0));
        assert!(stored.resume_key.is_none());
        assert!(h.documents.keys().is_empty());
    }

    #[tokio::test]
    async fn test_review_accepts_blank_filters() {
        let student = sample_student("cse", Some(8.2), Some(0));
        let sid = student.id;
        let store = InMemoryStore::with_students(vec![student]);
        let job = sample_job("Acme", "CSE, No backlogs");
        let job_id = job.id;
        store.add_job(job);
        store.add_application(sid, job_id, ApplicationStatus::Applied);
        let h = harness(store);

        let response = h
            .router
            .clone()
            .oneshot(
                Request::get(format!(
                    "/api/v1/jobs/{job_id}/applications?min_cgpa=&branch=&max_backlogs=&skills=&status="
                ))
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let review = read_json(response).await;
        assert_eq!(review["applications"].as_array().unwrap().len(), 1);

        let response = h
            .router
            .oneshot(
                Request::get(format!("/api/v1/jobs/{job_id}/applications?min_cgpa=high"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_all_applications_ranked() {
        let strong = sample_student("cse", Some(8.2), Some(0));
        let weak = sample_student("mech", Some(6.0), Some(3));
        let (strong_id, weak_id) = (strong.id, weak.id);
        let store = InMemoryStore::with_students(vec![strong, weak]);
        let acme = sample_job("Acme", "Min CGPA 7.0, CSE branches, No backlogs");
        let beta = sample_job("Beta", "Min CGPA 7.0, No backlogs");
        let (acme_id, beta_id) = (acme.id, beta.id);
        store.add_job(acme);
        store.add_job(beta);
        store.add_application(weak_id, acme_id, ApplicationStatus::Applied);
        store.add_application(strong_id, beta_id, ApplicationStatus::Shortlisted);
        let h = harness(store);

        let response = h
            .router
            .oneshot(Request::get("/api/v1/applications").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let ranked = read_json(response).await;
        let ranked = ranked.as_array().unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0]["job"]["company_name"], "Beta");
        assert_eq!(ranked[0]["match"]["match_percentage"], 100.0);
        assert_eq!(ranked[1]["job"]["company_name"], "Acme");
        assert_eq!(ranked[1]["match"]["match_percentage"], 0.0);
        assert_eq!(ranked[1]["recommendation_slug"], "low");
    }

    #[tokio::test]
    async fn test_student_directory_endpoint() {
        let mut listed = sample_student("cse", Some(8.0), Some(0));
        listed.roll_number = "CS-7".to_string();
        let mut other = sample_student("civil", Some(5.0), Some(4));
        other.roll_number = "CV-9".to_string();
        let h = harness(InMemoryStore::with_students(vec![listed, other]));

        let response = h
            .router
            .oneshot(
                Request::get("/api/v1/students?q=&branch=cs&min_cgpa=7&max_backlogs=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["total_students"], 2);
        assert_eq!(body["students"].as_array().unwrap().len(), 1);
        assert_eq!(body["students"][0]["roll_number"], "CS-7");
        assert_eq!(body["students"][0]["placement_readiness_score"], 54.0);
    }

    #[tokio::test]
    async fn test_reparse_without_resume_is_404() {
        let student = sample_student("cse", Some(7.0), Some(0));
        let sid = student.id;
        let h = harness(InMemoryStore::with_students(vec![student]));

        let response = h
            .router
            .oneshot(
                Request::post(format!("/api/v1/students/{sid}/resume/parse"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
