use crate::auth::AuthService;
use crate::errors::{AppError, ResultExt};
use crate::models::{
    CreateAssessmentRequest, CreateStudentRequest, LoginRequest, LoginResponse,
};
use crate::services::{AssessmentService, StudentService};
use crate::store::DocumentStore;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
///
/// Deliberately small: just the store client. There is no session store, no
/// cache and no other shared mutable state; each request re-fetches what it
/// needs and runs to completion independently.
#[derive(Clone)]
pub struct AppState {
    /// Client for the external document store.
    pub store: DocumentStore,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "student-risk-api",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// POST /login
///
/// Validates counselor credentials and returns the reduced counselor
/// projection. No session or token is issued: the client carries the
/// returned counselor id as a query parameter on the dashboard route.
///
/// # Returns
///
/// * `200 {success, counselor}` on success
/// * `400 {error}` when email or password is missing
/// * `401 {error}` on credential mismatch (generic, never reveals which
///   field was wrong)
/// * `404 {error}` when no counselors exist upstream
/// * `500 {error}` when the store fails
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    tracing::info!("POST /login");

    let auth = AuthService::new(state.store.clone());
    let counselor = auth
        .login(request.email.as_deref(), request.password.as_deref())
        .await
        .context("Login failed")?;

    Ok(Json(LoginResponse {
        success: true,
        counselor,
    }))
}

/// POST /students
///
/// Creates a student record. Requires `title`, `email` and `student_id`;
/// the remaining fields default as documented on the service.
pub async fn create_student(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateStudentRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!("POST /students");

    let service = StudentService::new(state.store.clone());
    let student = service
        .create(request)
        .await
        .map_err(classify_creation_failure)
        .context("Failed to create student")?;

    tracing::info!("Student created: {}", student.id);
    Ok(Json(json!({
        "success": true,
        "student": student,
    })))
}

/// POST /assessments
///
/// Creates a risk assessment record. Requires `studentId` and a
/// `prediction` object; status is computed from the presence of
/// `counselorId`. Duplicate assessments for one student are permitted.
pub async fn create_assessment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateAssessmentRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!("POST /assessments");

    let service = AssessmentService::new(state.store.clone());
    let assessment = service
        .create(request)
        .await
        .map_err(classify_creation_failure)
        .context("Failed to create assessment")?;

    tracing::info!("Assessment created: {}", assessment.id);
    Ok(Json(json!({
        "success": true,
        "assessment": assessment,
    })))
}

/// Re-classifies store failures on the write paths.
///
/// An upstream 404 on a create means the store rejected the call, not that
/// a record is missing, so it is reported as a creation failure rather than
/// passed through as a NotFound. Validation errors pass through untouched
/// so the `.context(..)` wrapper only labels upstream failures.
fn classify_creation_failure(err: AppError) -> AppError {
    match err {
        AppError::NotFound(msg) => AppError::Upstream {
            message: msg,
            details: None,
        },
        other => other,
    }
}
