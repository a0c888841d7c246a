use crate::errors::AppError;
use crate::models::{CreateAssessmentRequest, CreateStudentRequest};
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

/// Creates student records: validate, construct normalized metadata, persist.
pub struct StudentService {
    store: DocumentStore,
}

impl StudentService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Creates a student record and returns it with its store-assigned id.
    ///
    /// Requires non-empty `title`, `email` and `student_id`; everything else
    /// falls back to the documented defaults. `current_risk_level` is a
    /// sparse field: written only when supplied, never as null.
    pub async fn create(
        &self,
        request: CreateStudentRequest,
    ) -> Result<crate::models::StoreObject<Value>, AppError> {
        let title = require_field(request.title.as_deref())?;
        require_field(request.email.as_deref())?;
        require_field(request.student_id.as_deref())?;

        let title = title.to_string();
        let metadata = build_student_metadata(&request);

        tracing::info!("Creating student record: {}", title);
        self.store
            .insert_one("students", &title, Value::Object(metadata))
            .await
    }
}

fn require_field<'a>(value: Option<&'a str>) -> Result<&'a str, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(
            "Missing required fields: title, email, or student_id".to_string(),
        )),
    }
}

/// Builds the student metadata map with defaults applied.
///
/// Caller has already validated the required fields.
fn build_student_metadata(request: &CreateStudentRequest) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert("email".to_string(), json!(request.email));
    metadata.insert("student_id".to_string(), json!(request.student_id));
    metadata.insert(
        "department".to_string(),
        json!(request.department.as_deref().unwrap_or("")),
    );
    // Zero is not a valid semester; it falls back to 1 like an absent value.
    metadata.insert(
        "semester".to_string(),
        json!(request.semester.filter(|s| *s >= 1).unwrap_or(1)),
    );
    metadata.insert(
        "attendance_percentage".to_string(),
        json!(request.attendance_percentage.unwrap_or(0.0)),
    );
    metadata.insert("cgpa".to_string(), json!(request.cgpa.unwrap_or(0.0)));
    metadata.insert(
        "subjects".to_string(),
        json!(request.subjects.clone().unwrap_or_default()),
    );
    metadata.insert(
        "financial_status".to_string(),
        json!(request
            .financial_status
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("Stable")),
    );
    metadata.insert(
        "part_time_job".to_string(),
        json!(request.part_time_job.unwrap_or(false)),
    );

    // Sparse field: absent when not supplied, not null.
    if let Some(risk) = request.current_risk_level {
        metadata.insert("current_risk_level".to_string(), json!(risk));
    }

    metadata
}

/// Creates risk assessment records.
pub struct AssessmentService {
    store: DocumentStore,
}

impl AssessmentService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Creates a risk assessment and returns it with its store-assigned id.
    ///
    /// Requires `studentId` and a `prediction` object; the prediction's
    /// fields are written through as supplied. Status is computed, never
    /// supplied: `Assigned` when a counselor id was given, else `Pending`.
    ///
    /// Two calls for the same student both succeed: duplicate assessments
    /// are permitted, there is no dedup or conflict detection.
    pub async fn create(
        &self,
        request: CreateAssessmentRequest,
    ) -> Result<crate::models::StoreObject<Value>, AppError> {
        let student_id = match request.student_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(AppError::Validation("Missing required fields".to_string())),
        };
        if request.prediction.is_none() {
            return Err(AppError::Validation("Missing required fields".to_string()));
        }

        let title = format!("Risk Assessment - {}", student_id);
        let metadata = build_assessment_metadata(&request, &student_id, Utc::now());
        let status = metadata
            .get("status")
            .and_then(|v| v.as_str())
            .unwrap_or("?")
            .to_string();

        tracing::info!(
            "Creating assessment for student {} (status: {})",
            student_id,
            status,
        );
        self.store
            .insert_one("risk-assessments", &title, Value::Object(metadata))
            .await
    }
}

/// Builds the assessment metadata map.
///
/// `assessment_date` is pinned to `now` (creation instant); `teacher` and
/// `assigned_counselor` follow the sparse-field policy, with an empty-string
/// reference treated the same as an absent one. The status invariant is set
/// atomically here: `Assigned` iff a counselor reference is written.
fn build_assessment_metadata(
    request: &CreateAssessmentRequest,
    student_id: &str,
    now: DateTime<Utc>,
) -> Map<String, Value> {
    let prediction = request.prediction.clone().unwrap_or_default();
    let teacher_id = request.teacher_id.as_deref().filter(|t| !t.is_empty());
    let counselor_id = request.counselor_id.as_deref().filter(|c| !c.is_empty());

    let mut metadata = Map::new();
    metadata.insert("student".to_string(), json!(student_id));
    if let Some(risk) = prediction.risk_level {
        metadata.insert("risk_level".to_string(), json!(risk));
    }
    if let Some(score) = prediction.prediction_score {
        metadata.insert("prediction_score".to_string(), json!(score));
    }
    if let Some(factors) = prediction.factors {
        metadata.insert("factors".to_string(), json!(factors));
    }
    metadata.insert(
        "assessment_date".to_string(),
        json!(now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
    );
    metadata.insert(
        "status".to_string(),
        json!(if counselor_id.is_some() {
            "Assigned"
        } else {
            "Pending"
        }),
    );

    if let Some(teacher) = teacher_id {
        metadata.insert("teacher".to_string(), json!(teacher));
    }
    if let Some(counselor) = counselor_id {
        metadata.insert("assigned_counselor".to_string(), json!(counselor));
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Prediction, RiskLevel};

    fn student_request() -> CreateStudentRequest {
        CreateStudentRequest {
            title: Some("Jordan Park".to_string()),
            email: Some("jordan@school.edu".to_string()),
            student_id: Some("S-100".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn student_metadata_applies_defaults() {
        let metadata = build_student_metadata(&student_request());
        assert_eq!(metadata["department"], json!(""));
        assert_eq!(metadata["semester"], json!(1));
        assert_eq!(metadata["attendance_percentage"], json!(0.0));
        assert_eq!(metadata["cgpa"], json!(0.0));
        assert_eq!(metadata["subjects"], json!([]));
        assert_eq!(metadata["financial_status"], json!("Stable"));
        assert_eq!(metadata["part_time_job"], json!(false));
    }

    #[test]
    fn student_risk_level_is_sparse() {
        let metadata = build_student_metadata(&student_request());
        assert!(!metadata.contains_key("current_risk_level"));

        let mut request = student_request();
        request.current_risk_level = Some(RiskLevel::VeryHigh);
        let metadata = build_student_metadata(&request);
        assert_eq!(metadata["current_risk_level"], json!("Very High"));
    }

    #[test]
    fn zero_semester_falls_back_to_first() {
        let mut request = student_request();
        request.semester = Some(0);
        let metadata = build_student_metadata(&request);
        assert_eq!(metadata["semester"], json!(1));

        request.semester = Some(3);
        let metadata = build_student_metadata(&request);
        assert_eq!(metadata["semester"], json!(3));
    }

    #[test]
    fn empty_financial_status_falls_back_to_stable() {
        let mut request = student_request();
        request.financial_status = Some(String::new());
        let metadata = build_student_metadata(&request);
        assert_eq!(metadata["financial_status"], json!("Stable"));

        request.financial_status = Some("At Risk".to_string());
        let metadata = build_student_metadata(&request);
        assert_eq!(metadata["financial_status"], json!("At Risk"));
    }

    #[test]
    fn required_field_rejects_empty_and_missing() {
        assert!(require_field(None).is_err());
        assert!(require_field(Some("")).is_err());
        assert!(require_field(Some("x")).is_ok());
    }

    fn assessment_request(counselor: Option<&str>) -> CreateAssessmentRequest {
        CreateAssessmentRequest {
            student_id: Some("S-100".to_string()),
            prediction: Some(Prediction {
                risk_level: Some(RiskLevel::High),
                prediction_score: Some(0.82),
                factors: Some(vec!["Low attendance".to_string()]),
            }),
            teacher_id: None,
            counselor_id: counselor.map(str::to_string),
        }
    }

    #[test]
    fn status_is_assigned_iff_counselor_given() {
        let now = Utc::now();

        let with = build_assessment_metadata(&assessment_request(Some("c1")), "S-100", now);
        assert_eq!(with["status"], json!("Assigned"));
        assert_eq!(with["assigned_counselor"], json!("c1"));

        let without = build_assessment_metadata(&assessment_request(None), "S-100", now);
        assert_eq!(without["status"], json!("Pending"));
        assert!(!without.contains_key("assigned_counselor"));
    }

    #[test]
    fn empty_counselor_id_means_unassigned() {
        let now = Utc::now();
        let mut request = assessment_request(Some(""));
        request.teacher_id = Some(String::new());

        let metadata = build_assessment_metadata(&request, "S-100", now);
        assert_eq!(metadata["status"], json!("Pending"));
        assert!(!metadata.contains_key("assigned_counselor"));
        assert!(!metadata.contains_key("teacher"));
    }

    #[test]
    fn teacher_reference_is_sparse() {
        let now = Utc::now();
        let mut request = assessment_request(None);
        let metadata = build_assessment_metadata(&request, "S-100", now);
        assert!(!metadata.contains_key("teacher"));

        request.teacher_id = Some("t9".to_string());
        let metadata = build_assessment_metadata(&request, "S-100", now);
        assert_eq!(metadata["teacher"], json!("t9"));
    }

    #[test]
    fn assessment_date_is_the_creation_instant() {
        let now = Utc::now();
        let metadata = build_assessment_metadata(&assessment_request(None), "S-100", now);
        let written = metadata["assessment_date"].as_str().unwrap();
        let parsed = DateTime::parse_from_rfc3339(written).unwrap();
        assert_eq!(parsed.timestamp_millis(), now.timestamp_millis());
    }
}
