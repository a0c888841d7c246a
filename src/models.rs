use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============ Store Objects ============

/// A record as returned by the external document store.
///
/// Domain data lives under `metadata`; the envelope fields (`id`, `slug`,
/// `title`) are assigned by the store. The metadata shape is caller-chosen:
/// typed structs on read paths that need the fields, raw `Value` when the
/// record is only echoed back to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreObject<M> {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub metadata: M,
}

/// A counselor record. Pre-provisioned in the store; never written here.
pub type Counselor = StoreObject<CounselorMeta>;

/// A risk assessment record as read back for the dashboard (depth 1).
pub type Assessment = StoreObject<AssessmentMeta>;

/// Counselor metadata. All fields optional: the store does not enforce a
/// schema, so a half-provisioned record must not break login for everyone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounselorMeta {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
}

/// Risk assessment metadata on the read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentMeta {
    #[serde(default)]
    pub student: Option<Value>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub prediction_score: Option<f64>,
    #[serde(default)]
    pub factors: Option<Vec<String>>,
    #[serde(default)]
    pub assessment_date: Option<String>,
    #[serde(default)]
    pub status: Option<AssessmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_counselor: Option<CounselorRef>,
}

/// Reference to an assigned counselor.
///
/// At query depth 0 the store returns the bare id string; at depth 1 it
/// expands the reference into the full object. Both forms resolve to the
/// same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CounselorRef {
    Id(String),
    Object { id: String },
}

impl CounselorRef {
    pub fn id(&self) -> &str {
        match self {
            CounselorRef::Id(id) => id,
            CounselorRef::Object { id } => id,
        }
    }
}

// ============ Domain Enums ============

/// Dropout risk level for a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskLevel {
    /// Whether this level counts toward the dashboard's high-risk statistic.
    pub fn is_high(self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::VeryHigh)
    }
}

/// Review lifecycle status of a risk assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentStatus {
    Pending,
    Assigned,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl AssessmentStatus {
    /// Whether this status counts toward the dashboard's pending-review
    /// statistic (the review has not started yet).
    pub fn is_pending_review(self) -> bool {
        matches!(self, AssessmentStatus::Pending | AssessmentStatus::Assigned)
    }
}

// ============ Request / Response Types ============

/// Body of `POST /login`.
///
/// Fields are optional so that an absent field reaches the validator and
/// produces a 400 rather than a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Successful login response body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub counselor: CounselorProfile,
}

/// Reduced counselor projection returned on successful login. Only what the
/// client needs to label the session; never the full store record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounselorProfile {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

impl CounselorProfile {
    pub fn from_counselor(counselor: &Counselor) -> Self {
        Self {
            id: counselor.id.clone(),
            title: counselor.title.clone(),
            email: counselor.metadata.email.clone(),
            specialization: counselor.metadata.specialization.clone(),
        }
    }
}

/// Body of `POST /students`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateStudentRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub semester: Option<u32>,
    #[serde(default)]
    pub attendance_percentage: Option<f64>,
    #[serde(default)]
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub subjects: Option<Vec<String>>,
    #[serde(default)]
    pub financial_status: Option<String>,
    #[serde(default)]
    pub part_time_job: Option<bool>,
    #[serde(default)]
    pub current_risk_level: Option<RiskLevel>,
}

/// Body of `POST /assessments`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentRequest {
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub prediction: Option<Prediction>,
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub counselor_id: Option<String>,
}

/// Prediction payload attached to an assessment creation request.
///
/// Only the presence of the object itself is validated; its fields are
/// written through as supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub prediction_score: Option<f64>,
    #[serde(default)]
    pub factors: Option<Vec<String>>,
}
