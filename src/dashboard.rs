use crate::assignments::{assessments_for_counselor, AssignmentSummary};
use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{AssessmentMeta, Counselor, CounselorMeta};
use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters for the counselor dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    #[serde(rename = "counselorId")]
    pub counselor_id: Option<String>,
}

/// GET /counselor/dashboard?counselorId=<id>
///
/// Server-rendered counselor dashboard. The counselor identity travels as a
/// URL parameter because no server-side session exists: presence of the
/// parameter is the entire access check, and the record is re-fetched on
/// every render without re-validating credentials. Anyone holding a valid
/// counselor id can view that counselor's dashboard. Known trust-boundary
/// weakness, preserved as designed rather than silently fixed.
pub async fn counselor_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> Result<Html<String>, AppError> {
    let Some(counselor_id) = params.counselor_id.filter(|id| !id.is_empty()) else {
        tracing::debug!("Dashboard request without counselorId");
        return Ok(Html(render_access_denied()));
    };

    tracing::info!("GET /counselor/dashboard for {}", counselor_id);

    let counselor: Counselor = state
        .store
        .find_one::<CounselorMeta>("counselors", &counselor_id)
        .await?;

    // An empty collection is a normal state for a fresh bucket: the store
    // reports it as 404, the dashboard shows zero assessments.
    let assessments = match state.store.find::<AssessmentMeta>("risk-assessments", 1).await {
        Ok(assessments) => assessments,
        Err(AppError::NotFound(_)) => Vec::new(),
        Err(e) => return Err(e),
    };

    let summary = assessments_for_counselor(assessments, &counselor_id);
    Ok(Html(render_dashboard(&counselor, &summary)))
}

fn render_access_denied() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Access Denied</title>
</head>
<body>
    <main class="centered">
        <h1>Access Denied</h1>
        <p>Please log in to access the counselor dashboard.</p>
        <a href="/counselor/login" class="btn">Go to Login</a>
    </main>
</body>
</html>
"#
    .to_string()
}

/// Renders the dashboard page: summary cards plus the assigned-assessment
/// table, in source order.
fn render_dashboard(counselor: &Counselor, summary: &AssignmentSummary) -> String {
    let rows = if summary.assigned.is_empty() {
        r#"<tr><td colspan="4" class="empty">No students assigned yet.</td></tr>"#.to_string()
    } else {
        summary
            .assigned
            .iter()
            .map(|a| {
                let risk = a
                    .metadata
                    .risk_level
                    .and_then(|r| serde_json::to_value(r).ok())
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_else(|| "-".to_string());
                let status = a
                    .metadata
                    .status
                    .and_then(|s| serde_json::to_value(s).ok())
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_else(|| "-".to_string());
                let date = a.metadata.assessment_date.as_deref().unwrap_or("-");
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape_html(&a.title),
                    escape_html(&risk),
                    escape_html(&status),
                    escape_html(date),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Counselor Dashboard</title>
</head>
<body>
    <nav>
        <h1>Counselor Dashboard</h1>
        <p>{name}</p>
        <a href="/counselor/login">Logout</a>
    </nav>
    <section class="stats">
        <div class="card"><p>Assigned Students</p><p class="stat">{assigned}</p></div>
        <div class="card"><p>High Risk Cases</p><p class="stat">{high_risk}</p></div>
        <div class="card"><p>Pending Reviews</p><p class="stat">{pending}</p></div>
    </section>
    <section class="card">
        <h2>My Assigned Students</h2>
        <table>
            <thead><tr><th>Assessment</th><th>Risk Level</th><th>Status</th><th>Date</th></tr></thead>
            <tbody>
{rows}
            </tbody>
        </table>
    </section>
</body>
</html>
"#,
        name = escape_html(&counselor.title),
        assigned = summary.assigned.len(),
        high_risk = summary.high_risk_count,
        pending = summary.pending_count,
        rows = rows,
    )
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
