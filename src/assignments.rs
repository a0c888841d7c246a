use crate::models::Assessment;

/// Derived dashboard view for one counselor: the assessments assigned to
/// them plus the statistics rendered in the summary cards.
#[derive(Debug, Clone)]
pub struct AssignmentSummary {
    /// Assessments whose `assigned_counselor` resolves to the counselor id,
    /// in source collection order (insertion/query order, not re-sorted).
    pub assigned: Vec<Assessment>,
    /// How many of `assigned` are High or Very High risk.
    pub high_risk_count: usize,
    /// How many of `assigned` are still awaiting review (Assigned or Pending).
    pub pending_count: usize,
}

/// Computes the assigned subset and its statistics for a counselor.
///
/// Purely a derived view: no mutation, no re-ordering. An assessment with a
/// missing or null `assigned_counselor` belongs to no one and is excluded
/// from every counselor's view.
pub fn assessments_for_counselor(
    assessments: Vec<Assessment>,
    counselor_id: &str,
) -> AssignmentSummary {
    let assigned: Vec<Assessment> = assessments
        .into_iter()
        .filter(|a| {
            a.metadata
                .assigned_counselor
                .as_ref()
                .map(|c| c.id() == counselor_id)
                .unwrap_or(false)
        })
        .collect();

    let high_risk_count = assigned
        .iter()
        .filter(|a| a.metadata.risk_level.map(|r| r.is_high()).unwrap_or(false))
        .count();

    let pending_count = assigned
        .iter()
        .filter(|a| {
            a.metadata
                .status
                .map(|s| s.is_pending_review())
                .unwrap_or(false)
        })
        .count();

    AssignmentSummary {
        assigned,
        high_risk_count,
        pending_count,
    }
}
