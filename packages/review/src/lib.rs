// ABOUTME: State machine for the one-shot emailed review links
// ABOUTME: Entry validation, action gating, and decided-state summaries

use chrono::{DateTime, Utc};

use llc_core::{Decision, DeploymentProcessing, LlcRecord, MIN_REJECT_REASON_LEN};

/// Which review step a link belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewKind {
    Pm,
    Final,
    Deployment,
}

/// A validated review link: both parts must be present before anything
/// is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub id: i64,
    pub token: String,
}

impl ReviewEntry {
    /// Validate the id and token a review link carries. Either part
    /// missing or malformed is an immediate error, no request is made.
    pub fn parse(id: Option<&str>, token: Option<&str>) -> Result<Self, String> {
        let id = id
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| "Invalid link (missing id/token).".to_string())?;
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| "Invalid link (missing id/token).".to_string())?;
        Ok(Self {
            id,
            token: token.to_string(),
        })
    }
}

/// Load state of one review page instance.
///
/// `Loading` moves to `Failed` or `Loaded` exactly once per load; a
/// decision triggers a reload, whose result shows the decided summary.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewState<T> {
    Loading,
    Failed(String),
    Loaded(T),
}

impl<T> ReviewState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            ReviewState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ReviewState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// The action a reviewer takes. A rejection always carries its reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject { reason: String },
}

impl ReviewAction {
    /// Build a rejection, enforcing the minimum reason length on the
    /// trimmed text.
    pub fn reject(reason: &str) -> Result<Self, String> {
        let trimmed = reason.trim();
        if trimmed.chars().count() < MIN_REJECT_REASON_LEN {
            return Err(format!(
                "Rejection reason must be at least {MIN_REJECT_REASON_LEN} characters"
            ));
        }
        Ok(ReviewAction::Reject {
            reason: trimmed.to_string(),
        })
    }
}

/// Read-only summary shown once a decision exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionSummary {
    pub decision: Decision,
    pub decided_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}

/// What the page offers for a loaded record: action buttons, or the
/// terminal decided summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewView {
    Actionable,
    Decided(DecisionSummary),
}

fn view_of(
    decision: Option<Decision>,
    decided_at: Option<DateTime<Utc>>,
    reason: Option<&str>,
) -> ReviewView {
    match decision {
        Some(d) if d.is_terminal() => ReviewView::Decided(DecisionSummary {
            decision: d,
            decided_at,
            reason: reason.map(str::to_string),
        }),
        _ => ReviewView::Actionable,
    }
}

/// View for a PM review of the given record.
pub fn pm_view(record: &LlcRecord) -> ReviewView {
    view_of(
        record.pm_decision,
        record.pm_decision_at,
        record.pm_reject_reason.as_deref(),
    )
}

/// View for a final review of the given record.
pub fn final_view(record: &LlcRecord) -> ReviewView {
    view_of(
        record.final_decision,
        record.final_decision_at,
        record.final_reject_reason.as_deref(),
    )
}

/// View for a deployment review of the given processing record.
pub fn dep_view(processing: &DeploymentProcessing) -> ReviewView {
    view_of(
        processing.dep_decision,
        processing.dep_decision_at,
        processing.dep_reject_reason.as_deref(),
    )
}
