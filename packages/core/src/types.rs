// ABOUTME: Typed domain model for LLC records and their workflow state
// ABOUTME: Mirrors the backend JSON shape; absent fields decode as None

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{ROLE_ADMIN, ROLE_QUALITY_MANAGER};

/// Workflow status of an LLC record. Transitions are backend-owned; the
/// client only ever reads this value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
    InPreparation,
    WaitingForValidation,
    DeploymentInProgress,
    DeploymentProcessing,
    DeploymentValidated,
    DeploymentRejected,
    Closed,
}

impl WorkflowStatus {
    /// Every status, in dashboard display order.
    pub const ALL: [WorkflowStatus; 7] = [
        WorkflowStatus::InPreparation,
        WorkflowStatus::WaitingForValidation,
        WorkflowStatus::DeploymentInProgress,
        WorkflowStatus::DeploymentProcessing,
        WorkflowStatus::DeploymentValidated,
        WorkflowStatus::DeploymentRejected,
        WorkflowStatus::Closed,
    ];

    /// Wire value sent in `?status=` query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::InPreparation => "IN_PREPARATION",
            WorkflowStatus::WaitingForValidation => "WAITING_FOR_VALIDATION",
            WorkflowStatus::DeploymentInProgress => "DEPLOYMENT_IN_PROGRESS",
            WorkflowStatus::DeploymentProcessing => "DEPLOYMENT_PROCESSING",
            WorkflowStatus::DeploymentValidated => "DEPLOYMENT_VALIDATED",
            WorkflowStatus::DeploymentRejected => "DEPLOYMENT_REJECTED",
            WorkflowStatus::Closed => "CLOSED",
        }
    }

    /// Human label used for table headings.
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowStatus::InPreparation => "LLC in preparation",
            WorkflowStatus::WaitingForValidation => "Waiting for validation",
            WorkflowStatus::DeploymentInProgress => "Deployment in progress",
            WorkflowStatus::DeploymentProcessing => "Deployment processing",
            WorkflowStatus::DeploymentValidated => "Deployment validated",
            WorkflowStatus::DeploymentRejected => "Deployment rejected",
            WorkflowStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status or decision string is not part of the enum.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for WorkflowStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkflowStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseEnumError {
                kind: "workflow status",
                value: s.to_string(),
            })
    }
}

/// Decision value carried by the PM, final, and deployment review steps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    PendingForValidation,
    Approved,
    Rejected,
}

impl Decision {
    /// A decision is terminal once it leaves the pending state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Decision::Approved | Decision::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::PendingForValidation => "PENDING_FOR_VALIDATION",
            Decision::Approved => "APPROVED",
            Decision::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING_FOR_VALIDATION" => Ok(Decision::PendingForValidation),
            "APPROVED" => Ok(Decision::Approved),
            "REJECTED" => Ok(Decision::Rejected),
            _ => Err(ParseEnumError {
                kind: "decision",
                value: s.to_string(),
            }),
        }
    }
}

/// Which decision field a badge column reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionField {
    Pm,
    Final,
}

impl DecisionField {
    pub fn key(&self) -> &'static str {
        match self {
            DecisionField::Pm => "pm_decision",
            DecisionField::Final => "final_decision",
        }
    }
}

/// Purpose tag of an uploaded file on the main record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentScope {
    BadPart,
    GoodPart,
    SituationBefore,
    SituationAfter,
    #[serde(other)]
    Unknown,
}

impl AttachmentScope {
    /// Multipart part name this scope's new uploads are sent under.
    pub fn part_name(&self) -> &'static str {
        match self {
            AttachmentScope::BadPart => "badPartFiles",
            AttachmentScope::GoodPart => "goodPartFiles",
            AttachmentScope::SituationBefore => "situationBeforeFiles",
            AttachmentScope::SituationAfter => "situationAfterFiles",
            AttachmentScope::Unknown => "files",
        }
    }
}

/// Purpose tag of an uploaded file on a deployment-processing record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingScope {
    BeforeDep,
    AfterDep,
    EvidenceFile,
    #[serde(other)]
    Unknown,
}

/// One uploaded file attached to a record or root cause.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub id: i64,
    pub filename: String,
    pub storage_path: String,
    #[serde(default = "AttachmentScope::unknown")]
    pub scope: AttachmentScope,
}

impl AttachmentScope {
    fn unknown() -> AttachmentScope {
        AttachmentScope::Unknown
    }
}

/// One uploaded file attached to a deployment-processing record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessingAttachment {
    pub id: i64,
    pub filename: String,
    pub storage_path: String,
    #[serde(default = "ProcessingScope::unknown")]
    pub scope: ProcessingScope,
}

impl ProcessingScope {
    fn unknown() -> ProcessingScope {
        ProcessingScope::Unknown
    }
}

/// Structured sub-record for one identified cause of the problem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RootCause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub root_cause: String,
    #[serde(default)]
    pub detailed_cause_description: String,
    #[serde(default)]
    pub solution_description: String,
    #[serde(default)]
    pub conclusion: String,
    #[serde(default)]
    pub process: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// A full LLC quality record as returned by the backend.
///
/// Every field that the backend may omit is an `Option` or defaults to empty,
/// so a sparse list payload never fails to decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlcRecord {
    pub id: i64,
    pub status: WorkflowStatus,

    // Classification
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub llc_type: Option<String>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub product_family: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub quality_detection: Option<String>,
    #[serde(default)]
    pub application_label: Option<String>,
    #[serde(default)]
    pub product_line_label: Option<String>,
    #[serde(default)]
    pub part_or_machine_number: Option<String>,
    #[serde(default)]
    pub failure_mode: Option<String>,

    // Descriptive text
    #[serde(default)]
    pub problem_short: Option<String>,
    #[serde(default)]
    pub problem_detail: Option<String>,
    #[serde(default)]
    pub conclusions: Option<String>,

    // Provenance
    #[serde(default)]
    pub editor: Option<String>,
    #[serde(default)]
    pub plant: Option<String>,
    #[serde(default)]
    pub validator: Option<String>,

    // PM decision
    #[serde(default)]
    pub pm_decision: Option<Decision>,
    #[serde(default)]
    pub pm_decision_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pm_validation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pm_reject_reason: Option<String>,

    // Final decision
    #[serde(default)]
    pub final_decision: Option<Decision>,
    #[serde(default)]
    pub final_decision_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub final_validation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub final_reject_reason: Option<String>,

    // Deployment processing fields surfaced on the record itself
    #[serde(default)]
    pub evidence_plant: Option<String>,
    #[serde(default)]
    pub deployment_applicability: Option<String>,
    #[serde(default)]
    pub why_not_apply: Option<String>,
    #[serde(default)]
    pub person: Option<String>,
    #[serde(default)]
    pub deployment_description: Option<String>,
    #[serde(default)]
    pub deployment_progress: Option<String>,
    #[serde(default)]
    pub pm: Option<String>,
    #[serde(default)]
    pub deployment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deployed_at: Option<DateTime<Utc>>,

    // Files
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub processing_attachments: Vec<ProcessingAttachment>,
    #[serde(default, rename = "rootCauses")]
    pub root_causes: Vec<RootCause>,

    // Generated artifacts
    #[serde(default)]
    pub generated_llc: Option<String>,
    #[serde(default)]
    pub generated_dep: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl LlcRecord {
    /// Decision value for a badge column.
    pub fn decision(&self, field: DecisionField) -> Option<Decision> {
        match field {
            DecisionField::Pm => self.pm_decision,
            DecisionField::Final => self.final_decision,
        }
    }

    /// Attachments on the main record carrying the given scope.
    pub fn attachments_in_scope(&self, scope: AttachmentScope) -> Vec<&Attachment> {
        self.attachments
            .iter()
            .filter(|a| a.scope == scope)
            .collect()
    }

    /// Deployment-processing attachments carrying the given scope.
    pub fn processing_in_scope(&self, scope: ProcessingScope) -> Vec<&ProcessingAttachment> {
        self.processing_attachments
            .iter()
            .filter(|a| a.scope == scope)
            .collect()
    }

    /// Date a record is bucketed under for monthly charts: the deployment
    /// date when one exists, otherwise the creation date.
    pub fn bucket_date(&self) -> Option<DateTime<Utc>> {
        self.deployed_at
            .or(self.deployment_date)
            .or(self.created_at)
    }

    /// Generic field access for table cells, through the serialized shape.
    pub fn field_value(&self, key: &str) -> serde_json::Value {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => {
                map.get(key).cloned().unwrap_or(serde_json::Value::Null)
            }
            _ => serde_json::Value::Null,
        }
    }
}

/// The deployment-processing record driven by the token-scoped dep review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentProcessing {
    pub id: i64,
    #[serde(default)]
    pub llc_id: Option<i64>,
    #[serde(default)]
    pub evidence_plant: Option<String>,
    #[serde(default)]
    pub deployment_applicability: Option<String>,
    #[serde(default)]
    pub why_not_apply: Option<String>,
    #[serde(default)]
    pub person: Option<String>,
    #[serde(default)]
    pub deployment_description: Option<String>,
    #[serde(default)]
    pub dep_decision: Option<Decision>,
    #[serde(default)]
    pub dep_decision_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dep_reject_reason: Option<String>,
    #[serde(default)]
    pub deployment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub generated_dep: Option<String>,
    #[serde(default)]
    pub attachments: Vec<ProcessingAttachment>,
}

/// Signed-in user profile persisted alongside the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub plant: Option<String>,
}

impl UserProfile {
    pub fn is_quality_manager(&self) -> bool {
        self.role.as_deref() == Some(ROLE_QUALITY_MANAGER)
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ROLE_ADMIN)
    }

    /// Identity recorded as the editor of a record: email, falling back to name.
    pub fn editor_identity(&self) -> Option<&str> {
        self.email.as_deref().or(self.name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_wire_format() {
        for status in WorkflowStatus::ALL {
            let parsed: WorkflowStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn sparse_record_payload_decodes() {
        let record: LlcRecord =
            serde_json::from_str(r#"{"id": 7, "status": "IN_PREPARATION"}"#).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.status, WorkflowStatus::InPreparation);
        assert!(record.pm_decision.is_none());
        assert!(record.attachments.is_empty());
        assert!(record.root_causes.is_empty());
    }

    #[test]
    fn unknown_attachment_scope_decodes_as_unknown() {
        let att: Attachment = serde_json::from_str(
            r#"{"id": 1, "filename": "x.png", "storage_path": "uploads/x.png", "scope": "SOMETHING_NEW"}"#,
        )
        .unwrap();
        assert_eq!(att.scope, AttachmentScope::Unknown);
    }

    #[test]
    fn bucket_date_prefers_deployment_over_creation() {
        let mut record: LlcRecord =
            serde_json::from_str(r#"{"id": 1, "status": "CLOSED"}"#).unwrap();
        assert!(record.bucket_date().is_none());

        let created = "2024-06-01T00:00:00Z".parse().unwrap();
        record.created_at = Some(created);
        assert_eq!(record.bucket_date(), Some(created));

        let deployed = "2024-08-15T00:00:00Z".parse().unwrap();
        record.deployed_at = Some(deployed);
        assert_eq!(record.bucket_date(), Some(deployed));
    }

    #[test]
    fn field_value_reads_serialized_shape() {
        let record: LlcRecord = serde_json::from_str(
            r#"{"id": 3, "status": "CLOSED", "plant": "SCEET Plant"}"#,
        )
        .unwrap();
        assert_eq!(record.field_value("plant"), serde_json::json!("SCEET Plant"));
        assert_eq!(record.field_value("customer"), serde_json::Value::Null);
    }

    #[test]
    fn role_checks_are_exact_matches() {
        let qm = UserProfile {
            role: Some("quality_manager".into()),
            ..Default::default()
        };
        assert!(qm.is_quality_manager());
        assert!(!qm.is_admin());

        let other = UserProfile {
            role: Some("Quality_Manager".into()),
            ..Default::default()
        };
        assert!(!other.is_quality_manager());
        assert!(!UserProfile::default().is_quality_manager());
    }
}
