// ABOUTME: Multipart payload assembly and edit-mode attachment bookkeeping
// ABOUTME: Deletion is staged locally and shipped as a manifest on submit

use serde::Serialize;
use std::collections::BTreeMap;

use llc_core::{AttachmentScope, Decision, LlcRecord};
use llc_policy::edit_enabled;

use crate::draft::LlcDraft;
use crate::validator::{validate_draft, ValidationError};

/// An attachment already stored on the server, with its local removal mark.
/// Toggling the mark sends nothing; deletion happens at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingAttachment {
    pub id: i64,
    pub filename: String,
    pub scope: AttachmentScope,
    pub removed: bool,
}

/// Ids flagged for removal, JSON-encoded into the `delete` part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteManifest {
    pub llc_attachments: Vec<i64>,
    pub root_cause_attachments: Vec<i64>,
    pub root_causes: Vec<i64>,
}

/// Edit-mode state layered over the draft: the server-side attachments
/// and their pending removal marks.
#[derive(Debug, Clone, Default)]
pub struct EditState {
    pub record_id: i64,
    pub llc_attachments: Vec<ExistingAttachment>,
    pub root_cause_attachments: BTreeMap<i64, Vec<ExistingAttachment>>,
    pub removed_root_causes: Vec<i64>,
}

impl EditState {
    /// Edit is only reachable for records a rejection reopened. Mirrors
    /// the server-side gate so the form never renders for a locked record.
    pub fn ensure_editable(record: &LlcRecord) -> Result<(), String> {
        if edit_enabled(record) {
            Ok(())
        } else {
            Err(format!(
                "Record #{} is not editable: PM decision is {} and Final decision is {}",
                record.id,
                decision_text(record.pm_decision),
                decision_text(record.final_decision),
            ))
        }
    }

    /// Build edit state from a loaded record, all marks cleared.
    pub fn from_record(record: &LlcRecord) -> Result<Self, String> {
        Self::ensure_editable(record)?;
        let llc_attachments = record
            .attachments
            .iter()
            .map(|a| ExistingAttachment {
                id: a.id,
                filename: a.filename.clone(),
                scope: a.scope,
                removed: false,
            })
            .collect();
        let mut root_cause_attachments = BTreeMap::new();
        for rc in &record.root_causes {
            let Some(rc_id) = rc.id else { continue };
            let list: Vec<ExistingAttachment> = rc
                .attachments
                .iter()
                .map(|a| ExistingAttachment {
                    id: a.id,
                    filename: a.filename.clone(),
                    scope: a.scope,
                    removed: false,
                })
                .collect();
            root_cause_attachments.insert(rc_id, list);
        }
        Ok(Self {
            record_id: record.id,
            llc_attachments,
            root_cause_attachments,
            removed_root_causes: Vec::new(),
        })
    }

    /// Flip the removal mark on a record attachment.
    pub fn toggle_remove_attachment(&mut self, attachment_id: i64) {
        for a in &mut self.llc_attachments {
            if a.id == attachment_id {
                a.removed = !a.removed;
            }
        }
    }

    /// Flip the removal mark on a root-cause attachment.
    pub fn toggle_remove_root_cause_attachment(&mut self, rc_id: i64, attachment_id: i64) {
        if let Some(list) = self.root_cause_attachments.get_mut(&rc_id) {
            for a in list {
                if a.id == attachment_id {
                    a.removed = !a.removed;
                }
            }
        }
    }

    /// Attachments of one scope that are not marked for removal.
    pub fn kept_in_scope(&self, scope: AttachmentScope) -> Vec<&ExistingAttachment> {
        self.llc_attachments
            .iter()
            .filter(|a| a.scope == scope && !a.removed)
            .collect()
    }

    pub fn delete_manifest(&self) -> DeleteManifest {
        DeleteManifest {
            llc_attachments: self
                .llc_attachments
                .iter()
                .filter(|a| a.removed)
                .map(|a| a.id)
                .collect(),
            root_cause_attachments: self
                .root_cause_attachments
                .values()
                .flatten()
                .filter(|a| a.removed)
                .map(|a| a.id)
                .collect(),
            root_causes: self.removed_root_causes.clone(),
        }
    }
}

fn decision_text(d: Option<Decision>) -> String {
    d.map(|d| d.to_string()).unwrap_or_else(|| "unset".into())
}

/// One file part of the multipart submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub part_name: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// The complete multipart payload, ready for the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionParts {
    /// JSON-encoded base record, part `llc`.
    pub record_json: String,
    /// JSON-encoded root-cause array, part `rootCauses`.
    pub root_causes_json: String,
    /// JSON-encoded deletion manifest, part `delete`.
    pub delete_json: String,
    pub files: Vec<FilePart>,
}

/// Validate the draft and assemble the multipart payload.
///
/// New root-cause files go under `rootCauseFiles_{index}`; scoped record
/// files under their scope part name. Part comparison files are only
/// included for Quality records, matching the visible form sections.
pub fn build_submission(
    draft: &LlcDraft,
    edit: Option<&EditState>,
) -> Result<SubmissionParts, Vec<ValidationError>> {
    if let Some(reason) = draft.submission_blocked_reason() {
        return Err(vec![ValidationError::new("validator", reason)]);
    }
    let errors = validate_draft(draft);
    if !errors.is_empty() {
        return Err(errors);
    }

    let record_json = serde_json::json!({
        "category": draft.category,
        "problem_short": draft.problem_short,
        "problem_detail": draft.problem_detail,
        "llc_type": draft.llc_type,
        "customer": draft.customer,
        "product_family": draft.product_family,
        "product_type": draft.product_type,
        "quality_detection": draft.quality_detection,
        "application_label": draft.application_label,
        "product_line_label": draft.product_line_label,
        "part_or_machine_number": draft.part_or_machine_number,
        "editor": draft.editor,
        "plant": draft.plant,
        "validator": draft.validator,
        "failure_mode": draft.failure_mode,
        "conclusions": draft.conclusions,
    })
    .to_string();

    let root_causes_json = serde_json::to_string(&draft.root_causes)
        .map_err(|e| vec![ValidationError::new("rootCauses", e.to_string())])?;

    let manifest = edit.map(EditState::delete_manifest).unwrap_or_default();
    let delete_json = serde_json::to_string(&manifest)
        .map_err(|e| vec![ValidationError::new("delete", e.to_string())])?;

    let mut files = Vec::new();
    for (i, rc) in draft.root_causes.iter().enumerate() {
        for f in &rc.files {
            files.push(FilePart {
                part_name: format!("rootCauseFiles_{i}"),
                filename: f.filename.clone(),
                bytes: f.bytes.clone(),
            });
        }
    }
    let mut push_scoped = |part_name: &str, group: &[crate::draft::DraftFile]| {
        for f in group {
            files.push(FilePart {
                part_name: part_name.to_string(),
                filename: f.filename.clone(),
                bytes: f.bytes.clone(),
            });
        }
    };
    if draft.is_quality() {
        push_scoped(AttachmentScope::BadPart.part_name(), &draft.bad_part_files);
        push_scoped(AttachmentScope::GoodPart.part_name(), &draft.good_part_files);
    }
    push_scoped(
        AttachmentScope::SituationBefore.part_name(),
        &draft.situation_before_files,
    );
    push_scoped(
        AttachmentScope::SituationAfter.part_name(),
        &draft.situation_after_files,
    );

    Ok(SubmissionParts {
        record_json,
        root_causes_json,
        delete_json,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{DraftFile, RootCauseDraft};
    use llc_core::UserProfile;
    use pretty_assertions::assert_eq;

    fn valid_draft() -> LlcDraft {
        let user = UserProfile {
            name: Some("QM".into()),
            email: Some("qm@avocarbon.com".into()),
            role: Some("quality_manager".into()),
            plant: Some("SCEET Plant".into()),
        };
        let mut draft = LlcDraft::for_user(&user);
        draft.set_category("Quality");
        draft.problem_short = "Brush wear out of spec".into();
        draft.problem_detail = "Detail".into();
        draft.llc_type = "Internal".into();
        draft.customer = "BOSCH".into();
        draft.product_family = "Carbon brush".into();
        draft.product_type = "EPS".into();
        draft.quality_detection = "Final inspection".into();
        draft.application_label = "Chassis".into();
        draft.product_line_label = "PL2 - Carbon brushes".into();
        draft.part_or_machine_number = "CB-4711".into();
        draft.failure_mode = "Dimensional".into();
        draft.conclusions = "Tighter incoming control".into();
        draft.root_causes = vec![RootCauseDraft {
            root_cause: "Worn tooling".into(),
            detailed_cause_description: "Die past service interval".into(),
            solution_description: "Replace die".into(),
            conclusion: "Preventive maintenance".into(),
            process: "Stamping".into(),
            origin: "Maintenance".into(),
            files: vec![DraftFile::new("die.png", vec![1, 2])],
            ..Default::default()
        }];
        draft
    }

    fn rejected_record() -> LlcRecord {
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "status": "IN_PREPARATION",
            "pm_decision": "REJECTED",
            "attachments": [
                {"id": 1, "filename": "bad.png", "storage_path": "u/bad.png", "scope": "BAD_PART"},
                {"id": 2, "filename": "good.png", "storage_path": "u/good.png", "scope": "GOOD_PART"}
            ],
            "rootCauses": [
                {"id": 7, "root_cause": "x", "attachments": [
                    {"id": 3, "filename": "rc.png", "storage_path": "u/rc.png", "scope": "SITUATION_BEFORE"}
                ]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn submission_carries_exact_part_names() {
        let parts = build_submission(&valid_draft(), None).unwrap();
        let names: Vec<&str> = parts.files.iter().map(|f| f.part_name.as_str()).collect();
        assert_eq!(names, vec!["rootCauseFiles_0"]);

        let record: serde_json::Value = serde_json::from_str(&parts.record_json).unwrap();
        assert_eq!(record["plant"], "SCEET Plant");
        assert_eq!(record["validator"], "imed.benalaya@avocarbon.com");
        // Root causes travel in their own part, not inside the record
        assert!(record.get("rootCauses").is_none());

        let rcs: serde_json::Value = serde_json::from_str(&parts.root_causes_json).unwrap();
        assert_eq!(rcs[0]["root_cause"], "Worn tooling");
    }

    #[test]
    fn part_comparison_files_only_ship_for_quality() {
        let mut draft = valid_draft();
        draft.bad_part_files.push(DraftFile::new("b.png", vec![1]));
        draft
            .situation_before_files
            .push(DraftFile::new("s.png", vec![2]));

        let parts = build_submission(&draft, None).unwrap();
        let names: Vec<&str> = parts.files.iter().map(|f| f.part_name.as_str()).collect();
        assert!(names.contains(&"badPartFiles"));
        assert!(names.contains(&"situationBeforeFiles"));
    }

    #[test]
    fn invalid_draft_fails_instead_of_building() {
        let mut draft = valid_draft();
        draft.root_causes.clear();
        let errors = build_submission(&draft, None).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "rootCauses"));
    }

    #[test]
    fn blocked_draft_reports_the_validator_gap() {
        let mut draft = valid_draft();
        draft.validator.clear();
        let errors = build_submission(&draft, None).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("No validator configured"));
    }

    #[test]
    fn toggling_marks_feeds_the_delete_manifest() {
        let mut edit = EditState::from_record(&rejected_record()).unwrap();
        assert_eq!(edit.delete_manifest(), DeleteManifest::default());

        edit.toggle_remove_attachment(2);
        edit.toggle_remove_root_cause_attachment(7, 3);
        let manifest = edit.delete_manifest();
        assert_eq!(manifest.llc_attachments, vec![2]);
        assert_eq!(manifest.root_cause_attachments, vec![3]);

        // Toggling again un-marks
        edit.toggle_remove_attachment(2);
        assert!(edit.delete_manifest().llc_attachments.is_empty());
    }

    #[test]
    fn kept_in_scope_hides_marked_attachments() {
        let mut edit = EditState::from_record(&rejected_record()).unwrap();
        assert_eq!(edit.kept_in_scope(AttachmentScope::BadPart).len(), 1);
        edit.toggle_remove_attachment(1);
        assert!(edit.kept_in_scope(AttachmentScope::BadPart).is_empty());
    }

    #[test]
    fn locked_records_refuse_edit_state() {
        let locked: LlcRecord = serde_json::from_value(serde_json::json!({
            "id": 9, "status": "CLOSED", "pm_decision": "APPROVED", "final_decision": "APPROVED"
        }))
        .unwrap();
        let err = EditState::from_record(&locked).unwrap_err();
        assert!(err.contains("not editable"));
    }

    #[test]
    fn delete_manifest_uses_camel_case_keys() {
        let manifest = DeleteManifest {
            llc_attachments: vec![1],
            root_cause_attachments: vec![2],
            root_causes: vec![],
        };
        let json = serde_json::to_string(&manifest).unwrap();
        assert_eq!(
            json,
            r#"{"llcAttachments":[1],"rootCauseAttachments":[2],"rootCauses":[]}"#
        );
    }
}
