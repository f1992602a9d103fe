// ABOUTME: Computes visible columns, decision badges, and enabled actions
// ABOUTME: Pure functions over already-fetched records, no I/O

use llc_core::{
    AttachmentScope, Decision, DecisionField, LlcRecord, ProcessingScope, WorkflowStatus,
    ROLE_QUALITY_MANAGER,
};

/// What a column renders. The renderer switches exhaustively on this,
/// so a new kind cannot be silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Plain field rendered through the value normalizer.
    Text { field: &'static str },
    /// Timestamp field rendered in day/minute form.
    Date { field: &'static str },
    /// Attachments on the main record filtered by scope.
    Attachments { scope: AttachmentScope },
    /// Attachments on the deployment-processing record filtered by scope.
    ProcessingAttachments { scope: ProcessingScope },
    /// Decision badge cell.
    Badge { field: DecisionField },
    /// Link to the generated LLC document.
    GeneratedLlc,
    /// Link to the generated deployment PDF.
    GeneratedDep,
    /// Edit/delete buttons.
    Actions,
}

/// One ordered column of a status table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    const fn text(label: &'static str, field: &'static str) -> Self {
        ColumnSpec {
            label,
            kind: ColumnKind::Text { field },
        }
    }

    const fn date(label: &'static str, field: &'static str) -> Self {
        ColumnSpec {
            label,
            kind: ColumnKind::Date { field },
        }
    }
}

/// Status-independent column set. Ends at the PM decision badge; every
/// status augmentation inserts immediately after it.
const COLUMNS_BASE: [ColumnSpec; 23] = [
    ColumnSpec::text("Problem description", "problem_short"),
    ColumnSpec::text("Category", "category"),
    ColumnSpec::text("LLC type", "llc_type"),
    ColumnSpec::text("Customer", "customer"),
    ColumnSpec::text("Product family", "product_family"),
    ColumnSpec::text("Product type", "product_type"),
    ColumnSpec::text("Quality detection", "quality_detection"),
    ColumnSpec::text("Application label", "application_label"),
    ColumnSpec::text("Product line label", "product_line_label"),
    ColumnSpec::text("Part / Machine number", "part_or_machine_number"),
    ColumnSpec::text("Editor", "editor"),
    ColumnSpec::text("Plant", "plant"),
    ColumnSpec::text("Failure mode", "failure_mode"),
    ColumnSpec::text("Detailed problem description", "problem_detail"),
    ColumnSpec {
        label: "Bad Part",
        kind: ColumnKind::Attachments {
            scope: AttachmentScope::BadPart,
        },
    },
    ColumnSpec {
        label: "Good Part",
        kind: ColumnKind::Attachments {
            scope: AttachmentScope::GoodPart,
        },
    },
    ColumnSpec::text("Conclusions", "conclusions"),
    ColumnSpec {
        label: "Situation Before",
        kind: ColumnKind::Attachments {
            scope: AttachmentScope::SituationBefore,
        },
    },
    ColumnSpec {
        label: "Situation After",
        kind: ColumnKind::Attachments {
            scope: AttachmentScope::SituationAfter,
        },
    },
    ColumnSpec::text("Validator of LLC", "validator"),
    ColumnSpec {
        label: "LLC generated",
        kind: ColumnKind::GeneratedLlc,
    },
    ColumnSpec::date("Creation date", "created_at"),
    ColumnSpec {
        label: "PM decision",
        kind: ColumnKind::Badge {
            field: DecisionField::Pm,
        },
    },
];

const COL_PM_VALIDATION_DATE: ColumnSpec =
    ColumnSpec::date("PM validation date", "pm_validation_date");

const COL_FINAL_DECISION: ColumnSpec = ColumnSpec {
    label: "Final decision",
    kind: ColumnKind::Badge {
        field: DecisionField::Final,
    },
};

const COL_FINAL_VALIDATION_DATE: ColumnSpec =
    ColumnSpec::date("Final validation date", "final_validation_date");

/// Deployment-processing column block shared by the three deployment
/// outcome tables.
const COLUMNS_DEPLOYMENT: [ColumnSpec; 11] = [
    ColumnSpec::text("Evidence plant", "evidence_plant"),
    ColumnSpec::text("Deployment applicability", "deployment_applicability"),
    ColumnSpec::text("Why not apply", "why_not_apply"),
    ColumnSpec::text("Person", "person"),
    ColumnSpec {
        label: "Before Dep",
        kind: ColumnKind::ProcessingAttachments {
            scope: ProcessingScope::BeforeDep,
        },
    },
    ColumnSpec {
        label: "After Dep",
        kind: ColumnKind::ProcessingAttachments {
            scope: ProcessingScope::AfterDep,
        },
    },
    ColumnSpec {
        label: "Files",
        kind: ColumnKind::ProcessingAttachments {
            scope: ProcessingScope::EvidenceFile,
        },
    },
    ColumnSpec::text("Deployment description", "deployment_description"),
    ColumnSpec::text("Validator of LLC deployment", "pm"),
    ColumnSpec {
        label: "Dep generated",
        kind: ColumnKind::GeneratedDep,
    },
    ColumnSpec::date("Deployment date", "deployment_date"),
];

const COL_DEPLOYMENT_PROGRESS: ColumnSpec =
    ColumnSpec::text("Deployment progress", "deployment_progress");

const COL_ACTIONS: ColumnSpec = ColumnSpec {
    label: "Actions",
    kind: ColumnKind::Actions,
};

/// Ordered column set for one status table.
///
/// `records` is the set already loaded for that status: the preparation
/// table consults it for late-stage rejections bounced back from final
/// review. `viewer_role` gates the actions column, exact string match.
pub fn columns_for(
    status: WorkflowStatus,
    records: &[LlcRecord],
    viewer_role: Option<&str>,
) -> Vec<ColumnSpec> {
    let mut columns: Vec<ColumnSpec> = COLUMNS_BASE.to_vec();
    let pm_idx = columns.len();

    let mut extra: Vec<ColumnSpec> = Vec::new();
    match status {
        WorkflowStatus::InPreparation => {
            let has_final_rejected = records
                .iter()
                .any(|r| r.final_decision == Some(Decision::Rejected));
            if has_final_rejected {
                extra.push(COL_PM_VALIDATION_DATE);
                extra.push(COL_FINAL_DECISION);
            }
        }
        WorkflowStatus::WaitingForValidation => {
            extra.push(COL_PM_VALIDATION_DATE);
            extra.push(COL_FINAL_DECISION);
        }
        WorkflowStatus::DeploymentInProgress => {
            extra.push(COL_PM_VALIDATION_DATE);
            extra.push(COL_FINAL_DECISION);
            extra.push(COL_FINAL_VALIDATION_DATE);
            extra.push(COL_DEPLOYMENT_PROGRESS);
        }
        WorkflowStatus::DeploymentProcessing
        | WorkflowStatus::DeploymentValidated
        | WorkflowStatus::DeploymentRejected => {
            extra.push(COL_PM_VALIDATION_DATE);
            extra.push(COL_FINAL_DECISION);
            extra.push(COL_FINAL_VALIDATION_DATE);
            extra.extend(COLUMNS_DEPLOYMENT);
        }
        WorkflowStatus::Closed => {}
    }
    columns.splice(pm_idx..pm_idx, extra);

    if status == WorkflowStatus::InPreparation && viewer_role == Some(ROLE_QUALITY_MANAGER) {
        columns.push(COL_ACTIONS);
    }

    columns
}

/// Visual style of a decision badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Pending,
    Approved,
    Rejected,
}

/// A rendered decision badge. Absence means the cell shows the placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub style: BadgeStyle,
}

/// Badge for a decision cell within the table of the given status.
///
/// Within the preparation table, a final decision that is absent or still
/// pending renders as the placeholder: final review has not actually
/// started for those records.
pub fn badge_for(
    table_status: WorkflowStatus,
    field: DecisionField,
    record: &LlcRecord,
) -> Option<Badge> {
    let decision = record.decision(field)?;
    if table_status == WorkflowStatus::InPreparation
        && field == DecisionField::Final
        && decision == Decision::PendingForValidation
    {
        return None;
    }
    Some(match decision {
        Decision::PendingForValidation => Badge {
            label: "PENDING FOR VALIDATION",
            style: BadgeStyle::Pending,
        },
        Decision::Approved => Badge {
            label: "APPROVED",
            style: BadgeStyle::Approved,
        },
        Decision::Rejected => Badge {
            label: "REJECTED",
            style: BadgeStyle::Rejected,
        },
    })
}

/// A record can be edited only after a rejection reopened it.
pub fn edit_enabled(record: &LlcRecord) -> bool {
    record.pm_decision == Some(Decision::Rejected)
        || record.final_decision == Some(Decision::Rejected)
}

/// Tooltip shown on the edit button.
pub fn edit_tooltip(record: &LlcRecord) -> &'static str {
    if edit_enabled(record) {
        "Edit"
    } else {
        "Edit available only when PM decision is REJECTED or Final decision is REJECTED"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn record(json: serde_json::Value) -> LlcRecord {
        serde_json::from_value(json).unwrap()
    }

    fn minimal(status: &str) -> LlcRecord {
        record(serde_json::json!({"id": 1, "status": status}))
    }

    fn field_keys(columns: &[ColumnSpec]) -> Vec<&'static str> {
        columns
            .iter()
            .filter_map(|c| match c.kind {
                ColumnKind::Text { field } | ColumnKind::Date { field } => Some(field),
                ColumnKind::Badge { field } => Some(field.key()),
                _ => None,
            })
            .collect()
    }

    #[rstest]
    #[case(WorkflowStatus::InPreparation)]
    #[case(WorkflowStatus::WaitingForValidation)]
    #[case(WorkflowStatus::DeploymentInProgress)]
    #[case(WorkflowStatus::DeploymentProcessing)]
    #[case(WorkflowStatus::DeploymentValidated)]
    #[case(WorkflowStatus::DeploymentRejected)]
    #[case(WorkflowStatus::Closed)]
    fn base_columns_keep_fixed_order_for_every_status(#[case] status: WorkflowStatus) {
        let columns = columns_for(status, &[], None);
        // Base prefix is untouched for every status.
        assert_eq!(&columns[..COLUMNS_BASE.len()], &COLUMNS_BASE[..]);
        // Augmentation never duplicates a column.
        let keys = field_keys(&columns);
        let mut deduped = keys.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), keys.len(), "duplicate column for {status}");
    }

    #[test]
    fn closed_table_is_exactly_the_base_set() {
        let columns = columns_for(WorkflowStatus::Closed, &[], Some("quality_manager"));
        assert_eq!(columns, COLUMNS_BASE.to_vec());
    }

    #[test]
    fn waiting_table_appends_pm_date_and_final_decision_after_pm_decision() {
        let columns = columns_for(WorkflowStatus::WaitingForValidation, &[], None);
        let keys = field_keys(&columns);
        let pm = keys.iter().position(|k| *k == "pm_decision").unwrap();
        assert_eq!(keys[pm + 1], "pm_validation_date");
        assert_eq!(keys[pm + 2], "final_decision");
    }

    #[test]
    fn deployment_tables_carry_the_full_processing_block() {
        for status in [
            WorkflowStatus::DeploymentProcessing,
            WorkflowStatus::DeploymentValidated,
            WorkflowStatus::DeploymentRejected,
        ] {
            let columns = columns_for(status, &[], None);
            let keys = field_keys(&columns);
            assert!(keys.contains(&"evidence_plant"), "{status}");
            assert!(keys.contains(&"deployment_date"), "{status}");
            assert!(columns.iter().any(|c| c.kind
                == ColumnKind::ProcessingAttachments {
                    scope: ProcessingScope::BeforeDep
                }));
            assert!(columns.iter().any(|c| c.kind == ColumnKind::GeneratedDep));
            // Deployment progress belongs to the in-progress table only.
            assert!(!keys.contains(&"deployment_progress"), "{status}");
        }

        let in_progress = columns_for(WorkflowStatus::DeploymentInProgress, &[], None);
        assert!(field_keys(&in_progress).contains(&"deployment_progress"));
    }

    #[test]
    fn preparation_table_reveals_final_rejection_columns_only_when_triggered() {
        let quiet = vec![minimal("IN_PREPARATION")];
        let columns = columns_for(WorkflowStatus::InPreparation, &quiet, None);
        let keys = field_keys(&columns);
        assert!(!keys.contains(&"pm_validation_date"));
        assert!(!keys.contains(&"final_decision"));

        let bounced = vec![
            minimal("IN_PREPARATION"),
            record(serde_json::json!({
                "id": 2, "status": "IN_PREPARATION", "final_decision": "REJECTED"
            })),
        ];
        let columns = columns_for(WorkflowStatus::InPreparation, &bounced, None);
        let keys = field_keys(&columns);
        let pm = keys.iter().position(|k| *k == "pm_decision").unwrap();
        assert_eq!(keys[pm + 1], "pm_validation_date");
        assert_eq!(keys[pm + 2], "final_decision");
    }

    #[test]
    fn empty_record_set_still_yields_untriggered_columns() {
        let columns = columns_for(WorkflowStatus::InPreparation, &[], Some("quality_manager"));
        assert!(!field_keys(&columns).contains(&"final_decision"));
        assert_eq!(columns.last().unwrap().kind, ColumnKind::Actions);
    }

    #[rstest]
    #[case(Some("quality_manager"), true)]
    #[case(Some("admin"), false)]
    #[case(Some("Quality_Manager"), false)]
    #[case(Some(""), false)]
    #[case(None, false)]
    fn actions_column_is_exclusive_to_quality_managers(
        #[case] role: Option<&str>,
        #[case] expected: bool,
    ) {
        let columns = columns_for(WorkflowStatus::InPreparation, &[], role);
        let present = columns.iter().any(|c| c.kind == ColumnKind::Actions);
        assert_eq!(present, expected);
    }

    #[test]
    fn no_actions_column_outside_preparation_regardless_of_role() {
        for status in WorkflowStatus::ALL {
            if status == WorkflowStatus::InPreparation {
                continue;
            }
            let columns = columns_for(status, &[], Some("quality_manager"));
            assert!(
                !columns.iter().any(|c| c.kind == ColumnKind::Actions),
                "{status}"
            );
        }
    }

    #[test]
    fn pending_final_decision_hides_badge_in_preparation_only() {
        let pending = record(serde_json::json!({
            "id": 1, "status": "IN_PREPARATION", "final_decision": "PENDING_FOR_VALIDATION"
        }));
        assert_eq!(
            badge_for(WorkflowStatus::InPreparation, DecisionField::Final, &pending),
            None
        );
        // The same decision shows a pending badge in any other table.
        let badge = badge_for(
            WorkflowStatus::WaitingForValidation,
            DecisionField::Final,
            &pending,
        )
        .unwrap();
        assert_eq!(badge.style, BadgeStyle::Pending);
    }

    #[test]
    fn absent_decisions_render_placeholder() {
        let bare = minimal("WAITING_FOR_VALIDATION");
        assert_eq!(
            badge_for(WorkflowStatus::WaitingForValidation, DecisionField::Pm, &bare),
            None
        );
        assert_eq!(
            badge_for(
                WorkflowStatus::WaitingForValidation,
                DecisionField::Final,
                &bare
            ),
            None
        );
    }

    #[test]
    fn rejected_final_decision_shows_badge_even_in_preparation() {
        let rejected = record(serde_json::json!({
            "id": 1, "status": "IN_PREPARATION", "final_decision": "REJECTED"
        }));
        let badge = badge_for(WorkflowStatus::InPreparation, DecisionField::Final, &rejected)
            .unwrap();
        assert_eq!(badge.style, BadgeStyle::Rejected);
        assert_eq!(badge.label, "REJECTED");
    }

    #[rstest]
    #[case(None, None, false)]
    #[case(Some("APPROVED"), Some("APPROVED"), false)]
    #[case(Some("PENDING_FOR_VALIDATION"), None, false)]
    #[case(Some("REJECTED"), None, true)]
    #[case(None, Some("REJECTED"), true)]
    #[case(Some("APPROVED"), Some("REJECTED"), true)]
    fn edit_is_enabled_only_after_a_rejection(
        #[case] pm: Option<&str>,
        #[case] fin: Option<&str>,
        #[case] expected: bool,
    ) {
        let r = record(serde_json::json!({
            "id": 1, "status": "IN_PREPARATION",
            "pm_decision": pm, "final_decision": fin
        }));
        assert_eq!(edit_enabled(&r), expected);
        if expected {
            assert_eq!(edit_tooltip(&r), "Edit");
        } else {
            assert!(edit_tooltip(&r).contains("REJECTED"));
        }
    }
}
