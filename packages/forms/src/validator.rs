// ABOUTME: Client-side validation of the record draft before submission
// ABOUTME: Field-level errors keyed the way the form highlights inputs

use llc_core::TEXT_FIELD_MAX;

use crate::draft::{LlcDraft, RootCauseDraft};

/// Validation errors for draft data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn check_required(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(field, "Required"));
    }
}

fn check_bounded(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    check_required(errors, field, value);
    if value.chars().count() > TEXT_FIELD_MAX {
        errors.push(ValidationError::new(
            field,
            format!("Must be at most {TEXT_FIELD_MAX} characters"),
        ));
    }
}

/// Validates the complete draft for submission
pub fn validate_draft(draft: &LlcDraft) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_required(&mut errors, "category", &draft.category);
    check_required(&mut errors, "problem_short", &draft.problem_short);
    check_bounded(&mut errors, "problem_detail", &draft.problem_detail);
    check_required(&mut errors, "llc_type", &draft.llc_type);
    check_required(&mut errors, "customer", &draft.customer);
    check_required(&mut errors, "product_family", &draft.product_family);
    check_required(&mut errors, "product_type", &draft.product_type);
    check_required(&mut errors, "quality_detection", &draft.quality_detection);
    check_required(&mut errors, "application_label", &draft.application_label);
    check_required(&mut errors, "product_line_label", &draft.product_line_label);
    check_required(
        &mut errors,
        "part_or_machine_number",
        &draft.part_or_machine_number,
    );
    check_required(&mut errors, "editor", &draft.editor);
    check_required(&mut errors, "plant", &draft.plant);
    check_required(&mut errors, "validator", &draft.validator);
    check_required(&mut errors, "failure_mode", &draft.failure_mode);
    check_bounded(&mut errors, "conclusions", &draft.conclusions);

    if draft.root_causes.is_empty() {
        errors.push(ValidationError::new(
            "rootCauses",
            "At least one root cause is required",
        ));
    }
    for (i, rc) in draft.root_causes.iter().enumerate() {
        for e in validate_root_cause(rc) {
            errors.push(ValidationError::new(
                format!("rootCauses[{i}].{}", e.field),
                e.message,
            ));
        }
    }

    errors
}

/// Validates a single root cause, as the modal does before saving
pub fn validate_root_cause(rc: &RootCauseDraft) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check_required(&mut errors, "root_cause", &rc.root_cause);
    check_bounded(
        &mut errors,
        "detailed_cause_description",
        &rc.detailed_cause_description,
    );
    check_bounded(&mut errors, "solution_description", &rc.solution_description);
    check_bounded(&mut errors, "conclusion", &rc.conclusion);
    check_required(&mut errors, "process", &rc.process);
    check_required(&mut errors, "origin", &rc.origin);
    errors
}
