// ABOUTME: In-memory draft of an LLC record under creation or edit
// ABOUTME: Read-only provenance fields derive from the signed-in profile

use serde::Serialize;

use llc_core::{validator_for_plant, UserProfile, QUALITY_CATEGORY};

/// A file staged for upload, not yet sent anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl DraftFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// One root cause being edited, with its staged files.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RootCauseDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub root_cause: String,
    pub detailed_cause_description: String,
    pub solution_description: String,
    pub conclusion: String,
    pub process: String,
    pub origin: String,
    #[serde(skip)]
    pub files: Vec<DraftFile>,
}

/// The full record draft backing the create/edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlcDraft {
    pub category: String,
    pub problem_short: String,
    pub problem_detail: String,
    pub llc_type: String,
    pub customer: String,
    pub product_family: String,
    pub product_type: String,
    pub quality_detection: String,
    pub application_label: String,
    pub product_line_label: String,
    pub part_or_machine_number: String,
    pub failure_mode: String,
    pub conclusions: String,

    // Derived from the signed-in profile, read-only in the form
    pub editor: String,
    pub plant: String,
    pub validator: String,

    pub root_causes: Vec<RootCauseDraft>,

    // Scoped upload groups
    pub bad_part_files: Vec<DraftFile>,
    pub good_part_files: Vec<DraftFile>,
    pub situation_before_files: Vec<DraftFile>,
    pub situation_after_files: Vec<DraftFile>,
}

impl LlcDraft {
    /// Fresh draft with editor/plant/validator derived from the profile.
    /// The validator stays blank when the plant has no configured one;
    /// submission is blocked in that case.
    pub fn for_user(user: &UserProfile) -> Self {
        let plant = user.plant.clone().unwrap_or_default();
        let validator = validator_for_plant(&plant).unwrap_or_default().to_string();
        Self {
            editor: user.editor_identity().unwrap_or_default().to_string(),
            plant,
            validator,
            ..Default::default()
        }
    }

    pub fn is_quality(&self) -> bool {
        self.category == QUALITY_CATEGORY
    }

    /// Change category. Leaving "Quality" discards any staged part
    /// comparison files, since that section disappears from the form.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        if !self.is_quality() {
            self.bad_part_files.clear();
            self.good_part_files.clear();
        }
    }

    /// Why submission is impossible regardless of field validity, if so.
    pub fn submission_blocked_reason(&self) -> Option<String> {
        if self.editor.trim().is_empty() {
            return Some("No editor in the current session. Sign in again.".to_string());
        }
        if self.plant.trim().is_empty() {
            return Some("No plant in the current session. Sign in again.".to_string());
        }
        if self.validator.trim().is_empty() {
            return Some(format!("No validator configured for: {}", self.plant));
        }
        None
    }
}

/// Staging area for the root-cause modal. Saving writes back into the
/// parent draft; nothing reaches the server until the form submits.
#[derive(Debug, Clone)]
pub struct RootCauseEditor {
    index: Option<usize>,
    pub draft: RootCauseDraft,
}

impl RootCauseEditor {
    /// Open the modal for a new root cause.
    pub fn open_new() -> Self {
        Self {
            index: None,
            draft: RootCauseDraft::default(),
        }
    }

    /// Open the modal over an existing entry of the parent draft.
    pub fn open_edit(parent: &LlcDraft, index: usize) -> Option<Self> {
        parent.root_causes.get(index).map(|rc| Self {
            index: Some(index),
            draft: rc.clone(),
        })
    }

    /// Append or update the corresponding entry in the parent draft.
    pub fn save(self, parent: &mut LlcDraft) {
        match self.index {
            Some(i) if i < parent.root_causes.len() => parent.root_causes[i] = self.draft,
            _ => parent.root_causes.push(self.draft),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn quality_manager() -> UserProfile {
        UserProfile {
            name: Some("QM".into()),
            email: Some("qm@avocarbon.com".into()),
            role: Some("quality_manager".into()),
            plant: Some("SCEET Plant".into()),
        }
    }

    #[test]
    fn draft_derives_provenance_from_profile() {
        let draft = LlcDraft::for_user(&quality_manager());
        assert_eq!(draft.editor, "qm@avocarbon.com");
        assert_eq!(draft.plant, "SCEET Plant");
        assert_eq!(draft.validator, "imed.benalaya@avocarbon.com");
        assert_eq!(draft.submission_blocked_reason(), None);
    }

    #[test]
    fn unconfigured_plant_blocks_submission() {
        let user = UserProfile {
            plant: Some("MARS Plant".into()),
            ..quality_manager()
        };
        let draft = LlcDraft::for_user(&user);
        assert_eq!(draft.validator, "");
        assert_eq!(
            draft.submission_blocked_reason(),
            Some("No validator configured for: MARS Plant".to_string())
        );
    }

    #[test]
    fn leaving_quality_clears_part_comparison_files() {
        let mut draft = LlcDraft::for_user(&quality_manager());
        draft.set_category("Quality");
        draft.bad_part_files.push(DraftFile::new("bad.png", vec![1]));
        draft.good_part_files.push(DraftFile::new("good.png", vec![2]));

        draft.set_category("CIP");
        assert!(draft.bad_part_files.is_empty());
        assert!(draft.good_part_files.is_empty());

        // Switching back does not resurrect them
        draft.set_category("Quality");
        assert!(draft.bad_part_files.is_empty());
    }

    #[test]
    fn editor_appends_new_and_updates_existing() {
        let mut draft = LlcDraft::for_user(&quality_manager());

        let mut editor = RootCauseEditor::open_new();
        editor.draft.root_cause = "Worn tooling".to_string();
        editor.save(&mut draft);
        assert_eq!(draft.root_causes.len(), 1);

        let mut editor = RootCauseEditor::open_edit(&draft, 0).unwrap();
        editor.draft.root_cause = "Worn stamping die".to_string();
        editor.save(&mut draft);
        assert_eq!(draft.root_causes.len(), 1);
        assert_eq!(draft.root_causes[0].root_cause, "Worn stamping die");

        assert!(RootCauseEditor::open_edit(&draft, 5).is_none());
    }
}
