// ABOUTME: Draft editing and validation for LLC records
// ABOUTME: Assembles the multipart submission payload the backend expects

pub mod draft;
pub mod submission;
pub mod validator;

pub use draft::{DraftFile, LlcDraft, RootCauseDraft, RootCauseEditor};
pub use submission::{
    build_submission, DeleteManifest, EditState, ExistingAttachment, FilePart, SubmissionParts,
};
pub use validator::{validate_draft, validate_root_cause, ValidationError};
