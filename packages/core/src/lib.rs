// ABOUTME: Core types, catalogs, and constants for LLC quality records
// ABOUTME: Foundational package shared by every other LLC package

pub mod constants;
pub mod options;
pub mod types;

// Re-export main types
pub use types::{
    Attachment, AttachmentScope, Decision, DecisionField, DeploymentProcessing, LlcRecord,
    ProcessingAttachment, ProcessingScope, RootCause, UserProfile, WorkflowStatus,
};

// Re-export constants
pub use constants::{
    MIN_REJECT_REASON_LEN, QUALITY_CATEGORY, ROLE_ADMIN, ROLE_QUALITY_MANAGER, TEXT_FIELD_MAX,
};

// Re-export option catalog helpers
pub use options::{validator_for_plant, Options};
