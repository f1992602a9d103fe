// ABOUTME: Shared constants for LLC records and role checks
// ABOUTME: Field bounds, role strings, image extension list

/// Maximum length of bounded descriptive text fields
pub const TEXT_FIELD_MAX: usize = 2000;

/// Minimum trimmed length of a rejection reason
pub const MIN_REJECT_REASON_LEN: usize = 3;

/// Role allowed to see the actions column on the preparation table
pub const ROLE_QUALITY_MANAGER: &str = "quality_manager";

/// Role allowed to see the per-plant aggregate charts
pub const ROLE_ADMIN: &str = "admin";

/// Category value that enables the Part Comparison section
pub const QUALITY_CATEGORY: &str = "Quality";

/// File extensions rendered as image thumbnails
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];
