// ABOUTME: Renders policy column descriptors into table cells
// ABOUTME: One exhaustive switch over the column kinds

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use llc_client::ApiClient;
use llc_core::{LlcRecord, WorkflowStatus};
use llc_formatter::{display_value, is_image, PLACEHOLDER};
use llc_policy::{badge_for, edit_tooltip, Badge, BadgeStyle, ColumnKind, ColumnSpec};

use super::utils::truncate;

const CELL_WIDTH: usize = 28;

/// Text of one cell for a record under a column descriptor.
pub fn cell_text(
    table_status: WorkflowStatus,
    column: &ColumnSpec,
    record: &LlcRecord,
    client: &ApiClient,
) -> String {
    match column.kind {
        ColumnKind::Text { field } | ColumnKind::Date { field } => {
            truncate(&display_value(&record.field_value(field)), CELL_WIDTH)
        }
        ColumnKind::Attachments { scope } => attachment_cell(
            record
                .attachments_in_scope(scope)
                .iter()
                .map(|a| a.filename.as_str()),
        ),
        ColumnKind::ProcessingAttachments { scope } => attachment_cell(
            record
                .processing_in_scope(scope)
                .iter()
                .map(|a| a.filename.as_str()),
        ),
        ColumnKind::Badge { field } => match badge_for(table_status, field, record) {
            Some(badge) => badge_text(badge),
            None => PLACEHOLDER.to_string(),
        },
        ColumnKind::GeneratedLlc => match record.generated_llc.as_deref() {
            Some(path) => client.file_url(path),
            None => PLACEHOLDER.to_string(),
        },
        ColumnKind::GeneratedDep => match record.generated_dep.as_deref() {
            Some(path) => client.file_url(path),
            None => PLACEHOLDER.to_string(),
        },
        ColumnKind::Actions => edit_tooltip(record).to_string(),
    }
}

/// Joined filename list for an attachment cell. Files the web app shows
/// as thumbnails are tagged, since a terminal cannot inline them.
fn attachment_cell<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let rendered: Vec<String> = names
        .map(|n| {
            if is_image(n) {
                format!("{n} (image)")
            } else {
                n.to_string()
            }
        })
        .collect();
    if rendered.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        truncate(&rendered.join(", "), CELL_WIDTH)
    }
}

fn badge_text(badge: Badge) -> String {
    let marker = match badge.style {
        BadgeStyle::Pending => "…",
        BadgeStyle::Approved => "✓",
        BadgeStyle::Rejected => "✗",
    };
    format!("{marker} {}", badge.label)
}

/// New table in the house style.
pub fn new_table(columns: &[ColumnSpec]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    let mut header = vec!["ID".to_string()];
    header.extend(columns.iter().map(|c| c.label.to_string()));
    table.set_header(header);
    table
}

/// One row per record under the given columns.
pub fn add_record_row(
    table: &mut Table,
    table_status: WorkflowStatus,
    columns: &[ColumnSpec],
    record: &LlcRecord,
    client: &ApiClient,
) {
    let mut row = vec![record.id.to_string()];
    row.extend(
        columns
            .iter()
            .map(|c| cell_text(table_status, c, record, client)),
    );
    table.add_row(row);
}
