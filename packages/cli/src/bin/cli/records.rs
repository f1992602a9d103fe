// ABOUTME: Record subcommands: list, show, new, edit, delete
// ABOUTME: Interactive forms build drafts and submit multipart payloads

use clap::Subcommand;
use colored::*;
use inquire::{Confirm, Select, Text};

use llc_cli::Config;
use llc_client::{ApiClient, StatusBoard};
use llc_core::{LlcRecord, Options, UserProfile, WorkflowStatus};
use llc_forms::{
    build_submission, validate_root_cause, DraftFile, EditState, LlcDraft, RootCauseDraft,
    RootCauseEditor,
};
use llc_policy::{columns_for, ColumnKind};

use super::render::{add_record_row, cell_text, new_table};
use super::utils::{signed_in_client, CliResult};

#[derive(Subcommand)]
pub enum RecordsCommands {
    /// List records, one table per workflow status
    List {
        /// Only show this status (e.g. IN_PREPARATION, CLOSED)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show one record in full
    Show {
        /// Record ID
        id: i64,
    },
    /// Create a record interactively
    New,
    /// Edit a rejected record
    Edit {
        /// Record ID
        id: i64,
    },
    /// Delete a record
    Delete {
        /// Record ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_records_command(command: RecordsCommands, config: &Config) -> CliResult {
    match command {
        RecordsCommands::List { status } => list_records(status.as_deref(), config).await,
        RecordsCommands::Show { id } => show_record(id, config).await,
        RecordsCommands::New => new_record(config).await,
        RecordsCommands::Edit { id } => edit_record(id, config).await,
        RecordsCommands::Delete { id, yes } => delete_record(id, yes, config).await,
    }
}

async fn list_records(status: Option<&str>, config: &Config) -> CliResult {
    let (client, _store, user) = signed_in_client(config).await?;

    let statuses: Vec<WorkflowStatus> = match status {
        Some(s) => vec![s.parse()?],
        None => WorkflowStatus::ALL.to_vec(),
    };

    let mut board = StatusBoard::new();
    board.refresh_all(&client).await;

    for status in statuses {
        println!();
        println!("{}", status.label().blue().bold());
        if let Some(message) = board.get(status).error() {
            println!("{} {}", "Failed to load:".red(), message);
            continue;
        }
        let records = board.records(status);
        if records.is_empty() {
            println!("{}", "No records".dimmed());
            continue;
        }

        let columns = columns_for(status, records, user.role.as_deref());
        let mut table = new_table(&columns);
        for record in records {
            add_record_row(&mut table, status, &columns, record, &client);
        }
        println!("{table}");
        println!("Total: {} records", records.len().to_string().cyan());
    }
    Ok(())
}

async fn show_record(id: i64, config: &Config) -> CliResult {
    let (client, _store, user) = signed_in_client(config).await?;
    let record = client.get_record(id).await?;

    println!(
        "{}",
        format!("Record #{} - {}", record.id, record.status.label())
            .blue()
            .bold()
    );
    let records = std::slice::from_ref(&record);
    let columns = columns_for(record.status, records, user.role.as_deref());
    for column in &columns {
        if column.kind == ColumnKind::Actions {
            continue;
        }
        let value = cell_text(record.status, column, &record, &client);
        println!("{:<28} {}", column.label.bold(), value);
    }
    Ok(())
}

fn prompt_text(label: &str, initial: &str) -> Result<String, Box<dyn std::error::Error>> {
    let prompt = Text::new(label);
    let value = if initial.is_empty() {
        prompt.prompt()?
    } else {
        prompt.with_initial_value(initial).prompt()?
    };
    Ok(value)
}

fn prompt_select(
    label: &str,
    options: &[&str],
    current: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let start = options.iter().position(|o| *o == current).unwrap_or(0);
    let choice = Select::new(label, options.to_vec())
        .with_starting_cursor(start)
        .prompt()?;
    Ok(choice.to_string())
}

fn prompt_files(label: &str) -> Result<Vec<DraftFile>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    loop {
        let path = Text::new(label)
            .with_help_message("Path to a file, empty to finish")
            .prompt()?;
        let path = path.trim().to_string();
        if path.is_empty() {
            break;
        }
        match std::fs::read(&path) {
            Ok(bytes) => {
                let filename = std::path::Path::new(&path)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or(path.clone());
                files.push(DraftFile::new(filename, bytes));
            }
            Err(e) => println!("{} {}: {}", "Cannot read".red(), path, e),
        }
    }
    Ok(files)
}

fn prompt_root_cause(
    initial: Option<&RootCauseDraft>,
) -> Result<RootCauseDraft, Box<dyn std::error::Error>> {
    let base = initial.cloned().unwrap_or_default();
    loop {
        let mut rc = RootCauseDraft {
            id: base.id,
            root_cause: prompt_text("Root cause:", &base.root_cause)?,
            detailed_cause_description: prompt_text(
                "Detailed cause description:",
                &base.detailed_cause_description,
            )?,
            solution_description: prompt_text(
                "Solution description:",
                &base.solution_description,
            )?,
            conclusion: prompt_text("Conclusion:", &base.conclusion)?,
            process: prompt_select("Process:", &Options::PROCESS, &base.process)?,
            origin: prompt_select("Origin:", &Options::ORIGIN, &base.origin)?,
            files: base.files.clone(),
        };
        rc.files.extend(prompt_files("Root cause file:")?);

        let errors = validate_root_cause(&rc);
        if errors.is_empty() {
            return Ok(rc);
        }
        for e in &errors {
            println!("{} {}: {}", "✗".red(), e.field, e.message);
        }
    }
}

fn fill_draft(draft: &mut LlcDraft) -> CliResult {
    let category = prompt_select("Category:", &Options::CATEGORY, &draft.category)?;
    draft.set_category(category);
    draft.problem_short = prompt_text("Short problem description:", &draft.problem_short)?;
    draft.problem_detail = prompt_text("Detailed problem description:", &draft.problem_detail)?;
    draft.llc_type = prompt_select("LLC type:", &Options::LLC_TYPE, &draft.llc_type)?;
    draft.customer = prompt_select("Customer:", &Options::CUSTOMER, &draft.customer)?;
    draft.product_family = prompt_select(
        "Product family:",
        &Options::PRODUCT_FAMILY,
        &draft.product_family,
    )?;
    draft.product_type = prompt_select("Product type:", &Options::PRODUCT_TYPE, &draft.product_type)?;
    draft.quality_detection = prompt_select(
        "Quality detection:",
        &Options::QUALITY_DETECTION,
        &draft.quality_detection,
    )?;
    draft.application_label = prompt_select(
        "Application label:",
        &Options::APPLICATION,
        &draft.application_label,
    )?;
    draft.product_line_label = prompt_select(
        "Product line label:",
        &Options::PRODUCT_LINE,
        &draft.product_line_label,
    )?;
    draft.part_or_machine_number =
        prompt_text("Part or machine number:", &draft.part_or_machine_number)?;
    draft.failure_mode = prompt_select("Failure mode:", &Options::FAILURE_MODE, &draft.failure_mode)?;
    draft.conclusions = prompt_text("General conclusions:", &draft.conclusions)?;

    // Root causes through the staged editor
    if draft.root_causes.is_empty() {
        println!("{}", "At least one root cause is required".dimmed());
    }
    loop {
        let add = if draft.root_causes.is_empty() {
            true
        } else {
            Confirm::new("Add another root cause?")
                .with_default(false)
                .prompt()?
        };
        if !add {
            break;
        }
        let mut editor = RootCauseEditor::open_new();
        editor.draft = prompt_root_cause(None)?;
        editor.save(draft);
    }

    if draft.is_quality() {
        println!("{}", "Part Comparison (Quality only)".bold());
        draft.bad_part_files.extend(prompt_files("Bad part file:")?);
        draft.good_part_files.extend(prompt_files("Good part file:")?);
    }
    draft
        .situation_before_files
        .extend(prompt_files("Situation before file:")?);
    draft
        .situation_after_files
        .extend(prompt_files("Situation after file:")?);

    Ok(())
}

fn print_validation_errors(errors: &[llc_forms::ValidationError]) {
    for e in errors {
        println!("{} {}: {}", "✗".red(), e.field, e.message);
    }
}

async fn new_record(config: &Config) -> CliResult {
    let (client, _store, user) = signed_in_client(config).await?;

    let mut draft = LlcDraft::for_user(&user);
    if let Some(reason) = draft.submission_blocked_reason() {
        return Err(reason.into());
    }
    println!("Editor:    {}", draft.editor.cyan());
    println!("Plant:     {}", draft.plant.cyan());
    println!("Validator: {}", draft.validator.cyan());

    fill_draft(&mut draft)?;

    match build_submission(&draft, None) {
        Ok(parts) => {
            let created = client.create_record(parts).await?;
            println!(
                "{} Record #{} created, waiting in preparation",
                "✓".green(),
                created.id
            );
            Ok(())
        }
        Err(errors) => {
            print_validation_errors(&errors);
            Err("Draft is not valid".into())
        }
    }
}

fn draft_from_record(record: &LlcRecord, user: &UserProfile) -> LlcDraft {
    let mut draft = LlcDraft::for_user(user);
    let field = |v: &Option<String>| v.clone().unwrap_or_default();
    draft.set_category(field(&record.category));
    draft.problem_short = field(&record.problem_short);
    draft.problem_detail = field(&record.problem_detail);
    draft.llc_type = field(&record.llc_type);
    draft.customer = field(&record.customer);
    draft.product_family = field(&record.product_family);
    draft.product_type = field(&record.product_type);
    draft.quality_detection = field(&record.quality_detection);
    draft.application_label = field(&record.application_label);
    draft.product_line_label = field(&record.product_line_label);
    draft.part_or_machine_number = field(&record.part_or_machine_number);
    draft.failure_mode = field(&record.failure_mode);
    draft.conclusions = field(&record.conclusions);
    draft.root_causes = record
        .root_causes
        .iter()
        .map(|rc| RootCauseDraft {
            id: rc.id,
            root_cause: rc.root_cause.clone(),
            detailed_cause_description: rc.detailed_cause_description.clone(),
            solution_description: rc.solution_description.clone(),
            conclusion: rc.conclusion.clone(),
            process: rc.process.clone(),
            origin: rc.origin.clone(),
            files: Vec::new(),
        })
        .collect();
    draft
}

async fn edit_record(id: i64, config: &Config) -> CliResult {
    let (client, _store, user) = signed_in_client(config).await?;
    let record = client.get_record(id).await?;

    // Mirrors the server-side gate; locked records never reach the form
    let mut edit = EditState::from_record(&record)?;
    println!(
        "{}",
        format!("Edit record #{} (reopened by rejection)", id)
            .blue()
            .bold()
    );
    if let Some(reason) = record
        .pm_reject_reason
        .as_deref()
        .or(record.final_reject_reason.as_deref())
    {
        println!("Rejection reason: {}", reason.yellow());
    }

    let mut draft = draft_from_record(&record, &user);
    fill_draft(&mut draft)?;

    // Existing attachments: toggle removal marks, nothing sent until submit
    let removable: Vec<String> = edit
        .llc_attachments
        .iter()
        .map(|a| format!("#{} {}", a.id, a.filename))
        .collect();
    if !removable.is_empty() {
        let marked = inquire::MultiSelect::new(
            "Mark attachments for deletion:",
            removable.clone(),
        )
        .prompt()?;
        for label in marked {
            if let Some(idx) = removable.iter().position(|l| *l == label) {
                let att_id = edit.llc_attachments[idx].id;
                edit.toggle_remove_attachment(att_id);
            }
        }
    }

    match build_submission(&draft, Some(&edit)) {
        Ok(parts) => {
            let updated = client.update_record(id, parts).await?;
            println!("{} Record #{} updated", "✓".green(), updated.id);
            Ok(())
        }
        Err(errors) => {
            print_validation_errors(&errors);
            Err("Draft is not valid".into())
        }
    }
}

async fn delete_record(id: i64, yes: bool, config: &Config) -> CliResult {
    let (client, _store, _user) = signed_in_client(config).await?;

    if !yes {
        let confirmed = Confirm::new(&format!("Delete record #{id}?"))
            .with_default(false)
            .prompt()?;
        if !confirmed {
            println!("{}", "Cancelled".yellow());
            return Ok(());
        }
    }

    client.delete_record(id).await?;
    println!("{} Record #{} deleted", "✓".green(), id);
    Ok(())
}
