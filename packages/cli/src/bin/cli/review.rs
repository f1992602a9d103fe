// ABOUTME: One-shot review links: load, show, approve or reject, reload
// ABOUTME: Shared handler for the PM, final, and deployment steps

use chrono::{DateTime, Utc};
use clap::Args;
use colored::*;
use inquire::{Confirm, Text};

use llc_cli::Config;
use llc_client::{ApiClient, ReviewVerdict};
use llc_formatter::{format_opt_date, PLACEHOLDER};
use llc_review::{
    dep_view, final_view, pm_view, DecisionSummary, ReviewAction, ReviewEntry, ReviewKind,
    ReviewView,
};

use super::utils::{client_and_store, CliResult};

#[derive(Args)]
pub struct ReviewArgs {
    /// Record id (processing id for deployment reviews) from the link
    pub id: String,
    /// The token query parameter from the link
    #[arg(short, long)]
    pub token: String,
    /// Approve without prompting
    #[arg(long, conflicts_with = "reject")]
    pub approve: bool,
    /// Reject without prompting (requires --reason)
    #[arg(long)]
    pub reject: bool,
    /// Rejection reason, at least 3 characters
    #[arg(long)]
    pub reason: Option<String>,
}

pub async fn handle_review(kind: ReviewKind, args: ReviewArgs, config: &Config) -> CliResult {
    let entry = ReviewEntry::parse(Some(&args.id), Some(&args.token))?;
    let (client, _store) = client_and_store(config).await?;

    let view = load_view(kind, &client, &entry).await?;
    match view {
        ReviewView::Decided(summary) => {
            print_summary(&summary);
            println!(
                "{}",
                "This link was already used; the decision cannot be repeated".dimmed()
            );
            return Ok(());
        }
        ReviewView::Actionable => {}
    }

    let action = resolve_action(&args)?;
    let Some(action) = action else {
        println!("{}", "No decision made".yellow());
        return Ok(());
    };

    let (verdict, reason) = match &action {
        ReviewAction::Approve => (ReviewVerdict::Approve, String::new()),
        ReviewAction::Reject { reason } => (ReviewVerdict::Reject, reason.clone()),
    };
    decide(kind, &client, &entry, verdict, &reason).await?;

    // Reload so the terminal state comes from the backend, not from what
    // was just sent
    match load_view(kind, &client, &entry).await? {
        ReviewView::Decided(summary) => {
            println!("{} Decision recorded", "✓".green());
            print_summary(&summary);
        }
        ReviewView::Actionable => {
            println!("{}", "Decision sent but the record still shows as open".yellow());
        }
    }
    Ok(())
}

async fn load_view(
    kind: ReviewKind,
    client: &ApiClient,
    entry: &ReviewEntry,
) -> Result<ReviewView, Box<dyn std::error::Error>> {
    let view = match kind {
        ReviewKind::Pm => {
            let record = client.pm_review_fetch(entry.id, &entry.token).await?;
            print_record_header(&record.problem_short, record.created_at);
            pm_view(&record)
        }
        ReviewKind::Final => {
            let record = client.final_review_fetch(entry.id, &entry.token).await?;
            print_record_header(&record.problem_short, record.created_at);
            final_view(&record)
        }
        ReviewKind::Deployment => {
            let processing = client.dep_review_fetch(entry.id, &entry.token).await?;
            print_record_header(&processing.deployment_description, processing.deployment_date);
            dep_view(&processing)
        }
    };
    Ok(view)
}

fn print_record_header(description: &Option<String>, date: Option<DateTime<Utc>>) {
    println!(
        "{} {}",
        description.as_deref().unwrap_or(PLACEHOLDER).bold(),
        format!("({})", format_opt_date(date.as_ref())).dimmed()
    );
}

async fn decide(
    kind: ReviewKind,
    client: &ApiClient,
    entry: &ReviewEntry,
    verdict: ReviewVerdict,
    reason: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match kind {
        ReviewKind::Pm => client
            .pm_review_decide(entry.id, &entry.token, verdict, reason)
            .await?,
        ReviewKind::Final => client
            .final_review_decide(entry.id, &entry.token, verdict, reason)
            .await?,
        ReviewKind::Deployment => client
            .dep_review_decide(entry.id, &entry.token, verdict, reason)
            .await?,
    }
    Ok(())
}

fn resolve_action(args: &ReviewArgs) -> Result<Option<ReviewAction>, Box<dyn std::error::Error>> {
    if args.approve {
        return Ok(Some(ReviewAction::Approve));
    }
    if args.reject {
        let reason = args
            .reason
            .as_deref()
            .ok_or("--reject requires --reason")?;
        return Ok(Some(ReviewAction::reject(reason)?));
    }

    // Interactive path
    let approve = Confirm::new("Approve this record?")
        .with_default(false)
        .prompt()?;
    if approve {
        return Ok(Some(ReviewAction::Approve));
    }
    let reject = Confirm::new("Reject it instead?")
        .with_default(false)
        .prompt()?;
    if !reject {
        return Ok(None);
    }
    loop {
        let reason = Text::new("Rejection reason:").prompt()?;
        match ReviewAction::reject(&reason) {
            Ok(action) => return Ok(Some(action)),
            Err(message) => println!("{} {}", "✗".red(), message),
        }
    }
}

fn print_summary(summary: &DecisionSummary) {
    let decision = match summary.decision {
        llc_core::Decision::Approved => summary.decision.to_string().green(),
        llc_core::Decision::Rejected => summary.decision.to_string().red(),
        llc_core::Decision::PendingForValidation => summary.decision.to_string().yellow(),
    };
    println!("Decision: {}", decision.bold());
    println!("Decided:  {}", format_opt_date(summary.decided_at.as_ref()));
    if let Some(reason) = &summary.reason {
        println!("Reason:   {}", reason);
    }
}
