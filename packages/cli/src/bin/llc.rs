// ABOUTME: Entry point for the llc binary
// ABOUTME: Parses subcommands and dispatches to the cli handler modules

use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod cli;

use cli::auth::AuthCommands;
use cli::records::RecordsCommands;
use cli::review::ReviewArgs;
use llc_cli::Config;
use llc_review::ReviewKind;

#[derive(Parser)]
#[command(name = "llc")]
#[command(about = "LLC CLI - quality lessons learned records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the signed-in session
    #[command(subcommand)]
    Auth(AuthCommands),
    /// Browse, create, edit, and delete records
    #[command(subcommand)]
    Records(RecordsCommands),
    /// Show the KPI dashboard
    Kpis {
        /// Free-text filter over status, plant, category, type, customer,
        /// product family, and short problem description
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Act on a PM review link
    PmReview(ReviewArgs),
    /// Act on a final review link
    FinalReview(ReviewArgs),
    /// Act on a deployment review link
    DepReview(ReviewArgs),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let result = match cli.command {
        Commands::Auth(command) => cli::auth::handle_auth_command(command, &config).await,
        Commands::Records(command) => cli::records::handle_records_command(command, &config).await,
        Commands::Kpis { query } => cli::kpis::show_kpis(query.as_deref(), &config).await,
        Commands::PmReview(args) => cli::review::handle_review(ReviewKind::Pm, args, &config).await,
        Commands::FinalReview(args) => {
            cli::review::handle_review(ReviewKind::Final, args, &config).await
        }
        Commands::DepReview(args) => {
            cli::review::handle_review(ReviewKind::Deployment, args, &config).await
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
