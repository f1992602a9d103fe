// ABOUTME: Session subcommands: signin, signup, signout, whoami
// ABOUTME: Credentials are prompted, never taken from argv

use clap::Subcommand;
use colored::*;
use inquire::{Password, Text};

use llc_cli::Config;
use llc_client::SignupRequest;

use super::utils::{client_and_store, CliResult};

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in and persist the session
    Signin {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Create an account and sign in
    Signup,
    /// Drop the persisted session
    Signout,
    /// Show the signed-in profile
    Whoami,
}

pub async fn handle_auth_command(command: AuthCommands, config: &Config) -> CliResult {
    match command {
        AuthCommands::Signin { email } => signin(email, config).await,
        AuthCommands::Signup => signup(config).await,
        AuthCommands::Signout => signout(config).await,
        AuthCommands::Whoami => whoami(config).await,
    }
}

async fn signin(email: Option<String>, config: &Config) -> CliResult {
    let (mut client, mut store) = client_and_store(config).await?;

    let email = match email {
        Some(email) => email,
        None => Text::new("Email:").prompt()?,
    };
    let password = Password::new("Password:")
        .without_confirmation()
        .prompt()?;

    let session = client.sign_in(&email, &password).await?;
    let name = session.user.name.clone().unwrap_or_else(|| email.clone());
    store.save(session).await?;

    println!("{} Signed in as {}", "✓".green(), name.cyan());
    Ok(())
}

async fn signup(config: &Config) -> CliResult {
    let (mut client, mut store) = client_and_store(config).await?;

    let name = Text::new("Name:").prompt()?;
    let email = Text::new("Email:").prompt()?;
    let password = Password::new("Password:").prompt()?;

    let session = client
        .sign_up(&SignupRequest {
            name,
            email,
            password,
        })
        .await?;
    store.save(session).await?;

    println!("{} Account created, you are signed in", "✓".green());
    Ok(())
}

async fn signout(config: &Config) -> CliResult {
    let (_, mut store) = client_and_store(config).await?;
    if !store.is_signed_in() {
        println!("{}", "Not signed in".yellow());
        return Ok(());
    }
    store.clear().await?;
    println!("{} Signed out", "✓".green());
    Ok(())
}

async fn whoami(config: &Config) -> CliResult {
    let (_, store) = client_and_store(config).await?;
    match store.user() {
        Some(user) => {
            let dash = "\u{2014}";
            println!("Name:  {}", user.name.as_deref().unwrap_or(dash));
            println!("Email: {}", user.email.as_deref().unwrap_or(dash));
            println!("Role:  {}", user.role.as_deref().unwrap_or(dash));
            println!("Plant: {}", user.plant.as_deref().unwrap_or(dash));
        }
        None => println!("{}", "Not signed in".yellow()),
    }
    Ok(())
}
