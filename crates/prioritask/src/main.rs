//! ptk - Prioritask command-line client
//!
//! Household task management from the terminal: tasks, tags, rooms,
//! assignments, history and AI suggestions.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use prioritask_core::SessionEvent;
use tokio::sync::broadcast::Receiver;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (stderr, so --json output stays clean)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("ptk=info".parse()?))
        .init();

    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("ptk {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration
    let config = config::Config::load()?;
    let client = commands::connect(&config)?;
    let events = client.subscribe();

    // Execute command
    let result = match cli.command {
        Commands::Auth(cmd) => commands::auth::execute(cmd.action, &client, &config).await,
        Commands::Task(cmd) => commands::task::execute(cmd.action, &client).await,
        Commands::Tag(cmd) => commands::tag::execute(cmd.action, &client).await,
        Commands::Room(cmd) => commands::room::execute(cmd.action, &client).await,
        Commands::Assign(cmd) => commands::assign::execute(cmd.action, &client).await,
        Commands::Ai(cmd) => commands::ai::execute(cmd.action, &client).await,
        Commands::History {
            period,
            room,
            user,
            json,
        } => commands::history::execute(period, room, user, json, &client, &config).await,
        Commands::Users { json } => commands::user::execute(json, &client).await,
        Commands::Doctor => commands::doctor::execute(&client, &config).await,
        Commands::Version => Ok(()),
    };

    report_session_events(events);

    if let Err(err) = &result {
        if let Some(api_err) = err.downcast_ref::<prioritask_core::Error>() {
            eprintln!("{} {}", "✗".red(), api_err.user_message(&api_err.to_string()));
            std::process::exit(1);
        }
    }
    result
}

/// Tell the user what happened to their session during the command.
fn report_session_events(mut events: Receiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::SessionInvalidated => {
                eprintln!("{} Your session has expired.", "✗".red());
                eprintln!("  Run {} to log in again.", "ptk auth login".cyan());
            }
            SessionEvent::TokenRefreshed => tracing::debug!("Session renewed during command"),
            SessionEvent::LoggedIn | SessionEvent::LoggedOut => {}
        }
    }
}
