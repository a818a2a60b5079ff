//! Authentication commands.
//!
//! The access token lives in the session file next to the selected room.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};
use prioritask_core::{ApiClient, Credentials, NewUser};

use crate::cli::AuthAction;
use crate::config::Config;

/// Handle auth commands
pub async fn execute(action: AuthAction, client: &ApiClient, config: &Config) -> Result<()> {
    match action {
        AuthAction::Login { email } => login(email, client).await,
        AuthAction::Register { name, email } => register(name, email, client).await,
        AuthAction::Logout => logout(client),
        AuthAction::Status => status(client, config).await,
        AuthAction::Refresh => refresh(client).await,
    }
}

async fn login(email: Option<String>, client: &ApiClient) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    let credentials = Credentials { email, password };
    client.login(&credentials).await?;
    println!("{} Logged in as {}", "✓".green(), credentials.email.cyan());
    Ok(())
}

async fn register(nombre: String, email: String, client: &ApiClient) -> Result<()> {
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    let user = NewUser {
        nombre,
        email,
        password,
    };
    let created = client.register(&user).await?;
    println!("{} Account created for {}", "✓".green(), created.email.cyan());
    println!("  Run {} to start a session.", "ptk auth login".cyan());
    Ok(())
}

fn logout(client: &ApiClient) -> Result<()> {
    if !client.is_logged_in()? {
        println!("{} Not logged in.", "✗".red());
        return Ok(());
    }
    client.logout()?;
    println!("{} Logged out.", "✓".green());
    Ok(())
}

async fn status(client: &ApiClient, config: &Config) -> Result<()> {
    println!("{}", "Session Status".bold());
    println!("{}", "─".repeat(40));
    println!("API:       {}", client.config().base_url());
    println!("Session:   {}", config.session_path().display());

    match client.selected_room()? {
        Some(room) => println!("Room:      {}", room.cyan()),
        None => println!("Room:      {}", "none selected".yellow()),
    }

    if !client.is_logged_in()? {
        println!("Token:     {}", "Not logged in".red());
        return Ok(());
    }

    match client.current_user().await {
        Ok(user) => {
            println!("Token:     {}", "Valid".green());
            println!("User:      {} ({})", user.label().cyan(), user.id);
        }
        Err(e) if e.is_auth_failure() => {
            println!("Token:     {}", "Expired".red());
        }
        Err(e) => {
            println!("Token:     {} ({})", "Unverified".yellow(), e);
        }
    }

    Ok(())
}

async fn refresh(client: &ApiClient) -> Result<()> {
    client.refresh_session().await?;
    println!("{} Session renewed.", "✓".green());
    Ok(())
}
