//! Diagnostics: configuration, session file and API reachability.

use anyhow::Result;
use colored::Colorize;
use prioritask_core::ApiClient;

use crate::config::Config;

pub async fn execute(client: &ApiClient, config: &Config) -> Result<()> {
    println!("{}", "ptk doctor".bold());
    println!("{}", "─".repeat(40));

    let config_path = Config::config_path();
    if config_path.exists() {
        check(true, &format!("Config file: {}", config_path.display()));
    } else {
        println!(
            "{} Config file: {} (using defaults)",
            "○".yellow(),
            config_path.display()
        );
    }

    println!("{} API URL: {}", "→".cyan(), client.config().base_url());

    let session_path = config.session_path();
    match client.is_logged_in() {
        Ok(true) => check(true, &format!("Session: {}", session_path.display())),
        Ok(false) => println!(
            "{} Session: not logged in ({})",
            "○".yellow(),
            session_path.display()
        ),
        Err(e) => check(false, &format!("Session file unreadable: {}", e)),
    }

    // Any HTTP answer, even 401, means the backend is reachable.
    match client.current_user().await {
        Ok(user) => check(true, &format!("API reachable, logged in as {}", user.label())),
        Err(e) if e.status().is_some() => check(true, "API reachable"),
        Err(e) => check(false, &format!("API unreachable: {}", e)),
    }

    Ok(())
}

fn check(ok: bool, message: &str) {
    if ok {
        println!("{} {}", "✓".green(), message);
    } else {
        println!("{} {}", "✗".red(), message);
    }
}
