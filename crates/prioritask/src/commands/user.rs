use anyhow::Result;
use colored::Colorize;
use prioritask_core::ApiClient;

use super::{header, print_json};

pub async fn execute(json: bool, client: &ApiClient) -> Result<()> {
    let users = client.list_users().await?;
    if json {
        return print_json(&users);
    }
    header("Users");
    for user in &users {
        let name = user.nombre.as_deref().unwrap_or("");
        let inactive = if user.is_active { "" } else { " (inactive)" };
        println!("  {}  {} {}{}", user.id.dimmed(), user.email, name, inactive.yellow());
    }
    Ok(())
}
