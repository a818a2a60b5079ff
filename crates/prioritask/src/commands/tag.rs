use anyhow::Result;
use colored::Colorize;
use prioritask_core::ApiClient;

use super::{header, print_json, short_id};
use crate::cli::TagAction;

pub async fn execute(action: TagAction, client: &ApiClient) -> Result<()> {
    match action {
        TagAction::List { json } => {
            let tags = client.list_tags().await?;
            if json {
                return print_json(&tags);
            }
            header("Tags");
            if tags.is_empty() {
                println!("  {}", "No tags.".dimmed());
            }
            for tag in &tags {
                println!("  {}  {}", short_id(&tag.id).dimmed(), tag.nombre);
            }
            Ok(())
        }
        TagAction::Add { name } => {
            let tag = client.create_tag(&name).await?;
            println!("{} Created tag {} ({})", "✓".green(), tag.nombre.bold(), tag.id);
            Ok(())
        }
        TagAction::Rename { tag_id, name } => {
            let tag = client.rename_tag(tag_id, &name).await?;
            println!("{} Renamed to {}", "✓".green(), tag.nombre.bold());
            Ok(())
        }
        TagAction::Delete { tag_id } => {
            client.delete_tag(tag_id).await?;
            println!("{} Deleted tag {}", "✓".green(), tag_id);
            Ok(())
        }
        TagAction::Apply { task_id, tag_ids } => {
            let ack = client.assign_tags(task_id, &tag_ids).await?;
            println!("{} {}", "✓".green(), ack.message);
            Ok(())
        }
    }
}
