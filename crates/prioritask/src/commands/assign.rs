use anyhow::Result;
use colored::Colorize;
use prioritask_core::ApiClient;

use super::{header, print_json};
use crate::cli::AssignAction;
use crate::commands::task::print_tasks;

pub async fn execute(action: AssignAction, client: &ApiClient) -> Result<()> {
    match action {
        AssignAction::Add { task_id, user_id } => {
            let assignment = client.assign_task(task_id, &user_id).await?;
            println!(
                "{} Task {} assigned to {}",
                "✓".green(),
                assignment.task_id,
                assignment.user_id.cyan()
            );
            Ok(())
        }
        AssignAction::List { user_id, json } => {
            let tasks = client.assigned_tasks(&user_id).await?;
            if json {
                return print_json(&tasks);
            }
            header(&format!("Assigned to {}", user_id));
            print_tasks(&tasks);
            Ok(())
        }
        AssignAction::Remove { task_id, user_id } => {
            client.unassign_task(task_id, &user_id).await?;
            println!("{} Removed {} from task {}", "✓".green(), user_id.cyan(), task_id);
            Ok(())
        }
    }
}
