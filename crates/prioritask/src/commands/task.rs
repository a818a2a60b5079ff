//! Task commands.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use dialoguer::Confirm;
use prioritask_core::{ApiClient, NewTask, Task, TaskHistoryRecord, TaskUpdate};
use uuid::Uuid;

use super::{header, print_json, short_id, status_label};
use crate::cli::TaskAction;

pub async fn execute(action: TaskAction, client: &ApiClient) -> Result<()> {
    match action {
        TaskAction::List {
            status,
            category,
            json,
        } => {
            let tasks: Vec<Task> = client
                .list_tasks()
                .await?
                .into_iter()
                .filter(|t| status.is_none_or(|s| t.estado == s))
                .filter(|t| category.is_none_or(|c| t.categoria == c))
                .collect();
            if json {
                return print_json(&tasks);
            }
            header("Tasks");
            print_tasks(&tasks);
            Ok(())
        }
        TaskAction::Add {
            title,
            category,
            description,
            weight,
            due,
        } => {
            let mut task = NewTask::new(title, category).with_weight(weight);
            if let Some(d) = description {
                task = task.with_description(d);
            }
            if let Some(due) = due {
                task = task.with_due_date(due);
            }
            let created = client.create_task(&task).await?;
            println!(
                "{} Created task {} ({})",
                "✓".green(),
                created.titulo.bold(),
                created.id
            );
            Ok(())
        }
        TaskAction::Edit {
            task_id,
            title,
            description,
            category,
            weight,
            due,
            replace,
        } => {
            let update = TaskUpdate {
                titulo: title,
                descripcion: description,
                categoria: category,
                estado: None,
                peso: weight,
                due_date: due,
            };
            if update.is_empty() {
                bail!("Nothing to change. Pass at least one of --title, --description, --category, --weight, --due.");
            }
            let task = if replace {
                client.update_task(task_id, &update).await?
            } else {
                client.patch_task(task_id, &update).await?
            };
            println!("{} Updated {}", "✓".green(), task.titulo.bold());
            Ok(())
        }
        TaskAction::Status { task_id, status } => {
            let task = client.set_task_status(task_id, status).await?;
            println!("{} {} is now {}", "✓".green(), task.titulo.bold(), status_label(task.estado));
            Ok(())
        }
        TaskAction::Toggle { task_id } => toggle(task_id, client).await,
        TaskAction::Delete { task_id, yes } => {
            if !yes
                && !Confirm::new()
                    .with_prompt(format!("Delete task {}?", task_id))
                    .default(false)
                    .interact()?
            {
                println!("Cancelled.");
                return Ok(());
            }
            client.delete_task(task_id).await?;
            println!("{} Deleted task {}", "✓".green(), task_id);
            Ok(())
        }
        TaskAction::History { task_id, json } => {
            let records = client.task_history(task_id).await?;
            if json {
                return print_json(&records);
            }
            header(&format!("History of {}", task_id));
            print_task_history(&records);
            Ok(())
        }
    }
}

async fn toggle(task_id: Uuid, client: &ApiClient) -> Result<()> {
    let current = client
        .list_tasks()
        .await?
        .into_iter()
        .find(|t| t.id == task_id)
        .with_context(|| format!("Task {} not found", task_id))?;

    let task = client.toggle_task_status(task_id, current.estado).await?;
    println!("{} {} is now {}", "✓".green(), task.titulo.bold(), status_label(task.estado));
    Ok(())
}

pub fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("  {}", "No tasks.".dimmed());
        return;
    }
    for task in tasks {
        println!(
            "  {}  {:<12} {:<14} {}",
            short_id(&task.id).dimmed(),
            status_label(task.estado),
            task.categoria.as_str(),
            task.titulo
        );
        if let Some(due) = task.due_date {
            println!("            due {}", due.format("%Y-%m-%d"));
        }
    }
}

fn print_task_history(records: &[TaskHistoryRecord]) {
    if records.is_empty() {
        println!("  {}", "No changes recorded.".dimmed());
        return;
    }
    for record in records {
        println!(
            "  {}  {:<8} by {}",
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.action.bold(),
            record.user_id
        );
        if let Some(changes) = &record.changes {
            println!("      {}", changes.dimmed());
        }
    }
}
