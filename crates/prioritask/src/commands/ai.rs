//! AI suggestion commands.
//!
//! The backend's model calls can take several seconds, so each request
//! shows a spinner. Rewrites are only applied on request.

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use prioritask_core::{ApiClient, TaskSelection};
use tracing::warn;

use super::{header, print_json, short_id, spinner};
use crate::cli::AiAction;

pub async fn execute(action: AiAction, client: &ApiClient) -> Result<()> {
    match action {
        AiAction::Prioritize { task_ids, json } => {
            let selection = TaskSelection::only(task_ids);
            let bar = spinner("Asking for priorities...");
            let ranked = client.prioritize_tasks(&selection).await;
            bar.finish_and_clear();
            let ranked = ranked?;

            if json {
                return print_json(&ranked);
            }
            header("Suggested priorities");
            for (i, task) in ranked.iter().enumerate() {
                println!(
                    "  {:>2}. {} [{}]",
                    i + 1,
                    task.titulo.bold(),
                    task.prioridad.yellow()
                );
                println!("      {}", task.motivo.dimmed());
            }
            Ok(())
        }
        AiAction::Group { task_ids, json } => {
            let selection = TaskSelection::only(task_ids);
            let bar = spinner("Grouping tasks...");
            let grouped = client.group_tasks(&selection).await;
            bar.finish_and_clear();
            let grouped = grouped?;

            if json {
                return print_json(&grouped);
            }
            header("Suggested groups");
            if grouped.grupos.is_empty() {
                println!("  {}", "No groups suggested.".dimmed());
            }
            for (name, tasks) in &grouped.grupos {
                println!("{}", name.cyan().bold());
                for task in tasks {
                    println!("  {}  {}", short_id(&task.id).dimmed(), task.titulo);
                }
            }
            Ok(())
        }
        AiAction::Rewrite {
            task_ids,
            apply,
            yes,
        } => {
            let selection = TaskSelection::only(task_ids);
            let bar = spinner("Rewriting titles...");
            let suggestions = client.rewrite_titles(&selection).await;
            bar.finish_and_clear();
            let suggestions = suggestions?;

            header("Suggested titles");
            if suggestions.is_empty() {
                println!("  {}", "No suggestions.".dimmed());
                return Ok(());
            }

            let mut applied = 0;
            for suggestion in &suggestions {
                println!("  {} {}", "-".red(), suggestion.original);
                println!("  {} {}", "+".green(), suggestion.reformulada.bold());
                if let Some(reason) = &suggestion.motivo {
                    println!("    {}", reason.dimmed());
                }
                if !apply {
                    continue;
                }

                let accepted = yes
                    || Confirm::new()
                        .with_prompt("Apply this title?")
                        .default(true)
                        .interact()?;
                if !accepted {
                    continue;
                }
                match client.apply_rewrite(suggestion).await {
                    Ok(_) => {
                        applied += 1;
                        println!("    {} Applied", "✓".green());
                    }
                    Err(e) => {
                        warn!(task_id = %suggestion.id, "Failed to apply rewrite: {}", e);
                        println!("    {} {}", "✗".red(), e.user_message("Could not apply title"));
                    }
                }
            }

            if apply {
                println!();
                println!("{} {} of {} titles updated", "→".cyan(), applied, suggestions.len());
            }
            Ok(())
        }
    }
}
