//! Room commands.
//!
//! Listing a room's tasks or creating a room makes it the selected room,
//! which is remembered in the session file across logins.

use anyhow::{Result, bail};
use colored::Colorize;
use prioritask_core::ApiClient;

use super::{header, print_json};
use crate::cli::RoomAction;
use crate::commands::task::print_tasks;

pub async fn execute(action: RoomAction, client: &ApiClient) -> Result<()> {
    match action {
        RoomAction::List { json } => {
            let rooms = client.list_rooms().await?;
            if json {
                return print_json(&rooms);
            }
            let selected = client.selected_room()?;
            header("Rooms");
            if rooms.is_empty() {
                println!("  {}", "No rooms.".dimmed());
            }
            for room in &rooms {
                let marker = if selected.as_deref() == Some(room.id.as_str()) {
                    "*".green()
                } else {
                    " ".normal()
                };
                println!("{} {}  {}", marker, room.id.dimmed(), room.nombre);
            }
            Ok(())
        }
        RoomAction::Create { name } => {
            let room = client.create_room(&name).await?;
            println!("{} Created room {} ({})", "✓".green(), room.nombre.bold(), room.id);
            println!("  {} Selected.", "→".cyan());
            Ok(())
        }
        RoomAction::Tasks {
            room_id,
            limit,
            json,
        } => {
            let room_id = match room_id.or(client.selected_room()?) {
                Some(id) => id,
                None => bail!("No room selected. Pass a room ID or run `ptk room select <id>`."),
            };
            let tasks = client.room_tasks(&room_id, Some(limit)).await?;
            if json {
                return print_json(&tasks);
            }
            header(&format!("Tasks in room {}", room_id));
            print_tasks(&tasks);
            Ok(())
        }
        RoomAction::Select { room_id } => {
            client.select_room(&room_id)?;
            println!("{} Selected room {}", "✓".green(), room_id.cyan());
            Ok(())
        }
        RoomAction::Current => {
            match client.selected_room()? {
                Some(id) => println!("{}", id),
                None => println!("{}", "No room selected.".yellow()),
            }
            Ok(())
        }
        RoomAction::Clear => {
            client.clear_selected_room()?;
            println!("{} Room selection cleared.", "✓".green());
            Ok(())
        }
    }
}
