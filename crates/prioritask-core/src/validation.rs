//! Client-side input checks.
//!
//! These mirror the backend's request schemas so that obviously invalid
//! forms are rejected before a request is sent.

use crate::error::{Error, Result};
use crate::types::{NewTask, NewUser, TaskUpdate};

/// Tag names are between 2 and 50 characters.
pub const TAG_NAME_MIN: usize = 2;
pub const TAG_NAME_MAX: usize = 50;

/// Room names are at most 100 characters.
pub const ROOM_NAME_MAX: usize = 100;

/// Validate and trim a tag name.
pub fn tag_name(name: &str) -> Result<&str> {
    let name = name.trim();
    let len = name.chars().count();
    if len < TAG_NAME_MIN || len > TAG_NAME_MAX {
        return Err(Error::Validation(format!(
            "tag name must be between {} and {} characters",
            TAG_NAME_MIN, TAG_NAME_MAX
        )));
    }
    Ok(name)
}

/// Validate and trim a room name.
pub fn room_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("room name is required".into()));
    }
    if name.chars().count() > ROOM_NAME_MAX {
        return Err(Error::Validation(format!(
            "room name must be {} characters or less",
            ROOM_NAME_MAX
        )));
    }
    Ok(name)
}

/// Loose email check: something before `@`, a dotted domain after it.
pub fn email(email: &str) -> Result<()> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::Validation(format!("invalid email address: {}", email)))
    }
}

pub fn password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(Error::Validation("password is required".into()));
    }
    Ok(())
}

pub fn new_user(user: &NewUser) -> Result<()> {
    if user.nombre.trim().is_empty() {
        return Err(Error::Validation("name is required".into()));
    }
    email(&user.email)?;
    password(&user.password)
}

fn weight(peso: f64) -> Result<()> {
    if !peso.is_finite() || peso <= 0.0 {
        return Err(Error::Validation("weight must be a positive number".into()));
    }
    Ok(())
}

pub fn new_task(task: &NewTask) -> Result<()> {
    if task.titulo.trim().is_empty() {
        return Err(Error::Validation("task title is required".into()));
    }
    weight(task.peso)
}

pub fn task_update(update: &TaskUpdate) -> Result<()> {
    if update.is_empty() {
        return Err(Error::Validation("nothing to update".into()));
    }
    if let Some(titulo) = &update.titulo {
        if titulo.trim().is_empty() {
            return Err(Error::Validation("task title cannot be empty".into()));
        }
    }
    if let Some(peso) = update.peso {
        weight(peso)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskCategory;

    #[test]
    fn test_tag_name_bounds() {
        assert_eq!(tag_name("  Urgente ").unwrap(), "Urgente");
        assert!(tag_name("a").is_err());
        assert!(tag_name(" a ").is_err());
        assert!(tag_name(&"x".repeat(50)).is_ok());
        assert!(tag_name(&"x".repeat(51)).is_err());
        // Counted in characters, not bytes.
        assert!(tag_name("ñá").is_ok());
    }

    #[test]
    fn test_email() {
        assert!(email("usuario@ejemplo.com").is_ok());
        assert!(email("usuario@ejemplo").is_err());
        assert!(email("@ejemplo.com").is_err());
        assert!(email("a@b@c.com").is_err());
        assert!(email("a b@c.com").is_err());
        assert!(email("user@.com").is_err());
    }

    #[test]
    fn test_new_user() {
        let user = NewUser {
            nombre: "Ana".into(),
            email: "ana@example.com".into(),
            password: "secret".into(),
        };
        assert!(new_user(&user).is_ok());

        let nameless = NewUser {
            nombre: " ".into(),
            ..user.clone()
        };
        assert!(matches!(new_user(&nameless), Err(Error::Validation(_))));

        let no_password = NewUser {
            password: String::new(),
            ..user
        };
        assert!(new_user(&no_password).is_err());
    }

    #[test]
    fn test_new_task() {
        assert!(new_task(&NewTask::new("Barrer", TaskCategory::Limpieza)).is_ok());
        assert!(new_task(&NewTask::new("  ", TaskCategory::Limpieza)).is_err());
        assert!(new_task(&NewTask::new("Barrer", TaskCategory::Limpieza).with_weight(0.0)).is_err());
        assert!(new_task(&NewTask::new("Barrer", TaskCategory::Limpieza).with_weight(f64::NAN)).is_err());
    }

    #[test]
    fn test_task_update() {
        assert!(task_update(&TaskUpdate::default()).is_err());
        assert!(task_update(&TaskUpdate::title("")).is_err());
        assert!(task_update(&TaskUpdate::title("Nuevo")).is_ok());
    }
}
