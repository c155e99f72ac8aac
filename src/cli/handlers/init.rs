//! `ticket-desk init`

use crate::cli::output::OutputFormatter;
use crate::config::{Config, DESK_DIR, project_config_path};
use crate::error::{DeskError, Result};
use crate::storage::{FileStorage, ProjectState};
use chrono::Utc;
use std::env;
use std::path::PathBuf;

pub fn handle_init(
    name: Option<String>,
    description: Option<String>,
    force: bool,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let root = match project_dir {
        Some(dir) => PathBuf::from(dir),
        None => env::current_dir()?,
    };
    let desk_dir = root.join(DESK_DIR);
    let storage = FileStorage::new(&desk_dir);

    let existing = match storage.load_state() {
        Ok(_) if !force => return Err(DeskError::ProjectAlreadyInitialized(desk_dir)),
        Ok(state) => Some(state),
        Err(DeskError::ProjectNotInitialized) => None,
        Err(e) => return Err(e),
    };

    let name = name
        .or_else(|| existing.as_ref().map(|s| s.name.clone()))
        .or_else(|| {
            root.file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "ticket-desk".to_string());

    let description = description.or_else(|| existing.as_ref().and_then(|s| s.description.clone()));

    let now = Utc::now();
    let state = ProjectState {
        name: name.clone(),
        description: description.clone(),
        created_at: existing.as_ref().map_or(now, |s| s.created_at),
        updated_at: now,
    };

    storage.ensure_directories()?;
    storage.save_state(&state)?;

    let config_path = project_config_path(&root);
    if !config_path.exists() || force {
        let mut config = Config::default();
        config.project.name = Some(name);
        config.project.description = description;
        config.save(&config_path)?;
    }

    tracing::info!("Initialized desk at {}", desk_dir.display());

    if formatter.is_json() {
        formatter.respond(&state, "Desk initialized")?;
    } else {
        formatter.success(&format!(
            "Initialized ticket desk '{}' in {}",
            state.name,
            desk_dir.display()
        ));
        formatter.info("Next: run 'ticket-desk seed' to add demo categories and records");
    }
    Ok(())
}
