//! `ticket-desk export`

use super::common::HandlerContext;
use crate::cli::ExportFormat;
use crate::cli::output::OutputFormatter;
use crate::core::{Category, Client, Technician, Ticket};
use crate::error::{DeskError, Result};
use crate::services::TicketQueries;
use crate::storage::Store;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::fs;

/// Every record of a desk at one point in time
#[derive(Debug, Serialize)]
pub struct DeskSnapshot {
    pub exported_at: DateTime<Utc>,
    pub clients: Vec<Client>,
    pub technicians: Vec<Technician>,
    pub categories: Vec<Category>,
    pub tickets: Vec<Ticket>,
}

impl DeskSnapshot {
    pub fn capture<S: Store + ?Sized>(store: &S) -> Result<Self> {
        Ok(Self {
            exported_at: Utc::now(),
            clients: store.list_clients()?,
            technicians: store.list_technicians()?,
            categories: store.list_categories()?,
            tickets: TicketQueries::new(store).find_all()?,
        })
    }
}

pub fn handle_export(
    format: ExportFormat,
    output: Option<String>,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let snapshot = DeskSnapshot::capture(ctx.storage())?;

    let content = render(&snapshot, format)?;

    match output {
        Some(path) => {
            fs::write(&path, content)?;
            if formatter.is_json() {
                formatter.respond(
                    &json!({ "path": path, "tickets": snapshot.tickets.len() }),
                    "Export written",
                )?;
            } else {
                formatter.success(&format!(
                    "Exported {} tickets to {path}",
                    snapshot.tickets.len()
                ));
            }
        },
        None => print!("{content}"),
    }
    Ok(())
}

/// Serialize a snapshot; CSV carries the tickets only
pub fn render(snapshot: &DeskSnapshot, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(snapshot)? + "\n"),
        ExportFormat::Yaml => Ok(serde_yaml::to_string(snapshot)?),
        ExportFormat::Csv => tickets_csv(&snapshot.tickets),
    }
}

fn tickets_csv(tickets: &[Ticket]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "title",
        "description",
        "status",
        "priority",
        "client_id",
        "category_id",
        "technician_id",
        "created_at",
        "updated_at",
    ])?;

    for ticket in tickets {
        writer.write_record([
            ticket.id.to_string(),
            ticket.title.clone(),
            ticket.description.clone(),
            ticket.status.to_string(),
            ticket.priority.to_string(),
            ticket.client_id.to_string(),
            ticket.category_id.to_string(),
            ticket
                .technician_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            ticket.created_at.to_rfc3339(),
            ticket.updated_at.to_rfc3339(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DeskError::custom(format!("Failed to finish CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| DeskError::custom(format!("Invalid UTF-8 in CSV: {e}")))
}
