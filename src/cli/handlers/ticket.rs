//! Ticket commands
//!
//! Thin wrappers around [`TicketLifecycle`](crate::services::TicketLifecycle):
//! they resolve references typed on the command line and render results.

use super::common::{HandlerContext, Missing};
use crate::cli::output::OutputFormatter;
use crate::core::{Priority, Status, Ticket};
use crate::error::Result;
use crate::services::{NewTicket, TicketChanges};
use colored::Colorize;

/// Arguments of `ticket create`
pub struct CreateParams {
    pub title: String,
    pub description: String,
    pub client: String,
    pub category: String,
    pub technician: Option<String>,
    pub priority: Option<String>,
}

/// Arguments of `ticket update`
pub struct UpdateParams {
    pub ticket: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub technician: Option<String>,
}

pub fn handle_ticket_create(
    params: CreateParams,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;

    let priority = match params.priority {
        Some(p) => p.parse::<Priority>()?,
        None => ctx.config.defaults.priority,
    };
    let client_id = ctx.resolve_client(&params.client, Missing::InvalidReference)?;
    let category_id = ctx.resolve_category(&params.category, Missing::InvalidReference)?;
    let technician_id = params
        .technician
        .map(|t| ctx.resolve_technician(&t, Missing::InvalidReference))
        .transpose()?;

    let ticket = ctx.engine.create(NewTicket {
        title: params.title,
        description: params.description,
        priority,
        category_id,
        client_id,
        technician_id,
    })?;

    if formatter.is_json() {
        formatter.respond(&ticket, "Ticket created")?;
    } else {
        formatter.success(&format!("Created ticket '{}' ({})", ticket.title, ticket.id));
    }
    Ok(())
}

pub fn handle_ticket_update(
    params: UpdateParams,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let id = ctx.resolve_ticket(&params.ticket)?;

    let changes = TicketChanges {
        title: params.title,
        description: params.description,
        priority: params.priority.map(|p| p.parse()).transpose()?,
        category_id: params
            .category
            .map(|c| ctx.resolve_category(&c, Missing::InvalidReference))
            .transpose()?,
        technician_id: params
            .technician
            .map(|t| ctx.resolve_technician(&t, Missing::InvalidReference))
            .transpose()?,
    };
    let ticket = ctx.engine.update_fields(&id, changes)?;

    if formatter.is_json() {
        formatter.respond(&ticket, "Ticket updated")?;
    } else {
        formatter.success(&format!("Updated ticket {}", ticket.id.short()));
        print_ticket(&ticket, formatter);
    }
    Ok(())
}

pub fn handle_ticket_status(
    reference: &str,
    status: &str,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let id = ctx.resolve_ticket(reference)?;
    let requested: Status = status.parse()?;

    let ticket = ctx.engine.transition_status(&id, requested)?;

    if formatter.is_json() {
        formatter.respond(&ticket, "Status updated")?;
    } else {
        formatter.success(&format!(
            "Ticket {} is now {}",
            ticket.id.short(),
            ticket.status
        ));
    }
    Ok(())
}

pub fn handle_ticket_show(
    reference: &str,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let id = ctx.resolve_ticket(reference)?;
    let ticket = ctx.engine.queries().get(&id)?;

    if formatter.is_json() {
        formatter.respond(&ticket, "Ticket found")?;
    } else {
        print_ticket(&ticket, formatter);
    }
    Ok(())
}

pub fn handle_ticket_list(
    client: Option<String>,
    technician: Option<String>,
    status: Option<String>,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let status = status.map(|s| s.parse::<Status>()).transpose()?;
    let queries = ctx.engine.queries();

    let mut tickets = match (client, technician) {
        (Some(c), _) => queries.find_by_client(&ctx.resolve_client(&c, Missing::NotFound)?)?,
        (None, Some(t)) => {
            queries.find_by_technician(&ctx.resolve_technician(&t, Missing::NotFound)?)?
        },
        (None, None) => queries.find_all()?,
    };
    if let Some(status) = status {
        tickets.retain(|t| t.status == status);
    }

    if formatter.is_json() {
        formatter.respond(&tickets, &format!("{} tickets", tickets.len()))?;
    } else if tickets.is_empty() {
        formatter.info("No tickets found");
    } else {
        for ticket in &tickets {
            formatter.info(&format!(
                "{}  {:<11} {:<6} {}",
                ticket.id.short(),
                colored_status(ticket.status),
                ticket.priority,
                ticket.title
            ));
        }
    }
    Ok(())
}

fn print_ticket(ticket: &Ticket, formatter: &OutputFormatter) {
    formatter.info(&format!("{} {}", "Ticket:".bold(), ticket.id));
    formatter.info(&format!("Title:       {}", ticket.title));
    formatter.info(&format!("Status:      {}", colored_status(ticket.status)));
    formatter.info(&format!("Priority:    {}", ticket.priority));
    formatter.info(&format!("Client:      {}", ticket.client_id));
    formatter.info(&format!("Category:    {}", ticket.category_id));
    formatter.info(&format!(
        "Technician:  {}",
        ticket
            .technician_id
            .map_or_else(|| "-".to_string(), |id| id.to_string())
    ));
    formatter.info(&format!(
        "Updated:     {}",
        ticket.updated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    formatter.info("");
    formatter.info(&ticket.description);
}

fn colored_status(status: Status) -> String {
    let text = status.as_str();
    match status {
        Status::Open => text.cyan().to_string(),
        Status::InProgress => text.yellow().to_string(),
        Status::Resolved => text.green().to_string(),
        Status::Closed => text.dimmed().to_string(),
    }
}
