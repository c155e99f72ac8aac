//! Client, technician and category commands

use super::common::{HandlerContext, Missing};
use crate::cli::output::OutputFormatter;
use crate::cli::utils::or_dash;
use crate::core::{Category, Client, Technician};
use crate::error::{DeskError, EntityKind, Result};
use crate::services::{
    CategoryChanges, ClientChanges, NewCategory, NewClient, NewTechnician, TechnicianChanges,
};
use crate::storage::IdentityDirectory;
use serde_json::json;

pub fn handle_client_add(
    name: String,
    company: Option<String>,
    email: Option<String>,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let client = ctx.directory().register_client(NewClient {
        name,
        company,
        contact_email: email,
    })?;

    if formatter.is_json() {
        formatter.respond(&client, "Client registered")?;
    } else {
        formatter.success(&format!("Registered client '{}' ({})", client.name, client.id));
    }
    Ok(())
}

pub fn handle_client_list(project_dir: Option<&str>, formatter: &OutputFormatter) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let clients = ctx.directory().clients()?;

    if formatter.is_json() {
        formatter.respond(&clients, &format!("{} clients", clients.len()))?;
    } else if clients.is_empty() {
        formatter.info("No clients registered");
    } else {
        for client in &clients {
            print_client_line(client, formatter);
        }
    }
    Ok(())
}

pub fn handle_client_show(
    reference: &str,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let id = ctx.resolve_client(reference, Missing::NotFound)?;
    let client = ctx.directory().client(&id)?;
    let tickets = ctx.engine.queries().find_by_client(&id)?;

    if formatter.is_json() {
        formatter.respond(
            &json!({ "client": client, "tickets": tickets }),
            "Client found",
        )?;
    } else {
        formatter.info(&format!("Client:   {} ({})", client.name, client.id));
        formatter.info(&format!("Company:  {}", or_dash(client.company.as_deref())));
        formatter.info(&format!(
            "Contact:  {}",
            or_dash(client.contact_email.as_deref())
        ));
        formatter.info(&format!("Tickets:  {}", tickets.len()));
        for ticket in &tickets {
            formatter.info(&format!(
                "  {} [{}] {}",
                ticket.id.short(),
                ticket.status,
                ticket.title
            ));
        }
    }
    Ok(())
}

pub fn handle_client_update(
    reference: &str,
    changes: ClientChanges,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let id = ctx.resolve_client(reference, Missing::NotFound)?;
    let client = ctx.directory().update_client(&id, changes)?;

    if formatter.is_json() {
        formatter.respond(&client, "Client updated")?;
    } else {
        formatter.success(&format!("Updated client '{}' ({})", client.name, client.id));
    }
    Ok(())
}

pub fn handle_technician_add(
    name: String,
    specialty: Option<String>,
    unavailable: bool,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let technician = ctx.directory().register_technician(NewTechnician {
        name,
        specialty,
        available: !unavailable,
    })?;

    if formatter.is_json() {
        formatter.respond(&technician, "Technician registered")?;
    } else {
        formatter.success(&format!(
            "Registered technician '{}' ({})",
            technician.name, technician.id
        ));
    }
    Ok(())
}

pub fn handle_technician_list(
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let technicians = ctx.directory().technicians()?;

    if formatter.is_json() {
        formatter.respond(&technicians, &format!("{} technicians", technicians.len()))?;
    } else if technicians.is_empty() {
        formatter.info("No technicians registered");
    } else {
        for technician in &technicians {
            print_technician_line(technician, formatter);
        }
    }
    Ok(())
}

pub fn handle_technician_show(
    reference: &str,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let id = ctx.resolve_technician(reference, Missing::NotFound)?;
    let record = ctx
        .storage()
        .get_technician(&id, true)?
        .ok_or_else(|| DeskError::not_found(EntityKind::Technician, id))?;
    let assigned = record.assigned_tickets.unwrap_or_default();
    let workload = ctx.engine.workload().summary(&id)?;

    if formatter.is_json() {
        formatter.respond(
            &json!({
                "technician": record.technician,
                "assigned_tickets": assigned,
                "workload": workload,
            }),
            "Technician found",
        )?;
    } else {
        let technician = &record.technician;
        formatter.info(&format!("Technician: {} ({})", technician.name, technician.id));
        formatter.info(&format!(
            "Specialty:  {}",
            or_dash(technician.specialty.as_deref())
        ));
        formatter.info(&format!(
            "Available:  {}",
            if technician.available { "yes" } else { "no" }
        ));
        formatter.info(&format!(
            "Workload:   {}/{} in progress",
            workload.in_progress, workload.limit
        ));
        for ticket in &assigned {
            formatter.info(&format!(
                "  {} [{}] {}",
                ticket.id.short(),
                ticket.status,
                ticket.title
            ));
        }
    }
    Ok(())
}

pub fn handle_technician_availability(
    reference: &str,
    available: bool,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let id = ctx.resolve_technician(reference, Missing::NotFound)?;
    let technician = ctx.directory().set_technician_availability(&id, available)?;

    if formatter.is_json() {
        formatter.respond(&technician, "Availability updated")?;
    } else {
        formatter.success(&format!(
            "{} is now {}",
            technician.name,
            if available { "available" } else { "unavailable" }
        ));
    }
    Ok(())
}

pub fn handle_technician_update(
    reference: &str,
    changes: TechnicianChanges,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let id = ctx.resolve_technician(reference, Missing::NotFound)?;
    let technician = ctx.directory().update_technician(&id, changes)?;

    if formatter.is_json() {
        formatter.respond(&technician, "Technician updated")?;
    } else {
        formatter.success(&format!(
            "Updated technician '{}' ({})",
            technician.name, technician.id
        ));
    }
    Ok(())
}

pub fn handle_category_add(
    name: String,
    description: Option<String>,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let category = ctx
        .directory()
        .register_category(NewCategory { name, description })?;

    if formatter.is_json() {
        formatter.respond(&category, "Category registered")?;
    } else {
        formatter.success(&format!(
            "Registered category '{}' ({})",
            category.name, category.id
        ));
    }
    Ok(())
}

pub fn handle_category_update(
    reference: &str,
    changes: CategoryChanges,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let id = ctx.resolve_category(reference, Missing::NotFound)?;
    let category = ctx.directory().update_category(&id, changes)?;

    if formatter.is_json() {
        formatter.respond(&category, "Category updated")?;
    } else {
        formatter.success(&format!(
            "Updated category '{}' ({})",
            category.name, category.id
        ));
    }
    Ok(())
}

pub fn handle_category_list(project_dir: Option<&str>, formatter: &OutputFormatter) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let categories = ctx.directory().categories()?;

    if formatter.is_json() {
        formatter.respond(&categories, &format!("{} categories", categories.len()))?;
    } else if categories.is_empty() {
        formatter.info("No categories registered");
    } else {
        for category in &categories {
            print_category_line(category, formatter);
        }
    }
    Ok(())
}

fn print_client_line(client: &Client, formatter: &OutputFormatter) {
    formatter.info(&format!(
        "{}  {}  {}",
        client.id.short(),
        client.name,
        or_dash(client.company.as_deref())
    ));
}

fn print_technician_line(technician: &Technician, formatter: &OutputFormatter) {
    let marker = if technician.available { "" } else { " (unavailable)" };
    formatter.info(&format!(
        "{}  {}{marker}  {}",
        technician.id.short(),
        technician.name,
        or_dash(technician.specialty.as_deref())
    ));
}

fn print_category_line(category: &Category, formatter: &OutputFormatter) {
    formatter.info(&format!(
        "{}  {}  {}",
        category.id.short(),
        category.name,
        or_dash(category.description.as_deref())
    ));
}
