//! `ticket-desk seed`

use super::common::HandlerContext;
use crate::cli::output::OutputFormatter;
use crate::error::Result;
use crate::services::seed_directory;

pub fn handle_seed(project_dir: Option<&str>, formatter: &OutputFormatter) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let report = seed_directory(ctx.storage(), ctx.engine.locks())?;

    if formatter.is_json() {
        formatter.respond(&report, "Seeding finished")?;
    } else if report.is_empty() {
        formatter.info("Demo data already present; nothing inserted");
    } else {
        for name in &report.categories {
            formatter.success(&format!("Added category '{name}'"));
        }
        for name in &report.technicians {
            formatter.success(&format!("Added technician '{name}'"));
        }
        for name in &report.clients {
            formatter.success(&format!("Added client '{name}'"));
        }
    }
    Ok(())
}
