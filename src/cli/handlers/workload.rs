//! `ticket-desk workload`

use super::common::{HandlerContext, Missing};
use crate::cli::output::OutputFormatter;
use crate::error::Result;

pub fn handle_workload(
    reference: &str,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let id = ctx.resolve_technician(reference, Missing::NotFound)?;
    let summary = ctx.engine.workload().summary(&id)?;

    if formatter.is_json() {
        formatter.respond(&summary, "Workload computed")?;
    } else {
        formatter.info(&format!(
            "{}: {} of {} tickets in progress ({} remaining)",
            summary.technician_name, summary.in_progress, summary.limit, summary.remaining
        ));
        if summary.remaining == 0 {
            formatter.warning("Technician is at capacity; new assignments will be refused");
        }
    }
    Ok(())
}
