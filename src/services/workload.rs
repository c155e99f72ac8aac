//! Technician workload counting
//!
//! Counts are always computed from a fresh directory read. Callers that act
//! on the count hold the technician's lock across the read and their write.

use crate::core::{TechnicianId, Ticket, TicketId};
use crate::error::{DeskError, EntityKind, Result};
use crate::storage::IdentityDirectory;
use serde::Serialize;
use tracing::{debug, warn};

/// Maximum number of tickets a technician may hold in progress at once
pub const MAX_IN_PROGRESS_PER_TECHNICIAN: usize = 5;

/// Snapshot of a technician's in-progress load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkloadSummary {
    pub technician_id: TechnicianId,
    pub technician_name: String,
    pub in_progress: usize,
    pub limit: usize,
    pub remaining: usize,
}

/// Counts in-progress tickets per technician
pub struct WorkloadCounter<'a, D: IdentityDirectory + ?Sized> {
    directory: &'a D,
}

impl<'a, D: IdentityDirectory + ?Sized> WorkloadCounter<'a, D> {
    pub const fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// Number of the technician's tickets in `in_progress`, skipping `exclude`
    pub fn count_in_progress(
        &self,
        technician_id: &TechnicianId,
        exclude: Option<&TicketId>,
    ) -> Result<usize> {
        let tickets = self.assigned_tickets(technician_id)?.1;
        let count = count_in_progress_of(&tickets, exclude);
        debug!(
            "Technician {} has {count} tickets in progress",
            technician_id.short()
        );
        Ok(count)
    }

    /// Fail with `CapacityExceeded` if the technician is already at the cap
    pub fn ensure_capacity(
        &self,
        technician_id: &TechnicianId,
        exclude: Option<&TicketId>,
    ) -> Result<usize> {
        let in_progress = self.count_in_progress(technician_id, exclude)?;
        if in_progress >= MAX_IN_PROGRESS_PER_TECHNICIAN {
            warn!(
                "Rejected assignment: technician {} is at capacity ({in_progress})",
                technician_id.short()
            );
            return Err(DeskError::CapacityExceeded {
                technician_id: *technician_id,
                in_progress,
                limit: MAX_IN_PROGRESS_PER_TECHNICIAN,
            });
        }
        Ok(in_progress)
    }

    pub fn summary(&self, technician_id: &TechnicianId) -> Result<WorkloadSummary> {
        let (technician_name, tickets) = self.assigned_tickets(technician_id)?;
        let in_progress = count_in_progress_of(&tickets, None);
        Ok(WorkloadSummary {
            technician_id: *technician_id,
            technician_name,
            in_progress,
            limit: MAX_IN_PROGRESS_PER_TECHNICIAN,
            remaining: MAX_IN_PROGRESS_PER_TECHNICIAN.saturating_sub(in_progress),
        })
    }

    fn assigned_tickets(&self, technician_id: &TechnicianId) -> Result<(String, Vec<Ticket>)> {
        let record = self
            .directory
            .get_technician(technician_id, true)?
            .ok_or_else(|| DeskError::not_found(EntityKind::Technician, technician_id))?;
        let tickets = record.assigned_tickets.ok_or_else(|| {
            DeskError::custom(format!(
                "Directory returned technician {technician_id} without assigned tickets"
            ))
        })?;
        Ok((record.technician.name, tickets))
    }
}

fn count_in_progress_of(tickets: &[Ticket], exclude: Option<&TicketId>) -> usize {
    tickets
        .iter()
        .filter(|t| t.is_in_progress() && Some(&t.id) != exclude)
        .count()
}
