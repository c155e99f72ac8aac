//! Ticket lifecycle engine
//!
//! Every mutation of a ticket's status or technician goes through
//! [`TicketLifecycle`]. Validation runs to completion before the single
//! write of each operation, so a failed request leaves the store untouched.
//!
//! The workload cap is checked at each path that can raise a technician's
//! in-progress count: creation with a technician, reassignment, and the
//! transition into `in_progress`. Each check runs inside the technician's
//! lock together with the write it guards. Edits of an existing ticket take
//! the ticket's lock first, then the technician's; creation only takes the
//! technician's. Locks are never taken in the other order.

use super::query::TicketQueries;
use super::workload::WorkloadCounter;
use crate::core::{
    CategoryId, ClientId, Priority, Status, TechnicianId, Ticket, TicketBuilder, TicketId,
};
use crate::error::{DeskError, EntityKind, Result};
use crate::storage::{IdentityDirectory, LockKey, LockManager, TicketRepository};
use tracing::info;

/// Input for [`TicketLifecycle::create`]
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category_id: CategoryId,
    pub client_id: ClientId,
    pub technician_id: Option<TechnicianId>,
}

/// Partial update for [`TicketLifecycle::update_fields`]
///
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct TicketChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category_id: Option<CategoryId>,
    pub technician_id: Option<TechnicianId>,
}

impl TicketChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.category_id.is_none()
            && self.technician_id.is_none()
    }
}

/// Owns every status and assignment decision for tickets
pub struct TicketLifecycle<S, L> {
    store: S,
    locks: L,
}

impl<S, L> TicketLifecycle<S, L>
where
    S: TicketRepository + IdentityDirectory,
    L: LockManager,
{
    pub const fn new(store: S, locks: L) -> Self {
        Self { store, locks }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn locks(&self) -> &L {
        &self.locks
    }

    pub const fn workload(&self) -> WorkloadCounter<'_, S> {
        WorkloadCounter::new(&self.store)
    }

    pub const fn queries(&self) -> TicketQueries<'_, S> {
        TicketQueries::new(&self.store)
    }

    /// Create a ticket in `open`, optionally assigned to a technician
    pub fn create(&self, new: NewTicket) -> Result<Ticket> {
        require_text("title", &new.title)?;
        require_text("description", &new.description)?;

        let client = self
            .store
            .get_client(&new.client_id)?
            .ok_or_else(|| DeskError::invalid_reference(EntityKind::Client, new.client_id))?;
        let category = self
            .store
            .get_category(&new.category_id)?
            .ok_or_else(|| DeskError::invalid_reference(EntityKind::Category, new.category_id))?;

        let builder = TicketBuilder::new()
            .title(new.title)
            .description(new.description)
            .priority(new.priority)
            .client(client.id)
            .category(category.id);

        let ticket = match new.technician_id {
            Some(technician_id) => {
                self.require_technician(&technician_id)?;
                let _technician_lock = self.locks.acquire(&LockKey::Technician(technician_id))?;
                // The new ticket starts open, so it is not part of the count
                self.workload().ensure_capacity(&technician_id, None)?;
                let ticket = builder.technician(technician_id).build();
                self.store.save(&ticket)?;
                ticket
            },
            None => {
                let ticket = builder.build();
                self.store.save(&ticket)?;
                ticket
            },
        };

        info!(
            "Created ticket {} for client {}",
            ticket.id.short(),
            ticket.client_id.short()
        );
        Ok(ticket)
    }

    /// Apply a partial update to a ticket
    pub fn update_fields(&self, id: &TicketId, changes: TicketChanges) -> Result<Ticket> {
        let _ticket_lock = self.locks.acquire(&LockKey::Ticket(*id))?;
        let mut ticket = self.store.load(id)?;

        if let Some(title) = changes.title {
            require_text("title", &title)?;
            ticket.title = title;
        }
        if let Some(description) = changes.description {
            require_text("description", &description)?;
            ticket.description = description;
        }
        if let Some(priority) = changes.priority {
            ticket.priority = priority;
        }
        if let Some(category_id) = changes.category_id {
            let category = self
                .store
                .get_category(&category_id)?
                .ok_or_else(|| DeskError::invalid_reference(EntityKind::Category, category_id))?;
            ticket.category_id = category.id;
        }

        let _technician_lock = match changes.technician_id {
            Some(technician_id) => {
                self.require_technician(&technician_id)?;
                let guard = self.locks.acquire(&LockKey::Technician(technician_id))?;
                self.workload().ensure_capacity(&technician_id, Some(id))?;
                ticket.technician_id = Some(technician_id);
                Some(guard)
            },
            None => None,
        };

        ticket.touch();
        self.store.save(&ticket)?;

        info!("Updated ticket {}", ticket.id.short());
        Ok(ticket)
    }

    /// Move a ticket to the next status of the lifecycle
    pub fn transition_status(&self, id: &TicketId, requested: Status) -> Result<Ticket> {
        let _ticket_lock = self.locks.acquire(&LockKey::Ticket(*id))?;
        let mut ticket = self.store.load(id)?;
        let current = ticket.status;

        if !current.can_transition_to(requested) {
            return Err(DeskError::InvalidTransition {
                from: current,
                to: requested,
            });
        }

        let _technician_lock = match ticket.technician_id {
            Some(technician_id) if requested == Status::InProgress => {
                let guard = self.locks.acquire(&LockKey::Technician(technician_id))?;
                self.workload().ensure_capacity(&technician_id, Some(id))?;
                Some(guard)
            },
            _ => None,
        };

        ticket.status = requested;
        ticket.touch();
        self.store.save(&ticket)?;

        info!(
            "Ticket {} moved from {current} to {requested}",
            ticket.id.short()
        );
        Ok(ticket)
    }

    fn require_technician(&self, technician_id: &TechnicianId) -> Result<()> {
        match self.store.get_technician(technician_id, false)? {
            Some(_) => Ok(()),
            None => Err(DeskError::invalid_reference(
                EntityKind::Technician,
                technician_id,
            )),
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DeskError::InvalidInput(format!(
            "Ticket {field} cannot be empty"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::workload::MAX_IN_PROGRESS_PER_TECHNICIAN;
    use crate::test_utils::TestDesk;

    #[test]
    fn test_create_starts_open() {
        let desk = TestDesk::new();
        let ticket = desk.engine.create(desk.new_ticket("Mouse broken")).unwrap();

        assert_eq!(ticket.status, Status::Open);
        assert_eq!(ticket.client_id, desk.client.id);
        assert_eq!(ticket.category_id, desk.category.id);
        assert!(ticket.technician_id.is_none());
        assert_eq!(desk.engine.store().load(&ticket.id).unwrap(), ticket);
    }

    #[test]
    fn test_create_rejects_unknown_client() {
        let desk = TestDesk::new();
        let mut new = desk.new_ticket("Orphan");
        new.client_id = ClientId::new();

        let err = desk.engine.create(new).unwrap_err();
        assert!(matches!(
            err,
            DeskError::InvalidReference {
                kind: EntityKind::Client,
                ..
            }
        ));
        assert!(desk.engine.store().load_all().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_unknown_category() {
        let desk = TestDesk::new();
        let mut new = desk.new_ticket("Uncategorized");
        new.category_id = CategoryId::new();

        let err = desk.engine.create(new).unwrap_err();
        assert!(matches!(
            err,
            DeskError::InvalidReference {
                kind: EntityKind::Category,
                ..
            }
        ));
        assert!(desk.engine.store().load_all().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_unknown_technician() {
        let desk = TestDesk::new();
        let mut new = desk.new_ticket("Ghost technician");
        new.technician_id = Some(TechnicianId::new());

        let err = desk.engine.create(new).unwrap_err();
        assert!(matches!(
            err,
            DeskError::InvalidReference {
                kind: EntityKind::Technician,
                ..
            }
        ));
        assert!(desk.engine.store().load_all().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_blank_text() {
        let desk = TestDesk::new();
        let mut new = desk.new_ticket("   ");
        assert!(matches!(
            desk.engine.create(new.clone()),
            Err(DeskError::InvalidInput(_))
        ));

        new.title = "Title".to_string();
        new.description = String::new();
        assert!(matches!(
            desk.engine.create(new),
            Err(DeskError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_create_with_technician_at_capacity_fails() {
        let desk = TestDesk::new();
        desk.fill_in_progress(&desk.technician.id, MAX_IN_PROGRESS_PER_TECHNICIAN);
        let before = desk.engine.store().load_all().unwrap().len();

        let err = desk
            .engine
            .create(desk.new_ticket_for("One too many", desk.technician.id))
            .unwrap_err();

        assert!(matches!(err, DeskError::CapacityExceeded { .. }));
        assert_eq!(desk.engine.store().load_all().unwrap().len(), before);
    }

    #[test]
    fn test_capacity_scenario() {
        let desk = TestDesk::new();
        let technician = desk.technician.id;
        desk.fill_in_progress(&technician, 4);

        let ticket = desk
            .engine
            .create(desk.new_ticket_for("Fifth", technician))
            .unwrap();
        assert_eq!(ticket.status, Status::Open);

        desk.engine
            .transition_status(&ticket.id, Status::InProgress)
            .unwrap();
        assert_eq!(
            desk.engine.workload().count_in_progress(&technician, None).unwrap(),
            5
        );

        // At five in progress, another assignment is refused
        let err = desk
            .engine
            .create(desk.new_ticket_for("Sixth", technician))
            .unwrap_err();
        assert!(matches!(err, DeskError::CapacityExceeded { .. }));

        let resolved = desk
            .engine
            .transition_status(&ticket.id, Status::Resolved)
            .unwrap();
        assert_eq!(resolved.status, Status::Resolved);

        // Resolving freed a slot
        assert!(
            desk.engine
                .create(desk.new_ticket_for("Sixth again", technician))
                .is_ok()
        );
    }

    #[test]
    fn test_transition_follows_chain() {
        let desk = TestDesk::new();
        let ticket = desk.engine.create(desk.new_ticket("Chain")).unwrap();

        for status in [Status::InProgress, Status::Resolved, Status::Closed] {
            let updated = desk.engine.transition_status(&ticket.id, status).unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[test]
    fn test_skip_is_rejected_and_state_unchanged() {
        let desk = TestDesk::new();
        let ticket = desk.engine.create(desk.new_ticket("Skip")).unwrap();

        let err = desk
            .engine
            .transition_status(&ticket.id, Status::Closed)
            .unwrap_err();
        match err {
            DeskError::InvalidTransition { from, to } => {
                assert_eq!(from, Status::Open);
                assert_eq!(to, Status::Closed);
            },
            other => panic!("Expected InvalidTransition, got {other:?}"),
        }
        assert_eq!(
            desk.engine.store().load(&ticket.id).unwrap().status,
            Status::Open
        );
    }

    #[test]
    fn test_self_and_backward_transitions_rejected() {
        let desk = TestDesk::new();
        let ticket = desk.engine.create(desk.new_ticket("Back")).unwrap();
        desk.engine
            .transition_status(&ticket.id, Status::InProgress)
            .unwrap();

        for requested in [Status::InProgress, Status::Open] {
            assert!(matches!(
                desk.engine.transition_status(&ticket.id, requested),
                Err(DeskError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_closed_is_terminal() {
        let desk = TestDesk::new();
        let ticket = desk.engine.create(desk.new_ticket("Done")).unwrap();
        for status in [Status::InProgress, Status::Resolved, Status::Closed] {
            desk.engine.transition_status(&ticket.id, status).unwrap();
        }

        for requested in Status::ALL {
            assert!(matches!(
                desk.engine.transition_status(&ticket.id, requested),
                Err(DeskError::InvalidTransition {
                    from: Status::Closed,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_transition_unknown_ticket_is_not_found() {
        let desk = TestDesk::new();
        let err = desk
            .engine
            .transition_status(&TicketId::new(), Status::InProgress)
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_transition_into_progress_respects_capacity() {
        let desk = TestDesk::new();
        let technician = desk.technician.id;
        let ticket = desk
            .engine
            .create(desk.new_ticket_for("Waiting", technician))
            .unwrap();
        desk.fill_in_progress(&technician, MAX_IN_PROGRESS_PER_TECHNICIAN);

        let err = desk
            .engine
            .transition_status(&ticket.id, Status::InProgress)
            .unwrap_err();
        assert!(matches!(err, DeskError::CapacityExceeded { .. }));
        assert_eq!(
            desk.engine.store().load(&ticket.id).unwrap().status,
            Status::Open
        );
    }

    #[test]
    fn test_unassigned_ticket_skips_capacity_check() {
        let desk = TestDesk::new();
        let ticket = desk.engine.create(desk.new_ticket("Unassigned")).unwrap();
        let updated = desk
            .engine
            .transition_status(&ticket.id, Status::InProgress)
            .unwrap();
        assert_eq!(updated.status, Status::InProgress);
    }

    #[test]
    fn test_update_applies_present_fields_only() {
        let desk = TestDesk::new();
        let ticket = desk.engine.create(desk.new_ticket("Original")).unwrap();

        let updated = desk
            .engine
            .update_fields(
                &ticket.id,
                TicketChanges {
                    priority: Some(Priority::High),
                    ..TicketChanges::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "Original");
        assert_eq!(updated.description, ticket.description);
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.status, ticket.status);
        assert!(updated.updated_at >= ticket.updated_at);
    }

    #[test]
    fn test_update_rejects_unknown_category_without_writing() {
        let desk = TestDesk::new();
        let ticket = desk.engine.create(desk.new_ticket("Keep me")).unwrap();

        let err = desk
            .engine
            .update_fields(
                &ticket.id,
                TicketChanges {
                    title: Some("Changed".to_string()),
                    category_id: Some(CategoryId::new()),
                    ..TicketChanges::default()
                },
            )
            .unwrap_err();

        assert!(matches!(err, DeskError::InvalidReference { .. }));
        assert_eq!(desk.engine.store().load(&ticket.id).unwrap().title, "Keep me");
    }

    #[test]
    fn test_update_unknown_ticket_is_not_found() {
        let desk = TestDesk::new();
        let err = desk
            .engine
            .update_fields(&TicketId::new(), TicketChanges::default())
            .unwrap_err();
        assert!(matches!(
            err,
            DeskError::NotFound {
                kind: EntityKind::Ticket,
                ..
            }
        ));
    }

    #[test]
    fn test_reassign_to_full_technician_fails() {
        let desk = TestDesk::new();
        let other = desk.add_technician("Busy");
        desk.fill_in_progress(&other.id, MAX_IN_PROGRESS_PER_TECHNICIAN);
        let ticket = desk
            .engine
            .create(desk.new_ticket_for("Move me", desk.technician.id))
            .unwrap();

        let err = desk
            .engine
            .update_fields(
                &ticket.id,
                TicketChanges {
                    technician_id: Some(other.id),
                    ..TicketChanges::default()
                },
            )
            .unwrap_err();

        assert!(matches!(err, DeskError::CapacityExceeded { .. }));
        assert_eq!(
            desk.engine.store().load(&ticket.id).unwrap().technician_id,
            Some(desk.technician.id)
        );
    }

    #[test]
    fn test_reassign_own_in_progress_ticket_succeeds() {
        let desk = TestDesk::new();
        let technician = desk.technician.id;
        let own = desk.fill_in_progress(&technician, MAX_IN_PROGRESS_PER_TECHNICIAN);

        let updated = desk
            .engine
            .update_fields(
                &own[0].id,
                TicketChanges {
                    technician_id: Some(technician),
                    ..TicketChanges::default()
                },
            )
            .unwrap();
        assert_eq!(updated.technician_id, Some(technician));
    }

    #[test]
    fn test_update_rejects_blank_title() {
        let desk = TestDesk::new();
        let ticket = desk.engine.create(desk.new_ticket("Named")).unwrap();
        let err = desk
            .engine
            .update_fields(
                &ticket.id,
                TicketChanges {
                    title: Some(" ".to_string()),
                    ..TicketChanges::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DeskError::InvalidInput(_)));
    }

    #[test]
    fn test_changes_is_empty() {
        assert!(TicketChanges::default().is_empty());
        assert!(
            !TicketChanges {
                priority: Some(Priority::Low),
                ..TicketChanges::default()
            }
            .is_empty()
        );
    }
}
