//! Command handlers
//!
//! One function per subcommand. Each opens the desk through
//! [`HandlerContext`], delegates to the services layer and renders the
//! result with the [`OutputFormatter`](crate::cli::OutputFormatter).

mod common;
mod directory;
mod export;
mod init;
mod seed;
mod ticket;
mod workload;

pub use common::{HandlerContext, Missing, resolve_id};
pub use directory::{
    handle_category_add, handle_category_list, handle_category_update, handle_client_add,
    handle_client_list, handle_client_show, handle_client_update, handle_technician_add,
    handle_technician_availability, handle_technician_list, handle_technician_show,
    handle_technician_update,
};
pub use export::{DeskSnapshot, handle_export, render as render_export};
pub use init::handle_init;
pub use seed::handle_seed;
pub use ticket::{
    CreateParams, UpdateParams, handle_ticket_create, handle_ticket_list, handle_ticket_show,
    handle_ticket_status, handle_ticket_update,
};
pub use workload::handle_workload;
