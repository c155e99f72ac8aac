//! ticket-desk - support ticket desk CLI
//!
//! Parses command-line arguments and dispatches to the handlers in
//! `ticket_desk::cli::handlers`.

use clap::Parser;
use std::process;
use ticket_desk::cli::handlers::{
    CreateParams, UpdateParams, handle_category_add, handle_category_list, handle_category_update,
    handle_client_add, handle_client_list, handle_client_show, handle_client_update,
    handle_export, handle_init, handle_seed, handle_technician_add,
    handle_technician_availability, handle_technician_list, handle_technician_show,
    handle_technician_update, handle_ticket_create, handle_ticket_list, handle_ticket_show,
    handle_ticket_status, handle_ticket_update, handle_workload,
};
use ticket_desk::cli::utils::find_project_root;
use ticket_desk::cli::{
    CategoryCommands, Cli, ClientCommands, Commands, OutputFormatter, TechnicianCommands,
    TicketCommands,
};
use ticket_desk::config::Config;
use ticket_desk::error::{DeskError, Result};
use ticket_desk::services::{CategoryChanges, ClientChanges, TechnicianChanges};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Flags win over the configured output defaults
    let root = find_project_root(cli.project.as_deref()).ok();
    let config = Config::load_or_default(root.as_deref());
    let formatter = OutputFormatter::new(
        cli.json || config.output.json,
        cli.no_color || !config.output.color,
    );

    if let Err(e) = dispatch_command(cli.command, cli.project.as_deref(), &formatter) {
        handle_error(&e, &formatter);
        process::exit(1);
    }
}

/// Install the stderr subscriber
///
/// `RUST_LOG` wins when set; otherwise `-v` selects `debug` and the default
/// is `warn`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn dispatch_command(
    command: Commands,
    project: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        Commands::Init {
            name,
            description,
            force,
        } => handle_init(name, description, force, project, formatter),
        Commands::Seed => handle_seed(project, formatter),
        Commands::Client(command) => dispatch_client_command(command, project, formatter),
        Commands::Technician(command) => dispatch_technician_command(command, project, formatter),
        Commands::Category(command) => dispatch_category_command(command, project, formatter),
        Commands::Ticket(command) => dispatch_ticket_command(command, project, formatter),
        Commands::Workload { technician } => handle_workload(&technician, project, formatter),
        Commands::Export { format, output } => handle_export(format, output, project, formatter),
    }
}

fn dispatch_client_command(
    command: ClientCommands,
    project: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        ClientCommands::Add {
            name,
            company,
            email,
        } => handle_client_add(name, company, email, project, formatter),
        ClientCommands::List => handle_client_list(project, formatter),
        ClientCommands::Show { client } => handle_client_show(&client, project, formatter),
        ClientCommands::Update {
            client,
            name,
            company,
            email,
        } => {
            let changes = ClientChanges {
                name,
                company,
                contact_email: email,
            };
            handle_client_update(&client, changes, project, formatter)
        },
    }
}

fn dispatch_technician_command(
    command: TechnicianCommands,
    project: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        TechnicianCommands::Add {
            name,
            specialty,
            unavailable,
        } => handle_technician_add(name, specialty, unavailable, project, formatter),
        TechnicianCommands::List => handle_technician_list(project, formatter),
        TechnicianCommands::Show { technician } => {
            handle_technician_show(&technician, project, formatter)
        },
        TechnicianCommands::Availability {
            technician,
            available,
        } => handle_technician_availability(&technician, available, project, formatter),
        TechnicianCommands::Update {
            technician,
            name,
            specialty,
            available,
        } => {
            let changes = TechnicianChanges {
                name,
                specialty,
                available,
            };
            handle_technician_update(&technician, changes, project, formatter)
        },
    }
}

fn dispatch_category_command(
    command: CategoryCommands,
    project: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        CategoryCommands::Add { name, description } => {
            handle_category_add(name, description, project, formatter)
        },
        CategoryCommands::List => handle_category_list(project, formatter),
        CategoryCommands::Update {
            category,
            name,
            description,
        } => {
            let changes = CategoryChanges { name, description };
            handle_category_update(&category, changes, project, formatter)
        },
    }
}

fn dispatch_ticket_command(
    command: TicketCommands,
    project: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        TicketCommands::Create {
            title,
            description,
            client,
            category,
            technician,
            priority,
        } => handle_ticket_create(
            CreateParams {
                title,
                description,
                client,
                category,
                technician,
                priority,
            },
            project,
            formatter,
        ),
        TicketCommands::Update {
            ticket,
            title,
            description,
            priority,
            category,
            technician,
        } => handle_ticket_update(
            UpdateParams {
                ticket,
                title,
                description,
                priority,
                category,
                technician,
            },
            project,
            formatter,
        ),
        TicketCommands::Status { ticket, status } => {
            handle_ticket_status(&ticket, &status, project, formatter)
        },
        TicketCommands::Show { ticket } => handle_ticket_show(&ticket, project, formatter),
        TicketCommands::List {
            client,
            technician,
            status,
        } => handle_ticket_list(client, technician, status, project, formatter),
    }
}

/// Report an error to the user
///
/// In JSON mode the failure envelope goes to stdout so scripts can parse it;
/// the human-readable message and suggestions always go to stderr.
fn handle_error(error: &DeskError, formatter: &OutputFormatter) {
    formatter.error(&error.user_message());

    let suggestions = error.suggestions();
    if !suggestions.is_empty() {
        eprintln!("\nSuggestions:");
        for suggestion in &suggestions {
            eprintln!("  • {suggestion}");
        }
    }

    if formatter.is_json() {
        let _ = formatter.respond_error(error);
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        eprintln!("\nDebug information:");
        eprintln!("{error:?}");
    }
}
