//! Command-line interface for ticket-desk
//!
//! Argument definitions live here; each command is executed by a function
//! in [`handlers`]. Output goes through [`OutputFormatter`] so that every
//! command honours `--json` and `--no-color` the same way.

pub mod handlers;
pub mod output;
pub mod utils;

pub use output::OutputFormatter;

use clap::{Parser, Subcommand, ValueEnum};

/// Support ticket desk with technician workload limits
#[derive(Parser, Debug)]
#[command(name = "ticket-desk", author, version, about, long_about = None)]
pub struct Cli {
    /// Project directory (defaults to the nearest directory containing .ticket-desk)
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Emit JSON envelopes instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a desk in the current directory
    Init {
        /// Project name
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Reinitialize an existing desk, keeping its records
        #[arg(short, long)]
        force: bool,
    },

    /// Insert the demo categories, technician and client
    Seed,

    /// Manage clients
    #[command(subcommand)]
    Client(ClientCommands),

    /// Manage technicians
    #[command(subcommand)]
    Technician(TechnicianCommands),

    /// Manage ticket categories
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Create, edit and move tickets
    #[command(subcommand)]
    Ticket(TicketCommands),

    /// Show how many tickets a technician has in progress
    Workload {
        /// Technician ID or ID prefix
        technician: String,
    },

    /// Export every record of the desk
    Export {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ClientCommands {
    /// Register a client
    Add {
        name: String,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    List,

    Show {
        /// Client ID or ID prefix
        client: String,
    },

    /// Change a client's details; an empty value clears an optional field
    Update {
        client: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TechnicianCommands {
    /// Register a technician
    Add {
        name: String,

        #[arg(long)]
        specialty: Option<String>,

        /// Register the technician as unavailable
        #[arg(long)]
        unavailable: bool,
    },

    List,

    /// Show a technician and their assigned tickets
    Show {
        /// Technician ID or ID prefix
        technician: String,
    },

    /// Mark a technician available or unavailable
    Availability {
        technician: String,

        #[arg(action = clap::ArgAction::Set)]
        available: bool,
    },

    /// Change a technician's details
    Update {
        technician: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        specialty: Option<String>,

        #[arg(long)]
        available: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Register a category
    Add {
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    List,

    /// Rename a category or change its description
    Update {
        /// Category ID, ID prefix or name
        category: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TicketCommands {
    /// Open a new ticket
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        description: String,

        /// Client ID or ID prefix
        #[arg(long)]
        client: String,

        /// Category ID, ID prefix or name
        #[arg(long)]
        category: String,

        /// Technician ID or ID prefix
        #[arg(long)]
        technician: Option<String>,

        /// low, medium or high (defaults to the configured priority)
        #[arg(long)]
        priority: Option<String>,
    },

    /// Change a ticket's fields
    Update {
        /// Ticket ID or ID prefix
        ticket: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        technician: Option<String>,
    },

    /// Move a ticket to its next status
    Status {
        ticket: String,

        /// open, in_progress, resolved or closed
        status: String,
    },

    Show {
        ticket: String,
    },

    List {
        /// Only tickets of this client
        #[arg(long, conflicts_with = "technician")]
        client: Option<String>,

        /// Only tickets assigned to this technician
        #[arg(long)]
        technician: Option<String>,

        #[arg(short, long)]
        status: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ticket_create() {
        let cli = Cli::parse_from([
            "ticket-desk",
            "--json",
            "ticket",
            "create",
            "--title",
            "Printer jam",
            "--description",
            "Tray 2",
            "--client",
            "abc",
            "--category",
            "Request",
        ]);

        assert!(cli.json);
        match cli.command {
            Commands::Ticket(TicketCommands::Create {
                title,
                technician,
                priority,
                ..
            }) => {
                assert_eq!(title, "Printer jam");
                assert!(technician.is_none());
                assert!(priority.is_none());
            },
            other => panic!("Unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_list_filters_conflict() {
        let result = Cli::try_parse_from([
            "ticket-desk",
            "ticket",
            "list",
            "--client",
            "a",
            "--technician",
            "b",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_export_defaults_to_json() {
        let cli = Cli::parse_from(["ticket-desk", "export"]);
        match cli.command {
            Commands::Export { format, output } => {
                assert_eq!(format, ExportFormat::Json);
                assert!(output.is_none());
            },
            other => panic!("Unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_availability_takes_bool() {
        let cli = Cli::parse_from(["ticket-desk", "technician", "availability", "abc", "false"]);
        assert!(matches!(
            cli.command,
            Commands::Technician(TechnicianCommands::Availability {
                available: false,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_technician_update() {
        let cli = Cli::parse_from([
            "ticket-desk",
            "technician",
            "update",
            "abc",
            "--specialty",
            "",
            "--available",
            "true",
        ]);
        match cli.command {
            Commands::Technician(TechnicianCommands::Update {
                technician,
                name,
                specialty,
                available,
            }) => {
                assert_eq!(technician, "abc");
                assert!(name.is_none());
                assert_eq!(specialty.as_deref(), Some(""));
                assert_eq!(available, Some(true));
            },
            other => panic!("Unexpected command: {other:?}"),
        }
    }
}
