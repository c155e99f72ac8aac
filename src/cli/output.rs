//! Terminal and JSON output

use crate::error::{DeskError, Result};
use colored::Colorize;
use serde::Serialize;
use serde_json::json;

/// Renders command results either as colored text or as JSON envelopes
///
/// In JSON mode the human-oriented `success`/`info` lines are suppressed and
/// each command prints exactly one `{ "success", "data", "message" }`
/// document on stdout.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    json: bool,
}

impl OutputFormatter {
    pub fn new(json: bool, no_color: bool) -> Self {
        if no_color || json {
            colored::control::set_override(false);
        }
        Self { json }
    }

    pub const fn is_json(&self) -> bool {
        self.json
    }

    pub fn success(&self, message: &str) {
        if !self.json {
            println!("{}", message.green());
        }
    }

    pub fn info(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }

    pub fn warning(&self, message: &str) {
        if !self.json {
            eprintln!("{} {message}", "warning:".yellow().bold());
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {message}", "error:".red().bold());
    }

    pub fn print_json(&self, value: &serde_json::Value) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print the success envelope for `data`
    pub fn respond<T: Serialize + ?Sized>(&self, data: &T, message: &str) -> Result<()> {
        self.print_json(&success_envelope(data, message)?)
    }

    /// Print the failure envelope for `error`
    pub fn respond_error(&self, error: &DeskError) -> Result<()> {
        self.print_json(&error_envelope(error))
    }
}

pub fn success_envelope<T: Serialize + ?Sized>(
    data: &T,
    message: &str,
) -> Result<serde_json::Value> {
    Ok(json!({
        "success": true,
        "data": serde_json::to_value(data)?,
        "message": message,
    }))
}

pub fn error_envelope(error: &DeskError) -> serde_json::Value {
    json!({
        "success": false,
        "data": null,
        "message": error.user_message(),
        "status_code": error.status_code(),
        "suggestions": error.suggestions(),
        "recoverable": error.is_recoverable(),
        "is_config_error": error.is_config_error(),
    })
}
