//! Terminal helpers: colored message prefixes and status badges.

use crate::models::Status;
use owo_colors::OwoColorize;

/// Colors are on unless `NO_COLOR` is set or the output is machine-readable.
pub fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if use_colors("human") {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if use_colors("human") {
        "note:".yellow().bold().to_string()
    } else {
        "note:".to_string()
    }
}

pub fn status_badge(status: Status, color: bool) -> String {
    let label = format!("⟦{}⟧", status);
    if !color {
        return label;
    }
    match status {
        Status::ApproveAsOptimal => label.green().bold().to_string(),
        Status::ApproveWithComment => label.cyan().bold().to_string(),
        Status::DisapproveWithComment => label.red().bold().to_string(),
        Status::ReferToMentor => label.yellow().bold().to_string(),
    }
}
