//! CLI command implementations

pub mod convert;
pub mod inspect;
pub mod json_output;
pub mod verify;

use colored::Colorize;
use lanecast_chart::ValidationResult;

/// Prints validation errors and warnings in the human-readable style.
pub(crate) fn print_validation(validation: &ValidationResult) {
    for err in &validation.errors {
        let path = err
            .path
            .as_ref()
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();
        println!(
            "  {} [{}]{}: {}",
            "x".red(),
            err.code,
            path.dimmed(),
            err.message
        );
    }
    for warning in &validation.warnings {
        let path = warning
            .path
            .as_ref()
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();
        println!(
            "  {} [{}]{}: {}",
            "!".yellow(),
            warning.code,
            path.dimmed(),
            warning.message
        );
    }
}

/// Prints a JSON document to stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
