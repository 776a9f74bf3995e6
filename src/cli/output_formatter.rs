use colored::*;
use crate::commands::CommandDescriptor;
use crate::utils::error::VoltError;

/// Formats user-facing CLI output
pub struct OutputFormatter;

impl OutputFormatter {
    /// Format the command listing
    pub fn format_command_list(descriptors: &[&CommandDescriptor]) -> String {
        if descriptors.is_empty() {
            return Self::format_info("No commands are registered.");
        }

        let width = descriptors
            .iter()
            .map(|d| d.name().len())
            .max()
            .unwrap_or(0);

        let mut output = String::new();
        output.push_str(&format!("{}\n", "Available Commands:".bold()));

        for descriptor in descriptors {
            let name = format!("{:<width$}", descriptor.name(), width = width);
            let name = if descriptor.is_hidden() { name.dimmed() } else { name.cyan() };
            output.push_str(&format!("  {} {}  {}\n", "•".green(), name, descriptor.description()));
        }

        output
    }

    /// Format error message for CLI display
    pub fn format_error(error: &VoltError) -> String {
        format!("{} {}", "Error:".red().bold(), error.to_string().red())
    }

    /// Format warning message for CLI display
    pub fn format_warning(message: &str) -> String {
        format!("{} {}", "WARNING:".yellow().bold(), message)
    }

    /// Format info message for CLI display
    pub fn format_info(message: &str) -> String {
        format!("{} {}", "Info:".blue().bold(), message)
    }
}
