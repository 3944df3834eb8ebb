//! CLI Output Formatting Module
//! Provides consistent, colorized output for terminal UX

use colored::Colorize;

use crate::engine::rbac::Role;
use crate::engine::validation::FieldError;

pub struct CliFormatter;

impl CliFormatter {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green().bold(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue().bold(), message);
    }

    /// Print a section header
    pub fn header(title: &str) {
        println!("\n{}", title.bright_cyan().bold());
        println!("{}", "─".repeat(title.len()).bright_black());
    }

    /// Print a key-value pair
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", key.bright_white().bold(), value);
    }

    /// Print a list item
    pub fn item(text: &str) {
        println!("  {} {}", "•".bright_black(), text);
    }

    /// Print a code block
    pub fn code_block(code: &str, language: &str) {
        println!("\n{}", format!("```{}", language).bright_black());
        for line in code.lines() {
            println!("  {}", line.bright_white());
        }
        println!("{}\n", "```".bright_black());
    }
}

/// `OWNER -> MEMBER, AUTHENTICATED, UNAUTHENTICATED`
pub fn format_role_line(role: Role, implied: &[Role]) -> String {
    if implied.is_empty() {
        return format!("{role} -> (none)");
    }
    let implied = implied
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{role} -> {implied}")
}

/// `name: name is required`
pub fn format_field_error(error: &FieldError) -> String {
    format!("{}: {}", error.field, error.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_role_line() {
        assert_eq!(
            format_role_line(Role::Member, &[Role::Authenticated, Role::Unauthenticated]),
            "MEMBER -> AUTHENTICATED, UNAUTHENTICATED"
        );
        assert_eq!(
            format_role_line(Role::Unauthenticated, &[]),
            "UNAUTHENTICATED -> (none)"
        );
    }

    #[test]
    fn test_format_field_error() {
        let error = FieldError::new("email", "email must be a valid email address".to_string());
        assert_eq!(
            format_field_error(&error),
            "email: email must be a valid email address"
        );
    }
}
