//! # Error Display
//!
//! User-facing error display helpers for the docq CLI.

use colored::Colorize;

/// Display a network error with helpful suggestions
pub fn display_network_error(message: &str) {
    eprintln!("{} Network error: {}", "✗".red().bold(), message);
    eprintln!();
    eprintln!("{}", "Possible causes:".yellow());
    eprintln!("  • No internet connection");
    eprintln!("  • The provider endpoint is unreachable");
    eprintln!();
    eprintln!(
        "{} Check your connection and try again.",
        "Tip:".cyan().bold()
    );
}

/// Display a configuration error with helpful suggestions
pub fn display_config_error(message: &str) {
    eprintln!("{} Configuration error: {}", "✗".red().bold(), message);
    eprintln!();
    eprintln!("{}", "Possible causes:".yellow());
    eprintln!("  • A required API key environment variable is not set");
    eprintln!("  • The config file is corrupted");
    eprintln!();
    eprintln!(
        "{} Check ~/.config/docq/config.json and your environment.",
        "Tip:".cyan().bold()
    );
}

/// Display a generic error
pub fn display_error(message: &str) {
    eprintln!("{} Error: {}", "✗".red().bold(), message);
}
