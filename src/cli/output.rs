//! Console output for hooksmith.
//!
//! Styled, consistent messages gated on verbosity, plus the y/N
//! confirmation prompt the install state machine asks its questions
//! through.

use std::io::{self, Write};

use console::style;

use crate::install::Prompter;
use crate::settings::EchoLevel;

/// Output handler for consistent CLI formatting.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Fold the settings-file echo level into the flag-derived verbosity.
    /// Explicit flags win; the level only widens or narrows the default.
    pub fn with_level(self, level: EchoLevel) -> Self {
        Self {
            verbose: self.verbose || level == EchoLevel::Debug,
            quiet: self.quiet || level == EchoLevel::Error,
        }
    }

    /// Print a plain message
    pub fn print(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print an error message. Errors are always shown, even in quiet mode.
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if !self.quiet {
            println!("  • {item}");
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Ask for user confirmation.
    pub fn confirm(&self, message: &str, default_yes: bool) -> bool {
        let hint = if default_yes { "(Y/n)" } else { "(y/N)" };
        print!("{} {} {}: ", style("❯").cyan(), message, hint);
        if io::stdout().flush().is_err() {
            return default_yes;
        }

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            return default_yes;
        }
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            "" => default_yes,
            _ => false,
        }
    }
}

impl Prompter for Output {
    fn confirm(&self, message: &str, default_yes: bool) -> bool {
        Output::confirm(self, message, default_yes)
    }
}
