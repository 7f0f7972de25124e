//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Results go to stdout. Diagnostics (skipped clauses, missing working
//! copies, unknown groups) go to stderr. Everything except errors respects
//! the global `--quiet` flag.

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - results only, no diagnostics
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message on stdout (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a diagnostic on stderr as-is (respects quiet mode).
pub fn notice(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("{}", message);
    }
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Format a heading followed by indented members.
///
/// ```
/// use git_all::ui::output::format_section;
///
/// assert_eq!(format_section("web", &["acme/site", "acme/cdn"]), "web:\n  acme/site\n  acme/cdn");
/// ```
pub fn format_section<T: Display>(heading: impl Display, items: &[T]) -> String {
    let mut out = format!("{}:", heading);
    for item in items {
        out.push_str(&format!("\n  {}", item));
    }
    out
}

/// Mark the default entry in a listing.
pub fn format_user(name: &str, is_default: bool) -> String {
    if is_default {
        format!("{} [default]", name)
    } else {
        name.to_string()
    }
}
