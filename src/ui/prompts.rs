//! ui::prompts
//!
//! Interactive prompts.
//!
//! # Design
//!
//! Prompts are only shown when stdin is a terminal. Otherwise, callers must
//! take input from flags or a pipe, or fail with a clear error message.

use std::io::{self, BufRead, IsTerminal, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Whether stdin is attached to a terminal.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Prompt for a line of text on stderr and read it from stdin.
///
/// An empty answer (or end of input) is `Cancelled`.
pub fn input(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    let mut stderr = io::stderr();
    write!(stderr, "{}", message).map_err(|e| PromptError::IoError(e.to_string()))?;
    stderr.flush().map_err(|e| PromptError::IoError(e.to_string()))?;

    read_line(&mut io::stdin().lock())
}

/// Prompt for masked input (e.g., passwords).
///
/// The input is not echoed to the terminal.
pub fn password(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    rpassword::prompt_password(message).map_err(|e| PromptError::IoError(e.to_string()))
}

/// Read one line, without its line ending.
///
/// Used for `--password-stdin`; only the first line is consumed.
pub fn read_line<R: BufRead>(reader: &mut R) -> Result<String, PromptError> {
    let mut line = String::new();
    let n = reader
        .read_line(&mut line)
        .map_err(|e| PromptError::IoError(e.to_string()))?;
    let line = line.trim_end_matches(['\r', '\n']).to_string();
    if n == 0 || line.is_empty() {
        return Err(PromptError::Cancelled);
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn non_interactive_fails() {
        assert!(matches!(input("User: ", false), Err(PromptError::NotInteractive)));
        assert!(matches!(
            password("Password: ", false),
            Err(PromptError::NotInteractive)
        ));
    }

    #[test]
    fn read_line_strips_ending() {
        let mut reader = Cursor::new("s3cret\r\nignored\n");
        assert_eq!(read_line(&mut reader).unwrap(), "s3cret");
    }

    #[test]
    fn read_line_keeps_inner_spaces() {
        let mut reader = Cursor::new(" pass word \n");
        assert_eq!(read_line(&mut reader).unwrap(), " pass word ");
    }

    #[test]
    fn empty_input_is_cancelled() {
        assert!(matches!(
            read_line(&mut Cursor::new("")),
            Err(PromptError::Cancelled)
        ));
        assert!(matches!(
            read_line(&mut Cursor::new("\n")),
            Err(PromptError::Cancelled)
        ));
    }
}
