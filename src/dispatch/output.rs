//! dispatch::output
//!
//! Rendering of captured command output.

use std::io::{self, Write};

use super::ExecOutput;

/// How captured output is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// `<repo>:` header, then the text.
    #[default]
    Framed,
    /// The text only, verbatim.
    Clean,
    /// Nothing.
    Quiet,
}

impl OutputMode {
    /// Pick a mode from the `-q` and `-c` flags. Quiet wins.
    pub fn from_flags(quiet: bool, clean: bool) -> Self {
        match (quiet, clean) {
            (true, _) => Self::Quiet,
            (false, true) => Self::Clean,
            (false, false) => Self::Framed,
        }
    }
}

/// Write one run's output according to `mode`.
///
/// A run that produced no output writes nothing in any mode.
pub fn render<W: Write>(out: &mut W, mode: OutputMode, result: &ExecOutput) -> io::Result<()> {
    let text = result.text();
    if text.is_empty() {
        return Ok(());
    }

    match mode {
        OutputMode::Quiet => Ok(()),
        OutputMode::Clean => out.write_all(text.as_bytes()),
        OutputMode::Framed => writeln!(out, "{}:\n{}", result.repo, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RepoId;

    fn output(stdout: &str, stderr: &str) -> ExecOutput {
        ExecOutput {
            repo: RepoId::new("acme/api").unwrap(),
            stdout: stdout.into(),
            stderr: stderr.into(),
            status: Some(0),
        }
    }

    fn rendered(mode: OutputMode, result: &ExecOutput) -> String {
        let mut buf = Vec::new();
        render(&mut buf, mode, result).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn flags() {
        assert_eq!(OutputMode::from_flags(true, true), OutputMode::Quiet);
        assert_eq!(OutputMode::from_flags(false, true), OutputMode::Clean);
        assert_eq!(OutputMode::from_flags(false, false), OutputMode::Framed);
    }

    #[test]
    fn framed() {
        assert_eq!(
            rendered(OutputMode::Framed, &output("main\n", "")),
            "acme/api:\nmain\n\n"
        );
    }

    #[test]
    fn clean_is_verbatim() {
        assert_eq!(rendered(OutputMode::Clean, &output("main\n", "")), "main\n");
    }

    #[test]
    fn stderr_wins() {
        assert_eq!(
            rendered(OutputMode::Clean, &output("out\n", "fatal: oops\n")),
            "fatal: oops\n"
        );
    }

    #[test]
    fn quiet_and_empty_write_nothing() {
        assert_eq!(rendered(OutputMode::Quiet, &output("x", "")), "");
        assert_eq!(rendered(OutputMode::Framed, &output("", "")), "");
    }
}
