//! dispatch::sequential
//!
//! One blocking process at a time.

use std::io::Write;
use std::process::Command;

use tracing::debug;

use super::{
    next_target, render, split_command, DispatchError, ExecOutput, MissingCopy, OutputMode,
};
use crate::core::types::RepoId;
use crate::store::Store;

/// Summary of a sequential batch.
#[derive(Debug, Default)]
pub struct SequentialReport {
    /// Finished runs, in resolution order.
    pub completed: Vec<ExecOutput>,
    /// Bound repositories skipped because their working copy is gone.
    pub missing: Vec<MissingCopy>,
}

/// Run `command` in each bound repository, in order.
///
/// Output is written to `out` after each run according to `mode`.
///
/// # Errors
///
/// `DispatchError::Launch` if a process cannot be started. Results rendered
/// before the failure have already been written.
pub fn run_sequential<W: Write>(
    store: &dyn Store,
    repos: &[RepoId],
    command: &[String],
    mode: OutputMode,
    out: &mut W,
) -> Result<SequentialReport, DispatchError> {
    let (program, args) = split_command(command)?;
    let mut report = SequentialReport::default();
    let mut pending = repos.iter();

    while let Some(target) = next_target(store, &mut pending, &mut report.missing) {
        debug!(repo = %target.repo, path = %target.path.display(), "running {}", program);
        let output = Command::new(program)
            .args(args)
            .current_dir(&target.path)
            .output()
            .map_err(|source| DispatchError::Launch {
                program: program.to_string(),
                path: target.path.clone(),
                source,
            })?;

        let result = ExecOutput::from_output(target.repo, output);
        render(out, mode, &result)?;
        report.completed.push(result);
    }

    out.flush()?;
    Ok(report)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::store::State;
    use tempfile::TempDir;

    fn repo(s: &str) -> RepoId {
        RepoId::new(s).unwrap()
    }

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".into(), "-c".into(), script.into()]
    }

    #[test]
    fn unbound_repo_produces_nothing() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("x")).unwrap();
        let mut state = State::new();
        state.record_binding(&repo("acme/x"), temp.path());

        let mut out = Vec::new();
        let report = run_sequential(
            &state,
            &[repo("acme/x"), repo("acme/y")],
            &sh("echo hello"),
            OutputMode::Framed,
            &mut out,
        )
        .unwrap();

        assert_eq!(report.completed.len(), 1);
        assert!(report.missing.is_empty());
        assert_eq!(String::from_utf8(out).unwrap(), "acme/x:\nhello\n\n");
    }

    #[test]
    fn runs_in_working_copy() {
        let temp = TempDir::new().unwrap();
        let working_copy = temp.path().join("x");
        std::fs::create_dir(&working_copy).unwrap();
        std::fs::write(working_copy.join("marker"), "").unwrap();
        let mut state = State::new();
        state.record_binding(&repo("acme/x"), temp.path());

        let mut out = Vec::new();
        run_sequential(&state, &[repo("acme/x")], &sh("ls"), OutputMode::Clean, &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "marker\n");
    }

    #[test]
    fn failing_command_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("x")).unwrap();
        std::fs::create_dir(temp.path().join("z")).unwrap();
        let mut state = State::new();
        state.record_binding(&repo("acme/x"), temp.path());
        state.record_binding(&repo("acme/z"), temp.path());

        let mut out = Vec::new();
        let report = run_sequential(
            &state,
            &[repo("acme/x"), repo("acme/z")],
            &sh("echo boom >&2; exit 3"),
            OutputMode::Quiet,
            &mut out,
        )
        .unwrap();

        assert!(out.is_empty());
        assert_eq!(report.completed.len(), 2);
        assert_eq!(report.completed[0].status, Some(3));
        assert_eq!(report.completed[0].stderr, "boom\n");
    }

    #[test]
    fn vanished_working_copy_is_reported() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("x")).unwrap();
        let mut state = State::new();
        state.record_binding(&repo("acme/x"), temp.path());
        state.record_binding(&repo("acme/gone"), temp.path());

        let mut out = Vec::new();
        let report = run_sequential(
            &state,
            &[repo("acme/gone"), repo("acme/x")],
            &sh("echo here"),
            OutputMode::Framed,
            &mut out,
        )
        .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "acme/x:\nhere\n\n");
        assert_eq!(
            report.missing,
            vec![MissingCopy {
                repo: repo("acme/gone"),
                path: temp.path().join("gone"),
            }]
        );
    }

    #[test]
    fn missing_program_is_launch_error() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("x")).unwrap();
        let mut state = State::new();
        state.record_binding(&repo("acme/x"), temp.path());

        let err = run_sequential(
            &state,
            &[repo("acme/x")],
            &["git-all-no-such-program".to_string()],
            OutputMode::Framed,
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DispatchError::Launch { .. }));
    }
}
