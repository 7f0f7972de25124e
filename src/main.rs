//! git-all CLI entry point.

use std::io::IsTerminal;
use std::process::ExitCode;

use git_all::cli::{self, Cli};
use git_all::ui::output;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN, or ERROR with `--quiet`
///
/// Colours are only used when stderr is a terminal.
fn init_tracing(debug: bool, quiet: bool) {
    let default = if quiet { "git_all=error" } else { "git_all=warn" };
    let filter = if debug {
        EnvFilter::new("git_all=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    let layer = fmt::layer()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.debug, cli.quiet);

    tracing::debug!("git-all starting with args: {:?}", cli);

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::from(1)
        }
    }
}
