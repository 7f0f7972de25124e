//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--state <path>`: Use this state file
//! - `--user <user>`: Acting user for `@` references
//! - `--debug`: Enable debug logging
//! - `--quiet`: Suppress diagnostics
//!
//! # Repository References
//!
//! Commands taking `REPOS` accept a comma-separated list of:
//! - `owner/name` - a single repository
//! - `--` - the `default` group
//! - `/group` - a named group
//! - `@user/team/project` - repositories from the remote directory; trailing
//!   segments may be omitted to fan out, and an empty user means the acting
//!   user

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// git-all - Run commands across many repositories
#[derive(Parser, Debug)]
#[command(name = "git-all")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this state file instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub state: Option<PathBuf>,

    /// Acting user for `@` references (defaults to the default user)
    #[arg(long, global = true, value_name = "USER")]
    pub user: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress diagnostics
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stored users
    Users,

    /// List stored groups
    Groups,

    /// List registered repositories by location
    Repos,

    /// Store credentials for a user
    #[command(after_help = "\
EXAMPLES:
    # Prompt for the password
    git-all add-user alice

    # Read the password from a pipe
    echo \"$APP_PASSWORD\" | git-all add-user alice --password-stdin")]
    AddUser {
        /// The user to store credentials for (prompted if omitted)
        user: Option<String>,

        /// Read the password from the first line of stdin
        #[arg(long)]
        password_stdin: bool,
    },

    /// Remove stored credentials
    DropUser {
        /// Comma-separated users, `_` for all (default: the default user)
        users: Option<String>,
    },

    /// Add repositories to groups
    AddRepo {
        /// Repositories to add
        repos: String,

        /// Comma-separated groups, `_` for all existing groups
        #[arg(default_value = "default")]
        groups: String,
    },

    /// Show the members of groups
    ListGroup {
        /// Comma-separated groups, `_` for all existing groups
        #[arg(default_value = "default")]
        groups: String,
    },

    /// Delete groups
    DropGroup {
        /// Comma-separated groups, `_` for all existing groups
        #[arg(default_value = "default")]
        groups: String,
    },

    /// Register working copies that already exist
    Register {
        /// Repositories to register
        repos: String,

        /// Directory holding the working copies (default: current directory)
        #[arg(short = 'l', long = "location", value_name = "PATH")]
        location: Option<PathBuf>,
    },

    /// Register working copies, cloning those that are missing
    Install {
        /// Repositories to install
        repos: String,

        /// Directory to clone into (default: current directory)
        #[arg(short = 'l', long = "location", value_name = "PATH")]
        location: Option<PathBuf>,
    },

    /// Run a command in each repository, one at a time
    #[command(after_help = "\
EXAMPLES:
    # Every repository in the default group
    git-all do -- git status -s

    # A group plus one repository, without headers
    git-all do /work,acme/api -c -- git rev-parse --abbrev-ref HEAD")]
    Do {
        /// Repositories to run in
        #[arg(default_value = "--")]
        repos: String,

        #[command(flatten)]
        output: RunOutput,

        /// The command to run, after `--`
        #[arg(last = true)]
        command: Vec<String>,
    },

    /// Run a command in each repository, several at a time
    Pardo {
        /// Repositories to run in
        #[arg(default_value = "--")]
        repos: String,

        #[command(flatten)]
        output: RunOutput,

        /// How many processes may run at once (default from config)
        #[arg(short = 'p', long = "max-processes", value_name = "N",
              value_parser = clap::value_parser!(u64).range(1..))]
        max_processes: Option<u64>,

        /// The command to run, after `--`
        #[arg(last = true)]
        command: Vec<String>,
    },

    /// Generate shell completion scripts
    #[command(after_help = "\
INSTALLATION:
    # Bash
    git-all completion bash > ~/.local/share/bash-completion/completions/git-all

    # Zsh
    git-all completion zsh > ~/.zfunc/_git-all

    # Fish
    git-all completion fish > ~/.config/fish/completions/git-all.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Output flags shared by `do` and `pardo`.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct RunOutput {
    /// Don't print any command output
    #[arg(short = 'q', long = "no-output")]
    pub silent: bool,

    /// Don't print headers for command output
    #[arg(short = 'c', long)]
    pub clean: bool,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
