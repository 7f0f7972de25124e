//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - Interactive prompts for usernames and passwords
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! Command handlers print through this module so quiet mode and the
//! stdout/stderr split are handled in one place.

pub mod output;
pub mod prompts;
