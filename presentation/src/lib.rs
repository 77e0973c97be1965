//! Presentation layer for tandem
//!
//! CLI argument definitions, progress reporting, console formatting, and
//! the interactive chat REPL.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, run_once};
pub use cli::{Cli, Command};
pub use output::ConsoleFormatter;
pub use progress::{ProgressReporter, SimpleProgress};
