//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for tandem
#[derive(Parser, Debug)]
#[command(name = "tandem")]
#[command(version, about = "Two-model synergy chat - two LLMs deliberate, the primary speaks")]
#[command(long_about = r#"
Tandem runs a synergy conversation between two chat-completion providers.

For each message you send, the primary and secondary models alternate short
deliberation passes until one of them signals completion; the primary then
produces the single user-facing reply. Conversations persist to a flat file.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./tandem.toml       Project-level config
3. ~/.config/tandem/config.toml   Global config

Example:
  tandem new "a todo app with offline sync"
  tandem send <id> "let's start"
  tandem chat <id>
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new synergy conversation from a project idea
    New {
        /// The project idea that seeds the conversation
        idea: String,
    },

    /// Send a message and run one synergy loop (ctrl-c cancels at the next
    /// pass boundary)
    Send {
        /// Conversation id
        id: String,
        /// The message to send
        message: String,
    },

    /// Interactive chat on a conversation
    Chat {
        /// Conversation id; omit together with --idea to start fresh
        id: Option<String>,
        /// Create a new conversation from this idea first
        #[arg(long)]
        idea: Option<String>,
    },

    /// List all conversations
    List,

    /// Show a conversation transcript
    Show {
        /// Conversation id
        id: String,
        /// Include internal deliberation messages
        #[arg(long)]
        internal: bool,
    },

    /// Show or update conversation settings
    Settings {
        /// Conversation id
        id: String,
        /// Settings to merge, as KEY=VALUE pairs
        #[arg(value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Generate project files from the conversation
    Scaffold {
        /// Conversation id
        id: String,
    },

    /// Delete a conversation
    Delete {
        /// Conversation id
        id: String,
    },
}
