//! Command-line interface definition for Scribe
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chatting, managing saved sessions, and the theme.

use clap::{Parser, Subcommand};

/// Scribe - conversational content generation from the terminal
///
/// Chat with a generation endpoint; every conversation is kept as a
/// session in local storage so it can be resumed, renamed or deleted.
#[derive(Parser, Debug, Clone)]
#[command(name = "scribe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the local storage file location
    #[arg(long, env = "SCRIBE_STORAGE_PATH")]
    pub storage_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Scribe
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat
    Chat {
        /// Override the generation endpoint URL
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Resume a saved session by ID
        #[arg(short, long)]
        resume: Option<String>,
    },

    /// Manage saved chat sessions
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Show or change the colour theme
    Theme {
        #[command(subcommand)]
        command: ThemeCommand,
    },
}

/// Saved session subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List saved sessions
    List,

    /// Print the messages of a saved session
    Show {
        /// Session ID
        id: String,
    },

    /// Rename a saved session
    Rename {
        /// Session ID
        id: String,

        /// New display name
        #[arg(num_args = 1.., required = true)]
        name: Vec<String>,
    },

    /// Delete a saved session
    Delete {
        /// Session ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Theme subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ThemeCommand {
    /// Print the current theme
    Show,

    /// Set the theme (light or dark)
    Set {
        /// Theme name
        theme: String,
    },

    /// Switch between light and dark
    Toggle,

    /// Forget the saved theme and fall back to the configured default
    Reset,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
