//! Command-line interface for the todo-server binary.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Todo server: user accounts and per-user todo lists over HTTP
#[derive(Parser, Debug)]
#[command(
    name = "todo-server",
    version,
    about = "HTTP todo service with token authentication",
    after_help = "EXAMPLES:\n    \
                  todo-server                         # Start the server (reads todo.toml)\n    \
                  todo-server --config my.toml        # Use a custom config file\n    \
                  todo-server --log-format json       # Structured logs\n    \
                  todo-server config --validate       # Check config and secret, then exit"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "todo.toml", env = "TODO_CONFIG", global = true)]
    pub config: PathBuf,

    /// Enable debug logging regardless of the configured level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// One JSON object per event
    Json,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the effective configuration
    Config {
        /// Also check that the signing secret is available
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
