//! CLI definitions for cronhook.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use cronhook_config::DEFAULT_CONFIG_PATH;

/// cronhook CLI.
#[derive(Parser)]
#[command(name = "cronhook")]
#[command(about = "Cron-scheduled webhook dispatcher")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true, env = "CRONHOOK_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Schedule every stored event and dispatch until Ctrl-C (default)
    Run,

    /// Manage stored events
    Events {
        #[command(subcommand)]
        action: EventsAction,
    },

    /// Validate a cron expression and print its next fire times
    Check {
        /// Six-field cron expression, seconds first
        expression: String,

        /// Number of fire times to print
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
    },
}

#[derive(Subcommand)]
pub(crate) enum EventsAction {
    /// List stored events
    List {
        /// Only show events whose URL starts with this prefix
        #[arg(long)]
        url_prefix: Option<String>,
    },

    /// Add or replace a stored event
    Add(AddEventArgs),

    /// Remove a stored event
    Remove {
        /// Event ID
        id: u64,
    },
}

#[derive(Args)]
pub(crate) struct AddEventArgs {
    /// Event ID (non-zero)
    #[arg(long)]
    pub id: u64,

    /// Six-field cron expression, seconds first
    #[arg(long)]
    pub expression: String,

    /// Target URL
    #[arg(long)]
    pub url: String,

    /// Retries after the first failed attempt
    #[arg(long, default_value_t = 0)]
    pub max_retries: u32,

    /// Seconds between retries (0 uses the configured default)
    #[arg(long, default_value_t = 0)]
    pub retry_timeout: u64,

    /// Overwrite an existing event with the same ID
    #[arg(long)]
    pub replace: bool,
}
