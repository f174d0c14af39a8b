// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `queuenotifier`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "queuenotifier",
    version,
    about = "Forward game screenshot markers to a remote notification service.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `QueueNotifier.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `QUEUENOTIFIER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// What to do. Defaults to `watch`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Watch the Screenshots folder and notify for every new marker file.
    Watch(WatchArgs),

    /// Register this client and print the issued registration id.
    Register {
        /// Client UUID to register. Falls back to `[identity].uuid`, then a
        /// freshly generated one.
        #[arg(long, value_name = "UUID")]
        id: Option<String>,
    },

    /// Send a single test notification and print the result.
    TestNotify,
}

impl Default for Command {
    fn default() -> Self {
        Command::Watch(WatchArgs::default())
    }
}

/// Overrides for the `[watcher]` section.
#[derive(Debug, Clone, Default, Args)]
pub struct WatchArgs {
    /// Game folder containing `Screenshots/`.
    #[arg(long, value_name = "DIR")]
    pub folder: Option<PathBuf>,

    /// Retry count forwarded to the service.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub notify_retries: Option<u32>,

    /// Delete marker files without notifying.
    #[arg(long)]
    pub disable_notify: bool,

    /// Do not reload the config file when it changes.
    #[arg(long)]
    pub no_reload: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
