use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(author, version, about = "Send a mobile-style notification", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Notification title.
    #[arg(long, default_value = "Notification title")]
    pub title: String,

    /// Notification message body.
    #[arg(long, default_value = "Notification message")]
    pub message: String,

    /// Ticker text shown in the status bar.
    #[arg(long, default_value = "Notification ticker")]
    pub ticker: String,

    /// Icon reference ("<name>.<extension>"); defaults to the app launcher
    /// icon.
    #[arg(long, value_name = "ICON")]
    pub icon: Option<String>,

    /// Show a transient toast instead of a full notification.
    #[arg(long, action = ArgAction::SetTrue)]
    pub toast: bool,

    /// Override the configured SDK level.
    #[arg(long, value_name = "LEVEL")]
    pub sdk_level: Option<u32>,

    /// Log every platform call instead of talking to the OS.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Use a JSON layer for logs (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Explicit log filter (e.g. "appnotify=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
