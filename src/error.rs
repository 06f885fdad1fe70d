use std::fmt::{self, Display};
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("missing required configuration field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

/// Icon lookup or decode failure. A missing resource is a packaging bug and
/// is surfaced to the caller instead of being masked by a fallback.
#[derive(Debug, Error)]
pub enum IconError {
    #[error("icon resource not found: {name}")]
    MissingResource { name: String },
    #[error("icon reference has no resource name: {reference:?}")]
    InvalidReference { reference: String },
    #[error("failed to decode bitmap from {path}")]
    DecodeFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode bitmap from resource: {message}")]
    DecodeResource { message: String },
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("notification service rejected channel {id}: {message}")]
    Rejected { id: String, message: String },
    #[error("notification service unavailable")]
    ServiceUnavailable,
}

#[derive(Debug, Error)]
pub enum IntentError {
    #[error("pending intent rejected: {message}")]
    Rejected { message: String },
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to build notification shell: {message}")]
    Shell { message: String },
    #[error("failed to finalize notification: {message}")]
    Finalize { message: String },
    #[error("failed to post notification at slot {slot}: {message}")]
    Post { slot: u32, message: String },
    #[error("failed to show toast: {message}")]
    Toast { message: String },
    #[error("ui context is not running")]
    UiContextClosed,
}

/// Terminal failure of a single `notify()` call, wrapping the error of the
/// stage that produced it. Nothing is retried and nothing is swallowed; the
/// caller renders this however it presents status.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("icon resolution failed")]
    Icon(#[from] IconError),
    #[error("channel registration failed")]
    Channel(#[from] ChannelError),
    #[error("reopen intent construction failed")]
    Intent(#[from] IntentError),
    #[error("notification dispatch failed")]
    Dispatch(#[from] DispatchError),
}

impl NotifyError {
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Icon(_) => Stage::Icons,
            Self::Channel(_) => Stage::Channel,
            Self::Intent(_) => Stage::ReopenIntent,
            Self::Dispatch(DispatchError::Toast { .. }) => Stage::Toast,
            Self::Dispatch(_) => Stage::Submit,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Channel,
    Icons,
    ReopenIntent,
    Submit,
    Toast,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::Icons => "icons",
            Self::ReopenIntent => "reopen-intent",
            Self::Submit => "submit",
            Self::Toast => "toast",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
