// ── Core error types ──
//
// Two failure families reach callers: fetch failures from a poll and
// write failures from a command. Both keep the adapter error as their
// source so hosts can log the real cause.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Router I/O ───────────────────────────────────────────────────
    /// A poll failed. The previously cached snapshot is untouched.
    #[error("Error communicating with router: {source}")]
    Fetch {
        #[source]
        source: hilink_api::Error,
    },

    /// A settings write or reboot failed. No refresh was triggered.
    #[error("{operation} failed: {source}")]
    Write {
        operation: &'static str,
        #[source]
        source: hilink_api::Error,
    },

    // ── Registry ─────────────────────────────────────────────────────
    #[error("Router already configured: {url}")]
    AlreadyConfigured { url: String },

    #[error("Router not configured: {url}")]
    NotFound { url: String },

    #[error("Coordinator for {url} has been shut down")]
    Stopped { url: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The adapter error behind a fetch or write failure.
    pub fn router_error(&self) -> Option<&hilink_api::Error> {
        match self {
            Self::Fetch { source } | Self::Write { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    pub fn is_write(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}
