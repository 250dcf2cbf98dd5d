use thiserror::Error;

/// Top-level error type for the `hilink-api` crate.
///
/// Covers every failure an adapter can report while opening a session,
/// reading a dataset, or pushing a write. `hilink-core` wraps these into
/// fetch and write failures without flattening the original cause.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, too many attempts, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session token was revoked or timed out on the router.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// Router unreachable (connection refused, DNS failure, reset, etc.)
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured URL does not describe a usable router endpoint.
    #[error("Invalid router target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    /// Operation did not complete in time.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Router ──────────────────────────────────────────────────────
    /// Error envelope returned by the router (`<error><code>..</code>`).
    #[error("Router error {code}: {message}")]
    Router { code: i64, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// A response lacked a field the caller cannot do without.
    #[error("{dataset} response is missing '{field}'")]
    MissingField { dataset: String, field: String },

    /// Response body could not be decoded, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates the credentials or session
    /// were rejected.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::SessionExpired)
    }

    /// Returns `true` if this is a transient error the next poll may clear.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::Timeout { .. } | Self::SessionExpired
        )
    }
}
