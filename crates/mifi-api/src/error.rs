use thiserror::Error;

/// Top-level error type for the `mifi-api` crate.
///
/// Covers every failure mode of the goform control plane: transport,
/// session authentication, and protocol-level rejections. Malformed
/// individual fields are never errors -- the decoders fall back to zero
/// values instead. `mifi-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The device answered with a status outside the accepted range.
    #[error("unexpected HTTP status {status} from {path}")]
    Status { status: u16, path: String },

    /// The body was not a JSON object. Carries the raw body for debugging.
    #[error("invalid JSON response from {path}: {message}")]
    Deserialization {
        path: String,
        message: String,
        body: String,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Authentication ──────────────────────────────────────────────
    /// Login result code `1`.
    #[error("login failed: general failure")]
    LoginFailed,

    /// Login result code `2`: another client already holds the session.
    #[error("login failed: duplicate user (already logged in)")]
    DuplicateSession,

    /// Login result code `3`.
    #[error("login failed: bad password")]
    BadCredentials,

    /// Any other login result code, kept verbatim.
    #[error("login failed: {code}")]
    LoginRejected { code: String },

    // ── Protocol ────────────────────────────────────────────────────
    /// The response lacked the field needed to judge the outcome.
    #[error("unexpected response format: missing `{field}`")]
    ProtocolFormat { field: &'static str },

    /// A write command was rejected. `response` is the device's literal text.
    #[error("failed to {operation}: {response}")]
    CommandFailed {
        operation: &'static str,
        response: String,
    },
}

impl Error {
    /// Returns `true` for the classified login rejections.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::LoginFailed
                | Self::DuplicateSession
                | Self::BadCredentials
                | Self::LoginRejected { .. }
        )
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// The HTTP status attached to this error, if the device answered at all.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
