// ── Core error types ──
//
// User-facing errors from mifi-core. Consumers never match on HTTP
// statuses or JSON failures directly; the `From<mifi_api::Error>` impl
// folds transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach device at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Device request timed out")]
    Timeout,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Another client (usually the web UI) holds the device's only session.
    #[error("Device already has an active session")]
    SessionInUse,

    // ── Operation errors ─────────────────────────────────────────────
    /// The device rejected a write; `message` is its literal answer.
    #[error("Operation rejected by device: {message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// The device answered in a shape this client cannot judge.
    #[error("Unexpected response from device: {message}")]
    Protocol { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if the device answered).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether the device turned the credentials (or the session) away.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. } | Self::SessionInUse)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<mifi_api::Error> for CoreError {
    fn from(err: mifi_api::Error) -> Self {
        use mifi_api::Error as Api;

        if err.is_timeout() {
            return CoreError::Timeout;
        }
        let status = err.http_status();

        match err {
            Api::Transport(e) if e.is_connect() => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            Api::Transport(e) => CoreError::Api {
                status,
                message: e.to_string(),
            },
            Api::Status { status, path } => CoreError::Api {
                message: format!("HTTP {status} from {path}"),
                status: Some(status),
            },
            Api::Deserialization { path, message, .. } => CoreError::Protocol {
                message: format!("{path}: {message}"),
            },
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::ClientBuild(message) => CoreError::Config { message },
            Api::DuplicateSession => CoreError::SessionInUse,
            e @ (Api::LoginFailed | Api::BadCredentials | Api::LoginRejected { .. }) => {
                CoreError::AuthenticationFailed {
                    message: e.to_string(),
                }
            }
            e @ Api::ProtocolFormat { .. } => CoreError::Protocol {
                message: e.to_string(),
            },
            Api::CommandFailed {
                operation,
                response,
            } => CoreError::Rejected {
                message: format!("{operation}: {response}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_codes_become_auth_errors() {
        let err = CoreError::from(mifi_api::Error::BadCredentials);
        assert!(err.is_auth());
        assert!(err.to_string().contains("bad password"));

        assert!(matches!(
            CoreError::from(mifi_api::Error::DuplicateSession),
            CoreError::SessionInUse
        ));
    }

    #[test]
    fn command_failure_keeps_device_text() {
        let err = CoreError::from(mifi_api::Error::CommandFailed {
            operation: "send SMS",
            response: "failure".into(),
        });
        assert_eq!(err.to_string(), "Operation rejected by device: send SMS: failure");
    }
}
