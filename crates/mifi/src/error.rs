//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use mifi_config::ConfigError;
use mifi_core::{CoreError, StopReason};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to device at {url}")]
    #[diagnostic(
        code(mifi::connection_failed),
        help(
            "Check that you are on the router's WiFi and the address is right.\n\
             URL: {url}\n\
             Try: mifi system ping --host <address>"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(mifi::timeout),
        help("Increase timeout with --timeout or check that the router is awake.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(mifi::auth_failed),
        help(
            "Verify the admin password.\n\
             Run: mifi config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("The device already has an active session")]
    #[diagnostic(
        code(mifi::session_in_use),
        help("Log out of the router's web UI (or wait for it to time out), then retry.")
    )]
    SessionInUse,

    #[error("Lost the device session ({reason})")]
    #[diagnostic(
        code(mifi::session_lost),
        help("Another client may have logged in. Enable auto_reconnect in the profile to retry once.")
    )]
    SessionLost { reason: StopReason },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(mifi::no_credentials),
        help(
            "Configure credentials with: mifi config init\n\
             Or set the MIFI_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Device rejected the request: {message}")]
    #[diagnostic(code(mifi::rejected))]
    Rejected { message: String },

    #[error("API error: {message}")]
    #[diagnostic(code(mifi::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mifi::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(mifi::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: mifi config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No device configured")]
    #[diagnostic(
        code(mifi::no_config),
        help(
            "Create a profile with: mifi config init\n\
             Or pass --host (MIFI_HOST) and set MIFI_PASSWORD.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(mifi::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' was not confirmed")]
    #[diagnostic(
        code(mifi::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NotConfirmed { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. }
            | Self::SessionInUse
            | Self::SessionLost { .. }
            | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NotConfirmed { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Timeout => CliError::Timeout,
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },
            CoreError::SessionInUse => CliError::SessionInUse,
            CoreError::Rejected { message } => CliError::Rejected { message },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Protocol { message } | CoreError::Api { message, .. } => {
                CliError::ApiError { message }
            }
            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
