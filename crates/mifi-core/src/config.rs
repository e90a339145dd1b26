// ── Runtime device configuration ──
//
// These types describe *how* to talk to one router. They carry credentials
// and tuning but never touch disk; the CLI builds a `DeviceConfig` from its
// profile and hands it in. Read once at construction, never reloaded.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use mifi_api::transport::{TlsMode, TransportConfig};

use crate::error::CoreError;

/// Management address most devices ship with.
pub const DEFAULT_URL: &str = "http://192.168.1.1";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// TLS verification strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Skip verification. Default: device pages are self-signed when they
    /// use TLS at all.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for one router.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Device base URL (e.g., `http://192.168.1.1`).
    pub url: Url,
    /// Sent for parity with the device UI; the firmware checks only the
    /// password.
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Period between poll ticks.
    pub poll_interval: Duration,
    /// Re-login once when a poll tick finds the session gone.
    pub auto_reconnect: bool,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
}

impl DeviceConfig {
    /// Config for the device at `url` with default tuning.
    pub fn new(url: Url, password: SecretString) -> Self {
        let transport = TransportConfig::default();
        Self {
            url,
            username: DEFAULT_USERNAME.into(),
            password,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            auto_reconnect: true,
            pool_max_idle_per_host: transport.pool_max_idle_per_host,
            pool_idle_timeout: transport.pool_idle_timeout,
        }
    }

    /// Reject settings the poller and transport cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.timeout < Duration::from_secs(1) {
            return Err(CoreError::Config {
                message: "timeout must be at least 1 second".into(),
            });
        }
        if self.poll_interval < Duration::from_secs(1) {
            return Err(CoreError::Config {
                message: "poll interval must be at least 1 second".into(),
            });
        }
        if !matches!(self.url.scheme(), "http" | "https") {
            return Err(CoreError::Config {
                message: format!("unsupported URL scheme `{}`", self.url.scheme()),
            });
        }
        Ok(())
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
            pool_max_idle_per_host: self.pool_max_idle_per_host,
            pool_idle_timeout: self.pool_idle_timeout,
        }
    }
}
