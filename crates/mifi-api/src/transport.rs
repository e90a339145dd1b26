// Shared transport configuration for building reqwest::Client instances.
//
// Timeout, TLS, connection-pool, and cookie settings live here so the goform
// client and the liveness probe share one builder.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Error;
use crate::session::Session;

/// TLS verification mode.
///
/// Most devices only serve plain HTTP on the LAN; the few that serve HTTPS
/// use a self-signed certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Accept any certificate (for self-signed device pages).
    #[default]
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Applied to every request, including the probe.
    pub timeout: Duration,
    /// Idle keep-alive connections kept per host.
    pub pool_max_idle_per_host: usize,
    /// How long an idle pooled connection survives.
    pub pool_idle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::default(),
            timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 10,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config, with `session` as its
    /// cookie store.
    pub fn build_client(&self, session: &Session) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(self.pool_idle_timeout)
            .user_agent(concat!("mifimate/", env!("CARGO_PKG_VERSION")))
            .cookie_provider(Arc::new(session.clone()));

        if self.tls == TlsMode::DangerAcceptInvalid {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}
