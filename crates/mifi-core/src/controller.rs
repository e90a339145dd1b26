// ── Controller abstraction ──
//
// Lifecycle management for one router: reachability probe, login, the
// background poller, and every device operation with errors folded into
// `CoreError`.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use mifi_api::{ConnectedDevice, DeviceStatus, GoformClient, SmsMessage, WifiConfig};

use crate::config::DeviceConfig;
use crate::error::CoreError;
use crate::poller::{PollEvent, PollSource, Poller, PollerState};

/// Inbox page the poller publishes.
const POLL_SMS_PAGE: u32 = 0;
const POLL_SMS_PER_PAGE: u32 = 50;

const MIN_WPA_PASSWORD_LEN: usize = 8;

// ── DeviceLink ───────────────────────────────────────────────────

/// API client plus the credentials needed to log back in.
#[derive(Clone)]
pub struct DeviceLink {
    client: GoformClient,
    username: String,
    password: SecretString,
}

impl DeviceLink {
    pub fn client(&self) -> &GoformClient {
        &self.client
    }

    async fn login(&self) -> Result<(), CoreError> {
        self.client.login(&self.username, &self.password).await?;
        Ok(())
    }
}

impl PollSource for DeviceLink {
    async fn device_status(&self) -> Result<DeviceStatus, CoreError> {
        Ok(self.client.device_status().await?)
    }

    async fn sms_count(&self) -> Result<u32, CoreError> {
        Ok(self.client.sms_count().await?)
    }

    async fn sms_list(&self) -> Result<Vec<SmsMessage>, CoreError> {
        Ok(self
            .client
            .list_sms(POLL_SMS_PAGE, POLL_SMS_PER_PAGE)
            .await?)
    }

    async fn reauthenticate(&self) -> Result<(), CoreError> {
        self.login().await
    }
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. All clones share one
/// session and one poller.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: DeviceConfig,
    poller: Poller<DeviceLink>,
}

impl Controller {
    /// Build a controller from configuration. Does NOT contact the device;
    /// call [`connect()`](Self::connect) to log in.
    pub fn new(config: DeviceConfig) -> Result<Self, CoreError> {
        config.validate()?;

        let client = GoformClient::new(config.url.clone(), &config.transport())?;
        let link = DeviceLink {
            client,
            username: config.username.clone(),
            password: config.password.clone(),
        };
        let poller = Poller::new(link, config.poll_interval, config.auto_reconnect);

        Ok(Self {
            inner: Arc::new(ControllerInner { config, poller }),
        })
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.inner.config
    }

    fn client(&self) -> &GoformClient {
        self.inner.poller.source().client()
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Probe the device, then log in. Polling is started separately with
    /// [`start_polling()`](Self::start_polling).
    pub async fn connect(&self) -> Result<(), CoreError> {
        let url = self.inner.config.url.to_string();
        self.client()
            .probe()
            .await
            .map_err(|e| match CoreError::from(e) {
                CoreError::Timeout => CoreError::Timeout,
                other => CoreError::ConnectionFailed {
                    url: url.clone(),
                    reason: other.to_string(),
                },
            })?;
        debug!(%url, "device reachable");

        self.inner.poller.source().login().await?;
        info!(%url, "connected to device");
        Ok(())
    }

    /// Stop polling and log out. Never fails; logout is best effort.
    pub async fn disconnect(&self) {
        self.inner.poller.stop();
        self.client().logout().await;
        debug!("disconnected");
    }

    /// Unauthenticated reachability check.
    pub async fn ping(&self) -> Result<(), CoreError> {
        Ok(self.client().probe().await?)
    }

    /// Whether a session token is held locally. Free; says nothing about
    /// whether the device still honors it.
    pub fn has_session(&self) -> bool {
        self.client().session().is_held()
    }

    /// Live session check: a full status fetch.
    pub async fn is_authenticated(&self) -> bool {
        self.client().is_authenticated().await
    }

    // ── Polling ──────────────────────────────────────────────────

    /// Start the background poller. `false` if it was already running.
    pub fn start_polling(&self) -> bool {
        self.inner.poller.start()
    }

    pub fn stop_polling(&self) {
        self.inner.poller.stop();
    }

    pub fn poller_state(&self) -> PollerState {
        self.inner.poller.state()
    }

    pub fn events(&self) -> broadcast::Receiver<PollEvent> {
        self.inner.poller.subscribe()
    }

    pub fn poller_state_watch(&self) -> watch::Receiver<PollerState> {
        self.inner.poller.state_watch()
    }

    pub fn status_watch(&self) -> watch::Receiver<Option<Arc<DeviceStatus>>> {
        self.inner.poller.status_watch()
    }

    pub fn messages_watch(&self) -> watch::Receiver<Arc<Vec<SmsMessage>>> {
        self.inner.poller.messages_watch()
    }

    // ── Device operations ────────────────────────────────────────

    pub async fn device_status(&self) -> Result<DeviceStatus, CoreError> {
        Ok(self.client().device_status().await?)
    }

    pub async fn wifi_config(&self) -> Result<WifiConfig, CoreError> {
        Ok(self.client().wifi_config().await?)
    }

    /// Validate, then write access point settings.
    pub async fn set_wifi_config(&self, config: &WifiConfig) -> Result<(), CoreError> {
        validate_wifi(config)?;
        self.client().set_wifi_config(config).await?;
        info!(ssid = %config.ssid, "WiFi config updated");
        Ok(())
    }

    pub async fn connected_devices(&self) -> Result<Vec<ConnectedDevice>, CoreError> {
        Ok(self.client().connected_devices().await?)
    }

    pub async fn sms_count(&self) -> Result<u32, CoreError> {
        Ok(self.client().sms_count().await?)
    }

    pub async fn list_sms(&self, page: u32, per_page: u32) -> Result<Vec<SmsMessage>, CoreError> {
        Ok(self.client().list_sms(page, per_page).await?)
    }

    pub async fn send_sms(&self, number: &str, text: &str) -> Result<(), CoreError> {
        if number.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "recipient number cannot be empty".into(),
            });
        }
        if text.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "message text cannot be empty".into(),
            });
        }
        Ok(self.client().send_sms(number.trim(), text).await?)
    }

    pub async fn delete_sms(&self, ids: &[String]) -> Result<(), CoreError> {
        if ids.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "no message ids given".into(),
            });
        }
        Ok(self.client().delete_sms(ids).await?)
    }

    pub async fn connect_network(&self) -> Result<(), CoreError> {
        Ok(self.client().connect_network().await?)
    }

    pub async fn disconnect_network(&self) -> Result<(), CoreError> {
        Ok(self.client().disconnect_network().await?)
    }

    pub async fn reboot(&self) -> Result<(), CoreError> {
        self.inner.poller.stop();
        Ok(self.client().reboot_device().await?)
    }

    pub async fn shutdown(&self) -> Result<(), CoreError> {
        self.inner.poller.stop();
        Ok(self.client().shutdown_device().await?)
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// SSID required; WPA modes need a passphrase of at least 8 characters.
pub fn validate_wifi(config: &WifiConfig) -> Result<(), CoreError> {
    if config.ssid.trim().is_empty() {
        return Err(CoreError::ValidationFailed {
            message: "SSID cannot be empty".into(),
        });
    }
    if !config.security_mode.eq_ignore_ascii_case("OPEN")
        && config.password.chars().count() < MIN_WPA_PASSWORD_LEN
    {
        return Err(CoreError::ValidationFailed {
            message: format!(
                "password must be at least {MIN_WPA_PASSWORD_LEN} characters for {}",
                config.security_mode
            ),
        });
    }
    Ok(())
}
