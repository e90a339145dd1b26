// mifi-core: Session lifecycle and live polling between mifi-api and consumers (CLI).

pub mod config;
pub mod controller;
pub mod error;
pub mod poller;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_URL, DeviceConfig, TlsVerification};
pub use controller::{Controller, DeviceLink, validate_wifi};
pub use error::CoreError;
pub use poller::{PollEvent, PollSource, Poller, PollerState, SmsChange, SmsTracker, StopReason};

// Model types at the crate root for ergonomics.
pub use mifi_api::{ConnectedDevice, DeviceStatus, SmsDirection, SmsMessage, WifiConfig};

// Display helpers for counters and rates.
pub use mifi_api::format;
