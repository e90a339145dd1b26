// Typed snapshots decoded from goform responses
//
// Every field has a zero value and every snapshot is built fresh per
// response. The device's own field names are noted where they differ.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Live status snapshot of the router.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// Radio access technology (`LTE`, `WCDMA`, ...).
    pub network_type: String,
    /// Operator name as broadcast by the network.
    pub network_provider: String,
    /// PPP/data session state (`ppp_connected`, `ppp_disconnected`, ...).
    pub ppp_status: String,
    /// `signalbar`, 0-5.
    pub signal_bars: u8,
    /// `battery_value`, 0-100. Anything else means unknown.
    pub battery_level: i32,
    /// Whether `battery_value` was present and numeric. Battery-less
    /// dongles omit it, leaving `battery_level` at zero.
    #[serde(default)]
    pub battery_reported: bool,
    pub battery_charging: bool,
    /// `wan_ipaddr`.
    pub wan_ip: String,
    /// `sta_count`.
    pub connected_devices: u32,
    /// `realtime_tx_thrpt`, bytes/sec.
    pub tx_rate: f64,
    /// `realtime_rx_thrpt`, bytes/sec.
    pub rx_rate: f64,
    /// `realtime_tx_bytes`.
    pub tx_bytes: u64,
    /// `realtime_rx_bytes`.
    pub rx_bytes: u64,
    pub imei: String,
    pub iccid: String,
    pub model_name: String,
    pub hardware_version: String,
    pub software_version: String,
}

impl DeviceStatus {
    /// Human label for the signal bar count.
    pub fn signal_quality(&self) -> &'static str {
        match self.signal_bars {
            0 => "No Signal",
            1 => "Very Poor",
            2 => "Poor",
            3 => "Fair",
            4 => "Good",
            5 => "Excellent",
            _ => "Unknown",
        }
    }

    /// Human label for the battery level.
    pub fn battery_status(&self) -> &'static str {
        match self.battery_level {
            level if !(0..=100).contains(&level) => "Unknown",
            0..10 => "Critical",
            10..20 => "Low",
            20..50 => "Medium",
            _ => "Good",
        }
    }

    /// Whether the mobile data session is up.
    pub fn is_data_connected(&self) -> bool {
        self.ppp_status == "ppp_connected"
    }
}

/// WiFi access point settings. Read and write share this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiConfig {
    pub ssid: String,
    pub password: String,
    /// `OPEN`, `WPA2PSK`, `WPA2/WPA3PSK`, ... kept as the device spells it.
    pub security_mode: String,
    /// `hide_ssid`.
    pub hidden: bool,
    /// 0 = auto / leave unchanged.
    pub channel: i32,
    /// `max_client_num`. 0 = unset / leave unchanged.
    pub max_clients: i32,
}

/// Which way an SMS travelled, derived from the device's `tag`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsDirection {
    /// Received (`tag` 0 = read, 1 = unread).
    Inbox,
    /// Sent, failed, or draft (`tag` 2, 3, 4).
    Outbox,
    #[default]
    Unknown,
}

impl SmsDirection {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "0" | "1" => Self::Inbox,
            "2" | "3" | "4" => Self::Outbox,
            _ => Self::Unknown,
        }
    }
}

/// A stored SMS message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub id: String,
    /// Sender (inbox) or recipient (outbox) number.
    pub number: String,
    /// Decoded text, or the raw wire value when it was not valid hex.
    pub content: String,
    /// Device-local time. `None` when the device's date could not be read.
    pub timestamp: Option<NaiveDateTime>,
    /// Raw `tag` value.
    pub status: String,
    pub direction: SmsDirection,
}

impl SmsMessage {
    pub fn is_unread(&self) -> bool {
        self.status == "1"
    }
}

/// A client attached to the router's WiFi.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedDevice {
    pub hostname: String,
    pub ip_address: String,
    pub mac_address: String,
    /// Seconds since association, when the firmware reports it.
    pub connected_time: Option<u64>,
    pub is_blocked: bool,
}
