// Device status and identity

use tracing::debug;

use crate::error::Error;
use crate::goform::client::{GET_CMD_PATH, GoformClient};
use crate::goform::decode::Fields;
use crate::goform::models::DeviceStatus;

/// Fields requested for a status snapshot in one round trip.
pub const STATUS_FIELDS: &[&str] = &[
    "modem_main_state",
    "pin_status",
    "network_type",
    "signalbar",
    "battery_value",
    "battery_charging",
    "wifi_status",
    "ssid1",
    "station_mac",
    "network_provider",
    "wan_ipaddr",
    "wan_apn",
    "ppp_status",
    "realtime_tx_bytes",
    "realtime_rx_bytes",
    "realtime_time",
    "realtime_tx_thrpt",
    "realtime_rx_thrpt",
    "sta_count",
    "imei",
    "iccid",
    "model_name",
    "hardware_version",
    "software_version",
];

impl GoformClient {
    /// Fetch a live status snapshot.
    ///
    /// Only transport failures are errors. Fields the firmware omits or
    /// garbles come back as zero values.
    pub async fn device_status(&self) -> Result<DeviceStatus, Error> {
        let cmd = STATUS_FIELDS.join(",");
        let map = self
            .get(
                GET_CMD_PATH,
                &[("cmd", &cmd), ("multi_data", "1"), ("isTest", "false")],
            )
            .await?;

        let status = decode_status(Fields::new(&map));
        debug!(
            network = %status.network_type,
            bars = status.signal_bars,
            stations = status.connected_devices,
            "device status"
        );
        Ok(status)
    }
}

pub(crate) fn decode_status(f: Fields<'_>) -> DeviceStatus {
    let battery = f.opt_parse::<i32>("battery_value");
    DeviceStatus {
        network_type: f.text("network_type"),
        network_provider: f.text("network_provider"),
        ppp_status: f.text("ppp_status"),
        signal_bars: f.parse("signalbar"),
        battery_level: battery.unwrap_or_default(),
        battery_reported: battery.is_some(),
        battery_charging: f.flag("battery_charging"),
        wan_ip: f.text("wan_ipaddr"),
        connected_devices: f.parse("sta_count"),
        tx_rate: f.parse("realtime_tx_thrpt"),
        rx_rate: f.parse("realtime_rx_thrpt"),
        tx_bytes: f.parse("realtime_tx_bytes"),
        rx_bytes: f.parse("realtime_rx_bytes"),
        imei: f.text("imei"),
        iccid: f.text("iccid"),
        model_name: f.text("model_name"),
        hardware_version: f.text("hardware_version"),
        software_version: f.text("software_version"),
    }
}
