// WiFi access point configuration

use tracing::debug;

use crate::error::Error;
use crate::goform::client::{GET_CMD_PATH, GoformClient, SET_CMD_PATH};
use crate::goform::decode::{Fields, check_result};
use crate::goform::models::WifiConfig;

const WIFI_FIELDS: &str = "wifi_ssid,wifi_password,security_mode,hide_ssid,wifi_channel,max_client_num";

impl GoformClient {
    /// Read the current access point settings.
    pub async fn wifi_config(&self) -> Result<WifiConfig, Error> {
        let map = self
            .get(GET_CMD_PATH, &[("cmd", WIFI_FIELDS), ("multi_data", "1")])
            .await?;

        let f = Fields::new(&map);
        Ok(WifiConfig {
            ssid: f.text("wifi_ssid"),
            password: f.text("wifi_password"),
            security_mode: f.text("security_mode"),
            hidden: f.flag("hide_ssid"),
            channel: f.parse("wifi_channel"),
            max_clients: f.parse("max_client_num"),
        })
    }

    /// Write access point settings.
    ///
    /// `channel` and `max_clients` are only sent when positive; zero or
    /// negative leaves the device's current value in place.
    pub async fn set_wifi_config(&self, config: &WifiConfig) -> Result<(), Error> {
        debug!(ssid = %config.ssid, mode = %config.security_mode, "updating WiFi config");

        let form = wifi_form(config);
        let form: Vec<(&str, &str)> = form.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let resp = self.post(SET_CMD_PATH, &form).await?;
        check_result(&resp, "update WiFi config")
    }
}

pub(crate) fn wifi_form(config: &WifiConfig) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("goformId", "SET_WIFI_SSID_PASSWORD".to_owned()),
        ("wifi_ssid", config.ssid.clone()),
        ("wifi_password", config.password.clone()),
        ("security_mode", config.security_mode.clone()),
        ("hide_ssid", if config.hidden { "1" } else { "0" }.to_owned()),
    ];
    if config.channel > 0 {
        form.push(("wifi_channel", config.channel.to_string()));
    }
    if config.max_clients > 0 {
        form.push(("max_client_num", config.max_clients.to_string()));
    }
    form
}
