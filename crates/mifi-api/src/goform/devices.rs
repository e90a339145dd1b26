// Connected WiFi stations

use crate::error::Error;
use crate::goform::client::{GET_CMD_PATH, GoformClient};
use crate::goform::decode::Fields;
use crate::goform::models::ConnectedDevice;

impl GoformClient {
    /// List stations attached to the access point.
    ///
    /// A missing `station_list` is an empty list, not an error.
    pub async fn connected_devices(&self) -> Result<Vec<ConnectedDevice>, Error> {
        let map = self.get(GET_CMD_PATH, &[("cmd", "station_list")]).await?;

        Ok(Fields::new(&map)
            .objects("station_list")
            .into_iter()
            .map(decode_station)
            .collect())
    }
}

fn decode_station(f: Fields<'_>) -> ConnectedDevice {
    ConnectedDevice {
        hostname: f.text("hostname"),
        ip_address: f.text("ipaddress"),
        mac_address: f.text("macaddress"),
        connected_time: f.opt_parse("connected_time"),
        is_blocked: f.flag("is_blocked"),
    }
}
