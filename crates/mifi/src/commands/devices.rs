//! Connected-device command handler.

use std::time::Duration;

use tabled::Tabled;

use mifi_core::format::format_duration;
use mifi_core::{ConnectedDevice, Controller};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Connected")]
    connected: String,
    #[tabled(rename = "Blocked")]
    blocked: String,
}

impl From<&ConnectedDevice> for DeviceRow {
    fn from(d: &ConnectedDevice) -> Self {
        Self {
            hostname: if d.hostname.is_empty() {
                "-".into()
            } else {
                d.hostname.clone()
            },
            ip: d.ip_address.clone(),
            mac: d.mac_address.clone(),
            connected: d
                .connected_time
                .map_or_else(|| "-".into(), |s| format_duration(Duration::from_secs(s))),
            blocked: if d.is_blocked { "yes" } else { "no" }.into(),
        }
    }
}

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let devices = controller.connected_devices().await?;
    if devices.is_empty() && matches!(global.output, OutputFormat::Table) {
        if !global.quiet {
            eprintln!("No clients connected.");
        }
        return Ok(());
    }
    let out = output::render_list(
        &global.output,
        &devices,
        |d| DeviceRow::from(d),
        |d| d.mac_address.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
