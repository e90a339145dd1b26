//! Status command handler.

use mifi_core::format::{format_bytes, format_rate};
use mifi_core::{Controller, DeviceStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

pub(crate) fn battery_label(s: &DeviceStatus) -> String {
    if !s.battery_reported {
        "unknown".into()
    } else if (0..=100).contains(&s.battery_level) {
        let charging = if s.battery_charging { ", charging" } else { "" };
        format!("{}% ({}{charging})", s.battery_level, s.battery_status())
    } else {
        s.battery_status().into()
    }
}

fn detail(s: &DeviceStatus) -> String {
    [
        format!("Model:       {}", or_dash(&s.model_name)),
        format!("Network:     {} {}", or_dash(&s.network_type), s.network_provider),
        format!(
            "Data:        {}",
            if s.is_data_connected() { "connected" } else { "disconnected" }
        ),
        format!("Signal:      {}/5 ({})", s.signal_bars, s.signal_quality()),
        format!("Battery:     {}", battery_label(s)),
        format!("WAN IP:      {}", or_dash(&s.wan_ip)),
        format!("Clients:     {}", s.connected_devices),
        format!(
            "Throughput:  up {} / down {}",
            format_rate(s.tx_rate),
            format_rate(s.rx_rate)
        ),
        format!(
            "Transfer:    sent {} / received {}",
            format_bytes(s.tx_bytes),
            format_bytes(s.rx_bytes)
        ),
        format!("IMEI:        {}", or_dash(&s.imei)),
        format!("ICCID:       {}", or_dash(&s.iccid)),
        format!("Hardware:    {}", or_dash(&s.hardware_version)),
        format!("Firmware:    {}", or_dash(&s.software_version)),
    ]
    .join("\n")
}

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let status = controller.device_status().await?;
    let out = output::render_single(&global.output, &status, detail, |s| {
        s.network_type.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
