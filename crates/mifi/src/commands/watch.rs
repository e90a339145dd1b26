//! Watch command: run the poller and stream its events until Ctrl-C.

use owo_colors::OwoColorize;
use tokio::sync::broadcast::error::RecvError;

use mifi_core::format::format_rate;
use mifi_core::{Controller, DeviceStatus, PollEvent, StopReason};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::status::battery_label;

pub async fn handle(
    controller: &Controller,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let mut events = controller.events();
    controller.start_polling();

    if !global.quiet {
        eprintln!(
            "Watching {} every {}s (Ctrl-C to stop)",
            controller.config().url,
            controller.config().poll_interval.as_secs()
        );
    }

    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupted");
                return Ok(());
            }
            event = events.recv() => match event {
                Ok(PollEvent::Stopped(reason)) => return stopped(reason),
                Ok(event) => {
                    if args.sms_only && !matches!(event, PollEvent::NewMessages { .. }) {
                        continue;
                    }
                    if let Some(line) = render(&event, &global.output, color) {
                        output::print_output(&line, global.quiet);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event stream lagged");
                }
                Err(RecvError::Closed) => return Ok(()),
            }
        }
    }
}

fn stopped(reason: StopReason) -> Result<(), CliError> {
    match reason {
        StopReason::Requested => Ok(()),
        StopReason::SessionLost | StopReason::ReconnectFailed => {
            Err(CliError::SessionLost { reason })
        }
    }
}

/// One output line per event. `None` for events this format skips.
fn render(event: &PollEvent, format: &OutputFormat, color: bool) -> Option<String> {
    match format {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            Some(output::render_json(&event_json(event), true))
        }
        OutputFormat::Yaml => Some(format!("---\n{}", output::render_yaml(&event_json(event)))),
        OutputFormat::Table | OutputFormat::Plain => render_line(event, color),
    }
}

fn render_line(event: &PollEvent, color: bool) -> Option<String> {
    let time = chrono::Local::now().format("%H:%M:%S").to_string();
    match event {
        PollEvent::Status(status) => Some(format!("{time}  {}", status_line(status))),
        PollEvent::NewMessages { count, total } => {
            let label = format!("{count} new message(s)");
            let label = if color {
                label.green().bold().to_string()
            } else {
                label
            };
            Some(format!("{time}  {label} ({total} stored)"))
        }
        PollEvent::Messages(_) | PollEvent::Stopped(_) => None,
    }
}

fn status_line(s: &DeviceStatus) -> String {
    format!(
        "{} {}/5  batt {}  clients {}  ↑ {}  ↓ {}",
        if s.network_type.is_empty() { "-" } else { s.network_type.as_str() },
        s.signal_bars,
        battery_label(s),
        s.connected_devices,
        format_rate(s.tx_rate),
        format_rate(s.rx_rate),
    )
}

fn event_json(event: &PollEvent) -> serde_json::Value {
    match event {
        PollEvent::Status(status) => serde_json::json!({
            "event": "status",
            "status": status,
        }),
        PollEvent::Messages(list) => serde_json::json!({
            "event": "messages",
            "messages": list,
        }),
        PollEvent::NewMessages { count, total } => serde_json::json!({
            "event": "new_messages",
            "count": count,
            "total": total,
        }),
        PollEvent::Stopped(reason) => serde_json::json!({
            "event": "stopped",
            "reason": reason.to_string(),
        }),
    }
}
