//! WiFi command handlers.

use mifi_core::{Controller, WifiConfig};

use crate::cli::{GlobalOpts, WifiArgs, WifiCommand};
use crate::error::CliError;
use crate::output;

const MASK: &str = "********";

fn detail(w: &WifiConfig) -> String {
    let or_auto = |v: i32| if v > 0 { v.to_string() } else { "auto".into() };
    [
        format!("SSID:        {}", w.ssid),
        format!("Security:    {}", w.security_mode),
        format!("Password:    {}", w.password),
        format!("Hidden:      {}", if w.hidden { "yes" } else { "no" }),
        format!("Channel:     {}", or_auto(w.channel)),
        format!("Max clients: {}", or_auto(w.max_clients)),
    ]
    .join("\n")
}

/// Apply only the flags that were given on top of the current settings.
fn merge(
    mut current: WifiConfig,
    ssid: Option<String>,
    password: Option<String>,
    security: Option<String>,
    hidden: Option<bool>,
    channel: Option<i32>,
    max_clients: Option<i32>,
) -> WifiConfig {
    if let Some(ssid) = ssid {
        current.ssid = ssid;
    }
    if let Some(password) = password {
        current.password = password;
    }
    if let Some(security) = security {
        current.security_mode = security;
    }
    if let Some(hidden) = hidden {
        current.hidden = hidden;
    }
    if let Some(channel) = channel {
        current.channel = channel;
    }
    if let Some(max_clients) = max_clients {
        current.max_clients = max_clients;
    }
    current
}

pub async fn handle(
    controller: &Controller,
    args: WifiArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        WifiCommand::Show { reveal } => {
            let mut wifi = controller.wifi_config().await?;
            if !reveal && !wifi.password.is_empty() {
                wifi.password = MASK.into();
            }
            let out = output::render_single(&global.output, &wifi, detail, |w| w.ssid.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WifiCommand::Set {
            ssid,
            password,
            prompt_password,
            security,
            hidden,
            channel,
            max_clients,
        } => {
            let password = if prompt_password {
                Some(
                    rpassword::prompt_password("New WiFi password: ").map_err(|e| {
                        CliError::Validation {
                            field: "password".into(),
                            reason: format!("prompt failed: {e}"),
                        }
                    })?,
                )
            } else {
                password
            };

            if ssid.is_none()
                && password.is_none()
                && security.is_none()
                && hidden.is_none()
                && channel.is_none()
                && max_clients.is_none()
            {
                return Err(CliError::Validation {
                    field: "wifi".into(),
                    reason: "nothing to change; pass at least one setting".into(),
                });
            }

            let current = controller.wifi_config().await?;
            let updated = merge(current, ssid, password, security, hidden, channel, max_clients);
            controller.set_wifi_config(&updated).await?;

            if !global.quiet {
                eprintln!("✓ WiFi settings updated (SSID '{}')", updated.ssid);
                eprintln!("  Clients on the old settings will need to reconnect.");
            }
            Ok(())
        }
    }
}
