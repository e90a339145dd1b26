//! System command handlers: reachability and power.

use mifi_core::{Controller, CoreError};

use crate::cli::{GlobalOpts, SystemArgs, SystemCommand};
use crate::error::CliError;

use super::util;

/// Unauthenticated probe; never logs in.
pub async fn ping(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let url = controller.config().url.to_string();
    controller
        .ping()
        .await
        .map_err(|e| match e {
            CoreError::Timeout => CliError::Timeout,
            other => CliError::ConnectionFailed {
                url: url.clone(),
                source: Box::new(other),
            },
        })?;
    if !global.quiet {
        println!("{url} is reachable");
    }
    Ok(())
}

pub async fn handle(
    controller: &Controller,
    args: SystemArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        // Dispatched before login.
        SystemCommand::Ping => ping(controller, global).await,

        SystemCommand::Reboot => {
            if !util::confirm("Reboot the router? WiFi clients will drop.", global.yes)? {
                return Err(CliError::NotConfirmed {
                    action: "system reboot".into(),
                });
            }
            controller.reboot().await?;
            if !global.quiet {
                eprintln!("✓ Reboot requested; the router will be back in about a minute");
            }
            Ok(())
        }

        SystemCommand::Shutdown => {
            if !util::confirm(
                "Power off the router? It must be switched on by hand.",
                global.yes,
            )? {
                return Err(CliError::NotConfirmed {
                    action: "system shutdown".into(),
                });
            }
            controller.shutdown().await?;
            if !global.quiet {
                eprintln!("✓ Shutdown requested");
            }
            Ok(())
        }
    }
}
