//! Command handlers, one module per top-level subcommand.

pub mod config_cmd;
pub mod devices;
pub mod network;
pub mod sms;
pub mod status;
pub mod system;
pub mod util;
pub mod watch;
pub mod wifi;

use mifi_core::Controller;

use crate::cli::{Command, GlobalOpts, SystemCommand};
use crate::error::CliError;

/// Run a device command. Everything except `system ping` logs in first and
/// logs out afterwards, whether or not the command succeeded.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Command::System(ref args) = cmd {
        if matches!(args.command, SystemCommand::Ping) {
            return system::ping(controller, global).await;
        }
    }

    controller.connect().await?;
    let result = run(cmd, controller, global).await;
    controller.disconnect().await;
    result
}

async fn run(cmd: Command, controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(controller, global).await,
        Command::Wifi(args) => wifi::handle(controller, args, global).await,
        Command::Devices => devices::handle(controller, global).await,
        Command::Sms(args) => sms::handle(controller, args, global).await,
        Command::Network(args) => network::handle(controller, args, global).await,
        Command::System(args) => system::handle(controller, args, global).await,
        Command::Watch(args) => watch::handle(controller, args, global).await,
        Command::Config(_) | Command::Completions(_) => unreachable!("handled before dispatch"),
    }
}
