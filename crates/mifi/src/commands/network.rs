//! Mobile data command handlers.

use mifi_core::Controller;

use crate::cli::{GlobalOpts, NetworkArgs, NetworkCommand};
use crate::error::CliError;

pub async fn handle(
    controller: &Controller,
    args: NetworkArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let message = match args.command {
        NetworkCommand::Connect => {
            controller.connect_network().await?;
            "✓ Mobile data connect requested"
        }
        NetworkCommand::Disconnect => {
            controller.disconnect_network().await?;
            "✓ Mobile data disconnect requested"
        }
    };
    if !global.quiet {
        eprintln!("{message}");
    }
    Ok(())
}
