// Data connection and power actions

use tracing::info;

use crate::error::Error;
use crate::goform::client::{GoformClient, SET_CMD_PATH};
use crate::goform::decode::check_result;

impl GoformClient {
    /// Bring the mobile data session up.
    pub async fn connect_network(&self) -> Result<(), Error> {
        self.action("CONNECT_NETWORK", "connect").await
    }

    /// Tear the mobile data session down.
    pub async fn disconnect_network(&self) -> Result<(), Error> {
        self.action("DISCONNECT_NETWORK", "disconnect").await
    }

    /// Reboot the router. The device drops off the network shortly after
    /// answering.
    pub async fn reboot_device(&self) -> Result<(), Error> {
        self.action("REBOOT_DEVICE", "reboot device").await
    }

    /// Power the router off.
    pub async fn shutdown_device(&self) -> Result<(), Error> {
        self.action("POWEROFF_DEVICE", "shut down device").await
    }

    async fn action(&self, goform_id: &str, operation: &'static str) -> Result<(), Error> {
        let resp = self.post(SET_CMD_PATH, &[("goformId", goform_id)]).await?;
        check_result(&resp, operation)?;
        info!(goform_id, "device action accepted");
        Ok(())
    }
}
