// mifi-api: Async Rust client for MiFi router goform control planes

pub mod error;
pub mod format;
pub mod goform;
pub mod session;
pub mod transport;

pub use error::Error;
pub use goform::GoformClient;
pub use goform::models::{ConnectedDevice, DeviceStatus, SmsDirection, SmsMessage, WifiConfig};
pub use session::Session;
pub use transport::{TlsMode, TransportConfig};
