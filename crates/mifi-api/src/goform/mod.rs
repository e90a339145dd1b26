//! Client for the router's goform control plane.
//!
//! [`GoformClient`] carries the transport; each logical operation lives in
//! its own file as an inherent method.

mod auth;
mod client;
pub mod decode;
mod devices;
pub mod models;
mod sms;
mod status;
mod system;
mod wifi;

pub use auth::classify_login_code;
pub use client::{GET_CMD_PATH, GoformClient, SET_CMD_PATH};
pub use status::STATUS_FIELDS;
