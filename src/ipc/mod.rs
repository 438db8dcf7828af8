//! IPC module for daemon-client communication

mod protocol;
mod server;

pub use protocol::{DeviceStatus, Notification, Request, Response};
pub use server::Server;
