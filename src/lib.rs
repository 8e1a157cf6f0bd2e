pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{CliArgs, RelayConfig};
pub use crate::core::{forwarder::Forwarder, relay::Relay, serial_reader::SerialReader};
pub use utils::error::{RelayError, Result};
