pub mod forwarder;
pub mod relay;
pub mod serial_reader;

pub use crate::domain::model::{ForwardOutcome, HttpReply, RelayStats};
pub use crate::domain::ports::{HttpTransport, LineSource, SerialLink};
pub use crate::utils::error::Result;
