pub mod cli;
pub mod toml_config;

pub use cli::CliArgs;
pub use toml_config::RelayFile;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, Validate,
};

#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM5";
#[cfg(not(windows))]
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

pub const DEFAULT_BAUD_RATE: u32 = 115_200;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_MAX_LINE_BYTES: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelayConfig {
    pub serial: SerialSettings,
    pub forward: ForwardSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    pub port: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    pub max_line_bytes: usize,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardSettings {
    /// Skip TLS certificate verification on forwarded requests. Only meant for
    /// the fixed, trusted forward target.
    pub accept_invalid_certs: bool,
    pub request_timeout_secs: Option<u64>,
}

impl Default for ForwardSettings {
    fn default() -> Self {
        Self {
            accept_invalid_certs: true,
            request_timeout_secs: None,
        }
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("serial.port", &self.serial.port)?;
        validate_range("serial.baud_rate", self.serial.baud_rate, 1, 4_000_000)?;
        validate_range("serial.read_timeout_ms", self.serial.read_timeout_ms, 1, 60_000)?;
        validate_positive_number("serial.max_line_bytes", self.serial.max_line_bytes, 1)?;

        if let Some(secs) = self.forward.request_timeout_secs {
            validate_range("forward.request_timeout_secs", secs, 1, 3600)?;
        }

        Ok(())
    }
}
