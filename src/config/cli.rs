use crate::config::{RelayConfig, RelayFile};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "serial-relay")]
#[command(about = "Forward webhook URLs read from a serial relay node over HTTPS")]
pub struct CliArgs {
    #[arg(long, help = "Serial port connected to the relay node")]
    pub port: Option<String>,

    #[arg(long, help = "Baud rate of the relay node")]
    pub baud: Option<u32>,

    #[arg(long)]
    pub read_timeout_ms: Option<u64>,

    #[arg(long)]
    pub max_line_bytes: Option<usize>,

    #[arg(long, help = "Verify TLS certificates of the forward target")]
    pub strict_tls: bool,

    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    #[arg(long, help = "TOML file with [serial] and [forward] overrides")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "List available serial ports and exit")]
    pub list_ports: bool,
}

impl CliArgs {
    /// 合併預設值、設定檔與命令列參數（命令列優先）
    pub fn resolve(&self) -> Result<RelayConfig> {
        let mut config = RelayConfig::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading config file: {}", path.display());
            RelayFile::from_file(path)?.apply(&mut config);
        }

        if let Some(port) = &self.port {
            config.serial.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.serial.baud_rate = baud;
        }
        if let Some(timeout) = self.read_timeout_ms {
            config.serial.read_timeout_ms = timeout;
        }
        if let Some(max) = self.max_line_bytes {
            config.serial.max_line_bytes = max;
        }
        if self.strict_tls {
            config.forward.accept_invalid_certs = false;
        }
        if self.request_timeout_secs.is_some() {
            config.forward.request_timeout_secs = self.request_timeout_secs;
        }

        Ok(config)
    }
}
