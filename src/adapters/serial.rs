use crate::config::SerialSettings;
use crate::domain::ports::SerialLink;
use crate::utils::error::{RelayError, Result};
use serialport::SerialPort;
use std::io::Read;
use std::time::Duration;

/// 實體序列埠，程序存活期間只開啟一次，drop 時關閉
pub struct SerialPortLink {
    port: Box<dyn SerialPort>,
}

impl SerialPortLink {
    pub fn open(settings: &SerialSettings) -> Result<Self> {
        tracing::debug!(
            "Opening serial port {} at {} baud (timeout {} ms)",
            settings.port,
            settings.baud_rate,
            settings.read_timeout_ms
        );

        let port = serialport::new(settings.port.as_str(), settings.baud_rate)
            .timeout(Duration::from_millis(settings.read_timeout_ms))
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .flow_control(serialport::FlowControl::None)
            .open()
            .map_err(|source| RelayError::SerialOpenError {
                port: settings.port.clone(),
                source,
            })?;

        Ok(Self { port })
    }
}

impl Read for SerialPortLink {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.port.read(buf)
    }
}

impl SerialLink for SerialPortLink {
    fn bytes_available(&self) -> Result<u32> {
        Ok(self.port.bytes_to_read()?)
    }
}

/// 列出系統上可用的序列埠名稱
pub fn list_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports()?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}
