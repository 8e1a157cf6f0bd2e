use crate::domain::model::HttpReply;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::io::Read;

/// Byte stream from the relay node plus a query for bytes already buffered at the port.
pub trait SerialLink: Read + Send {
    fn bytes_available(&self) -> Result<u32>;
}

/// Produces at most one decoded line per poll; `Ok(None)` means no data was waiting.
pub trait LineSource: Send {
    fn poll(&mut self) -> Result<Option<String>>;
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpReply>;
}
