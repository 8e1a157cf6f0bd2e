use crate::domain::ports::{LineSource, SerialLink};
use crate::utils::error::Result;
use std::io::ErrorKind;

/// Reads newline-terminated text lines from a [`SerialLink`].
///
/// A poll returns `None` when nothing is buffered at the port. Otherwise it reads
/// up to and including the next `\n`. A read timeout, end of stream or the
/// `max_line_bytes` cap ends the line early and whatever was read is returned
/// as-is; partial lines are not reassembled across polls.
pub struct SerialReader<L: SerialLink> {
    link: L,
    max_line_bytes: usize,
}

impl<L: SerialLink> SerialReader<L> {
    pub fn new(link: L, max_line_bytes: usize) -> Self {
        Self {
            link,
            max_line_bytes,
        }
    }

    fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        while line.len() < self.max_line_bytes {
            match self.link.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    line.push(byte[0]);
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::TimedOut => {
                    tracing::debug!("Serial read timed out after {} bytes", line.len());
                    break;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(line)
    }
}

impl<L: SerialLink> LineSource for SerialReader<L> {
    fn poll(&mut self) -> Result<Option<String>> {
        if self.link.bytes_available()? == 0 {
            return Ok(None);
        }

        let raw = self.read_line()?;
        Ok(Some(decode_lenient(&raw).trim().to_string()))
    }
}

/// Decodes UTF-8, silently dropping every invalid byte sequence.
pub fn decode_lenient(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
