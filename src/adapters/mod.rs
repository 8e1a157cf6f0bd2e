// Adapters layer: concrete implementations of the domain ports (serial port, HTTP client).

pub mod http;
pub mod serial;
