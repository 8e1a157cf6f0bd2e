// Domain layer: relay models and ports (interfaces) for the serial link and HTTP transport.

pub mod model;
pub mod ports;
