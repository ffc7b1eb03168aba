pub mod link;
pub mod serialport;

use std::time::Duration;

use ::serialport::{DataBits, Parity, StopBits};

use crate::constants::DEFAULT_BAUD_RATE;
use crate::error::DavisResult;

pub type ComPort = String;
pub type BaudRate = u32;

/// Physical parameters of the serial link to the console.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkConfig {
    pub port: ComPort,
    pub baud: BaudRate,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub data_bits: DataBits,
    /// Zero means reads return whatever is immediately available
    pub timeout: Duration,
}

impl LinkConfig {
    /// 8N1 with non-blocking reads
    pub fn new(port: impl Into<ComPort>, baud: BaudRate) -> Self {
        LinkConfig {
            port: port.into(),
            baud,
            parity: Parity::None,
            stop_bits: StopBits::One,
            data_bits: DataBits::Eight,
            timeout: Duration::ZERO,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig::new("", DEFAULT_BAUD_RATE)
    }
}

pub trait DeviceInterface {
    /// Whether the underlying connection reports itself open
    fn is_open(&self) -> bool;

    /// Write all bytes to the device
    fn write(&mut self, bytes: &[u8]) -> DavisResult<()>;

    /// Push buffered output to the wire
    fn flush(&mut self) -> DavisResult<()>;

    /// Return up to `max` bytes that are available right now, possibly none
    fn read(&mut self, max: usize) -> DavisResult<Vec<u8>>;

    /// Discard bytes received but not yet read
    fn flush_input(&mut self) -> DavisResult<()>;

    /// Discard bytes written but not yet transmitted
    fn flush_output(&mut self) -> DavisResult<()>;

    /// Release the physical connection
    fn close(&mut self) -> DavisResult<()>;
}

/// Produces a device connection for a given link configuration.
pub trait Connector {
    fn connect(&self, config: &LinkConfig) -> DavisResult<Box<dyn DeviceInterface>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_link_config_is_8n1_non_blocking() {
        let config = LinkConfig::new("/dev/ttyUSB0", 9600);
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.baud, 9600);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.timeout, Duration::ZERO);
    }

    #[test]
    fn default_baud_is_19200() {
        assert_eq!(LinkConfig::default().baud, 19200);
    }
}
