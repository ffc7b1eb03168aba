use tracing::{debug, trace};

use super::{Connector, DeviceInterface, LinkConfig};
use crate::error::{DavisError, DavisResult};
use std::io::{Read, Write};

use serialport::{ClearBuffer, SerialPort, SerialPortType};

/// Serial port device_interface layer
pub struct SerialPortDevice {
    serial_port: Option<Box<dyn SerialPort>>,
}

impl SerialPortDevice {
    pub fn open(config: &LinkConfig) -> DavisResult<SerialPortDevice> {
        let serial_port = serialport::new(config.port.as_str(), config.baud)
            .parity(config.parity)
            .stop_bits(config.stop_bits)
            .data_bits(config.data_bits)
            .timeout(config.timeout)
            .open()
            .map_err(|e| DavisError::Link(format!("Failed to open {}: {}", config.port, e)))?;

        debug!("Serial port {} open at {} baud", config.port, config.baud);
        Ok(SerialPortDevice {
            serial_port: Some(serial_port),
        })
    }

    fn port(&mut self) -> DavisResult<&mut Box<dyn SerialPort>> {
        self.serial_port
            .as_mut()
            .ok_or_else(|| DavisError::Link("Serial port is closed".to_string()))
    }
}

impl DeviceInterface for SerialPortDevice {
    fn is_open(&self) -> bool {
        self.serial_port.is_some()
    }

    fn write(&mut self, bytes: &[u8]) -> DavisResult<()> {
        self.port()?
            .write_all(bytes)
            .map_err(|e| DavisError::Link(format!("{:?}", e)))?;
        trace!("Sent bytes {:?}", bytes);
        Ok(())
    }

    fn flush(&mut self) -> DavisResult<()> {
        self.port()?
            .flush()
            .map_err(|e| DavisError::Link(format!("Failed to flush output, {}", e)))
    }

    fn read(&mut self, max: usize) -> DavisResult<Vec<u8>> {
        let port = self.port()?;
        let available = port
            .bytes_to_read()
            .map_err(|e| DavisError::Link(format!("{:?}", e)))? as usize;
        if available == 0 {
            return Ok(Vec::new());
        }

        let mut buffer = vec![0; available.min(max)];
        let size = port
            .read(&mut buffer)
            // Timeout error is fine, just continue
            .or_else(|e| {
                if e.kind() == std::io::ErrorKind::TimedOut {
                    Ok(0)
                } else {
                    Err(e)
                }
            })
            .map_err(|e| DavisError::Link(format!("{:?}", e)))?;

        buffer.truncate(size);
        trace!("Received bytes {:?}", buffer);
        Ok(buffer)
    }

    fn flush_input(&mut self) -> DavisResult<()> {
        self.port()?
            .clear(ClearBuffer::Input)
            .map_err(|e| DavisError::Link(format!("Failed to clear input buffer, {}", e)))
    }

    fn flush_output(&mut self) -> DavisResult<()> {
        self.port()?
            .clear(ClearBuffer::Output)
            .map_err(|e| DavisError::Link(format!("Failed to clear output buffer, {}", e)))
    }

    fn close(&mut self) -> DavisResult<()> {
        // Dropping the handle closes the port
        if self.serial_port.take().is_some() {
            debug!("Serial closed");
        }
        Ok(())
    }
}

/// Opens real serial ports through the `serialport` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialPortConnector;

impl Connector for SerialPortConnector {
    fn connect(&self, config: &LinkConfig) -> DavisResult<Box<dyn DeviceInterface>> {
        Ok(Box::new(SerialPortDevice::open(config)?))
    }
}

/// A serial port visible on this machine
#[derive(Debug, Clone)]
pub struct PortListing {
    pub name: String,
    pub description: Option<String>,
}

/// Enumerate serial ports, USB ports annotated with manufacturer/product
pub fn available_ports() -> DavisResult<Vec<PortListing>> {
    let ports = serialport::available_ports()
        .map_err(|e| DavisError::Link(format!("Failed to list ports: {}", e)))?;

    Ok(ports
        .into_iter()
        .map(|p| {
            let description = match p.port_type {
                SerialPortType::UsbPort(info) => Some(format!(
                    "USB {:04x}:{:04x} {} {}",
                    info.vid,
                    info.pid,
                    info.manufacturer.unwrap_or_default(),
                    info.product.unwrap_or_default()
                )),
                SerialPortType::BluetoothPort => Some("Bluetooth".to_string()),
                SerialPortType::PciPort => Some("PCI".to_string()),
                _ => None,
            };
            PortListing {
                name: p.port_name,
                description,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_a_missing_port_is_a_link_error() {
        let config = LinkConfig::new("/dev/davislink-does-not-exist", 19200);
        match SerialPortConnector.connect(&config) {
            Err(DavisError::Link(msg)) => assert!(msg.contains("davislink-does-not-exist")),
            Err(e) => panic!("unexpected error {:?}", e),
            Ok(_) => panic!("port should not open"),
        }
    }
}
