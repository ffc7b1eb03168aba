use tracing::{debug, warn};

use super::serialport::SerialPortConnector;
use super::{Connector, DeviceInterface, LinkConfig};
use crate::error::{DavisError, DavisResult};

/// Owns at most one open connection for its `LinkConfig`. The connection is
/// created lazily by `open` and released by `close` or on drop.
pub struct SerialLink {
    config: LinkConfig,
    connector: Box<dyn Connector>,
    device: Option<Box<dyn DeviceInterface>>,
}

impl SerialLink {
    pub fn new(config: LinkConfig) -> Self {
        Self::with_connector(config, Box::new(SerialPortConnector))
    }

    pub fn with_connector(config: LinkConfig, connector: Box<dyn Connector>) -> Self {
        SerialLink {
            config,
            connector,
            device: None,
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.device.as_ref().is_some_and(|d| d.is_open())
    }

    /// Open the port unless it already is. Failures are reported as `false`,
    /// the station may simply be unplugged or power cycling.
    pub fn open(&mut self) -> bool {
        if self.is_open() {
            return true;
        }

        debug!("Opening serial port {}", self.config.port);
        match self.connector.connect(&self.config) {
            Ok(device) => {
                let open = device.is_open();
                self.device = Some(device);
                open
            }
            Err(e) => {
                debug!("Could not open serial port: {}", e);
                self.device = None;
                false
            }
        }
    }

    pub fn close(&mut self) {
        if let Some(mut device) = self.device.take() {
            if device.is_open() {
                if let Err(e) = device.close() {
                    warn!("Error while closing serial port: {}", e);
                }
            }
        }
    }

    /// The open device, or a `Link` error when there is none
    pub fn device(&mut self) -> DavisResult<&mut dyn DeviceInterface> {
        match self.device.as_mut() {
            Some(device) if device.is_open() => Ok(&mut **device),
            _ => Err(DavisError::Link(format!(
                "Serial port {} is not open",
                self.config.port
            ))),
        }
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        self.close();
    }
}
