pub use error::{DavisError, DavisResult};
pub use interface::LinkConfig;
pub use interface::link::SerialLink;
pub use protocols::vantage::loop_packet::{DecodedSample, RawFrame};
pub use protocols::vantage::{Vantage, VantageParams};
pub use sink::{ArchiveRecord, FileSink, SampleSink};

use protocols::StationProtocol;
use tracing::{debug, warn};

pub mod constants;
pub mod cycle;
pub mod error;
pub mod interface;
pub mod protocols;
pub mod sink;
pub(crate) mod util;

pub enum ProtocolType {
    Vantage(VantageParams),
}

/// The acquisition pipeline. Owns the one link to the console; every
/// acquisition runs open, wake-up, request and decode in sequence.
pub struct Station {
    link: SerialLink,
    protocol: Box<dyn StationProtocol>,
}

impl Station {
    pub fn from_protocol(link: SerialLink, protocol: ProtocolType) -> Self {
        let protocol: Box<dyn StationProtocol> = match protocol {
            ProtocolType::Vantage(params) => Box::new(Vantage::new(params)),
        };

        Station { link, protocol }
    }

    /// Vantage console on a real serial port with the stock timings
    pub fn new(config: LinkConfig) -> Self {
        Self::from_protocol(
            SerialLink::new(config),
            ProtocolType::Vantage(VantageParams::default()),
        )
    }

    pub fn link(&self) -> &SerialLink {
        &self.link
    }

    /// Acquire and decode one sample.
    ///
    /// A port that will not open is reported as `Link` without touching the
    /// device. A transport failure mid-exchange closes the link so the next
    /// call reopens it.
    pub fn acquire(&mut self) -> DavisResult<DecodedSample> {
        if !self.link.open() {
            warn!("Serial NOT Ok");
            return Err(DavisError::Link(format!(
                "Could not open serial port {}",
                self.link.config().port
            )));
        }

        let result = self.exchange();
        if let Err(DavisError::Link(e)) = &result {
            warn!("Closing link after transport failure: {}", e);
            self.link.close();
        }
        result
    }

    fn exchange(&mut self) -> DavisResult<DecodedSample> {
        let device = self.link.device()?;
        self.protocol.wake_up(device)?;
        let frame = self.protocol.request_frame(device)?;
        let sample = self.protocol.decode(&frame);
        debug!("Decoded {:?}", sample);
        Ok(sample)
    }

    pub fn close(&mut self) {
        self.link.close();
    }
}
