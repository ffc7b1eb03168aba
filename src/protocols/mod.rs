use crate::error::DavisResult;
use crate::interface::DeviceInterface;
pub mod timing;
pub mod vantage;

use vantage::loop_packet::{DecodedSample, RawFrame};

/// One acquisition is wake-up, request, decode. Implementations keep no
/// state between cycles; the device is borrowed for each step.
pub trait StationProtocol {
    /// Bring a sleeping console into a command-ready state
    fn wake_up(&self, device: &mut dyn DeviceInterface) -> DavisResult<()>;

    /// Request one telemetry frame and collect it within the time budget
    fn request_frame(&self, device: &mut dyn DeviceInterface) -> DavisResult<RawFrame>;

    fn decode(&self, frame: &RawFrame) -> DecodedSample;
}
