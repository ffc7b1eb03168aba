pub mod loop_packet;

use std::thread;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use super::StationProtocol;
use super::timing::{AcquirePolicy, RetryPolicy};
use crate::constants::{FRAME_SIZE, LOOP_COMMAND, WAKE_ACK, WAKE_READ_CHUNK, WAKE_REQUEST};
use crate::error::{DavisError, DavisResult};
use crate::interface::DeviceInterface;
use loop_packet::{DecodedSample, RawFrame};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VantageParams {
    pub wake_up: RetryPolicy,
    pub acquire: AcquirePolicy,
}

/// Davis Vantage console speaking the serial LOOP protocol
pub struct Vantage {
    params: VantageParams,
}

impl Vantage {
    pub fn new(params: VantageParams) -> Self {
        Vantage { params }
    }

    /// One attempt: send a line feed and poll until the console echoes one
    /// back or the attempt deadline passes.
    fn wake_attempt(&self, device: &mut dyn DeviceInterface) -> DavisResult<bool> {
        let policy = &self.params.wake_up;

        device.write(WAKE_REQUEST)?;
        device.flush()?;

        let deadline = Instant::now() + policy.attempt_timeout;
        let mut response: Vec<u8> = Vec::new();
        loop {
            let fresh_bytes = device.read(WAKE_READ_CHUNK)?;
            if fresh_bytes.is_empty() {
                if Instant::now() > deadline {
                    return Ok(false);
                }
                thread::sleep(policy.poll_interval);
                continue;
            }

            response.extend(fresh_bytes);
            if response.contains(&WAKE_ACK) {
                trace!("Response RX {:?}", response);
                return Ok(true);
            }
            if Instant::now() > deadline {
                return Ok(false);
            }
        }
    }
}

impl StationProtocol for Vantage {
    fn wake_up(&self, device: &mut dyn DeviceInterface) -> DavisResult<()> {
        let policy = &self.params.wake_up;
        debug!("Waking up console");

        for attempt in 1..=policy.max_attempts {
            if self.wake_attempt(device)? {
                debug!("Console awake after {} attempt(s)", attempt);
                return Ok(());
            }

            warn!("Serial timeout, attempt {}/{}", attempt, policy.max_attempts);
            if attempt < policy.max_attempts {
                thread::sleep(policy.retry_delay);
            }
        }

        warn!("Console does not respond");
        Err(DavisError::HandshakeTimeout {
            attempts: policy.max_attempts,
        })
    }

    fn request_frame(&self, device: &mut dyn DeviceInterface) -> DavisResult<RawFrame> {
        let policy = &self.params.acquire;

        // Stale bytes from the wake-up would corrupt the frame
        device.flush_input()?;
        device.flush_output()?;

        debug!("Sending serial command TX: {:?}", String::from_utf8_lossy(LOOP_COMMAND));
        device.write(LOOP_COMMAND)?;
        device.flush()?;
        thread::sleep(policy.settle);

        debug!("Reading data ...");
        let deadline = Instant::now() + policy.budget;
        let mut received = 0;
        loop {
            let raw_data = device.read(policy.read_chunk)?;
            if !raw_data.is_empty() {
                received = raw_data.len();
            }
            if raw_data.len() == FRAME_SIZE {
                info!("Received frame of {} bytes", FRAME_SIZE);
                return RawFrame::try_from(raw_data);
            }
            if !raw_data.is_empty() {
                debug!("Discarding read of {} bytes", raw_data.len());
            }

            if Instant::now() > deadline {
                debug!("Timeout!");
                return Err(DavisError::FrameLengthMismatch {
                    expected: FRAME_SIZE,
                    received,
                });
            }

            thread::sleep(policy.poll_interval);
        }
    }

    fn decode(&self, frame: &RawFrame) -> DecodedSample {
        DecodedSample::decode(frame)
    }
}
