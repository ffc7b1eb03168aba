use tracing::debug;

use crate::constants::FRAME_SIZE;
use crate::error::DavisError;
use crate::util::round2;

/// Field offsets into the frame. Byte 0 is the ACK that precedes the LOOP
/// packet, so every offset is one past the packet-relative position.
#[repr(usize)]
pub enum LoopOffset {
    Barometer = 8,
    OutsideTemperature = 13,
    WindSpeed = 15,
    WindDirection = 17,
    OutsideHumidity = 34,
    StormRain = 47,
}

const INHG_TO_HPA: f64 = 33.864;
const MPH_PER_MPS: f64 = 2.237;
const MM_PER_INCH: f64 = 25.4;

/// Exactly `FRAME_SIZE` bytes captured in one read. No checksum is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame(Vec<u8>);

impl RawFrame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn u8_at(&self, offset: LoopOffset) -> u8 {
        self.0[offset as usize]
    }

    fn u16_at(&self, offset: LoopOffset) -> u16 {
        let at = offset as usize;
        u16::from_le_bytes([self.0[at], self.0[at + 1]])
    }
}

impl TryFrom<Vec<u8>> for RawFrame {
    type Error = DavisError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.len() == FRAME_SIZE {
            Ok(RawFrame(bytes))
        } else {
            Err(DavisError::FrameLengthMismatch {
                expected: FRAME_SIZE,
                received: bytes.len(),
            })
        }
    }
}

/// One reading in SI-ish units, every field rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedSample {
    /// °C
    pub temperature: f64,
    /// %
    pub humidity: f64,
    /// hPa
    pub pressure: f64,
    /// m/s
    pub wind_speed: f64,
    /// degrees, as reported
    pub wind_direction: f64,
    /// mm
    pub rainfall: f64,
}

impl DecodedSample {
    pub fn decode(frame: &RawFrame) -> Self {
        let pressure = round2(frame.u16_at(LoopOffset::Barometer) as f64 / 1000.0 * INHG_TO_HPA);
        debug!("getting pressure: {}", pressure);

        let fahrenheit = frame.u16_at(LoopOffset::OutsideTemperature) as f64 / 10.0;
        let temperature = round2((fahrenheit - 32.0) * 5.0 / 9.0);
        debug!("getting temperature: {}", temperature);

        let wind_speed = round2(frame.u8_at(LoopOffset::WindSpeed) as f64 / MPH_PER_MPS);
        debug!("getting windspeed: {}", wind_speed);

        let wind_direction = round2(frame.u16_at(LoopOffset::WindDirection) as f64);
        debug!("getting winddir: {}", wind_direction);

        let humidity = round2(frame.u8_at(LoopOffset::OutsideHumidity) as f64);
        debug!("getting humidity: {}", humidity);

        let rainfall = round2(frame.u16_at(LoopOffset::StormRain) as f64 / 100.0 * MM_PER_INCH);
        debug!("getting rain: {}", rainfall);

        DecodedSample {
            temperature,
            humidity,
            pressure,
            wind_speed,
            wind_direction,
            rainfall,
        }
    }
}
