pub const DEFAULT_BAUD_RATE: u32 = 19200;

pub(crate) const WAKE_REQUEST: &[u8] = b"\n";
pub(crate) const WAKE_ACK: u8 = b'\n';
pub(crate) const LOOP_COMMAND: &[u8] = b"LOOP 1\n";

pub(crate) const WAKE_ATTEMPTS: u32 = 3;
pub(crate) const WAKE_ATTEMPT_TIMEOUT_MS: u64 = 1000;
pub(crate) const WAKE_RETRY_DELAY_MS: u64 = 500;
pub(crate) const WAKE_POLL_INTERVAL_MS: u64 = 10;
pub(crate) const WAKE_READ_CHUNK: usize = 32;

pub(crate) const LOOP_SETTLE_MS: u64 = 1500;
pub(crate) const LOOP_BUDGET_MS: u64 = 3000;
pub(crate) const LOOP_POLL_INTERVAL_MS: u64 = 100;
pub(crate) const LOOP_READ_CHUNK: usize = 200;

/// ACK byte plus the 99-byte LOOP packet
pub const FRAME_SIZE: usize = 100;

pub(crate) const NO_DATA_BACKOFF_SECS: u64 = 5;
pub(crate) const LINK_BACKOFF_SECS: u64 = 30;
pub(crate) const POLL_CADENCE_SECS: u64 = 5;
