use thiserror::Error;

#[derive(Error, Debug)]
pub enum DavisError {
    /// Port could not be opened, or a read/write failed at the transport level
    #[error("Link error: {0}")]
    Link(String),

    #[error("Station did not wake up after {attempts} attempts")]
    HandshakeTimeout { attempts: u32 },

    #[error("Frame length mismatch: expected {expected} bytes, received {received}")]
    FrameLengthMismatch { expected: usize, received: usize },

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type DavisResult<T> = std::result::Result<T, DavisError>;
