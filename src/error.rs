//! Error types for the icom-civ library.

use bytes::Bytes;
use thiserror::Error;

/// The main error type for CI-V operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Serial port error.
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame encoding/decoding error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The bus echo did not match the frame that was written.
    ///
    /// Another device transmitted at the same time. The request is aborted
    /// and not retried.
    #[error("bus collision: sent {}, echoed {}", hex::encode(.sent), hex::encode(.echoed))]
    Collision { sent: Bytes, echoed: Bytes },

    /// The transceiver answered with the NG (`0xFA`) status byte.
    #[error("transceiver rejected command {}", hex::encode(.command))]
    Rejected { command: &'static [u8] },

    /// Read timed out waiting for a terminated frame.
    #[error("read timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Connection is not established.
    #[error("not connected")]
    NotConnected,
}

/// Frame-specific errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// Reply frame is too short to strip its envelope.
    #[error("malformed reply: need at least {expected} bytes, got {got}")]
    MalformedReply { expected: usize, got: usize },

    /// A nibble outside 0-9 in BCD data.
    #[error("invalid BCD digit at byte {index}: 0x{byte:02X}")]
    InvalidBcd { index: usize, byte: u8 },

    /// BCD data wider than a `u64` can hold.
    #[error("BCD value too wide: {width} bytes exceeds maximum {max}")]
    BcdTooWide { width: usize, max: usize },
}

/// Result type alias for CI-V operations.
pub type Result<T> = std::result::Result<T, Error>;
