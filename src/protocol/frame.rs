//! Frame encoding and decoding for the CI-V protocol.
//!
//! The wire format is delimited rather than length-prefixed:
//! ```text
//! ┌──────────────┬──────┬──────┬─────────────┬─────────┬──────┐
//! │  0xFE x N    │  to  │ from │  command    │  data   │ 0xFD │
//! │  N bytes     │  1   │  1   │  1-2 bytes  │ 0..k    │  1   │
//! └──────────────┴──────┴──────┴─────────────┴─────────┴──────┘
//! ```
//!
//! Every byte written to the bus is looped back to the writer, so a single
//! request produces two frames on the read side: the echo, then the reply.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::FrameError;

/// Preamble marker byte.
pub const PREAMBLE: u8 = 0xFE;

/// End-of-message marker. Never appears inside a frame body.
pub const TERMINATOR: u8 = 0xFD;

/// Status byte for an accepted command.
pub const ACK: u8 = 0xFB;

/// Status byte for a rejected command.
pub const NAK: u8 = 0xFA;

/// Preamble length for every command except power-on.
pub const STANDARD_PREAMBLE_LEN: usize = 2;

/// Standard preamble plus the two address bytes.
pub const HEADER_LEN: usize = STANDARD_PREAMBLE_LEN + 2;

/// Length of the end-of-message marker.
pub const TERMINATOR_LEN: usize = 1;

/// Transceiver address used when none is configured.
pub const DEFAULT_TRANSCEIVER_ADDR: u8 = 0x92;

/// Controller address used when none is configured.
pub const DEFAULT_CONTROLLER_ADDR: u8 = 0xE0;

/// Run of preamble bytes that opens a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preamble(usize);

impl Preamble {
    /// The two-byte preamble used by ordinary commands.
    #[must_use]
    pub const fn standard() -> Self {
        Self(STANDARD_PREAMBLE_LEN)
    }

    /// The long preamble that wakes a powered-down transceiver.
    ///
    /// The radio needs enough marker bytes on the line to come out of
    /// standby before the address bytes arrive, so the count scales with the
    /// line speed.
    #[must_use]
    pub const fn wake(baud_rate: u32) -> Self {
        match baud_rate {
            19_200 => Self(27),
            9_600 => Self(14),
            _ => Self(8),
        }
    }

    /// Number of marker bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0
    }

    /// Returns true if there are no marker bytes.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for Preamble {
    fn default() -> Self {
        Self::standard()
    }
}

/// Encodes a command into a complete frame.
///
/// Pure concatenation; command and data bytes are not validated.
#[must_use]
pub fn encode(preamble: Preamble, to: u8, from: u8, command: &[u8], data: &[u8]) -> Bytes {
    let mut buf =
        BytesMut::with_capacity(preamble.len() + 2 + command.len() + data.len() + TERMINATOR_LEN);
    buf.put_bytes(PREAMBLE, preamble.len());
    buf.put_u8(to);
    buf.put_u8(from);
    buf.put_slice(command);
    buf.put_slice(data);
    buf.put_u8(TERMINATOR);
    buf.freeze()
}

/// Splits a byte stream into terminator-delimited frames.
///
/// Bytes after the last terminator stay buffered for the next call.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: BytesMut,
}

impl FrameDecoder {
    /// Creates a new frame decoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    /// Feeds data into the decoder.
    pub fn feed(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Returns the next frame up to and including `delimiter`, or `None` if
    /// no delimiter has arrived yet.
    pub fn decode_until(&mut self, delimiter: u8) -> Option<Bytes> {
        let end = self.buffer.iter().position(|&b| b == delimiter)?;
        Some(self.buffer.split_to(end + 1).freeze())
    }

    /// Returns the number of bytes currently buffered.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Clears the internal buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// A reply frame with its envelope removed.
///
/// Holds `echoed command ∥ reply data`: the standard header and the
/// terminator are gone, the command the transceiver is answering is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    payload: Bytes,
}

impl Reply {
    /// Strips the header and terminator from a received frame.
    pub fn parse(frame: &Bytes) -> Result<Self, FrameError> {
        let min = HEADER_LEN + TERMINATOR_LEN;
        if frame.len() < min {
            return Err(FrameError::MalformedReply {
                expected: min,
                got: frame.len(),
            });
        }

        Ok(Self {
            payload: frame.slice(HEADER_LEN..frame.len() - TERMINATOR_LEN),
        })
    }

    /// The whole stripped payload.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// First payload byte: the echoed opcode, or `ACK`/`NAK` for set commands.
    pub fn status(&self) -> Result<u8, FrameError> {
        self.payload
            .first()
            .copied()
            .ok_or(FrameError::MalformedReply {
                expected: HEADER_LEN + 1 + TERMINATOR_LEN,
                got: HEADER_LEN + TERMINATOR_LEN,
            })
    }

    /// Reply data after skipping the `command_len`-byte echoed opcode.
    pub fn data(&self, command_len: usize) -> Result<&[u8], FrameError> {
        self.payload
            .get(command_len..)
            .ok_or(FrameError::MalformedReply {
                expected: HEADER_LEN + command_len + TERMINATOR_LEN,
                got: HEADER_LEN + self.payload.len() + TERMINATOR_LEN,
            })
    }
}
