//! Protocol definitions for CI-V communication.
//!
//! This module contains the low-level protocol types including:
//! - Frame encoding and terminator-delimited decoding
//! - Command opcodes
//! - Payload encoding and reply parsing

pub mod command;
pub mod frame;
pub mod parser;

pub use command::Command;
pub use frame::{
    ACK, DEFAULT_CONTROLLER_ADDR, DEFAULT_TRANSCEIVER_ADDR, FrameDecoder, HEADER_LEN, NAK,
    PREAMBLE, Preamble, Reply, STANDARD_PREAMBLE_LEN, TERMINATOR, TERMINATOR_LEN,
    encode as encode_frame,
};
pub use parser::{
    FREQUENCY_LEN, LEVEL_LEN, MAX_FREQUENCY_HZ, encode_frequency, encode_level, parse_frequency,
    parse_level, parse_set_status, parse_squelch_status,
};
