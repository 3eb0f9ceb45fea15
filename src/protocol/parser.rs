//! Payload encoding and reply decoding for the typed operations.
//!
//! Frequencies travel as five BCD bytes with the least significant digit pair
//! first, the reverse of [`crate::bcd`]'s order. Levels travel as two BCD
//! bytes, most significant first.

use crate::bcd;
use crate::error::{Error, FrameError, Result};
use crate::protocol::command::Command;
use crate::protocol::frame::{HEADER_LEN, NAK, Reply, TERMINATOR_LEN};
use crate::types::SquelchStatus;

/// Frequency payload width in bytes (ten digits).
pub const FREQUENCY_LEN: usize = 5;

/// Level payload width in bytes (four digits).
pub const LEVEL_LEN: usize = 2;

/// Largest frequency that fits in [`FREQUENCY_LEN`] bytes.
pub const MAX_FREQUENCY_HZ: u64 = 9_999_999_999;

/// Ensures `data` has at least `needed` bytes after a `command_len` opcode.
fn require(data: &[u8], needed: usize, command_len: usize) -> Result<()> {
    if data.len() < needed {
        return Err(Error::Frame(FrameError::MalformedReply {
            expected: HEADER_LEN + command_len + needed + TERMINATOR_LEN,
            got: HEADER_LEN + command_len + data.len() + TERMINATOR_LEN,
        }));
    }
    Ok(())
}

/// Encodes a frequency in Hz as the wire payload.
///
/// Digits above the tenth are dropped.
#[must_use]
pub fn encode_frequency(hz: u64) -> [u8; FREQUENCY_LEN] {
    let mut out = [0u8; FREQUENCY_LEN];
    for (dst, src) in out.iter_mut().zip(bcd::encode(hz, FREQUENCY_LEN).iter().rev()) {
        *dst = *src;
    }
    out
}

/// Parses a frequency reply, given the data after the echoed opcode.
pub fn parse_frequency(data: &[u8]) -> Result<u64> {
    require(data, FREQUENCY_LEN, Command::ReadFrequency.len())?;

    let mut digits = [0u8; FREQUENCY_LEN];
    for (dst, src) in digits.iter_mut().zip(data[..FREQUENCY_LEN].iter().rev()) {
        *dst = *src;
    }
    Ok(bcd::decode(&digits)?)
}

/// Encodes a 0-255 level as the wire payload.
#[must_use]
pub fn encode_level(level: u8) -> [u8; LEVEL_LEN] {
    let bcd = bcd::encode(u64::from(level), LEVEL_LEN);
    [bcd[0], bcd[1]]
}

/// Parses a level reply, given the data after the echoed opcode.
///
/// The four-digit value is narrowed to 8 bits; the radio reports 0-255.
pub fn parse_level(data: &[u8]) -> Result<u8> {
    require(data, LEVEL_LEN, Command::AudioLevel.len())?;
    let value = bcd::decode(&data[..LEVEL_LEN])?;
    Ok(value as u8)
}

/// Parses a squelch status reply, given the data after the echoed opcode.
pub fn parse_squelch_status(data: &[u8]) -> Result<SquelchStatus> {
    require(data, 1, Command::SquelchStatus.len())?;
    Ok(SquelchStatus::from(data[0]))
}

/// Checks the status byte of a reply to a set command.
///
/// Only `NAK` is an error. `ACK` and anything unrecognised count as accepted.
pub fn parse_set_status(reply: &Reply, command: Command) -> Result<()> {
    if reply.status()? == NAK {
        return Err(Error::Rejected {
            command: command.opcode(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::protocol::frame::ACK;

    #[test]
    fn test_encode_frequency_wire_order() {
        assert_eq!(
            encode_frequency(119_000_000),
            [0x00, 0x00, 0x00, 0x19, 0x01]
        );
        assert_eq!(
            encode_frequency(14_250_000),
            [0x00, 0x00, 0x25, 0x14, 0x00]
        );
    }

    #[test]
    fn test_encode_frequency_truncates() {
        assert_eq!(
            encode_frequency(MAX_FREQUENCY_HZ + 1 + 118_000_000),
            encode_frequency(118_000_000)
        );
    }

    #[test]
    fn test_parse_frequency() {
        assert_eq!(
            parse_frequency(&[0x00, 0x00, 0x00, 0x19, 0x01]).unwrap(),
            119_000_000
        );
        assert_eq!(
            parse_frequency(&[0x50, 0x62, 0x13, 0x12, 0x01]).unwrap(),
            112_136_250
        );
    }

    #[test]
    fn test_frequency_round_trip() {
        let samples = [
            0,
            1,
            9,
            10,
            99,
            100,
            118_000_000,
            118_008_330,
            136_975_000,
            1_234_567_890,
            MAX_FREQUENCY_HZ,
        ];
        for hz in samples {
            assert_eq!(parse_frequency(&encode_frequency(hz)).unwrap(), hz);
        }

        let mut hz = 7;
        while hz < MAX_FREQUENCY_HZ {
            assert_eq!(parse_frequency(&encode_frequency(hz)).unwrap(), hz);
            hz = hz * 3 + 1;
        }
    }

    #[test]
    fn test_parse_frequency_short() {
        let err = parse_frequency(&[0x00, 0x00, 0x19]).unwrap_err();
        assert!(matches!(
            err,
            Error::Frame(FrameError::MalformedReply {
                expected: 11,
                got: 9
            })
        ));
    }

    #[test]
    fn test_parse_frequency_bad_digit() {
        let err = parse_frequency(&[0x00, 0x00, 0x0F, 0x19, 0x01]).unwrap_err();
        assert!(matches!(
            err,
            Error::Frame(FrameError::InvalidBcd { .. })
        ));
    }

    #[test]
    fn test_level_encoding() {
        assert_eq!(encode_level(0), [0x00, 0x00]);
        assert_eq!(encode_level(100), [0x01, 0x00]);
        assert_eq!(encode_level(255), [0x02, 0x55]);
    }

    #[test]
    fn test_level_round_trip() {
        for level in 0..=u8::MAX {
            assert_eq!(parse_level(&encode_level(level)).unwrap(), level);
        }
    }

    #[test]
    fn test_parse_level_short() {
        assert!(parse_level(&[0x01]).is_err());
        assert!(parse_level(&[]).is_err());
    }

    #[test]
    fn test_parse_squelch_status() {
        assert_eq!(parse_squelch_status(&[0x01]).unwrap(), SquelchStatus::Open);
        assert_eq!(parse_squelch_status(&[0x00]).unwrap(), SquelchStatus::Closed);
        assert!(parse_squelch_status(&[]).is_err());
    }

    #[test]
    fn test_parse_set_status() {
        let ok = Reply::parse(&Bytes::from_static(&[0xFE, 0xFE, 0xE0, 0x92, ACK, 0xFD])).unwrap();
        assert!(parse_set_status(&ok, Command::SetFrequency).is_ok());

        let ng = Reply::parse(&Bytes::from_static(&[0xFE, 0xFE, 0xE0, 0x92, NAK, 0xFD])).unwrap();
        let err = parse_set_status(&ng, Command::SetFrequency).unwrap_err();
        assert!(matches!(err, Error::Rejected { command } if command == [0x05]));

        let other =
            Reply::parse(&Bytes::from_static(&[0xFE, 0xFE, 0xE0, 0x92, 0x05, 0xFD])).unwrap();
        assert!(parse_set_status(&other, Command::SetFrequency).is_ok());
    }
}
