//! Packed binary-coded decimal conversion.
//!
//! Each byte holds two decimal digits, high nibble first. Byte sequences are
//! most significant digit pair first; call sites that need the CI-V wire order
//! (least significant pair first) reverse the result themselves.

use crate::error::FrameError;

/// Widest BCD value that always fits in a `u64` (16 digits).
pub const MAX_WIDTH: usize = 8;

/// Encodes `value` as `width` bytes of packed BCD, most significant first.
///
/// The result is left-padded with zero bytes. Digits that do not fit in
/// `width` bytes are dropped from the high end.
///
/// ```
/// assert_eq!(icom_civ::bcd::encode(255, 2), vec![0x02, 0x55]);
/// assert_eq!(icom_civ::bcd::encode(123_456, 2), vec![0x34, 0x56]);
/// ```
#[must_use]
pub fn encode(value: u64, width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width];
    let mut rest = value;

    for byte in out.iter_mut().rev() {
        let lo = (rest % 10) as u8;
        rest /= 10;
        let hi = (rest % 10) as u8;
        rest /= 10;
        *byte = (hi << 4) | lo;
    }

    out
}

/// Decodes packed BCD, most significant first.
///
/// An empty slice decodes to zero.
pub fn decode(bcd: &[u8]) -> Result<u64, FrameError> {
    if bcd.len() > MAX_WIDTH {
        return Err(FrameError::BcdTooWide {
            width: bcd.len(),
            max: MAX_WIDTH,
        });
    }

    let mut value: u64 = 0;
    for (index, &byte) in bcd.iter().enumerate() {
        let hi = byte >> 4;
        let lo = byte & 0x0F;
        if hi > 9 || lo > 9 {
            return Err(FrameError::InvalidBcd { index, byte });
        }
        value = value * 100 + u64::from(hi) * 10 + u64::from(lo);
    }

    Ok(value)
}
