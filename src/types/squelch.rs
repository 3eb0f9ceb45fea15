//! Squelch status.

/// Whether the receiver squelch is passing audio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SquelchStatus {
    /// Audio muted.
    #[default]
    Closed = 0,
    /// Audio passing.
    Open = 1,
}

impl SquelchStatus {
    /// Returns true if the squelch is open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl From<u8> for SquelchStatus {
    fn from(byte: u8) -> Self {
        if byte == 0 { Self::Closed } else { Self::Open }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squelch_from_byte() {
        assert_eq!(SquelchStatus::from(0x00), SquelchStatus::Closed);
        assert_eq!(SquelchStatus::from(0x01), SquelchStatus::Open);
        assert_eq!(SquelchStatus::from(0x7F), SquelchStatus::Open);
    }

    #[test]
    fn test_squelch_is_open() {
        assert!(SquelchStatus::Open.is_open());
        assert!(!SquelchStatus::Closed.is_open());
    }
}
