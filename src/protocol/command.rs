//! Command opcodes for the CI-V protocol.
//!
//! Each command is one opcode byte, optionally followed by a sub-command
//! byte. The transceiver echoes the full opcode at the start of a data reply.

/// Commands sent to the transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Wake the transceiver from standby.
    PowerOn,
    /// Put the transceiver into standby.
    PowerOff,
    /// Read the operating frequency.
    ReadFrequency,
    /// Set the operating frequency.
    SetFrequency,
    /// Read or set the AF (audio) level.
    AudioLevel,
    /// Read the squelch level.
    ReadSquelchLevel,
    /// Set the squelch level.
    SetSquelchLevel,
    /// Read the main squelch status.
    SquelchStatus,
    /// Read the second squelch status.
    Squelch2Status,
}

impl Command {
    /// Opcode bytes as sent on the wire.
    #[must_use]
    pub const fn opcode(self) -> &'static [u8] {
        match self {
            Self::PowerOn => &[0x18, 0x01],
            Self::PowerOff => &[0x18, 0x00],
            Self::ReadFrequency => &[0x03],
            Self::SetFrequency => &[0x05],
            Self::AudioLevel => &[0x14, 0x01],
            Self::ReadSquelchLevel => &[0x14, 0x03],
            Self::SetSquelchLevel => &[0x14, 0x05],
            Self::SquelchStatus => &[0x15, 0x01],
            Self::Squelch2Status => &[0x15, 0x05],
        }
    }

    /// Number of opcode bytes the transceiver echoes in its reply.
    #[must_use]
    pub const fn len(self) -> usize {
        self.opcode().len()
    }

    /// Always false; every command has at least one opcode byte.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.opcode().is_empty()
    }
}
