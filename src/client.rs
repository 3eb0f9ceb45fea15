//! Main [`IcomRadio`] driver implementation.
//!
//! This module provides the typed transceiver operations on top of the
//! [`CommandHandler`] request/response engine.

use std::time::Duration;

use crate::commands::CommandHandler;
use crate::error::Result;
use crate::protocol::{
    Command, DEFAULT_CONTROLLER_ADDR, DEFAULT_TRANSCEIVER_ADDR, MAX_FREQUENCY_HZ, Preamble,
    encode_frequency, encode_level, parse_frequency, parse_level, parse_set_status,
    parse_squelch_status,
};
use crate::transport::{SerialConfig, SerialTransport, Transport, serial::DEFAULT_BAUD_RATE};
use crate::types::SquelchStatus;

/// Default time to wait for each echo or reply frame.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Bus addressing and timing for one transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioConfig {
    /// CI-V address of the transceiver.
    pub transceiver_addr: u8,
    /// CI-V address of this controller.
    pub controller_addr: u8,
    /// Line speed; only sizes the power-on wake preamble.
    pub baud_rate: u32,
    /// Limit on each frame read. `None` blocks until a frame arrives.
    pub read_timeout: Option<Duration>,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            transceiver_addr: DEFAULT_TRANSCEIVER_ADDR,
            controller_addr: DEFAULT_CONTROLLER_ADDR,
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
        }
    }
}

impl RadioConfig {
    /// Sets the transceiver address.
    #[must_use]
    pub const fn transceiver_addr(mut self, addr: u8) -> Self {
        self.transceiver_addr = addr;
        self
    }

    /// Sets the controller address.
    #[must_use]
    pub const fn controller_addr(mut self, addr: u8) -> Self {
        self.controller_addr = addr;
        self
    }

    /// Sets the baud rate used to size the wake preamble.
    #[must_use]
    pub const fn baud_rate(mut self, rate: u32) -> Self {
        self.baud_rate = rate;
        self
    }

    /// Sets the read timeout.
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }
}

/// Driver for a single CI-V transceiver.
///
/// Operations take `&mut self`: one request is in flight at a time. Share the
/// driver across tasks by giving it to one owner task fed by a channel.
pub struct IcomRadio<T> {
    commands: CommandHandler<T>,
}

impl IcomRadio<SerialTransport> {
    /// Creates a driver for a serial port with default addresses (9600 8N1).
    ///
    /// # Arguments
    ///
    /// * `port` - Serial port path (e.g., "/dev/ttyUSB0")
    ///
    /// # Returns
    ///
    /// A new driver (not yet connected).
    #[must_use]
    pub fn serial(port: impl Into<String>) -> Self {
        Self::with_serial_config(SerialConfig::new(port), RadioConfig::default())
    }

    /// Creates a driver with custom serial and bus configuration.
    ///
    /// The radio's baud rate is taken from the serial configuration.
    #[must_use]
    pub fn with_serial_config(serial: SerialConfig, radio: RadioConfig) -> Self {
        let radio = radio.baud_rate(serial.baud_rate);
        Self::new(SerialTransport::new(serial), radio)
    }
}

impl<T: Transport> IcomRadio<T> {
    /// Creates a driver over the given transport.
    #[must_use]
    pub const fn new(transport: T, config: RadioConfig) -> Self {
        Self {
            commands: CommandHandler::new(transport, config),
        }
    }

    /// Opens the transport.
    pub async fn connect(&mut self) -> Result<()> {
        self.commands.transport_mut().connect().await?;
        tracing::debug!(
            "driving transceiver 0x{:02X} as controller 0x{:02X}",
            self.config().transceiver_addr,
            self.config().controller_addr
        );
        Ok(())
    }

    /// Closes the transport.
    pub async fn close(&mut self) -> Result<()> {
        self.commands.clear_stale();
        self.commands.transport_mut().disconnect().await
    }

    /// Returns true if the transport is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.commands.transport().is_connected()
    }

    /// Returns the bus configuration.
    #[must_use]
    pub const fn config(&self) -> &RadioConfig {
        self.commands.config()
    }

    /// Returns the command handler for direct command access.
    pub fn commands(&mut self) -> &mut CommandHandler<T> {
        &mut self.commands
    }

    // ==================== Power ====================

    /// Wakes the transceiver from standby.
    ///
    /// Sent with the long wake preamble. Issued once; not idempotent.
    pub async fn power_on(&mut self) -> Result<()> {
        let preamble = Preamble::wake(self.config().baud_rate);
        tracing::debug!("power on ({} byte preamble)", preamble.len());
        self.commands
            .execute(preamble, Command::PowerOn, &[])
            .await?;
        Ok(())
    }

    /// Puts the transceiver into standby.
    pub async fn power_off(&mut self) -> Result<()> {
        tracing::debug!("power off");
        self.commands
            .execute(Preamble::standard(), Command::PowerOff, &[])
            .await?;
        Ok(())
    }

    // ==================== Frequency ====================

    /// Reads the operating frequency in Hz.
    pub async fn get_frequency(&mut self) -> Result<u64> {
        let command = Command::ReadFrequency;
        let reply = self
            .commands
            .execute(Preamble::standard(), command, &[])
            .await?;
        parse_frequency(reply.data(command.len())?)
    }

    /// Sets the operating frequency in Hz.
    ///
    /// Only the low ten digits are sent. Returns [`Error::Rejected`] if the
    /// transceiver answers NG.
    ///
    /// [`Error::Rejected`]: crate::Error::Rejected
    pub async fn set_frequency(&mut self, hz: u64) -> Result<()> {
        if hz > MAX_FREQUENCY_HZ {
            tracing::warn!("frequency {} Hz truncated to ten digits", hz);
        }
        let command = Command::SetFrequency;
        let reply = self
            .commands
            .execute(Preamble::standard(), command, &encode_frequency(hz))
            .await?;
        parse_set_status(&reply, command)
    }

    // ==================== Levels ====================

    /// Reads the AF level (0-255).
    pub async fn get_audio_level(&mut self) -> Result<u8> {
        self.read_level(Command::AudioLevel).await
    }

    /// Sets the AF level (0-255).
    pub async fn set_audio_level(&mut self, level: u8) -> Result<()> {
        self.write_level(Command::AudioLevel, level).await
    }

    /// Reads the squelch level (0-255).
    pub async fn get_squelch_level(&mut self) -> Result<u8> {
        self.read_level(Command::ReadSquelchLevel).await
    }

    /// Sets the squelch level (0-255).
    pub async fn set_squelch_level(&mut self, level: u8) -> Result<()> {
        self.write_level(Command::SetSquelchLevel, level).await
    }

    async fn read_level(&mut self, command: Command) -> Result<u8> {
        let reply = self
            .commands
            .execute(Preamble::standard(), command, &[])
            .await?;
        parse_level(reply.data(command.len())?)
    }

    // The reply to a level write carries no information we act on.
    async fn write_level(&mut self, command: Command, level: u8) -> Result<()> {
        self.commands
            .execute(Preamble::standard(), command, &encode_level(level))
            .await?;
        Ok(())
    }

    // ==================== Squelch status ====================

    /// Reads whether the main squelch is open.
    pub async fn get_squelch_status(&mut self) -> Result<SquelchStatus> {
        self.read_squelch(Command::SquelchStatus).await
    }

    /// Reads whether the second squelch is open.
    pub async fn get_squelch2_status(&mut self) -> Result<SquelchStatus> {
        self.read_squelch(Command::Squelch2Status).await
    }

    async fn read_squelch(&mut self, command: Command) -> Result<SquelchStatus> {
        let reply = self
            .commands
            .execute(Preamble::standard(), command, &[])
            .await?;
        parse_squelch_status(reply.data(command.len())?)
    }
}
