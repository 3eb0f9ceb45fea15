//! # icom-civ
//!
//! A Rust driver for Icom transceivers speaking the CI-V protocol.
//!
//! CI-V runs on a single shared, half-duplex serial bus. Every byte a device
//! writes is looped straight back to it, so the driver checks that echo to
//! detect collisions before it reads the transceiver's reply.
//!
//! ## Features
//!
//! - Async/await based API using Tokio
//! - Echo verification with explicit collision errors
//! - Typed frequency, level and squelch operations
//! - Per-read timeout (1 s default, `None` to block)
//!
//! ## Quick Start
//!
//! ```no_run
//! use icom_civ::IcomRadio;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), icom_civ::Error> {
//!     let mut radio = IcomRadio::serial("/dev/ttyUSB0");
//!     radio.connect().await?;
//!
//!     println!("Frequency: {} Hz", radio.get_frequency().await?);
//!     radio.set_frequency(119_000_000).await?;
//!
//!     if radio.get_squelch_status().await?.is_open() {
//!         println!("Squelch open");
//!     }
//!
//!     radio.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`bcd`] - Packed binary-coded decimal conversion
//! - [`protocol`] - Low-level protocol types (frames, commands, reply parsing)
//! - [`transport`] - Duplex byte channels (serial port, generic stream)
//! - [`commands`] - Send, echo-verify and reply engine
//! - [`types`] - Transceiver state types
//! - [`client`] - High-level [`IcomRadio`] driver

pub mod bcd;
pub mod client;
pub mod commands;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{DEFAULT_READ_TIMEOUT, IcomRadio, RadioConfig};
pub use commands::CommandHandler;
pub use error::{Error, FrameError, Result};
pub use protocol::{Command, Preamble, Reply};
pub use transport::{SerialConfig, SerialTransport, StreamTransport, Transport, serial::list_ports};
pub use types::SquelchStatus;
