//! Transport layer for CI-V communication.
//!
//! A transport is a duplex byte channel: it writes raw bytes and reads back
//! everything up to a delimiter. The CI-V bus loops every written byte back to
//! the reader, so callers see their own frames on the read side.

#[cfg(test)]
pub(crate) mod mock;
pub mod serial;
pub mod stream;

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::error::Result;

/// Trait for transport implementations.
pub trait Transport: Send {
    /// Connects to the device.
    fn connect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Disconnects from the device, closing the channel.
    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Writes data to the channel.
    fn send(&mut self, data: Bytes) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Reads up to and including the next `delimiter` byte.
    fn read_until(
        &mut self,
        delimiter: u8,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes>> + Send + '_>>;

    /// Returns true if connected.
    fn is_connected(&self) -> bool;
}

pub use serial::{SerialConfig, SerialTransport};
pub use stream::StreamTransport;
