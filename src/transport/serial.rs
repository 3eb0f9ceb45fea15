//! Serial transport implementation.
//!
//! CI-V transceivers are usually reached through a level converter or USB
//! interface that presents the shared bus as a serial port.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use tokio::io::AsyncReadExt;
use tokio_serial::{DataBits, Parity, SerialPortBuilderExt, SerialStream, StopBits};

use crate::error::{Error, Result};
use crate::transport::{StreamTransport, Transport};

/// Default baud rate for CI-V transceivers.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default window for draining stale bytes after opening the port.
pub const DEFAULT_DRAIN_WINDOW: Duration = Duration::from_millis(100);

/// Configuration for serial transport.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Serial port path (e.g., "/dev/ttyUSB0" or "COM3").
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Parity.
    pub parity: Parity,
    /// Data bits per character.
    pub data_bits: DataBits,
    /// Stop bits per character.
    pub stop_bits: StopBits,
    /// How long to discard incoming bytes after opening the port.
    pub drain_window: Duration,
}

impl SerialConfig {
    /// Creates a new serial configuration with default settings (9600 8N1).
    #[must_use]
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            parity: Parity::None,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            drain_window: DEFAULT_DRAIN_WINDOW,
        }
    }

    /// Sets the baud rate.
    #[must_use]
    pub const fn baud_rate(mut self, rate: u32) -> Self {
        self.baud_rate = rate;
        self
    }

    /// Sets the parity.
    #[must_use]
    pub const fn parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    /// Sets the data bits.
    #[must_use]
    pub const fn data_bits(mut self, bits: DataBits) -> Self {
        self.data_bits = bits;
        self
    }

    /// Sets the stop bits.
    #[must_use]
    pub const fn stop_bits(mut self, bits: StopBits) -> Self {
        self.stop_bits = bits;
        self
    }

    /// Sets the drain window. Zero disables draining.
    #[must_use]
    pub const fn drain_window(mut self, window: Duration) -> Self {
        self.drain_window = window;
        self
    }
}

/// Serial transport for CI-V communication.
pub struct SerialTransport {
    config: SerialConfig,
    inner: StreamTransport<SerialStream>,
}

impl SerialTransport {
    /// Creates a new serial transport with the given configuration.
    #[must_use]
    pub fn new(config: SerialConfig) -> Self {
        Self {
            config,
            inner: StreamTransport::detached(),
        }
    }

    /// Creates a new serial transport for the given port with default settings.
    #[must_use]
    pub fn with_port(port: impl Into<String>) -> Self {
        Self::new(SerialConfig::new(port))
    }

    /// Gets the configuration.
    #[must_use]
    pub const fn config(&self) -> &SerialConfig {
        &self.config
    }
}

/// Discards whatever the interface buffered before we opened it.
async fn drain(stream: &mut SerialStream, window: Duration) {
    if window.is_zero() {
        return;
    }

    let mut buf = [0u8; 256];
    let mut total_drained = 0usize;
    let deadline = tokio::time::Instant::now() + window;

    while tokio::time::Instant::now() < deadline {
        match tokio::time::timeout_at(deadline, stream.read(&mut buf)).await {
            Ok(Ok(n)) if n > 0 => total_drained += n,
            _ => break,
        }
    }

    if total_drained > 0 {
        tracing::debug!("drained {} stale bytes from buffer", total_drained);
    }
}

impl Transport for SerialTransport {
    fn connect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if self.inner.is_connected() {
                return Ok(());
            }

            tracing::info!(
                "opening serial port {} at {} baud",
                self.config.port,
                self.config.baud_rate
            );

            let mut stream = tokio_serial::new(&self.config.port, self.config.baud_rate)
                .parity(self.config.parity)
                .data_bits(self.config.data_bits)
                .stop_bits(self.config.stop_bits)
                .open_native_async()
                .map_err(Error::Serial)?;

            drain(&mut stream, self.config.drain_window).await;
            self.inner.attach(stream);

            tracing::info!("connected to serial port");
            Ok(())
        })
    }

    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if self.inner.is_connected() {
                tracing::info!("closing serial port {}", self.config.port);
            }
            self.inner.disconnect().await
        })
    }

    fn send(&mut self, data: Bytes) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        self.inner.send(data)
    }

    fn read_until(
        &mut self,
        delimiter: u8,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes>> + Send + '_>> {
        self.inner.read_until(delimiter)
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }
}

/// Lists available serial ports.
///
/// # Errors
///
/// Returns an error if the port list cannot be retrieved.
pub fn list_ports() -> Result<Vec<String>> {
    let ports = tokio_serial::available_ports().map_err(Error::Serial)?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}
