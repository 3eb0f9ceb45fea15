//! Transport over any async byte stream.

use std::future::Future;
use std::io;
use std::pin::Pin;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::protocol::FrameDecoder;
use crate::transport::Transport;

/// Read chunk size.
const READ_CHUNK: usize = 256;

/// Buffered transport over an `AsyncRead + AsyncWrite` stream.
///
/// Bytes read past a delimiter are kept for the next [`Transport::read_until`].
pub struct StreamTransport<S> {
    stream: Option<S>,
    decoder: FrameDecoder,
}

impl<S> StreamTransport<S> {
    /// Wraps an open stream.
    #[must_use]
    pub fn new(stream: S) -> Self {
        Self {
            stream: Some(stream),
            decoder: FrameDecoder::new(),
        }
    }

    /// Creates a transport with no stream attached.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            stream: None,
            decoder: FrameDecoder::new(),
        }
    }

    /// Attaches a freshly opened stream, discarding buffered bytes.
    pub fn attach(&mut self, stream: S) {
        self.stream = Some(stream);
        self.decoder.clear();
    }
}

impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    fn connect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if self.stream.is_some() {
                Ok(())
            } else {
                Err(Error::NotConnected)
            }
        })
    }

    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if let Some(mut stream) = self.stream.take() {
                tracing::debug!("closing stream");
                self.decoder.clear();
                stream.shutdown().await?;
            }
            Ok(())
        })
    }

    fn send(&mut self, data: Bytes) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;
            tracing::trace!("write {}", hex::encode(&data));
            stream.write_all(&data).await?;
            stream.flush().await?;
            Ok(())
        })
    }

    fn read_until(
        &mut self,
        delimiter: u8,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes>> + Send + '_>> {
        Box::pin(async move {
            let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;
            let mut buf = [0u8; READ_CHUNK];

            loop {
                if let Some(frame) = self.decoder.decode_until(delimiter) {
                    tracing::trace!("read {}", hex::encode(&frame));
                    return Ok(frame);
                }

                let n = stream.read(&mut buf).await?;
                if n == 0 {
                    return Err(Error::Io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "stream closed before delimiter",
                    )));
                }
                self.decoder.feed(&buf[..n]);
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}
