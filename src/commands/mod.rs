//! Request/response engine for CI-V commands.
//!
//! One request is strictly sequential: write the frame, read back the bus
//! echo and compare it, then read the transceiver's reply. The echo is always
//! consumed before the reply.
//!
//! A read that times out leaves its frame in flight. The handler remembers
//! what is still owed and discards those frames when they turn up ahead of
//! the next echo, so later requests stay paired with their own replies.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

use crate::client::RadioConfig;
use crate::error::{Error, Result};
use crate::protocol::{Command, Preamble, Reply, STANDARD_PREAMBLE_LEN, TERMINATOR, encode_frame};
use crate::transport::Transport;

/// Frames the bus still owes from requests whose reads timed out.
#[derive(Debug, Default)]
struct Backlog {
    frames: usize,
    /// Request whose echo never arrived.
    request: Option<Bytes>,
}

impl Backlog {
    /// An echo read timed out: the echo and the reply are both owed.
    fn echo_timed_out(&mut self, request: Bytes) {
        self.frames += 2;
        self.request = Some(request);
    }

    /// A reply read timed out.
    fn reply_timed_out(&mut self) {
        self.frames += 1;
    }

    /// Consumes `frame` if it is a late echo or a late transceiver reply.
    fn take_stale(&mut self, frame: &Bytes, config: &RadioConfig) -> bool {
        if self.frames == 0 {
            return false;
        }

        let late_echo = self.request.as_ref() == Some(frame);
        let late_reply = frame.get(STANDARD_PREAMBLE_LEN..STANDARD_PREAMBLE_LEN + 2)
            == Some(&[config.controller_addr, config.transceiver_addr][..]);
        if !late_echo && !late_reply {
            return false;
        }

        if late_echo {
            self.request = None;
        }
        self.frames -= 1;
        if self.frames == 0 {
            self.request = None;
        }
        true
    }
}

/// Command engine owning the transport.
pub struct CommandHandler<T> {
    transport: T,
    config: RadioConfig,
    backlog: Backlog,
}

/// Awaits `fut`, bounded by `timeout` when one is set.
async fn with_timeout<F>(timeout: Option<Duration>, fut: F) -> Result<Bytes>
where
    F: Future<Output = Result<Bytes>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| Error::Timeout {
                timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            })?,
        None => fut.await,
    }
}

impl<T: Transport> CommandHandler<T> {
    /// Creates a new command handler.
    #[must_use]
    pub const fn new(transport: T, config: RadioConfig) -> Self {
        Self {
            transport,
            config,
            backlog: Backlog {
                frames: 0,
                request: None,
            },
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RadioConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the transport mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Number of late frames still expected from timed-out reads.
    #[must_use]
    pub const fn pending_stale(&self) -> usize {
        self.backlog.frames
    }

    /// Forgets late frames, e.g. after the channel was reopened.
    pub fn clear_stale(&mut self) {
        self.backlog = Backlog::default();
    }

    /// Builds the frame for `command` addressed to the configured transceiver.
    #[must_use]
    pub fn frame(&self, preamble: Preamble, command: Command, data: &[u8]) -> Bytes {
        encode_frame(
            preamble,
            self.config.transceiver_addr,
            self.config.controller_addr,
            command.opcode(),
            data,
        )
    }

    /// Reads one terminated frame, honouring the read timeout.
    async fn read_frame(&mut self) -> Result<Bytes> {
        let timeout = self.config.read_timeout;
        with_timeout(timeout, self.transport.read_until(TERMINATOR)).await
    }

    /// Writes `frame` and checks the bus echo against it.
    ///
    /// Late frames owed by earlier timed-out requests are skipped first. Any
    /// other difference means another device drove the bus at the same time;
    /// the request fails with [`Error::Collision`] and is not retried.
    pub async fn send_and_verify(&mut self, frame: Bytes) -> Result<()> {
        tracing::trace!(">> {}", hex::encode(&frame));
        self.transport.send(frame.clone()).await?;

        loop {
            let echoed = match self.read_frame().await {
                Ok(echoed) => echoed,
                Err(e @ Error::Timeout { .. }) => {
                    self.backlog.echo_timed_out(frame);
                    return Err(e);
                }
                Err(e) => return Err(e),
            };

            if self.backlog.take_stale(&echoed, &self.config) {
                tracing::debug!("discarding late frame {}", hex::encode(&echoed));
                continue;
            }
            if echoed != frame {
                return Err(Error::Collision {
                    sent: frame,
                    echoed,
                });
            }
            return Ok(());
        }
    }

    /// Reads the transceiver's reply and strips its envelope.
    pub async fn read_reply(&mut self) -> Result<Reply> {
        let frame = match self.read_frame().await {
            Ok(frame) => frame,
            Err(e @ Error::Timeout { .. }) => {
                self.backlog.reply_timed_out();
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        tracing::trace!("<< {}", hex::encode(&frame));
        Ok(Reply::parse(&frame)?)
    }

    /// Sends `command` with `data` and returns the reply.
    pub async fn execute(
        &mut self,
        preamble: Preamble,
        command: Command,
        data: &[u8],
    ) -> Result<Reply> {
        let frame = self.frame(preamble, command, data);
        self.send_and_verify(frame).await?;
        self.read_reply().await
    }
}
