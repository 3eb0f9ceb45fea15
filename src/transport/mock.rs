//! In-memory bus for exercising the command engine without hardware.

use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::pin::Pin;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::transport::Transport;

/// What the simulated bus loops back after a write.
#[derive(Debug, Clone)]
pub enum Echo {
    /// The exact bytes written.
    Loopback,
    /// A fixed frame, standing in for a collision.
    Corrupt(Bytes),
}

/// Mock transport with a queue of canned reply frames.
///
/// Each `send` queues an echo ahead of any pending replies, so reads see the
/// echo first and then the next canned reply.
#[derive(Debug)]
pub struct MockTransport {
    echo: Echo,
    echoes: VecDeque<Bytes>,
    replies: VecDeque<Bytes>,
    sent: Vec<Bytes>,
    reads: usize,
    connected: bool,
    fail_writes: bool,
    fail_reads: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            echo: Echo::Loopback,
            echoes: VecDeque::new(),
            replies: VecDeque::new(),
            sent: Vec::new(),
            reads: 0,
            connected: true,
            fail_writes: false,
            fail_reads: false,
        }
    }

    /// Queues a reply frame.
    pub fn reply(mut self, frame: &[u8]) -> Self {
        self.replies.push_back(Bytes::copy_from_slice(frame));
        self
    }

    pub fn echo(mut self, echo: Echo) -> Self {
        self.echo = echo;
        self
    }

    /// Makes every `send` fail with a broken pipe.
    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Makes every `read_until` fail with a device error.
    pub fn fail_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn sent(&self) -> &[Bytes] {
        &self.sent
    }

    /// Number of completed `read_until` calls.
    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn remaining_replies(&self) -> usize {
        self.replies.len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn connect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.connected = true;
            Ok(())
        })
    }

    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.connected = false;
            Ok(())
        })
    }

    fn send(&mut self, data: Bytes) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if !self.connected {
                return Err(Error::NotConnected);
            }
            if self.fail_writes {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "write failed",
                )));
            }
            let echo = match &self.echo {
                Echo::Loopback => data.clone(),
                Echo::Corrupt(frame) => frame.clone(),
            };
            self.echoes.push_back(echo);
            self.sent.push(data);
            Ok(())
        })
    }

    fn read_until(
        &mut self,
        _delimiter: u8,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes>> + Send + '_>> {
        Box::pin(async move {
            if !self.connected {
                return Err(Error::NotConnected);
            }
            if self.fail_reads {
                return Err(Error::Io(io::Error::other("read failed")));
            }
            let frame = self
                .echoes
                .pop_front()
                .or_else(|| self.replies.pop_front())
                .ok_or_else(|| {
                    Error::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "bus idle"))
                })?;
            self.reads += 1;
            Ok(frame)
        })
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
