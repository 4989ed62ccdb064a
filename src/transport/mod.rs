//! Byte transports the stream is written to

mod memory;
mod serial;
#[cfg(test)]
mod tests;

pub use memory::{MemoryTransport, SharedWrites};
pub use serial::SerialTransport;

use crate::error::StreamError;
use async_trait::async_trait;

/// A write-only byte link to the receiving device.
///
/// No framing is added: `write_chunk` puts the bytes on the link as given.
/// `close` must be idempotent, and implementations release the link on drop
/// if it was never closed explicitly.
#[async_trait]
pub trait Transport: Send {
    async fn open(&mut self) -> Result<(), StreamError>;

    async fn write_chunk(&mut self, bytes: &[u8]) -> Result<(), StreamError>;

    async fn close(&mut self) -> Result<(), StreamError>;

    fn is_open(&self) -> bool;

    /// Human readable name for logs, e.g. `/dev/ttyUSB0 @ 2000000 baud`.
    fn describe(&self) -> String;
}
