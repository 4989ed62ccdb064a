use crate::error::StreamError;
use crate::probe::{ResourceProbe, SharedProbe};
use crate::transport::Transport;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

const LOG_TARGET: &str = "r_wavstream::transport::memory";

/// Every write made to a `MemoryTransport`, in order.
pub type SharedWrites = Arc<Mutex<Vec<Vec<u8>>>>;

/// Records writes in memory instead of sending them anywhere.
///
/// Backs `--dry-run` and the transmitter tests.
#[derive(Debug)]
pub struct MemoryTransport {
    writes: SharedWrites,
    probe: SharedProbe,
    open: bool,
    fail_on_write: Option<usize>,
    writes_attempted: usize,
}

impl MemoryTransport {
    pub fn new() -> Self {
        MemoryTransport {
            writes: Arc::new(Mutex::new(Vec::new())),
            probe: ResourceProbe::new(),
            open: false,
            fail_on_write: None,
            writes_attempted: 0,
        }
    }

    /// Makes the `n`-th write (zero based) fail with a `TransportError`.
    pub fn fail_on_write(mut self, n: usize) -> Self {
        self.fail_on_write = Some(n);
        self
    }

    pub fn writes(&self) -> SharedWrites {
        Arc::clone(&self.writes)
    }

    pub fn probe(&self) -> SharedProbe {
        SharedProbe::clone(&self.probe)
    }

    fn release(&mut self) {
        if self.open {
            self.open = false;
            self.probe.record_close();
            debug!(target: LOG_TARGET, "Memory transport closed.");
        }
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn open(&mut self) -> Result<(), StreamError> {
        if self.open {
            return Err(StreamError::InvalidState("Memory transport already open".to_string()));
        }
        self.open = true;
        self.probe.record_open();
        debug!(target: LOG_TARGET, "Memory transport opened.");
        Ok(())
    }

    async fn write_chunk(&mut self, bytes: &[u8]) -> Result<(), StreamError> {
        if !self.open {
            return Err(StreamError::InvalidState("Memory transport is not open".to_string()));
        }
        let index = self.writes_attempted;
        self.writes_attempted += 1;
        if self.fail_on_write == Some(index) {
            return Err(StreamError::TransportError(format!("simulated failure on write {}", index)));
        }

        let mut writes = self
            .writes
            .lock()
            .map_err(|_| StreamError::InvalidState("Write log mutex poisoned".to_string()))?;
        writes.push(bytes.to_vec());
        trace!(target: LOG_TARGET, "Recorded write of {} bytes", bytes.len());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), StreamError> {
        self.release();
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn describe(&self) -> String {
        "in-memory transport".to_string()
    }
}

impl Drop for MemoryTransport {
    fn drop(&mut self) {
        self.release();
    }
}
