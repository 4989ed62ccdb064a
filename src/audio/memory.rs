use crate::audio::SampleSource;
use crate::error::StreamError;
use crate::probe::{ResourceProbe, SharedProbe};
use std::collections::VecDeque;
use tracing::debug;

const LOG_TARGET: &str = "r_wavstream::audio::memory";

/// An in-memory sample source for exercising the transmitter without a WAV file.
#[derive(Debug)]
pub struct MemorySource {
    samples: VecDeque<u8>,
    announced_total: u64,
    open: bool,
    probe: SharedProbe,
}

impl MemorySource {
    /// Creates an open source announcing exactly `samples.len()` samples.
    pub fn new(samples: Vec<u8>) -> Self {
        let announced_total = samples.len() as u64;
        let probe = ResourceProbe::new();
        probe.record_open();
        MemorySource {
            samples: samples.into(),
            announced_total,
            open: true,
            probe,
        }
    }

    /// Overrides the announced sample count, e.g. to simulate a header that
    /// promises more data than the body holds.
    pub fn with_announced_total(mut self, total: u64) -> Self {
        self.announced_total = total;
        self
    }

    pub fn probe(&self) -> SharedProbe {
        SharedProbe::clone(&self.probe)
    }
}

impl SampleSource for MemorySource {
    fn total_samples(&self) -> u64 {
        self.announced_total
    }

    fn read_samples(&mut self, max: usize) -> Result<Vec<u8>, StreamError> {
        if !self.open {
            return Err(StreamError::InvalidState("Memory source is closed".to_string()));
        }
        let take = max.min(self.samples.len());
        Ok(self.samples.drain(..take).collect())
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.samples.clear();
            self.probe.record_close();
            debug!(target: LOG_TARGET, "Memory source closed.");
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

impl Drop for MemorySource {
    fn drop(&mut self) {
        self.close();
    }
}
