//! Audio sources feeding the serial stream

mod memory;
mod wav_source;

pub use memory::MemorySource;
pub use wav_source::{WavSource, EXPECTED_SAMPLE_RATE};

use crate::error::StreamError;

/// A sequential, forward-only source of 8-bit unsigned mono PCM samples.
///
/// One sample is one byte on the wire. Implementations release their
/// underlying resource on `close` and again (as a no-op) on drop.
pub trait SampleSource: Send {
    /// Total number of samples announced by the source header.
    fn total_samples(&self) -> u64;

    /// Reads up to `max` samples. Returns fewer only at the end of the stream.
    fn read_samples(&mut self, max: usize) -> Result<Vec<u8>, StreamError>;

    /// Releases the source. Calling it more than once is a no-op.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}
