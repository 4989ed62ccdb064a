//! Sample-count preamble sent ahead of the PCM payload.
//!
//! The firmware reads exactly ten ASCII digits, most significant first,
//! zero padded, and treats them as the number of samples that follow.

use crate::error::StreamError;

pub const PREAMBLE_LEN: usize = 10;

/// Largest count that fits in `PREAMBLE_LEN` decimal digits.
pub const MAX_SAMPLE_COUNT: u64 = 9_999_999_999;

/// Encodes `sample_count` as ten zero-padded ASCII digits.
///
/// Counts that do not fit are rejected rather than truncated.
pub fn encode_preamble(sample_count: u64) -> Result<[u8; PREAMBLE_LEN], StreamError> {
    if sample_count > MAX_SAMPLE_COUNT {
        return Err(StreamError::PreambleOverflow(sample_count));
    }
    let digits = format!("{:0width$}", sample_count, width = PREAMBLE_LEN);
    let mut preamble = [0u8; PREAMBLE_LEN];
    preamble.copy_from_slice(digits.as_bytes());
    Ok(preamble)
}

/// Parses a preamble back into a sample count.
pub fn decode_preamble(bytes: &[u8]) -> Result<u64, StreamError> {
    if bytes.len() != PREAMBLE_LEN {
        return Err(StreamError::InvalidPreamble(format!(
            "expected {} bytes, got {}",
            PREAMBLE_LEN,
            bytes.len()
        )));
    }
    if let Some(bad) = bytes.iter().find(|b| !b.is_ascii_digit()) {
        return Err(StreamError::InvalidPreamble(format!(
            "byte {:#04x} is not an ASCII digit",
            bad
        )));
    }
    Ok(bytes
        .iter()
        .fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0')))
}
