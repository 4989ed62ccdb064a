//! Preamble encoding, paced chunk transmission, and the top-level playback entry points

mod player;
pub mod preamble;
pub mod progress;
mod transmitter;

pub use player::{play, play_with};
pub use preamble::{decode_preamble, encode_preamble, MAX_SAMPLE_COUNT, PREAMBLE_LEN};
pub use progress::{new_shared_progress, SharedProgress, TransmitProgress};
pub use transmitter::{
    StreamTransmitter, TransmitConfig, TransmitOutcome, TransmitReport, DEFAULT_CHUNK_SIZE,
    DEFAULT_PACING_DELAY,
};
