use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::sync::Mutex as TokioMutex;

pub const PROGRESS_UPDATE_INTERVAL: StdDuration = StdDuration::from_millis(250);

/// Holds how far the current transmission has got.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransmitProgress {
    pub total_samples: u64,
    pub samples_sent: u64,
    pub chunks_sent: u64,
    pub finished: bool,
}

// Type alias for the shared progress tracker
pub type SharedProgress = Arc<TokioMutex<TransmitProgress>>;

pub fn new_shared_progress() -> SharedProgress {
    Arc::new(TokioMutex::new(TransmitProgress::default()))
}
