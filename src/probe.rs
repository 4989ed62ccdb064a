//! Open/close counters shared between a resource and whoever wants to inspect it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts how many times a resource was opened and released.
///
/// Only real state transitions are counted: closing an already closed
/// resource does not bump `closes`.
#[derive(Debug, Default)]
pub struct ResourceProbe {
    opens: AtomicUsize,
    closes: AtomicUsize,
}

pub type SharedProbe = Arc<ResourceProbe>;

impl ResourceProbe {
    pub fn new() -> SharedProbe {
        Arc::new(Self::default())
    }

    pub fn record_open(&self) {
        self.opens.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// True when every open has a matching close.
    pub fn is_balanced(&self) -> bool {
        self.opens() == self.closes()
    }
}
