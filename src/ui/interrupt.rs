//! Ctrl-C handling

use std::future::Future;
use std::io;
use tokio::sync::broadcast;
use tracing::warn;

/// Turns the first interrupt into a graceful shutdown request.
///
/// Returns `true` once a second interrupt arrives, so the caller can exit
/// without waiting for the transmitter. Returns `false` if interrupts can no
/// longer be received.
pub async fn watch_interrupts<F, Fut>(mut next_interrupt: F, shutdown_tx: broadcast::Sender<()>) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if next_interrupt().await.is_err() {
        return false;
    }
    warn!("Ctrl-C received, stopping transmission. Press Ctrl-C again to quit immediately.");
    let _ = shutdown_tx.send(());

    if next_interrupt().await.is_err() {
        return false;
    }
    warn!("Second Ctrl-C received, exiting without waiting for cleanup.");
    true
}
