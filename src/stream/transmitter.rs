use crate::audio::SampleSource;
use crate::error::StreamError;
use crate::stream::preamble::{encode_preamble, MAX_SAMPLE_COUNT};
use crate::stream::progress::SharedProgress;
use crate::transport::Transport;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;
use tracing::{debug, info, instrument, trace, warn};

const LOG_TARGET: &str = "r_wavstream::stream::transmitter";

/// Must match the receive buffer size compiled into the firmware.
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Gap between chunks. Anything shorter overruns the receive buffer on an
/// ATmega328p board.
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(69);

/// Chunking and pacing parameters for one transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitConfig {
    pub chunk_size: usize,
    pub pacing_delay: Duration,
}

impl Default for TransmitConfig {
    fn default() -> Self {
        TransmitConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            pacing_delay: DEFAULT_PACING_DELAY,
        }
    }
}

/// Why the transmission loop stopped without an error.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TransmitOutcome {
    Completed,
    Interrupted,
}

/// Summary of one transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmitReport {
    pub total_samples: u64,
    pub chunks_sent: u64,
    pub bytes_sent: u64,
    pub outcome: TransmitOutcome,
}

/// Sends a sample-count preamble followed by the PCM payload in paced chunks.
pub struct StreamTransmitter {
    config: TransmitConfig,
    progress: Option<SharedProgress>,
}

impl StreamTransmitter {
    pub fn new(config: TransmitConfig) -> Self {
        StreamTransmitter {
            config,
            progress: None,
        }
    }

    /// Publishes progress into `progress` while running.
    pub fn with_progress(mut self, progress: SharedProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Writes the ten preamble digits one byte per write, most significant first.
    pub async fn send_preamble<T>(link: &mut T, sample_count: u64) -> Result<(), StreamError>
    where
        T: Transport + ?Sized,
    {
        let preamble = encode_preamble(sample_count)?;
        for digit in preamble {
            link.write_chunk(&[digit]).await?;
        }
        debug!(target: LOG_TARGET, "Sent preamble {}", sample_count);
        Ok(())
    }

    /// Writes one chunk verbatim.
    pub async fn send_chunk<T>(link: &mut T, bytes: &[u8]) -> Result<(), StreamError>
    where
        T: Transport + ?Sized,
    {
        link.write_chunk(bytes).await
    }

    /// Streams the whole source over `link`, then releases both.
    ///
    /// The source is expected to be open already; the link is opened here.
    /// Both are closed on every return path. They also close themselves on
    /// drop, which covers a cancelled future.
    #[instrument(skip_all, name = "transmit", fields(total_samples = source.total_samples(), link = %link.describe()))]
    pub async fn run<S, T>(
        &self,
        mut source: S,
        mut link: T,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<TransmitReport, StreamError>
    where
        S: SampleSource,
        T: Transport,
    {
        let result = self.transmit(&mut source, &mut link, &mut shutdown_rx).await;

        source.close();
        let close_result = link.close().await;

        if let Some(progress) = &self.progress {
            progress.lock().await.finished = true;
        }

        match (result, close_result) {
            (Ok(report), Ok(())) => {
                info!(
                    target: LOG_TARGET,
                    "Transmission {:?}: {} bytes in {} chunks",
                    report.outcome, report.bytes_sent, report.chunks_sent
                );
                Ok(report)
            }
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!(target: LOG_TARGET, "Error closing link after failure (ignored): {}", close_err);
                Err(e)
            }
        }
    }

    async fn transmit<S, T>(
        &self,
        source: &mut S,
        link: &mut T,
        shutdown_rx: &mut broadcast::Receiver<()>,
    ) -> Result<TransmitReport, StreamError>
    where
        S: SampleSource,
        T: Transport,
    {
        if self.config.chunk_size == 0 {
            return Err(StreamError::InvalidState("Chunk size must be non-zero".to_string()));
        }

        let total_samples = source.total_samples();
        if total_samples > MAX_SAMPLE_COUNT {
            return Err(StreamError::PreambleOverflow(total_samples));
        }

        link.open().await?;
        info!(
            target: LOG_TARGET,
            "Streaming {} samples to {}", total_samples, link.describe()
        );

        if let Some(progress) = &self.progress {
            let mut guard = progress.lock().await;
            guard.total_samples = total_samples;
            guard.samples_sent = 0;
            guard.chunks_sent = 0;
            guard.finished = false;
        }

        Self::send_preamble(&mut *link, total_samples).await?;

        let chunk_size = self.config.chunk_size as u64;
        let chunk_count = total_samples.div_ceil(chunk_size);
        let mut report = TransmitReport {
            total_samples,
            chunks_sent: 0,
            bytes_sent: 0,
            outcome: TransmitOutcome::Completed,
        };

        for index in 0..chunk_count {
            if shutdown_requested(shutdown_rx) {
                info!(target: LOG_TARGET, "Shutdown requested before chunk {}, stopping.", index);
                report.outcome = TransmitOutcome::Interrupted;
                return Ok(report);
            }

            let wanted = (total_samples - report.bytes_sent).min(chunk_size) as usize;
            let samples = source.read_samples(wanted)?;
            if samples.is_empty() {
                return Err(StreamError::TruncatedSource {
                    expected: total_samples,
                    sent: report.bytes_sent,
                });
            }

            Self::send_chunk(&mut *link, &samples).await?;
            report.chunks_sent += 1;
            report.bytes_sent += samples.len() as u64;
            trace!(
                target: LOG_TARGET,
                "Sent chunk {}/{} ({} bytes)", index + 1, chunk_count, samples.len()
            );

            if let Some(progress) = &self.progress {
                let mut guard = progress.lock().await;
                guard.samples_sent = report.bytes_sent;
                guard.chunks_sent = report.chunks_sent;
            }

            if samples.len() < wanted {
                return Err(StreamError::TruncatedSource {
                    expected: total_samples,
                    sent: report.bytes_sent,
                });
            }

            if self.pace(shutdown_rx).await {
                info!(target: LOG_TARGET, "Shutdown requested during pacing delay, stopping.");
                report.outcome = TransmitOutcome::Interrupted;
                return Ok(report);
            }
        }

        Ok(report)
    }

    /// Sleeps for the pacing delay. Returns true if shutdown was signalled meanwhile.
    async fn pace(&self, shutdown_rx: &mut broadcast::Receiver<()>) -> bool {
        let sleep = time::sleep(self.config.pacing_delay);
        tokio::pin!(sleep);

        tokio::select! {
            _ = &mut sleep => false,
            signal = shutdown_rx.recv() => match signal {
                // Nobody can signal any more; finish the delay normally.
                Err(broadcast::error::RecvError::Closed) => {
                    (&mut sleep).await;
                    false
                }
                _ => true,
            },
        }
    }
}

fn shutdown_requested(shutdown_rx: &mut broadcast::Receiver<()>) -> bool {
    match shutdown_rx.try_recv() {
        Ok(()) => true,
        Err(broadcast::error::TryRecvError::Lagged(_)) => {
            warn!(target: LOG_TARGET, "Shutdown receiver lagged, treating as shutdown.");
            true
        }
        Err(broadcast::error::TryRecvError::Empty) | Err(broadcast::error::TryRecvError::Closed) => {
            false
        }
    }
}
