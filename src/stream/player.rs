use crate::audio::WavSource;
use crate::config::Settings;
use crate::error::StreamError;
use crate::stream::progress::SharedProgress;
use crate::stream::transmitter::{StreamTransmitter, TransmitReport};
use crate::transport::{SerialTransport, Transport};
use tokio::sync::broadcast;
use tracing::{info, instrument};

const LOG_TARGET: &str = "r_wavstream::stream::player";

/// Plays `settings.wav_path` once over the configured serial device.
#[instrument(skip_all, fields(wav = %settings.wav_path, device = %settings.serial_device))]
pub async fn play(
    settings: &Settings,
    shutdown_rx: broadcast::Receiver<()>,
    progress: Option<SharedProgress>,
) -> Result<TransmitReport, StreamError> {
    let link = SerialTransport::new(
        &settings.serial_device,
        settings.baud_rate,
        settings.read_timeout(),
    );
    play_with(settings, link, shutdown_rx, progress).await
}

/// Plays `settings.wav_path` once over an arbitrary transport.
///
/// The WAV file is opened first; if that fails the link is never opened.
pub async fn play_with<T: Transport>(
    settings: &Settings,
    link: T,
    shutdown_rx: broadcast::Receiver<()>,
    progress: Option<SharedProgress>,
) -> Result<TransmitReport, StreamError> {
    let source = WavSource::open(&settings.wav_path, settings.strict_format)?;
    info!(target: LOG_TARGET, "Playing {} via {}", settings.wav_path, link.describe());

    let mut transmitter = StreamTransmitter::new(settings.transmit_config());
    if let Some(progress) = progress {
        transmitter = transmitter.with_progress(progress);
    }
    transmitter.run(source, link, shutdown_rx).await
}
