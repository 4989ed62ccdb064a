//! Integration tests for streaming WAV files
//!
//! These run the full path from a WAV file on disk through the transmitter
//! into an in-memory transport.

use crate::test_utils::{constants, fast_settings, firmware_spec, ramp, write_u8_wav};
use r_wavstream::stream::{self, decode_preamble, TransmitOutcome};
use r_wavstream::transport::MemoryTransport;
use r_wavstream::StreamError;
use std::error::Error;
use tempfile::tempdir;
use tokio::sync::broadcast;

#[cfg(test)]
mod playback_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_wav_streams_preamble_then_payload() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        let wav_path = dir.path().join("speaking.wav");
        let samples = ramp(1000);
        write_u8_wav(&wav_path, firmware_spec(), &samples)?;

        let link = MemoryTransport::new();
        let writes = link.writes();
        let probe = link.probe();
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let report = stream::play_with(&fast_settings(&wav_path), link, shutdown_rx, None).await?;
        assert_eq!(report.outcome, TransmitOutcome::Completed);
        assert_eq!(report.total_samples, 1000);
        assert_eq!(report.chunks_sent, 2);

        let writes = writes.lock().unwrap();
        let preamble: Vec<u8> = writes[..constants::PREAMBLE_LEN].iter().map(|w| w[0]).collect();
        assert_eq!(preamble, b"0000001000".to_vec());
        assert_eq!(decode_preamble(&preamble)?, 1000);

        let payload = &writes[constants::PREAMBLE_LEN..];
        let sizes: Vec<usize> = payload.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![512, 488]);
        assert_eq!(payload.concat(), samples);

        assert_eq!((probe.opens(), probe.closes()), (1, 1));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_wav_sends_zero_preamble() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        let wav_path = dir.path().join("silence.wav");
        write_u8_wav(&wav_path, firmware_spec(), &[])?;

        let link = MemoryTransport::new();
        let writes = link.writes();
        let probe = link.probe();
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let report = stream::play_with(&fast_settings(&wav_path), link, shutdown_rx, None).await?;
        assert_eq!(report.chunks_sent, 0);

        let writes = writes.lock().unwrap();
        let preamble: Vec<u8> = writes.iter().map(|w| w[0]).collect();
        assert_eq!(preamble, b"0000000000".to_vec());
        assert!(probe.is_balanced());
        assert_eq!(probe.opens(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_wav_never_opens_link() {
        let dir = tempdir().unwrap();
        let wav_path = dir.path().join("missing.wav");

        let link = MemoryTransport::new();
        let probe = link.probe();
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let result = stream::play_with(&fast_settings(&wav_path), link, shutdown_rx, None).await;
        assert!(matches!(result, Err(StreamError::IoError(_))));
        assert_eq!(probe.opens(), 0);
    }

    #[tokio::test]
    async fn test_stereo_wav_rejected() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        let wav_path = dir.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            ..firmware_spec()
        };
        write_u8_wav(&wav_path, spec, &ramp(200))?;

        let link = MemoryTransport::new();
        let probe = link.probe();
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let result = stream::play_with(&fast_settings(&wav_path), link, shutdown_rx, None).await;
        assert!(matches!(result, Err(StreamError::UnsupportedFormat(_))));
        assert_eq!(probe.opens(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_lenient_sample_rate_streams() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        let wav_path = dir.path().join("fast.wav");
        let spec = hound::WavSpec {
            sample_rate: 9760,
            ..firmware_spec()
        };
        write_u8_wav(&wav_path, spec, &ramp(700))?;

        let mut settings = fast_settings(&wav_path);
        settings.strict_format = false;

        let link = MemoryTransport::new();
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let report = stream::play_with(&settings, link, shutdown_rx, None).await?;
        assert_eq!(report.bytes_sent, 700);
        Ok(())
    }

    #[tokio::test]
    async fn test_custom_chunk_size() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        let wav_path = dir.path().join("chunks.wav");
        write_u8_wav(&wav_path, firmware_spec(), &ramp(1000))?;

        let mut settings = fast_settings(&wav_path);
        settings.chunk_size = 300;

        let link = MemoryTransport::new();
        let writes = link.writes();
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
        stream::play_with(&settings, link, shutdown_rx, None).await?;

        let writes = writes.lock().unwrap();
        let sizes: Vec<usize> = writes[constants::PREAMBLE_LEN..].iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![300, 300, 300, 100]);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_serial_device_fails() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        let wav_path = dir.path().join("speaking.wav");
        write_u8_wav(&wav_path, firmware_spec(), &ramp(64))?;

        let mut settings = fast_settings(&wav_path);
        settings.serial_device = constants::MISSING_SERIAL_DEVICE.to_string();

        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let result = stream::play(&settings, shutdown_rx, None).await;
        assert!(matches!(result, Err(StreamError::SerialError(_))));
        Ok(())
    }
}
