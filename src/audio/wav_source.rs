use crate::audio::SampleSource;
use crate::error::StreamError;
use std::collections::VecDeque;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{
    CodecParameters, Decoder, DecoderOptions, CODEC_TYPE_NULL, CODEC_TYPE_PCM_U8,
};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info, instrument, trace, warn};

const LOG_TARGET: &str = "r_wavstream::audio::wav_source";

/// Sample rate the firmware plays back at.
pub const EXPECTED_SAMPLE_RATE: u32 = 8000;

/// Reads 8-bit unsigned mono PCM out of a RIFF/WAV file using Symphonia.
pub struct WavSource {
    path: PathBuf,
    format_reader: Option<Box<dyn FormatReader>>,
    decoder: Option<Box<dyn Decoder>>,
    track_id: u32,
    total_samples: u64,
    sample_rate: u32,
    pending: VecDeque<u8>,
    end_of_stream: bool,
}

impl WavSource {
    /// Opens and validates a WAV file.
    ///
    /// The codec must be unsigned 8-bit PCM with a single channel. When
    /// `strict_format` is set the sample rate must also be 8000 Hz, otherwise
    /// a mismatch is only logged.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), strict = strict_format))]
    pub fn open(path: impl AsRef<Path>, strict_format: bool) -> Result<Self, StreamError> {
        let path = path.as_ref();
        debug!(target: LOG_TARGET, "Opening WAV source {}", path.display());

        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;
        let format_reader = probed.format;

        let track = format_reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(StreamError::UnsupportedFormat("No audio track found".to_string()))?
            .clone();

        let (total_samples, sample_rate) = check_format(&track.codec_params, strict_format)?;
        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())?;

        info!(
            target: LOG_TARGET,
            "Opened {}: {} samples at {} Hz",
            path.display(), total_samples, sample_rate
        );

        Ok(WavSource {
            path: path.to_path_buf(),
            format_reader: Some(format_reader),
            decoder: Some(decoder),
            track_id: track.id,
            total_samples,
            sample_rate,
            pending: VecDeque::new(),
            end_of_stream: false,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Decodes packets until at least `wanted` samples are buffered or the stream ends.
    fn fill_pending(&mut self, wanted: usize) -> Result<(), StreamError> {
        while self.pending.len() < wanted && !self.end_of_stream {
            let reader = self
                .format_reader
                .as_mut()
                .ok_or_else(|| StreamError::InvalidState("WAV source is closed".to_string()))?;

            let packet = match reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    trace!(target: LOG_TARGET, "Reached end of WAV data.");
                    self.end_of_stream = true;
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoder = self
                .decoder
                .as_mut()
                .ok_or_else(|| StreamError::InvalidState("WAV source is closed".to_string()))?;

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    return Err(StreamError::DecodingError(e.to_string()))
                }
                Err(e) => return Err(e.into()),
            };

            let mut samples = SampleBuffer::<u8>::new(decoded.capacity() as u64, *decoded.spec());
            samples.copy_interleaved_ref(decoded);
            self.pending.extend(samples.samples().iter().copied());
        }
        Ok(())
    }
}

/// Returns `(total_samples, sample_rate)` for an acceptable track.
fn check_format(params: &CodecParameters, strict_format: bool) -> Result<(u64, u32), StreamError> {
    if params.codec != CODEC_TYPE_PCM_U8 {
        return Err(StreamError::UnsupportedFormat(format!(
            "expected 8-bit unsigned PCM, found codec {:?} ({} bits per sample)",
            params.codec,
            params
                .bits_per_sample
                .map_or_else(|| "unknown".to_string(), |b| b.to_string())
        )));
    }

    let channels = params
        .channels
        .ok_or(StreamError::MissingCodecParams("channels map"))?
        .count();
    if channels != 1 {
        return Err(StreamError::UnsupportedFormat(format!(
            "expected mono audio, found {} channels",
            channels
        )));
    }

    let sample_rate = params
        .sample_rate
        .ok_or(StreamError::MissingCodecParams("sample rate"))?;
    if sample_rate != EXPECTED_SAMPLE_RATE {
        if strict_format {
            return Err(StreamError::UnsupportedFormat(format!(
                "expected {} Hz, found {} Hz",
                EXPECTED_SAMPLE_RATE, sample_rate
            )));
        }
        warn!(
            target: LOG_TARGET,
            "Sample rate is {} Hz, firmware expects {} Hz. Playback speed will be off.",
            sample_rate, EXPECTED_SAMPLE_RATE
        );
    }

    let total_samples = params
        .n_frames
        .ok_or(StreamError::MissingCodecParams("frame count"))?;

    Ok((total_samples, sample_rate))
}

impl SampleSource for WavSource {
    fn total_samples(&self) -> u64 {
        self.total_samples
    }

    fn read_samples(&mut self, max: usize) -> Result<Vec<u8>, StreamError> {
        self.fill_pending(max)?;
        let take = max.min(self.pending.len());
        Ok(self.pending.drain(..take).collect())
    }

    fn close(&mut self) {
        if self.format_reader.is_some() || self.decoder.is_some() {
            self.decoder = None;
            self.format_reader = None;
            self.pending.clear();
            debug!(target: LOG_TARGET, "WAV source {} closed.", self.path.display());
        }
    }

    fn is_open(&self) -> bool {
        self.format_reader.is_some()
    }
}

impl Drop for WavSource {
    fn drop(&mut self) {
        self.close();
    }
}
