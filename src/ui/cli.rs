//! Command-line interface implementation

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use crate::config::{ConfigError, Settings};
use crate::stream::{TransmitOutcome, TransmitReport};

/// Command-line arguments for r-wavstream
#[derive(Parser, Debug)]
#[command(author, version, about = "Stream 8-bit PCM WAV audio to a microcontroller over serial", long_about = None)]
pub struct Args {
    /// WAV file to play (8000 Hz, 8-bit unsigned, mono)
    pub wav_path: Option<String>,

    /// Serial device the microcontroller is attached to
    #[arg(short = 'd', long, env = "WAVSTREAM_SERIAL_DEVICE")]
    pub serial_device: Option<String>,

    /// Serial baud rate
    #[arg(short, long, env = "WAVSTREAM_BAUD_RATE")]
    pub baud_rate: Option<u32>,

    /// Config file path
    #[arg(short, long, env = "WAVSTREAM_CONFIG")]
    pub config: Option<String>,

    /// Stream into memory instead of opening the serial device
    #[arg(long)]
    pub dry_run: bool,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// CLI user interface for interacting with the application
pub struct Cli {
    pub args: Args,
}

impl Cli {
    /// Create a new CLI instance
    pub fn new() -> Self {
        Cli {
            args: Args::parse(),
        }
    }

    /// Overlay command-line values on top of loaded settings
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(path) = &self.args.wav_path {
            settings.wav_path = path.clone();
        }
        if let Some(device) = &self.args.serial_device {
            settings.serial_device = device.clone();
        }
        if let Some(baud_rate) = self.args.baud_rate {
            settings.baud_rate = baud_rate;
        }
    }

    /// Load the config file, overlay command-line values and validate the result
    pub fn resolve_settings(&self) -> Result<Settings, ConfigError> {
        let config_path = match &self.args.config {
            Some(path) => PathBuf::from(path),
            None => Settings::default_path(),
        };
        let mut settings = Settings::load(&config_path)?;
        self.apply_overrides(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    /// Announce what is about to be played
    pub fn display_playback_start(&self, settings: &Settings) {
        if self.args.wav_path.is_some() {
            println!("Playing: {}", settings.wav_path);
        } else {
            println!("Playing default audio file: {}", settings.wav_path);
        }
    }

    /// Display the outcome of a transmission
    pub fn display_report(&self, report: &TransmitReport) {
        match report.outcome {
            TransmitOutcome::Completed => println!(
                "Sent {} samples in {} chunks.",
                report.bytes_sent, report.chunks_sent
            ),
            TransmitOutcome::Interrupted => println!(
                "Interrupted after {} of {} samples.",
                report.bytes_sent, report.total_samples
            ),
        }
    }

    /// Display error messages
    pub fn display_error(&self, error: &dyn Error) {
        eprintln!("{}", Self::error_message(error));
    }

    pub fn error_message(error: &dyn Error) -> String {
        format!("Error: {}", error)
    }
}
