//! Application settings and configuration management

use crate::stream::{TransmitConfig, DEFAULT_CHUNK_SIZE, DEFAULT_PACING_DELAY};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    /// WAV file to stream when none is given on the command line
    #[serde(default = "default_wav_path")]
    pub wav_path: String,
    /// Serial device the microcontroller is attached to
    #[serde(default = "default_serial_device")]
    pub serial_device: String,
    /// Must match the firmware's configured baud rate
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Read timeout applied when opening the port (milliseconds)
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// Bytes per write; must match the firmware receive buffer
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Delay after every chunk (milliseconds)
    #[serde(default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,
    /// Reject WAV files whose sample rate is not 8000 Hz
    #[serde(default = "default_strict_format")]
    pub strict_format: bool,
}

fn default_wav_path() -> String {
    "./music/speaking.wav".to_string()
}

fn default_serial_device() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud_rate() -> u32 {
    2_000_000
}

fn default_read_timeout_ms() -> u64 {
    1000
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_pacing_delay_ms() -> u64 {
    DEFAULT_PACING_DELAY.as_millis() as u64
}

fn default_strict_format() -> bool {
    true
}

/// Error types for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    IoError(io::Error),
    ParseError(String),
    ValidationError(String),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigError::ParseError(s) => write!(f, "Parse error: {}", s),
            ConfigError::ValidationError(s) => write!(f, "Validation error: {}", s),
        }
    }
}

impl Error for ConfigError {}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            wav_path: default_wav_path(),
            serial_device: default_serial_device(),
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout_ms(),
            chunk_size: default_chunk_size(),
            pacing_delay_ms: default_pacing_delay_ms(),
            strict_format: default_strict_format(),
        }
    }
}

impl Settings {
    /// Load settings from a file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(&self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("wavstream").join("config.json")
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wav_path.is_empty() {
            return Err(ConfigError::ValidationError("WAV path cannot be empty".to_string()));
        }

        if self.serial_device.is_empty() {
            return Err(ConfigError::ValidationError("Serial device cannot be empty".to_string()));
        }

        if self.baud_rate == 0 {
            return Err(ConfigError::ValidationError("Baud rate must be greater than zero".to_string()));
        }

        if self.chunk_size == 0 {
            return Err(ConfigError::ValidationError("Chunk size must be greater than zero".to_string()));
        }

        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn transmit_config(&self) -> TransmitConfig {
        TransmitConfig {
            chunk_size: self.chunk_size,
            pacing_delay: Duration::from_millis(self.pacing_delay_ms),
        }
    }
}
