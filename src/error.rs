use std::error::Error;
use std::io;
use symphonia::core::errors::Error as SymphoniaError;

/// Error types for a single streaming pass.
#[derive(Debug)]
pub enum StreamError {
    IoError(io::Error),
    SymphoniaError(SymphoniaError),
    DecodingError(String),
    UnsupportedFormat(String),
    MissingCodecParams(&'static str),
    SerialError(serialport::Error),
    PreambleOverflow(u64),
    InvalidPreamble(String),
    TruncatedSource { expected: u64, sent: u64 },
    InvalidState(String),
    TransportError(String),
    TaskJoinError(String),
}

impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamError::IoError(e) => write!(f, "I/O error: {}", e),
            StreamError::SymphoniaError(e) => write!(f, "Symphonia error: {}", e),
            StreamError::DecodingError(e) => write!(f, "Decoding error: {}", e),
            StreamError::UnsupportedFormat(s) => write!(f, "Unsupported format: {}", s),
            StreamError::MissingCodecParams(s) => write!(f, "Missing codec parameters: {}", s),
            StreamError::SerialError(e) => write!(f, "Serial error: {}", e),
            StreamError::PreambleOverflow(n) => {
                write!(f, "Sample count {} does not fit in a 10-digit preamble", n)
            }
            StreamError::InvalidPreamble(s) => write!(f, "Invalid preamble: {}", s),
            StreamError::TruncatedSource { expected, sent } => write!(
                f,
                "Audio source ended early: announced {} samples, sent {}",
                expected, sent
            ),
            StreamError::InvalidState(s) => write!(f, "Invalid state: {}", s),
            StreamError::TransportError(s) => write!(f, "Transport error: {}", s),
            StreamError::TaskJoinError(e) => write!(f, "Async task join error: {}", e),
        }
    }
}

impl Error for StreamError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StreamError::IoError(e) => Some(e),
            StreamError::SymphoniaError(e) => Some(e),
            StreamError::SerialError(e) => Some(e),
            _ => None,
        }
    }
}

// --- From Implementations for StreamError ---

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        StreamError::IoError(e)
    }
}

impl From<SymphoniaError> for StreamError {
    fn from(e: SymphoniaError) -> Self {
        StreamError::SymphoniaError(e)
    }
}

impl From<serialport::Error> for StreamError {
    fn from(e: serialport::Error) -> Self {
        StreamError::SerialError(e)
    }
}

impl From<tokio::task::JoinError> for StreamError {
    fn from(e: tokio::task::JoinError) -> Self {
        StreamError::TaskJoinError(e.to_string())
    }
}
