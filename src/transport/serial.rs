use crate::error::StreamError;
use crate::transport::Transport;
use async_trait::async_trait;
use serialport::SerialPort;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task;
use tracing::{debug, error, info, instrument, trace, warn};

const LOG_TARGET: &str = "r_wavstream::transport::serial";

type SharedPort = Arc<Mutex<Option<Box<dyn SerialPort>>>>;

/// Serial device link.
///
/// The serialport calls block, so open and write run on
/// `tokio::task::spawn_blocking`.
pub struct SerialTransport {
    device_path: String,
    baud_rate: u32,
    read_timeout: Duration,
    port: SharedPort,
}

impl SerialTransport {
    /// Creates a closed transport for the given device.
    pub fn new(device_path: &str, baud_rate: u32, read_timeout: Duration) -> Self {
        debug!(
            target: LOG_TARGET,
            "Creating SerialTransport for {} @ {} baud", device_path, baud_rate
        );
        SerialTransport {
            device_path: device_path.to_string(),
            baud_rate,
            read_timeout,
            port: Arc::new(Mutex::new(None)),
        }
    }

    /// Drops the port if one is held. Returns whether anything was released.
    fn release(&self) -> Result<bool, StreamError> {
        let mut guard = self
            .port
            .lock()
            .map_err(|_| StreamError::InvalidState("Serial port mutex poisoned".to_string()))?;
        Ok(guard.take().is_some())
    }
}

#[async_trait]
impl Transport for SerialTransport {
    #[instrument(skip(self), fields(device = %self.device_path, baud = self.baud_rate))]
    async fn open(&mut self) -> Result<(), StreamError> {
        if self.is_open() {
            return Err(StreamError::InvalidState(format!(
                "Serial device {} already open",
                self.device_path
            )));
        }

        let builder = serialport::new(self.device_path.clone(), self.baud_rate)
            .timeout(self.read_timeout);
        let port = task::spawn_blocking(move || builder.open())
            .await?
            .map_err(|e| {
                error!(target: LOG_TARGET, "Failed to open serial device: {}", e);
                StreamError::from(e)
            })?;

        let mut guard = self
            .port
            .lock()
            .map_err(|_| StreamError::InvalidState("Serial port mutex poisoned".to_string()))?;
        *guard = Some(port);
        info!(
            target: LOG_TARGET,
            "Opened serial device {} @ {} baud", self.device_path, self.baud_rate
        );
        Ok(())
    }

    async fn write_chunk(&mut self, bytes: &[u8]) -> Result<(), StreamError> {
        let port = Arc::clone(&self.port);
        let buffer = bytes.to_vec();

        trace!(target: LOG_TARGET, "Writing {} bytes in blocking task...", buffer.len());
        task::spawn_blocking(move || {
            let mut guard = port
                .lock()
                .map_err(|_| StreamError::InvalidState("Serial port mutex poisoned".to_string()))?;
            let port = guard
                .as_mut()
                .ok_or_else(|| StreamError::InvalidState("Serial port not open for writing".to_string()))?;
            port.write_all(&buffer)?;
            Ok::<(), StreamError>(())
        })
        .await?
    }

    async fn close(&mut self) -> Result<(), StreamError> {
        if self.release()? {
            info!(target: LOG_TARGET, "Closed serial device {}", self.device_path);
        } else {
            trace!(target: LOG_TARGET, "Serial device {} already closed", self.device_path);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.lock().map(|guard| guard.is_some()).unwrap_or(false)
    }

    fn describe(&self) -> String {
        format!("{} @ {} baud", self.device_path, self.baud_rate)
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        match self.release() {
            Ok(true) => debug!(target: LOG_TARGET, "Serial device {} released on drop", self.device_path),
            Ok(false) => {}
            Err(e) => warn!(target: LOG_TARGET, "Could not release serial device on drop: {}", e),
        }
    }
}
