//! Tests for byte transports

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::error::StreamError;
    use std::time::Duration;

    #[tokio::test]
    async fn test_memory_transport_records_writes() -> Result<(), StreamError> {
        let mut link = MemoryTransport::new();
        let writes = link.writes();

        link.open().await?;
        link.write_chunk(b"ab").await?;
        link.write_chunk(&[0x80; 3]).await?;
        link.close().await?;

        let writes = writes.lock().unwrap();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0], b"ab".to_vec());
        assert_eq!(writes[1], vec![0x80; 3]);
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_transport_write_before_open() {
        let mut link = MemoryTransport::new();
        let result = link.write_chunk(&[1]).await;
        assert!(matches!(result, Err(StreamError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_memory_transport_close_once() -> Result<(), StreamError> {
        let mut link = MemoryTransport::new();
        let probe = link.probe();
        link.open().await?;
        link.close().await?;
        link.close().await?;
        drop(link);
        assert_eq!(probe.opens(), 1);
        assert_eq!(probe.closes(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_transport_drop_releases() -> Result<(), StreamError> {
        let mut link = MemoryTransport::new();
        let probe = link.probe();
        link.open().await?;
        drop(link);
        assert!(probe.is_balanced());
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_transport_simulated_failure() -> Result<(), StreamError> {
        let mut link = MemoryTransport::new().fail_on_write(1);
        let writes = link.writes();
        link.open().await?;
        link.write_chunk(&[1]).await?;
        let result = link.write_chunk(&[2]).await;
        assert!(matches!(result, Err(StreamError::TransportError(_))));
        assert_eq!(writes.lock().unwrap().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_serial_transport_missing_device() {
        let mut link = SerialTransport::new(
            "/dev/r-wavstream-no-such-device",
            2_000_000,
            Duration::from_secs(1),
        );
        assert_eq!(link.describe(), "/dev/r-wavstream-no-such-device @ 2000000 baud");

        let result = link.open().await;
        assert!(matches!(result, Err(StreamError::SerialError(_))));
        assert!(!link.is_open());
        // Closing a link that never opened is fine.
        assert!(link.close().await.is_ok());
    }

    #[tokio::test]
    async fn test_serial_transport_write_when_closed() {
        let mut link = SerialTransport::new("/dev/null-serial", 9600, Duration::from_secs(1));
        let result = link.write_chunk(&[0]).await;
        assert!(matches!(result, Err(StreamError::InvalidState(_))));
    }
}
