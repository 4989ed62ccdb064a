//! Integration tests for configuration management
//!
//! These tests verify that the configuration system works correctly
//! across module boundaries.

use r_wavstream::config::Settings;
use std::error::Error;
use tempfile::tempdir;

#[cfg(test)]
mod config_integration_tests {
    use super::*;

    /// Test complete configuration workflow
    #[test]
    fn test_config_lifecycle() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        let config_path = dir.path().join("config.json");

        let mut settings = Settings::default();
        settings.wav_path = "/srv/audio/announcement.wav".to_string();
        settings.serial_device = "/dev/ttyACM0".to_string();
        settings.baud_rate = 1_000_000;
        settings.chunk_size = 256;
        settings.pacing_delay_ms = 40;

        settings.validate()?;
        settings.save(&config_path)?;

        let loaded = Settings::load(&config_path)?;
        assert_eq!(loaded.wav_path, "/srv/audio/announcement.wav");
        assert_eq!(loaded.serial_device, "/dev/ttyACM0");
        assert_eq!(loaded.baud_rate, 1_000_000);

        let transmit = loaded.transmit_config();
        assert_eq!(transmit.chunk_size, 256);
        assert_eq!(transmit.pacing_delay.as_millis(), 40);

        // Test overriding settings
        let mut updated = loaded;
        updated.strict_format = false;
        updated.save(&config_path)?;

        let reloaded = Settings::load(&config_path)?;
        assert!(!reloaded.strict_format);

        Ok(())
    }

    /// Test invalid configuration handling
    #[test]
    fn test_invalid_config_validation() {
        let invalid = Settings {
            serial_device: "".to_string(),
            ..Settings::default()
        };

        let result = invalid.validate();
        assert!(result.is_err());

        if let Err(e) = result {
            assert!(e.to_string().contains("Serial device cannot be empty"));
        }

        let no_path = Settings {
            wav_path: "".to_string(),
            ..Settings::default()
        };
        assert!(no_path.validate().is_err());
    }
}
