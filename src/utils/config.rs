//! Deployment configuration

use crate::modem::CaptureMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Deployment convention: a device's protocol short-address is its network
/// address last octet plus this offset (octet 8 -> address 228). The survey
/// core itself treats short-addresses as opaque integers.
pub const SHORT_ADDRESS_OFFSET: u8 = 220;

/// Derive a protocol short-address from a network address last octet
pub fn short_address_for_host_octet(octet: u8) -> u8 {
    octet.wrapping_add(SHORT_ADDRESS_OFFSET)
}

/// Survey deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Serial device of the local modem
    pub port: String,
    /// Serial line baud rate
    pub baud_rate: u32,
    /// Short-address assigned to the local modem before the survey
    pub local_address: u8,
    /// Remote short-addresses, surveyed in this order
    pub remote_addresses: Vec<u8>,
    /// Payload for unicast link checks
    pub message: Vec<u8>,
    /// Sounding capture variant
    pub capture_mode: CaptureMode,
    /// Directory receiving the run log and CSV artifacts
    pub output_dir: PathBuf,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            port: "/dev/modem".to_string(),
            baud_rate: 9600,
            local_address: short_address_for_host_octet(8),
            remote_addresses: vec![123, 124, 125, 126],
            message: b"Hello".to_vec(),
            capture_mode: CaptureMode::Magnitude,
            output_dir: PathBuf::from("."),
        }
    }
}

impl SurveyConfig {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            message: format!("{}: {}", path.as_ref().display(), e),
        })?;
        let config: SurveyConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Serialization {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialization {
                message: e.to_string(),
            })?;
        fs::write(&path, content).map_err(|e| ConfigError::Io {
            message: format!("{}: {}", path.as_ref().display(), e),
        })
    }

    /// Check parameters that would make the run unstartable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port.is_empty() {
            return Err(ConfigError::InvalidParameter {
                parameter: "port".to_string(),
                value: String::new(),
                reason: "serial device path cannot be empty".to_string(),
            });
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "baud_rate".to_string(),
                value: "0".to_string(),
                reason: "baud rate must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid parameter value
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Configuration file I/O error
    Io { message: String },
    /// JSON serialization/deserialization error
    Serialization { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid {} = {:?}: {}", parameter, value, reason)
            }
            ConfigError::Io { message } => write!(f, "Configuration I/O error: {}", message),
            ConfigError::Serialization { message } => {
                write!(f, "Configuration parse error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_deployment() {
        let config = SurveyConfig::default();
        assert_eq!(config.port, "/dev/modem");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.local_address, 228);
        assert_eq!(config.remote_addresses, vec![123, 124, 125, 126]);
        assert_eq!(config.message, b"Hello");
        assert_eq!(config.capture_mode, CaptureMode::Magnitude);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_address_convention() {
        assert_eq!(short_address_for_host_octet(8), 228);
        assert_eq!(short_address_for_host_octet(0), 220);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.json");

        let mut config = SurveyConfig::default();
        config.remote_addresses = vec![10, 20, 10];
        config.capture_mode = CaptureMode::Complex;
        config.save_to_file(&path).unwrap();

        let loaded = SurveyConfig::from_file(&path).unwrap();
        assert_eq!(loaded.remote_addresses, vec![10, 20, 10]);
        assert_eq!(loaded.capture_mode, CaptureMode::Complex);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = SurveyConfig::from_file("/nonexistent/survey.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_baud_rate_rejected() {
        let mut config = SurveyConfig::default();
        config.baud_rate = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }
}
