//! Modem communication error types

use std::fmt;

/// Error types for modem command/response exchanges
///
/// Every variant is recoverable at the survey level: a failed exchange with
/// one remote never prevents the next remote from being queried.
#[derive(Debug, Clone, PartialEq)]
pub enum ModemError {
    /// No response from the addressed remote within the response window
    NoResponse { address: u8 },
    /// No data from the local modem within the given bound
    Timeout { waited_ms: u64 },
    /// Serial line I/O failure
    Io { message: String },
    /// Response frame could not be parsed
    InvalidResponse { details: String },
    /// Declared value count does not match the received payload
    LengthMismatch { declared: usize, received: usize },
}

impl fmt::Display for ModemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModemError::NoResponse { address } => {
                write!(f, "No response from modem id={:03}", address)
            }
            ModemError::Timeout { waited_ms } => {
                write!(f, "Modem did not answer within {}ms", waited_ms)
            }
            ModemError::Io { message } => {
                write!(f, "Serial I/O error: {}", message)
            }
            ModemError::InvalidResponse { details } => {
                write!(f, "Invalid response: {}", details)
            }
            ModemError::LengthMismatch { declared, received } => {
                write!(
                    f,
                    "Declared sample count {} does not match received count {}",
                    declared, received
                )
            }
        }
    }
}

impl std::error::Error for ModemError {}

/// Result type for modem operations
pub type ModemResult<T> = Result<T, ModemError>;
