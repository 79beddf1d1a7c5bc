//! Acoustic modem transport layer
//!
//! Command/response access to NM3-class acoustic modems over a serial line,
//! with a mock implementation for tests and development.

pub mod error;
pub mod mock;
pub mod serial;
pub mod transport;

pub use error::{ModemError, ModemResult};
pub use mock::MockModem;
pub use serial::Nm3SerialModem;
pub use transport::{CaptureMode, ModemStatus, ModemTransport, SampleData, SoundingCapture};
