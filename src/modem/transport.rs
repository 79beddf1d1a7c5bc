//! Modem transport trait and sounding data types

use crate::modem::{ModemError, ModemResult};
use serde::{Deserialize, Serialize};

/// Capture variant for a channel sounding request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureMode {
    /// Amplitude-only samples
    Magnitude,
    /// Interleaved real/imaginary sample pairs
    Complex,
}

impl CaptureMode {
    /// Single-character code appended to the sounding command
    pub fn command_code(&self) -> char {
        match self {
            CaptureMode::Magnitude => 'M',
            CaptureMode::Complex => 'C',
        }
    }

    /// Mode name used in console and log reporting
    pub fn display_name(&self) -> &'static str {
        match self {
            CaptureMode::Magnitude => "Magnitude",
            CaptureMode::Complex => "Complex",
        }
    }

    /// Heading used for the per-address report line
    pub fn report_heading(&self) -> &'static str {
        match self {
            CaptureMode::Magnitude => "Magnitudes",
            CaptureMode::Complex => "Complex",
        }
    }

    /// Short tag embedded in artifact file names
    pub fn file_tag(&self) -> &'static str {
        match self {
            CaptureMode::Magnitude => "mag",
            CaptureMode::Complex => "complex",
        }
    }
}

/// Sample payload of a sounding capture
#[derive(Debug, Clone, PartialEq)]
pub enum SampleData {
    /// One amplitude value per sample
    Magnitude(Vec<u8>),
    /// Paired real/imaginary values, one of each per sample
    Complex { real: Vec<u8>, imaginary: Vec<u8> },
}

/// One decoded channel-sounding response
#[derive(Debug, Clone, PartialEq)]
pub struct SoundingCapture {
    /// Elapsed time between probe and first detected response, in seconds
    pub time_of_arrival_s: f64,
    /// Number of samples in the capture (complex pairs count as one sample)
    pub sample_count: usize,
    /// Sample payload
    pub samples: SampleData,
}

impl SoundingCapture {
    /// Build a magnitude capture from decoded samples
    pub fn magnitude(time_of_arrival_s: f64, samples: Vec<u8>) -> Self {
        Self {
            time_of_arrival_s,
            sample_count: samples.len(),
            samples: SampleData::Magnitude(samples),
        }
    }

    /// Build a complex capture from paired real/imaginary sequences
    pub fn complex(
        time_of_arrival_s: f64,
        real: Vec<u8>,
        imaginary: Vec<u8>,
    ) -> ModemResult<Self> {
        if real.len() != imaginary.len() {
            return Err(ModemError::LengthMismatch {
                declared: real.len(),
                received: imaginary.len(),
            });
        }
        Ok(Self {
            time_of_arrival_s,
            sample_count: real.len(),
            samples: SampleData::Complex { real, imaginary },
        })
    }

    /// Validate and assemble a capture from a raw response payload
    ///
    /// `declared_count` is the value count announced in the response header,
    /// counted in raw values. A count that does not match the payload is a
    /// transport failure, never an out-of-bounds read. Complex payloads
    /// interleave real and imaginary values, so the declared count must be
    /// even and the resulting capture holds `declared_count / 2` sample pairs.
    pub fn from_raw(
        time_of_arrival_s: f64,
        declared_count: usize,
        mode: CaptureMode,
        raw: Vec<u8>,
    ) -> ModemResult<Self> {
        if raw.len() != declared_count {
            return Err(ModemError::LengthMismatch {
                declared: declared_count,
                received: raw.len(),
            });
        }
        match mode {
            CaptureMode::Magnitude => Ok(Self::magnitude(time_of_arrival_s, raw)),
            CaptureMode::Complex => {
                if declared_count % 2 != 0 {
                    return Err(ModemError::InvalidResponse {
                        details: format!(
                            "complex capture declared an odd value count {}",
                            declared_count
                        ),
                    });
                }
                let real = raw.iter().step_by(2).copied().collect();
                let imaginary = raw.iter().skip(1).step_by(2).copied().collect();
                Self::complex(time_of_arrival_s, real, imaginary)
            }
        }
    }
}

/// Status report from the local modem
#[derive(Debug, Clone, PartialEq)]
pub struct ModemStatus {
    /// Configured short-address
    pub address: u8,
    /// Battery voltage in volts
    pub battery_volts: f64,
    /// Firmware version string
    pub firmware_version: String,
    /// Firmware build date string
    pub build_date: String,
}

/// Command/response interface to an acoustic modem
///
/// One synchronous exchange per call over a half-duplex channel with a
/// bounded response window. A remote that does not answer yields
/// `ModemError::NoResponse`, never an indefinite block.
pub trait ModemTransport {
    /// Query the local modem's status ($?)
    fn query_status(&mut self) -> ModemResult<ModemStatus>;

    /// Set the local modem's short-address ($A); returns the acknowledged address
    fn set_address(&mut self, new_address: u8) -> ModemResult<u8>;

    /// Issue a channel-sounding probe to a remote ($C) and decode the timed response
    fn query_sounding(&mut self, address: u8, mode: CaptureMode) -> ModemResult<SoundingCapture>;

    /// Send a unicast payload and wait for the ack ($M); returns time of arrival in seconds
    fn send_unicast_with_ack(&mut self, address: u8, payload: &[u8]) -> ModemResult<f64>;

    /// Ping a remote ($P); returns time of arrival in seconds
    fn send_ping(&mut self, address: u8) -> ModemResult<f64>;
}
