//! Acoustic Modem Channel-Sounding Survey
//!
//! Fleet survey tool for an underwater acoustic modem network: for a
//! configured local device and a list of remote short-addresses, issue a
//! channel-sounding command to each remote in turn, reconstruct the time
//! axis of the sampled response, and persist a per-node CSV artifact plus
//! a running human-readable log.

pub mod modem;
pub mod survey;
pub mod utils;

// Re-export commonly used types
pub use modem::{
    CaptureMode, MockModem, ModemError, ModemResult, ModemStatus, ModemTransport, Nm3SerialModem,
    SampleData, SoundingCapture,
};
pub use survey::{
    artifact_base_name, run_survey, time_axis, ArtifactWriter, LogSink, SurveyError, SurveyResult,
    SurveySummary, RUN_LOG_FILE, TIMESTAMP_FORMAT,
};
pub use utils::{short_address_for_host_octet, ConfigError, SurveyConfig};
