//! Channel impulse response survey pipeline
//!
//! Per-address sounding acquisition with failure isolation, time-axis
//! reconstruction, and deterministic artifact persistence.

pub mod acquisition;
pub mod artifact;
pub mod log_sink;
pub mod time_axis;

pub use acquisition::{run_survey, SurveySummary};
pub use artifact::{artifact_base_name, ArtifactWriter, TIMESTAMP_FORMAT};
pub use log_sink::{LogSink, RUN_LOG_FILE};
pub use time_axis::{time_axis, CAPTURE_SAMPLE_RATE_HZ, PRE_TRIGGER_SAMPLES};

use std::fmt;

/// Fatal persistence errors for a survey run
///
/// A modem that does not answer is handled inside the loop; a filesystem
/// failure is not, since a silently dropped artifact would corrupt the
/// survey's completeness guarantee.
#[derive(Debug, Clone, PartialEq)]
pub enum SurveyError {
    /// Tabular artifact could not be written
    Artifact { path: String, message: String },
    /// Run log could not be appended
    Log { path: String, message: String },
}

impl fmt::Display for SurveyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveyError::Artifact { path, message } => {
                write!(f, "Failed to write artifact {}: {}", path, message)
            }
            SurveyError::Log { path, message } => {
                write!(f, "Failed to append run log {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for SurveyError {}

/// Result type for survey operations
pub type SurveyResult<T> = Result<T, SurveyError>;
