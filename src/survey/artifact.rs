//! Artifact naming and persistence for sounding captures

use crate::modem::{CaptureMode, SampleData, SoundingCapture};
use crate::survey::log_sink::LogSink;
use crate::survey::time_axis::time_axis;
use crate::survey::{SurveyError, SurveyResult};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

/// Capture timestamp format, one-second resolution
///
/// Two captures for the same address within the same second collide on the
/// same artifact name and the later write wins. Intended behavior under
/// collision is unspecified upstream, so no guard is applied here.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y-%H-%M-%S";

/// Artifact base name for one capture: `id-{addr:03}-{mode}-{timestamp}`
///
/// Pure function of its inputs; identical inputs yield identical names.
pub fn artifact_base_name(address: u8, mode: CaptureMode, timestamp: &str) -> String {
    format!("id-{:03}-{}-{}", address, mode.file_tag(), timestamp)
}

/// Writes per-capture CSV artifacts and the shared run log
///
/// Every processed address produces exactly one log contribution: four lines
/// for a capture, one line for a silent remote. Filesystem failures are
/// returned, never swallowed; a dropped artifact would break the survey's
/// completeness guarantee.
pub struct ArtifactWriter {
    output_dir: PathBuf,
    log: LogSink,
}

impl ArtifactWriter {
    /// Create a writer rooted at `output_dir`, logging through `log`
    pub fn new<P: Into<PathBuf>>(output_dir: P, log: LogSink) -> Self {
        Self {
            output_dir: output_dir.into(),
            log,
        }
    }

    /// Persist a successful capture; returns the artifact file name
    ///
    /// Writes the CSV (create-or-truncate, so a same-identity rewrite stays
    /// well-formed), then appends the four report lines to the run log.
    pub fn record_success(
        &self,
        address: u8,
        mode: CaptureMode,
        capture: &SoundingCapture,
        timestamp: &str,
    ) -> SurveyResult<String> {
        let file_name = format!("{}.csv", artifact_base_name(address, mode, timestamp));
        let path = self.output_dir.join(&file_name);

        fs::write(&path, render_csv(capture)).map_err(|e| SurveyError::Artifact {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let lines = [
            format!(
                "{} {}: Remote Address={:03}",
                timestamp,
                mode.report_heading(),
                address
            ),
            format!(
                "{} Time of Arrival={} seconds",
                timestamp, capture.time_of_arrival_s
            ),
            format!("{} Data Count={}", timestamp, capture.sample_count),
            format!(
                "{} Channel Impulse Response ({}) saved to file ={}",
                timestamp,
                mode.display_name(),
                file_name
            ),
        ];
        for line in &lines {
            self.append_log(line)?;
        }

        Ok(file_name)
    }

    /// Record a silent remote: one log line, no artifact file
    pub fn record_failure(
        &self,
        address: u8,
        mode: CaptureMode,
        timestamp: &str,
    ) -> SurveyResult<()> {
        self.append_log(&format!(
            "{} {} query - No response from modem id={:03}",
            timestamp,
            mode.display_name(),
            address
        ))
    }

    fn append_log(&self, line: &str) -> SurveyResult<()> {
        self.log.append(line).map_err(|e| SurveyError::Log {
            path: self.log.path().display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Render the sample table: one row per sample in ascending index order,
/// elapsed time paired positionally with the sample values, no header
fn render_csv(capture: &SoundingCapture) -> String {
    let axis = time_axis(capture.sample_count);
    let mut table = String::new();
    match &capture.samples {
        SampleData::Magnitude(values) => {
            for (t, v) in axis.iter().zip(values) {
                let _ = writeln!(table, "{},{}", t, v);
            }
        }
        SampleData::Complex { real, imaginary } => {
            for ((t, re), im) in axis.iter().zip(real).zip(imaginary) {
                let _ = writeln!(table, "{},{},{}", t, re, im);
            }
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::log_sink::RUN_LOG_FILE;
    use std::fs;

    fn writer_in(dir: &std::path::Path) -> ArtifactWriter {
        ArtifactWriter::new(dir, LogSink::new(dir.join(RUN_LOG_FILE)))
    }

    #[test]
    fn test_base_name_is_deterministic() {
        let a = artifact_base_name(123, CaptureMode::Magnitude, "20-05-2022-14-03-59");
        let b = artifact_base_name(123, CaptureMode::Magnitude, "20-05-2022-14-03-59");
        assert_eq!(a, b);
        assert_eq!(a, "id-123-mag-20-05-2022-14-03-59");

        let c = artifact_base_name(7, CaptureMode::Complex, "20-05-2022-14-03-59");
        assert_eq!(c, "id-007-complex-20-05-2022-14-03-59");
    }

    #[test]
    fn test_success_pairs_axis_with_samples() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(dir.path());
        let capture = SoundingCapture::magnitude(0.125, vec![10, 20, 30, 40]);

        let file_name = writer
            .record_success(123, CaptureMode::Magnitude, &capture, "01-01-2024-00-00-00")
            .unwrap();
        assert_eq!(file_name, "id-123-mag-01-01-2024-00-00-00.csv");

        let content = fs::read_to_string(dir.path().join(&file_name)).unwrap();
        let rows: Vec<&str> = content.lines().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], "-0.00625,10");
        assert_eq!(rows[1], "-0.0061875,20");
        assert_eq!(rows[3], "-0.0060625,40");
    }

    #[test]
    fn test_success_appends_four_log_lines() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(dir.path());
        let capture = SoundingCapture::magnitude(0.125, vec![1, 2]);

        writer
            .record_success(125, CaptureMode::Magnitude, &capture, "01-01-2024-00-00-00")
            .unwrap();

        let log = fs::read_to_string(dir.path().join(RUN_LOG_FILE)).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "01-01-2024-00-00-00 Magnitudes: Remote Address=125");
        assert_eq!(lines[1], "01-01-2024-00-00-00 Time of Arrival=0.125 seconds");
        assert_eq!(lines[2], "01-01-2024-00-00-00 Data Count=2");
        assert_eq!(
            lines[3],
            "01-01-2024-00-00-00 Channel Impulse Response (Magnitude) saved to file \
             =id-125-mag-01-01-2024-00-00-00.csv"
        );
    }

    #[test]
    fn test_failure_appends_one_line_and_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(dir.path());

        writer
            .record_failure(124, CaptureMode::Magnitude, "01-01-2024-00-00-00")
            .unwrap();

        let log = fs::read_to_string(dir.path().join(RUN_LOG_FILE)).unwrap();
        assert_eq!(
            log,
            "01-01-2024-00-00-00 Magnitude query - No response from modem id=124\n"
        );
        // only the log file exists
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_same_identity_overwrites_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(dir.path());
        let timestamp = "01-01-2024-00-00-00";

        let first = SoundingCapture::magnitude(0.1, vec![9; 16]);
        let second = SoundingCapture::magnitude(0.2, vec![10, 20, 30, 40]);
        writer
            .record_success(123, CaptureMode::Magnitude, &first, timestamp)
            .unwrap();
        let file_name = writer
            .record_success(123, CaptureMode::Magnitude, &second, timestamp)
            .unwrap();

        // last write wins and the table is well-formed
        let content = fs::read_to_string(dir.path().join(&file_name)).unwrap();
        let rows: Vec<&str> = content.lines().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], "-0.00625,10");
    }

    #[test]
    fn test_complex_rows_have_three_columns() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(dir.path());
        let capture = SoundingCapture::complex(0.1, vec![1, 3], vec![2, 4]).unwrap();

        let file_name = writer
            .record_success(126, CaptureMode::Complex, &capture, "01-01-2024-00-00-00")
            .unwrap();
        assert_eq!(file_name, "id-126-complex-01-01-2024-00-00-00.csv");

        let content = fs::read_to_string(dir.path().join(&file_name)).unwrap();
        let rows: Vec<&str> = content.lines().collect();
        assert_eq!(rows, vec!["-0.00625,1,2", "-0.0061875,3,4"]);
    }

    #[test]
    fn test_unwritable_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(
            dir.path().join("missing"),
            LogSink::new(dir.path().join(RUN_LOG_FILE)),
        );
        let capture = SoundingCapture::magnitude(0.1, vec![1]);
        let result =
            writer.record_success(123, CaptureMode::Magnitude, &capture, "01-01-2024-00-00-00");
        assert!(matches!(result, Err(SurveyError::Artifact { .. })));
    }
}
