//! Per-address acquisition loop

use crate::modem::{CaptureMode, ModemTransport};
use crate::survey::artifact::{ArtifactWriter, TIMESTAMP_FORMAT};
use crate::survey::SurveyResult;
use chrono::Local;

/// Outcome counts for one survey pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurveySummary {
    /// Addresses processed
    pub attempted: usize,
    /// Captures persisted
    pub captured: usize,
    /// Remotes that never answered
    pub failed: usize,
}

/// Run one sounding pass over the configured remote addresses
///
/// Addresses are visited strictly in the given order, duplicates included,
/// one exchange per address with no retries. A remote that does not answer
/// is recorded and the pass continues; only a persistence failure aborts
/// the run. Each address yields exactly one artifact-writer invocation.
pub fn run_survey(
    modem: &mut dyn ModemTransport,
    addresses: &[u8],
    mode: CaptureMode,
    writer: &ArtifactWriter,
) -> SurveyResult<SurveySummary> {
    let mut summary = SurveySummary::default();

    for &address in addresses {
        println!("{}: Remote Address={:03}", mode.report_heading(), address);
        let outcome = modem.query_sounding(address, mode);
        // capture timestamp is taken after the exchange completes
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        summary.attempted += 1;

        match outcome {
            Ok(capture) => {
                println!(" Time of Arrival={:.6} seconds", capture.time_of_arrival_s);
                println!(" Data Count={:04}", capture.sample_count);
                let file_name = writer.record_success(address, mode, &capture, &timestamp)?;
                println!(
                    " Channel Impulse Response ({}) saved to file ={}",
                    mode.display_name(),
                    file_name
                );
                summary.captured += 1;
            }
            Err(error) => {
                println!(" Error: {}", error);
                writer.record_failure(address, mode, &timestamp)?;
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
