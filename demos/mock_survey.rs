//! Survey pass against the mock transport, writing artifacts to ./demo_output

use ensemble_survey::{
    run_survey, ArtifactWriter, CaptureMode, LogSink, MockModem, SoundingCapture, RUN_LOG_FILE,
};
use std::fs;

fn main() {
    let output_dir = std::path::PathBuf::from("demo_output");
    fs::create_dir_all(&output_dir).expect("failed to create demo_output");

    let mut modem = MockModem::new(228);
    modem.queue_capture(
        123,
        SoundingCapture::magnitude(0.131, (0..64).map(|i| (i * 3 % 251) as u8).collect()),
    );
    modem.queue_capture(125, SoundingCapture::magnitude(0.214, vec![12; 32]));
    // 124 and 126 stay silent

    let log = LogSink::new(output_dir.join(RUN_LOG_FILE));
    let writer = ArtifactWriter::new(&output_dir, log);

    println!("Channel Impulse Response");
    let summary = run_survey(
        &mut modem,
        &[123, 124, 125, 126],
        CaptureMode::Magnitude,
        &writer,
    )
    .expect("persistence failure");

    println!(
        "Survey complete: {} attempted, {} captured, {} failed",
        summary.attempted, summary.captured, summary.failed
    );
}
