//! Append-only run log

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// File name of the shared run log
pub const RUN_LOG_FILE: &str = "ensemble_log.txt";

/// Append-only writer for the shared run log
///
/// The file is opened for each append and released before the call returns,
/// so no handle is held across survey iterations and a crash mid-run loses
/// at most the in-flight line. The file is never truncated.
#[derive(Debug, Clone)]
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    /// Create a sink for the given log path; the file is created on first append
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line to the log
    pub fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}
