use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ScanError;
use crate::silence::SilentInterval;

/// Render a time in seconds as `{minutes}m{seconds}s`.
///
/// Each endpoint computes its seconds remainder from its own minute count.
pub fn fmt_timestamp(t: f64) -> String {
    let minutes = (t / 60.0).floor();
    let seconds = t - minutes * 60.0;
    format!("{}m{:.3}s", minutes as u64, seconds)
}

/// Append-only sink for the human-readable report, one line per interval,
/// written in emission order.
pub struct ReportSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl ReportSink {
    pub fn create(path: &Path) -> Result<Self, ScanError> {
        let file = File::create(path).map_err(|source| ScanError::Report {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    pub fn write_interval(&mut self, interval: &SilentInterval) -> Result<(), ScanError> {
        writeln!(
            self.writer,
            "Silent time: {} - {}",
            fmt_timestamp(interval.start),
            fmt_timestamp(interval.end)
        )
        .map_err(|source| self.io_error(source))
    }

    pub fn finish(mut self) -> Result<(), ScanError> {
        self.writer.flush().map_err(|source| ScanError::Report {
            path: self.path.clone(),
            source,
        })
    }

    fn io_error(&self, source: std::io::Error) -> ScanError {
        ScanError::Report {
            path: self.path.clone(),
            source,
        }
    }
}
