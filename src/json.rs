use std::path::Path;

use serde::Serialize;
use serde_json::{json, to_string_pretty};

use crate::error::ScanError;
use crate::silence::SilentInterval;

#[derive(Serialize)]
struct SilenceSegment {
    start: f64,
    end: f64,
    duration: f64,
}

pub fn write_json(
    path: &Path,
    threshold: f64,
    intervals: &[SilentInterval],
) -> Result<(), ScanError> {
    let segments: Vec<SilenceSegment> = intervals
        .iter()
        .map(|interval| SilenceSegment {
            start: interval.start,
            end: interval.end,
            duration: interval.duration(),
        })
        .collect();

    let json_value = json!({
        "silence": {
            "results": segments,
            "threshold": threshold,
        }
    });

    let body = to_string_pretty(&json_value).map_err(|source| ScanError::Json {
        path: path.to_path_buf(),
        source: source.into(),
    })?;
    std::fs::write(path, body).map_err(|source| ScanError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    println!("Wrote JSON output to {}", path.display());
    Ok(())
}
