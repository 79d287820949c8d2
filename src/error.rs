use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("could not open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("unsupported media format: {0}")]
    Format(#[source] symphonia::core::errors::Error),

    #[error("no decodeable audio track in the input")]
    NoAudioTrack,

    #[error("audio track is missing its sample rate")]
    MissingSampleRate,

    #[error("unsupported audio codec: {0}")]
    Codec(#[source] symphonia::core::errors::Error),

    #[error("could not write report to {path}: {source}")]
    Report { path: PathBuf, source: io::Error },

    #[error("could not write JSON output to {path}: {source}")]
    Json { path: PathBuf, source: io::Error },
}
