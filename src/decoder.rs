//! Symphonia-backed decode boundary.
//!
//! Demuxes the container, picks the first decodeable audio track and yields
//! interleaved i16 frames with presentation timestamps already converted to
//! seconds. The detection core never sees ticks or time-bases.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;
use tracing::warn;

use crate::error::ScanError;

/// One decode unit: interleaved samples across all channels plus its
/// presentation time in seconds.
pub struct DecodedFrame<'a> {
    pub timestamp: f64,
    pub samples: &'a [i16],
}

pub struct AudioDecoder {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    time_base: TimeBase,
    sample_rate: u32,
    channels: usize,
    duration_ticks: Option<u64>,
    sample_buf: Option<SampleBuffer<i16>>,
    position_ticks: u64,
    last_timestamp: f64,
}

impl AudioDecoder {
    pub fn open(path: &Path) -> Result<Self, ScanError> {
        let file = File::open(path).map_err(|source| ScanError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(ScanError::Format)?;

        let format = probed.format;
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(ScanError::NoAudioTrack)?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or(ScanError::MissingSampleRate)?;
        let channels = codec_params.channels.map(|c| c.count()).unwrap_or(1);
        let time_base = codec_params
            .time_base
            .unwrap_or_else(|| TimeBase::new(1, sample_rate));

        let decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(ScanError::Codec)?;

        Ok(Self {
            format,
            decoder,
            track_id,
            time_base,
            sample_rate,
            channels,
            duration_ticks: codec_params.n_frames,
            sample_buf: None,
            position_ticks: 0,
            last_timestamp: 0.0,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Total stream duration in ticks of the track time-base, when the
    /// container declares it.
    pub fn duration_ticks(&self) -> Option<u64> {
        self.duration_ticks
    }

    /// Total stream duration in seconds, when known.
    pub fn duration(&self) -> Option<f64> {
        self.duration_ticks.map(|ticks| self.ticks_to_seconds(ticks))
    }

    /// Presentation timestamp of the most recent frame, in ticks.
    pub fn position_ticks(&self) -> u64 {
        self.position_ticks
    }

    /// The timestamp to flush a trailing silent interval with: the declared
    /// stream duration, or the last observed frame time if the container
    /// does not declare one.
    pub fn best_known_end(&self) -> f64 {
        self.duration().unwrap_or(self.last_timestamp)
    }

    /// Next decoded frame in presentation order, or `None` at end-of-stream.
    ///
    /// Undecodable packets are skipped with a warning; terminal demux or
    /// decode errors end the stream early so the caller can still flush.
    pub fn next_frame(&mut self) -> Option<DecodedFrame<'_>> {
        let timestamp = self.advance()?;
        let samples = self
            .sample_buf
            .as_ref()
            .map(|buf| buf.samples())
            .unwrap_or(&[]);
        Some(DecodedFrame { timestamp, samples })
    }

    fn advance(&mut self) -> Option<f64> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref err))
                    if err.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return None;
                }
                Err(SymphoniaError::ResetRequired) => return None,
                Err(err) => {
                    warn!(error = %err, "terminal demux error, stopping early");
                    return None;
                }
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let pts = packet.ts();

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::DecodeError(_)) => {
                    warn!("skipping undecodable packet");
                    continue;
                }
                Err(err) => {
                    warn!(error = %err, "terminal decode error, stopping early");
                    return None;
                }
            };

            let spec = *decoded.spec();
            let num_frames = decoded.capacity();

            let buf = self
                .sample_buf
                .get_or_insert_with(|| SampleBuffer::new(num_frames as u64, spec));
            if buf.capacity() < num_frames {
                *buf = SampleBuffer::new(num_frames as u64, spec);
            }
            buf.copy_interleaved_ref(decoded);

            let timestamp = self.ticks_to_seconds(pts);
            self.position_ticks = pts;
            self.last_timestamp = timestamp;
            return Some(timestamp);
        }
    }

    fn ticks_to_seconds(&self, ticks: u64) -> f64 {
        let time = self.time_base.calc_time(ticks);
        time.seconds as f64 + time.frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::frame_energy;
    use crate::silence::{SilenceTracker, SilentInterval};

    /// Write a WAV with one second of near-full-scale square wave, one second
    /// of digital silence, then another second of square wave.
    fn write_loud_silent_loud(path: &Path, sample_rate: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for section in 0..3u32 {
            for i in 0..sample_rate {
                let sample = if section == 1 {
                    0i16
                } else if i % 2 == 0 {
                    30000
                } else {
                    -30000
                };
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn decodes_wav_stream_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_loud_silent_loud(&path, 16000);

        let decoder = AudioDecoder::open(&path).unwrap();
        assert_eq!(decoder.sample_rate(), 16000);
        assert_eq!(decoder.channels(), 1);
        let duration = decoder.duration().expect("wav declares duration");
        assert!((duration - 3.0).abs() < 0.01, "got {duration}");
    }

    #[test]
    fn timestamps_are_non_decreasing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_loud_silent_loud(&path, 16000);

        let mut decoder = AudioDecoder::open(&path).unwrap();
        let mut previous = 0.0;
        while let Some(frame) = decoder.next_frame() {
            assert!(frame.timestamp >= previous);
            assert!(!frame.samples.is_empty());
            previous = frame.timestamp;
        }
    }

    #[test]
    fn detects_the_silent_middle_second() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_loud_silent_loud(&path, 16000);

        let mut decoder = AudioDecoder::open(&path).unwrap();
        let mut tracker = SilenceTracker::new(0.265);
        let mut intervals: Vec<SilentInterval> = Vec::new();
        while let Some(frame) = decoder.next_frame() {
            let energy = frame_energy(frame.samples);
            intervals.extend(tracker.observe(frame.timestamp, energy));
        }
        intervals.extend(tracker.flush(decoder.best_known_end()));

        assert_eq!(intervals.len(), 1);
        let interval = intervals[0];
        // Interval boundaries land on packet timestamps, so allow a few
        // packets of slack around the 1s..2s silent section.
        assert!((interval.start - 1.0).abs() < 0.55, "start {}", interval.start);
        assert!((interval.end - 2.0).abs() < 0.55, "end {}", interval.end);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let result = AudioDecoder::open(Path::new("/nonexistent/clip.mp4"));
        assert!(matches!(result, Err(ScanError::Open { .. })));
    }
}
