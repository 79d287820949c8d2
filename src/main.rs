mod cli;
mod decoder;
mod energy;
mod error;
mod json;
mod output;
mod report;
mod silence;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use decoder::AudioDecoder;
use energy::frame_energy;
use error::ScanError;
use output::Output;
use report::{ReportSink, fmt_timestamp};
use silence::{SilenceTracker, SilentInterval};

const ERR_CONTAINS_SILENCE: u8 = 0b0010;

/// Drive the decode loop: meter each frame, feed the tracker, and write every
/// closed interval to the report as it is emitted. Returns the intervals and
/// the end-of-stream timestamp used for the flush.
fn scan(args: &Cli, decoder: &mut AudioDecoder) -> Result<(Vec<SilentInterval>, f64), ScanError> {
    let mut tracker = SilenceTracker::new(args.threshold);
    let mut sink = ReportSink::create(Path::new(&args.output))?;
    let mut intervals = Vec::new();

    let output = Output::new(args, decoder.duration_ticks());

    while let Some(frame) = decoder.next_frame() {
        let energy = frame_energy(frame.samples);
        if args.debug {
            println!(
                "[{:>9.3}] DEBUG        : energy {:.6}",
                frame.timestamp, energy
            );
        }

        if let Some(interval) = tracker.observe(frame.timestamp, energy) {
            println!(
                "SILENCE      : {} -> {} ({:.3}s)",
                fmt_timestamp(interval.start),
                fmt_timestamp(interval.end),
                interval.duration()
            );
            sink.write_interval(&interval)?;
            intervals.push(interval);
        }

        output.set_position(decoder.position_ticks());
    }

    // Close a trailing silent interval at the stream's total duration.
    let end_of_stream = decoder.best_known_end();
    if let Some(interval) = tracker.flush(end_of_stream) {
        println!(
            "SILENCE      : {} -> {} ({:.3}s, trailing)",
            fmt_timestamp(interval.start),
            fmt_timestamp(interval.end),
            interval.duration()
        );
        sink.write_interval(&interval)?;
        intervals.push(interval);
    }

    output.finish();
    sink.finish()?;
    Ok((intervals, end_of_stream))
}

fn run(args: &Cli) -> Result<u8, ScanError> {
    let mut decoder = AudioDecoder::open(Path::new(&args.input))?;

    println!("[+] sample rate:        {}", decoder.sample_rate());
    println!("[+] channels:           {}", decoder.channels());
    match decoder.duration() {
        Some(duration) => println!("[+] duration:           {}", fmt_timestamp(duration)),
        None => println!("[+] duration:           unknown"),
    }
    println!("[+] silence threshold:  {}", args.threshold);

    let (intervals, end_of_stream) = scan(args, &mut decoder)?;

    if let Some(path) = args.json.as_deref() {
        json::write_json(Path::new(path), args.threshold, &intervals)?;
    }

    let silent_seconds: f64 = intervals.iter().map(SilentInterval::duration).sum();
    let silent_share = if end_of_stream > 0.0 {
        silent_seconds / end_of_stream * 100.0
    } else {
        0.0
    };
    println!(
        "Found {} silent interval(s), {:.3}s total ({:.3}% of stream). Report saved to '{}'.",
        intervals.len(),
        silent_seconds,
        silent_share,
        args.output
    );

    let mut return_code = 0;
    if silent_share >= args.silence_percentage {
        return_code |= ERR_CONTAINS_SILENCE;
    }
    Ok(return_code)
}

fn main() -> ExitCode {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, sections: &[(f64, i16)], sample_rate: u32) {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &(seconds, amplitude) in sections {
            let frames = (seconds * sample_rate as f64) as u32;
            for i in 0..frames {
                let sample = if i % 2 == 0 { amplitude } else { -amplitude };
                writer.write_sample(sample).unwrap();
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn end_to_end_scan_reports_silent_sections() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.wav");
        let report = dir.path().join("silent_times.txt");
        write_wav(&input, &[(1.0, 30000), (1.0, 0), (1.0, 30000), (1.0, 0)], 16000);

        let args = Cli::parse_from([
            "hush",
            input.to_str().unwrap(),
            "-o",
            report.to_str().unwrap(),
            "--no-progress",
        ]);

        let mut decoder = AudioDecoder::open(Path::new(&args.input)).unwrap();
        let (intervals, end_of_stream) = scan(&args, &mut decoder).unwrap();

        // One closed interval around 1s..2s, one trailing interval flushed
        // at the 4s stream duration.
        assert_eq!(intervals.len(), 2);
        assert!((intervals[0].start - 1.0).abs() < 0.55);
        assert!((intervals[0].end - 2.0).abs() < 0.55);
        assert!((intervals[1].start - 3.0).abs() < 0.55);
        assert!((intervals[1].end - 4.0).abs() < 0.01);
        assert!((end_of_stream - 4.0).abs() < 0.01);

        let contents = std::fs::read_to_string(&report).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Silent time: "));
        assert!(lines[1].contains(" - "));
    }

    #[test]
    fn fully_loud_input_produces_an_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("loud.wav");
        let report = dir.path().join("silent_times.txt");
        write_wav(&input, &[(2.0, 30000)], 16000);

        let args = Cli::parse_from([
            "hush",
            input.to_str().unwrap(),
            "-o",
            report.to_str().unwrap(),
            "--no-progress",
        ]);

        let mut decoder = AudioDecoder::open(Path::new(&args.input)).unwrap();
        let (intervals, _) = scan(&args, &mut decoder).unwrap();
        assert!(intervals.is_empty());
        assert_eq!(std::fs::read_to_string(&report).unwrap(), "");
    }
}
