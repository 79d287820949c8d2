use crate::cli::Cli;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Debug)]
pub struct Output {
    pub progress_bar: Option<ProgressBar>,
}

impl Output {
    /// Progress is tracked in ticks of the track time-base; streams with no
    /// declared duration get a length-less bar.
    pub fn new(args: &Cli, duration_ticks: Option<u64>) -> Self {
        let progress_bar = if args.no_progress {
            None
        } else {
            Some(match duration_ticks {
                Some(len) => ProgressBar::new(len),
                None => ProgressBar::no_length(),
            })
        };

        if let Some(pb) = &progress_bar {
            pb.set_style(ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar:.yellow/green}] {percent_precise}% ({pos}/{len})")
                .unwrap()
                .progress_chars("#>-"));
        }

        Self { progress_bar }
    }

    pub fn set_position(&self, ticks: u64) {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(ticks);
        }
    }

    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish();
        }
    }
}
