use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Find the silent spots in a media file's audio track")]
pub struct Cli {
    /// Media file to scan (video container or plain audio file)
    pub input: String,

    /// Report file, one line per silent interval
    #[arg(short, long, default_value = "silent_times.txt")]
    pub output: String,

    /// Energy threshold; frames at or below it count as silent
    #[arg(short, long, default_value_t = 0.265)]
    pub threshold: f64,

    /// Exit with a nonzero status if at least this percentage of the stream is silent
    #[arg(long, default_value_t = 100.0)]
    pub silence_percentage: f64,

    /// Also write the detected intervals as JSON to this path
    #[arg(long)]
    pub json: Option<String>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Print per-frame energy readings
    #[arg(short, long)]
    pub debug: bool,
}
