use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pc80b",
    version,
    about = "PC-80B ECG recording parser with artifact masking",
    long_about = "Decode PC-80B .dat recordings, flatten non-waveform regions such as lead-off\n\
                  bursts, and export the result as CSV plus a waveform PNG."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Mask artifacts in one recording and export CSV/PNG
    Run(RunArgs),
    /// Process many recordings with the same parameters
    Batch(BatchArgs),
    /// Show decoded statistics of a recording without masking it
    Info(InfoArgs),
    /// Check a recording against the given parameters
    Validate(ValidateArgs),
}

// Byte layout and sample rate of the recording
#[derive(Args, Clone, Debug)]
pub struct RecordingArgs {
    /// Header size in bytes
    #[arg(long, default_value_t = 512, env = "PC80B_HEADER_SIZE")]
    pub header_size: usize,

    /// Trailer size in bytes
    #[arg(long, default_value_t = 512, env = "PC80B_TRAILER_SIZE")]
    pub trailer_size: usize,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 150, env = "PC80B_SAMPLE_RATE")]
    pub samplerate: u32,
}

// Artifact band overrides. Flags win over values from --config.
#[derive(Args, Clone, Debug, Default)]
pub struct ScanArgs {
    /// JSON file with low_ratio, high_ratio, baseline_seconds, strict
    #[arg(long)]
    pub config: Option<String>,

    /// Lower band edge as a fraction of the baseline minimum [default: 0.7]
    #[arg(long)]
    pub low_ratio: Option<f64>,

    /// Upper band edge as a multiple of the baseline maximum [default: 1.3]
    #[arg(long)]
    pub high_ratio: Option<f64>,

    /// Baseline window length in seconds [default: 20]
    #[arg(long)]
    pub baseline_seconds: Option<u32>,

    /// Fail on recordings too short for one baseline window
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

#[derive(Args)]
pub struct RunArgs {
    /// Input .dat file
    #[arg(long)]
    pub file: String,

    #[command(flatten)]
    pub recording: RecordingArgs,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Prefix for output files (default: input file stem)
    #[arg(long)]
    pub output_prefix: Option<String>,

    /// Skip the waveform PNG
    #[arg(long, default_value_t = false)]
    pub no_plot: bool,

    /// JSON report file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files (e.g. "data/*.dat")
    #[arg(long, conflicts_with = "files")]
    pub glob: Option<String>,

    /// Explicit list of input files
    #[arg(long, num_args = 1..)]
    pub files: Option<Vec<String>>,

    #[command(flatten)]
    pub recording: RecordingArgs,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Directory for CSV/PNG outputs and per-file JSON reports
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Skip the waveform PNGs
    #[arg(long, default_value_t = false)]
    pub no_plot: bool,

    /// Keep going after a file fails
    #[arg(long, default_value_t = false)]
    pub continue_on_error: bool,

    /// List matching files and exit
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Input .dat file
    #[arg(long)]
    pub file: String,

    #[command(flatten)]
    pub recording: RecordingArgs,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Input .dat file
    #[arg(long)]
    pub file: String,

    #[command(flatten)]
    pub recording: RecordingArgs,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
