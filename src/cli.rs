use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "djrp", about = "Rhythm chart generator and judgment engine")]
pub struct Cli {
    /// Config file (default: djrp.toml or ~/.config/djrp/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List known songs and exit
    Songs,

    /// Generate a chart from a song's audio (or the fallback grid)
    Chart {
        /// Song id from the catalog
        song: String,

        #[command(flatten)]
        gen: GenArgs,

        /// Output chart JSON (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replay recorded input against a generated chart and print the summary
    Play {
        /// Song id from the catalog
        song: String,

        /// JSON list of timed input events
        #[arg(short, long)]
        inputs: PathBuf,

        #[command(flatten)]
        gen: GenArgs,

        /// Calibration offset in ms added to the play clock
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<f64>,

        /// Scheduler tick in ms
        #[arg(long)]
        tick: Option<f64>,
    },

    /// Estimate input lag from taps recorded against the calibration clicks
    Calibrate {
        /// JSON list of tap times in ms
        #[arg(short, long)]
        taps: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct GenArgs {
    /// Audio file to analyze (default: the song's catalog entry)
    #[arg(short, long)]
    pub audio: Option<PathBuf>,

    /// Target notes per second (capped at 7)
    #[arg(long)]
    pub density: Option<f64>,

    /// Fraction of notes turned into scratches (0.0-1.0)
    #[arg(long)]
    pub scratch_ratio: Option<f64>,
}
