use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels accepted on the command line.
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments.
#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "A Monte Carlo path tracer")]
pub struct Args {
    /// Scene to render (see --list-scenes)
    #[arg(long, default_value = "random-spheres")]
    pub scene: String,

    /// Print the available scene names and exit
    #[arg(long)]
    pub list_scenes: bool,

    /// Image width in pixels
    #[arg(long, default_value = "400", value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "225", value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Number of samples per pixel
    #[arg(long, short = 's', default_value = "100", value_parser = clap::value_parser!(u32).range(1..))]
    pub samples_per_pixel: u32,

    /// Maximum ray bounce depth
    #[arg(long, default_value = "50")]
    pub max_depth: u32,

    /// Base RNG seed; a fixed seed reproduces the image exactly
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Output file path (.png, or .ppm for plain-text P3)
    #[arg(short, long, default_value = "output.png")]
    pub output: String,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,
}
