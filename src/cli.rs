use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::color::Hex;
use crate::pipeline::DEFAULT_VARIATIONS;

/// Catalog hex colors: generate tints and shades, scan documents for colors.
#[derive(Parser, Debug)]
#[command(name = "swatchbook", version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Log verbosity (RUST_LOG overrides)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Number of tints and of shades generated from a primary color
    #[arg(
        long,
        default_value_t = DEFAULT_VARIATIONS as u8,
        value_parser = clap::value_parser!(u8).range(1..=254),
        global = true
    )]
    pub variations: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tints and shades of a color
    Ramp {
        /// Base color, #RGB or #RRGGBB
        color: Hex,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Find the colors used in files and sort them around a primary color
    Scan {
        /// Files to scan; `-` reads stdin
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Primary color to classify against
        #[arg(short, long)]
        primary: Option<Hex>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the 24x24 PNG icon of a color as a data URI
    Icon {
        color: Hex,
    },

    /// Open the interactive color panel
    Panel {
        /// Files scanned with `s`
        files: Vec<PathBuf>,

        /// Initial primary color (tints and shades are generated from it)
        #[arg(short, long)]
        primary: Option<Hex>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter string for `env_logger`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
