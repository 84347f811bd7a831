// SPDX-License-Identifier: MIT
//
// Command-line arguments.
//
// Every flag only seeds the initial state. Nothing is persisted: the next
// run starts from the defaults again.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use chroma_core::{AxisMode, Color, Notation};

/// Log verbosity for the log file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Copies, start and stop (default)
    #[default]
    Info,
    /// Mode and target changes
    Debug,
    /// Every input chunk
    Trace,
}

impl LogLevel {
    /// The `EnvFilter` directive for this level.
    pub const fn as_filter_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Point at a color, watch the screen fade to it, click to copy.
#[derive(Debug, Parser)]
#[command(name = "chroma", version, about)]
pub struct Cli {
    /// Which pointer coordinate selects the color: x, y, both
    #[arg(long, default_value = "x", value_name = "AXIS")]
    pub axis: AxisMode,

    /// Notation shown on screen: hex, rgb, hsv (or hsb), hsl
    #[arg(long, default_value = "hex", value_name = "NOTATION")]
    pub display: Notation,

    /// Notation copied on click: hex, rgb, hsv (or hsb), hsl
    #[arg(long, default_value = "hex", value_name = "NOTATION")]
    pub copy: Notation,

    /// Milliseconds between the end of one tick and the next
    #[arg(
        long,
        default_value_t = 10,
        value_name = "MS",
        value_parser = clap::value_parser!(u64).range(1..=1000)
    )]
    pub tick_ms: u64,

    /// Starting color as #rrggbb or #rgb
    #[arg(long, value_name = "HEX", value_parser = parse_start_color)]
    pub start: Option<Color>,

    /// Log file [default: chroma.log in the system temp directory]
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log level, overridden by CHROMA_LOG or RUST_LOG
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Cli {
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    #[must_use]
    pub fn start_color(&self) -> Color {
        self.start.unwrap_or(Color::BLACK)
    }

    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("chroma.log"))
    }
}

fn parse_start_color(s: &str) -> Result<Color, String> {
    Color::from_hex(s).ok_or_else(|| format!("{s:?} is not a #rrggbb or #rgb color"))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
