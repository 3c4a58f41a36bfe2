//! CLI argument definitions for the project board.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "project-board",
    version,
    about = "Drag-and-drop project board driven from the terminal",
    long_about = "Drag-and-drop project board driven from the terminal.\n\n\
                  Reads one command per line from stdin (or --script) and prints\n\
                  the rendered board after every change. Type `help` for commands."
)]
pub struct Cli {
    /// Log output format (json for machine parsing, pretty or compact for humans).
    #[arg(
        long = "log-format",
        value_enum,
        env = "PROJECT_BOARD_LOG_FORMAT",
        default_value = "json"
    )]
    pub log_format: LogFormatArg,

    /// Explicit log level (overrides RUST_LOG).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Read commands from a file instead of stdin.
    #[arg(long, value_name = "PATH", env = "PROJECT_BOARD_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Do not print the board after each change.
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Json,
    Pretty,
    Compact,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevelArg::Error => "error",
            LogLevelArg::Warn => "warn",
            LogLevelArg::Info => "info",
            LogLevelArg::Debug => "debug",
            LogLevelArg::Trace => "trace",
        }
    }
}
