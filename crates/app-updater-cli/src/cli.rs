//! CLI argument definitions for the updater.

use std::path::PathBuf;

use app_updater::{Platform, Version};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "app-updater",
    version,
    about = "Check for, download and apply application updates",
    long_about = "Check a release feed for a newer version of an application.\n\n\
                  On Windows the installer is downloaded to the per-user data directory \
                  and launched with --updated. Other platforms open the download page."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with timestamps (always on when writing to a file).
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Settings file (default: updater.toml in the user config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Version of the installed application.
    #[arg(
        long = "current-version",
        value_name = "VERSION",
        value_parser = parse_version,
        global = true
    )]
    pub current_version: Option<Version>,

    /// Directory where installers are stored (overrides the settings file).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Act as if running on this platform.
    #[arg(long = "platform", value_enum, global = true)]
    pub platform: Option<PlatformArg>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a single update check.
    Check(CheckArgs),

    /// Check periodically until interrupted.
    Watch(WatchArgs),

    /// Show the resolved updater configuration.
    Status,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Apply the update right away when one is ready.
    #[arg(long = "apply")]
    pub apply: bool,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Hours between checks (overrides the settings file).
    #[arg(long = "interval-hours", value_name = "HOURS")]
    pub interval_hours: Option<u64>,

    /// Apply the update as soon as a check reports one.
    #[arg(long = "apply-on-ready")]
    pub apply_on_ready: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

/// CLI platform choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum PlatformArg {
    Windows,
    Macos,
    Linux,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Windows => Self::Windows,
            PlatformArg::Macos => Self::MacOs,
            PlatformArg::Linux => Self::Linux,
        }
    }
}

fn parse_version(value: &str) -> Result<Version, String> {
    app_updater::version::parse_tag(value).map_err(|e| e.to_string())
}
