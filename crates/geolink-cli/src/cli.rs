//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use geolink_store::KeyLayout;

use geolink_cli::config::OracleKind;

#[derive(Parser)]
#[command(
    name = "geolink",
    version,
    about = "Link historical electoral constituencies to ISO 3166-2 subdivisions",
    long_about = "Link historical electoral constituencies to ISO 3166-2 subdivisions.\n\n\
                  Stages: clean (normalize inputs), link (per-country matching), \
                  validate (apply curated overrides and report the review queue)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: ./geolink.toml if present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured work directory.
    #[arg(long = "work-dir", value_name = "DIR", global = true)]
    pub work_dir: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize the archive and deduplicate the subdivision standard.
    Clean,

    /// Match countries against the standard and store flagged partitions.
    Link(LinkArgs),

    /// Apply the override table and write validated outputs.
    Validate,

    /// Run clean, link and validate in sequence.
    Run(LinkArgs),

    /// Show which countries have stored partitions.
    Status,
}

#[derive(Args, Clone)]
pub struct LinkArgs {
    /// Country to link (repeatable). Defaults to every archive country.
    #[arg(long = "country", value_name = "NAME")]
    pub countries: Vec<String>,

    /// Recompute countries that already have a stored partition.
    #[arg(long = "overwrite")]
    pub overwrite: bool,

    /// Partition-key layout of stored rows.
    #[arg(long = "layout", value_enum, default_value = "combined")]
    pub layout: LayoutArg,

    /// Override the configured oracle.
    #[arg(long = "oracle", value_enum)]
    pub oracle: Option<OracleArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LayoutArg {
    Combined,
    Split,
}

impl From<LayoutArg> for KeyLayout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Combined => KeyLayout::Combined,
            LayoutArg::Split => KeyLayout::Split,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OracleArg {
    Lexical,
    Http,
}

impl From<OracleArg> for OracleKind {
    fn from(value: OracleArg) -> Self {
        match value {
            OracleArg::Lexical => OracleKind::Lexical,
            OracleArg::Http => OracleKind::Http,
        }
    }
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
