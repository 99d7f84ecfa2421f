//! Command-line parsing for the rice price estimator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{HistoryWindow, PredictionPolicy, YearMonth};
use crate::io::decode::DecoderKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rice", version, about = "Rice price curves from BPS monthly data")]
pub struct Cli {
    /// Log more (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the raw payload comes from and how its keys are read.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Use the synthetic sample instead of the BPS WebAPI (no API key needed).
    #[arg(long, global = true)]
    pub offline: bool,

    /// Random seed for the synthetic sample.
    #[arg(long, default_value_t = 42, global = true)]
    pub seed: u64,

    /// Key layout used to recover year and month from data keys.
    #[arg(long, value_enum, default_value_t = DecoderKind::Suffix, global = true)]
    pub decoder: DecoderKind,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate every grade's price for a month after the data cutoff.
    Predict(PredictArgs),
    /// Print the raw monthly series inside a window, optionally charted/exported.
    History(HistoryArgs),
    /// Write a Markdown diagnostics bundle for the current payload.
    Debug(DebugArgs),
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// Target year.
    #[arg(short = 'y', long)]
    pub year: i32,

    /// Target month (1-12).
    #[arg(short = 'm', long)]
    pub month: u32,

    /// Last month with observed data; targets at or before it are rejected.
    #[arg(long, value_name = "YYYY-MM", default_value = "2023-12")]
    pub cutoff: YearMonth,

    /// Previous months before this year are interpolated with the spline.
    #[arg(long, default_value_t = 2024)]
    pub historical_before: i32,

    /// Polynomial regression degree.
    #[arg(long, default_value_t = 3)]
    pub degree: usize,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Write the result as JSON to a file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl PredictArgs {
    pub fn target(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }

    pub fn policy(&self) -> PredictionPolicy {
        PredictionPolicy {
            cutoff: self.cutoff,
            historical_before_year: self.historical_before,
            degree: self.degree,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct HistoryArgs {
    /// First month of the window (inclusive).
    #[arg(long, value_name = "YYYY-MM", default_value = "2013-01")]
    pub from: YearMonth,

    /// Last month of the window (inclusive).
    #[arg(long, value_name = "YYYY-MM", default_value = "2024-12")]
    pub to: YearMonth,

    /// Print the history as JSON.
    #[arg(long)]
    pub json: bool,

    /// Render an ASCII chart in the terminal.
    #[arg(long)]
    pub plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the windowed history to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl HistoryArgs {
    pub fn window(&self) -> HistoryWindow {
        HistoryWindow {
            start: self.from,
            end: self.to,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct DebugArgs {
    /// Directory for the bundle.
    #[arg(long, default_value = "debug")]
    pub dir: PathBuf,
}
