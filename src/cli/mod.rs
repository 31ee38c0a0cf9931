//! Command-line parsing for the atmospheric muon reweighting tool.
//!
//! Argument parsing and command dispatch stay separate from the curve and
//! stage code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mureweight", version, about = "Atmospheric muon spectral-index reweighting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate toy muon events, set up the stage, apply it, and print a summary.
    Reweight(ReweightArgs),
    /// Build the uncertainty curve from a calibration table and print its nodes.
    Curve(CurveArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
}

/// Options selecting and fitting the calibration table.
#[derive(Debug, Args, Clone)]
pub struct TableArgs {
    /// Calibration table (path, or name under `MUREWEIGHT_RESOURCES`).
    /// Its name must mention the variable, e.g. `muon_coszen_unc.txt`.
    #[arg(short = 'f', long = "file", value_name = "TABLE")]
    pub file: String,

    /// Event variable the table is tabulated in (`coszen` or `true_coszen`).
    #[arg(long, default_value = "true_coszen")]
    pub variable: String,

    /// Interpolation kind: linear, slinear, nearest, nearest-up, previous, next, zero, cubic.
    #[arg(long, default_value = "linear")]
    pub kind: String,
}

/// Options for `mureweight reweight`.
#[derive(Debug, Args, Clone)]
pub struct ReweightArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Overall muon normalization.
    #[arg(long, default_value_t = 1.0)]
    pub atm_muon_scale: f64,

    /// Spectral-index shift applied through the curve.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub delta_gamma_mu: f64,

    /// Units of the two numeric parameters (`dimensionless` or `percent`).
    #[arg(long, default_value = "dimensionless")]
    pub units: String,

    /// Names of the toy event batches to generate.
    #[arg(long = "names", value_delimiter = ',', default_value = "muons")]
    pub names: Vec<String>,

    /// Events generated per batch.
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub n_events: usize,

    /// Draw initial weights uniformly in [0, 1) instead of ones.
    #[arg(long)]
    pub random_weights: bool,

    /// Random seed for event generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Lower edge of generated cos(zenith).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub coszen_min: f64,

    /// Upper edge of generated cos(zenith).
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub coszen_max: f64,

    /// Export per-event results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the curve (kind + nodes + sampled grid) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,
}

/// Options for `mureweight curve`.
#[derive(Debug, Args, Clone)]
pub struct CurveArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Export the curve to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,

    /// Render an ASCII plot of the curve.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for plotting a saved curve.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Curve JSON file produced by `--export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}
