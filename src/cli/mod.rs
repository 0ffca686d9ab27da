//! Command-line parsing for the lens prior engine.
//!
//! Argument parsing and command dispatch stay separate from the resolution
//! code; `app` turns these structs into engine calls.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::MeanOutsideSupport;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "priors", version, about = "Phase-aware priors for lens mass profile fits")]
pub struct Cli {
    /// Prior schema JSON (falls back to $PRIORS_SCHEMA, then the bundled schema).
    #[arg(long, global = true, value_name = "JSON")]
    pub schema: Option<PathBuf>,

    /// Policy for a narrowed mean outside its support (overrides $PRIORS_MEAN_OUTSIDE_SUPPORT).
    #[arg(long, global = true, value_enum)]
    pub policy: Option<MeanOutsideSupport>,

    /// Log resolution details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate the schema and print a per-class summary.
    Check,
    /// Resolve every parameter of a model class for one phase.
    Show(ShowArgs),
    /// Resolve a single parameter, optionally drawing samples from it.
    Resolve(ResolveArgs),
    /// Write the loaded schema in canonical form.
    Dump(DumpArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Model class, e.g. SphericalNFW.
    #[arg(short, long)]
    pub class: String,

    /// Phase index (0 = initial phase).
    #[arg(short, long, default_value_t = 0)]
    pub phase: usize,

    /// Previous phase's best fit, as PARAM=VALUE (repeatable).
    #[arg(long = "best-fit", value_name = "PARAM=VALUE", value_parser = parse_best_fit)]
    pub best_fits: Vec<(String, f64)>,

    /// Export the resolved priors to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ResolveArgs {
    /// Model class, e.g. SphericalNFW.
    #[arg(short, long)]
    pub class: String,

    /// Parameter name, e.g. kappa_s.
    #[arg(long)]
    pub param: String,

    /// Phase index (0 = initial phase).
    #[arg(short, long, default_value_t = 0)]
    pub phase: usize,

    /// Previous phase's best fit for this parameter.
    #[arg(long = "best-fit", allow_negative_numbers = true)]
    pub best_fit: Option<f64>,

    /// Number of samples to draw from the resolved prior.
    #[arg(long, default_value_t = 0)]
    pub samples: usize,

    /// Random seed for sampling.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Debug, Args, Clone)]
pub struct DumpArgs {
    /// Output path for the schema JSON.
    #[arg(long, value_name = "JSON")]
    pub out: PathBuf,
}

fn parse_best_fit(raw: &str) -> Result<(String, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PARAM=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for {name}: {e}"))?;
    Ok((name.to_string(), value))
}
