//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Recalculate a spreadsheet sheet from the command line.
#[derive(Parser, Debug)]
#[command(name = "gridcalc", version, about)]
pub struct Args {
    /// Sheet file to open (.grd). Without one, an empty in-memory sheet is used.
    pub file: Option<PathBuf>,

    /// Write a cell before printing, as REF=RAW (can be repeated, applied in order)
    #[arg(short, long = "set", value_name = "REF=RAW")]
    pub sets: Vec<String>,

    /// Evaluate one formula against the sheet and print the result
    #[arg(short = 'c', long = "command", value_name = "FORMULA")]
    pub command: Option<String>,

    /// Config file (default: <config dir>/gridcalc/config.toml)
    #[arg(long, value_name = "FILE", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore any config file
    #[arg(long)]
    pub no_config: bool,

    /// Open the sheet without permission to write
    #[arg(long)]
    pub read_only: bool,

    /// Override the maximum evaluation depth (1 to 1024)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,
}

/// Split a `REF=RAW` edit at the first `=`. The raw part may itself start
/// with `=` (`B1==A1*2`).
pub fn parse_set(arg: &str) -> Option<(&str, &str)> {
    let (name, raw) = arg.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, raw))
}
