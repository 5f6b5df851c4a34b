//! Gridcalc - recalculate a sheet from the command line

mod cli;

use anyhow::{Context, bail};
use clap::Parser;
use directories::ProjectDirs;
use gridcalc_core::{Config, FileStore, Sheet};
use gridcalc_engine::engine::{CellStore, MemoryStore};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::{Args, parse_set};

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gridcalc").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else if let Some(path) = &args.config {
        if !path.exists() {
            bail!("config file not found: {}", path.display());
        }
        Config::load(path).with_context(|| format!("loading {}", path.display()))?
    } else if let Some(path) = default_config_path() {
        Config::load(&path).with_context(|| format!("loading {}", path.display()))?
    } else {
        Config::default()
    };

    if args.read_only {
        config.read_only = true;
    }
    if let Some(depth) = args.max_depth {
        config.engine.max_depth = depth;
    }
    config.engine.validate()?;
    Ok(config)
}

fn run<S: CellStore>(mut sheet: Sheet<S>, args: &Args) -> anyhow::Result<ExitCode> {
    tracing::debug!(edits = args.sets.len(), "applying edits");
    for set in &args.sets {
        let Some((name, raw)) = parse_set(set) else {
            bail!("expected REF=RAW, got '{}'", set);
        };
        sheet
            .set_cell_by_name(name, raw)
            .with_context(|| format!("setting {}", name))?;
    }

    if let Some(formula) = &args.command {
        let formula = if formula.starts_with('=') {
            formula.clone()
        } else {
            format!("={}", formula)
        };
        let value = sheet.evaluate_formula(&formula);
        println!("{}", value);
        return Ok(if value.is_error() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    for (cell, value) in sheet.computed_cells() {
        println!("{}: {}", cell, value);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = load_config(&args).and_then(|config| match &args.file {
        Some(path) => {
            let store = FileStore::open(path).with_context(|| format!("opening {}", path.display()))?;
            let store = if config.read_only { store.read_only() } else { store };
            run(Sheet::new(store, config.engine), &args)
        }
        None => {
            let store = MemoryStore::new();
            let store = if config.read_only { store.read_only() } else { store };
            run(Sheet::new(store, config.engine), &args)
        }
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
