use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use tracing::info;
use tracing_subscriber::EnvFilter;

use discharge_explorer::constants::config::STATE_FILE;
use discharge_explorer::{ControlState, Dataset, ExplorerError, Pipeline};

#[derive(Parser, Debug)]
#[command(author, version, about = "Battery discharge-current explorer", long_about = None)]
struct Cli {
    /// CSV/Parquet measurement files, concatenated in order
    #[arg(long = "data", required = true, num_args = 1.., value_hint = ValueHint::FilePath)]
    data: Vec<PathBuf>,

    /// Control-state JSON (defaults to ./discharge-explorer.json when present,
    /// else the initial state)
    #[arg(long, value_hint = ValueHint::FilePath)]
    state: Option<PathBuf>,

    /// Output JSON path (stdout when omitted)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    out: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, action = ArgAction::SetTrue)]
    pretty: bool,

    /// Write the initial control state instead of recomputing
    #[arg(long, action = ArgAction::SetTrue)]
    dump_state: bool,

    /// Write the reconciled label selection back into the state file
    #[arg(long, action = ArgAction::SetTrue)]
    update_state: bool,

    /// Enable debug logging of pipeline stages
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let dataset = Dataset::load(&cli.data).map_err(report)?;
    let pipeline = Pipeline::new(Arc::new(dataset)).map_err(report)?;

    if cli.dump_state {
        let state = pipeline.initial_state().map_err(report)?;
        return emit(&state, cli.out.as_ref(), true);
    }

    let state_path = ControlState::locate(cli.state.as_deref(), Path::new("."));
    let mut state = match &state_path {
        Some(path) => ControlState::load(path)
            .map_err(report)
            .with_context(|| format!("failed to read control state {}", path.display()))?,
        None => pipeline.initial_state().map_err(report)?,
    };

    let bundle = pipeline.recompute(&state).map_err(report)?;
    info!(
        rows = bundle.row_count,
        charts = bundle.charts.len(),
        labels = bundle.label_selection.len(),
        "recomputation finished"
    );

    if cli.update_state {
        let path = state_path.unwrap_or_else(|| PathBuf::from(STATE_FILE));
        bundle.apply_to(&mut state);
        state
            .save(&path)
            .map_err(report)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    emit(&bundle, cli.out.as_ref(), cli.pretty)
}

fn report(err: ExplorerError) -> anyhow::Error {
    anyhow!("{}: {}", err.title(), err.user_message())
}

fn emit<T: serde::Serialize>(value: &T, out: Option<&PathBuf>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match out {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}
