//! ascpi - command line driver for the ASCπ kernel motor.
//!
//! - `ascpi evolve` - run a trajectory, optionally export it and snapshot the engine
//! - `ascpi glyph` - project a state onto the hexagonal glyph
//! - `ascpi verify` - check a snapshot or trajectory file by replay

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{fmt, EnvFilter};

use ascpi_kernel::analysis::FieldMetrics;
use ascpi_kernel::codec::to_value;
use ascpi_kernel::domain::{FieldState, KernelConstants, StepOutcome};
use ascpi_kernel::hashing::{canonical_hash, trajectory_hash};
use ascpi_kernel::state::{create_canonical_state, create_initial_state};
use ascpi_kernel::transitions::advance;
use ascpi_runtime::drift::{compare_states, first_invalid_transition};
use ascpi_runtime::snapshot::{load_latest_snapshot, restore_engine, save_snapshot, take_snapshot};
use ascpi_runtime::snapshot_codec::{
    export_trajectory_to_file, import_state_from_file, import_trajectory_from_file,
};
use ascpi_runtime::{replay, RuntimeConfig};
use hexglyph::Hex3DGlyph;

#[derive(Parser)]
#[command(name = "ascpi")]
#[command(about = "Deterministic ASCπ kernel motor", version)]
struct Cli {
    /// Runtime config (JSON with `engine` and `glyph` sections)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve a trajectory from an initial state
    Evolve {
        /// Number of transitions
        #[arg(short = 'n', long, default_value_t = 10)]
        steps: usize,

        #[command(flatten)]
        initial: InitialState,

        /// Write the trajectory to this file
        #[arg(long)]
        out: Option<PathBuf>,

        /// Save an engine snapshot of the final state into this directory
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,
    },

    /// Project a state onto the hexagonal glyph
    Glyph {
        /// State file (flat JSON); the canonical state when omitted
        #[arg(long)]
        state: Option<PathBuf>,
    },

    /// Verify a snapshot directory or a trajectory file by replay
    Verify {
        /// Directory holding snapshot_NNNNNN.json files
        #[arg(long, conflicts_with = "trajectory", required_unless_present = "trajectory")]
        snapshot_dir: Option<PathBuf>,

        /// Trajectory file written by `evolve --out`
        #[arg(long)]
        trajectory: Option<PathBuf>,
    },
}

/// Initial state overrides; unset fields take the factory defaults.
#[derive(Args)]
struct InitialState {
    /// Start from the canonical state instead of the factory defaults
    #[arg(long, conflicts_with_all = ["diff", "curvature", "phase", "coherence", "context"])]
    canonical: bool,

    #[arg(long, allow_hyphen_values = true)]
    diff: Option<f64>,
    #[arg(long)]
    curvature: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    phase: Option<f64>,
    #[arg(long)]
    coherence: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    context: Option<f64>,
}

impl InitialState {
    fn build(&self) -> Result<FieldState> {
        if self.canonical {
            return Ok(create_canonical_state());
        }
        create_initial_state(self.diff, self.curvature, self.phase, self.coherence, self.context)
            .context("invalid initial state")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Evolve {
            steps,
            initial,
            out,
            snapshot_dir,
        } => run_evolve(&config, steps, &initial, out.as_deref(), snapshot_dir.as_deref()),
        Commands::Glyph { state } => run_glyph(&config, state.as_deref()),
        Commands::Verify {
            snapshot_dir,
            trajectory,
        } => match (snapshot_dir, trajectory) {
            (Some(dir), _) => verify_snapshot_dir(&dir),
            (None, Some(path)) => verify_trajectory(&config, &path),
            (None, None) => bail!("nothing to verify: pass --snapshot-dir or --trajectory"),
        },
    }
}

fn run_evolve(
    config: &RuntimeConfig,
    steps: usize,
    initial: &InitialState,
    out: Option<&Path>,
    snapshot_dir: Option<&Path>,
) -> Result<()> {
    let initial = initial.build()?;
    tracing::info!(steps, diff = initial.diff(), "Evolving trajectory");

    let (states, hash) = replay::rebuild_trajectory(initial, config.engine, steps)?;

    if let Some(path) = out {
        export_trajectory_to_file(&states, path)
            .with_context(|| format!("writing trajectory to {}", path.display()))?;
        tracing::info!(path = %path.display(), states = states.len(), "Trajectory written");
    }

    if let Some(dir) = snapshot_dir {
        let engine = replay::replay_engine(initial, config.engine, steps)?;
        save_snapshot(dir, &take_snapshot(&engine)?)?;
    }

    let last = *states.last().context("empty trajectory")?;
    let report = json!({
        "steps": steps,
        "trajectory_hash": hash,
        "final_state": to_value(&last),
        "final_hash": canonical_hash(&last),
        "metrics": FieldMetrics::of(&last),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_glyph(config: &RuntimeConfig, state_path: Option<&Path>) -> Result<()> {
    let state = match state_path {
        Some(path) => import_state_from_file(path)
            .with_context(|| format!("reading state from {}", path.display()))?,
        None => create_canonical_state(),
    };
    let glyph = Hex3DGlyph::new(config.glyph)?;
    let geometry = glyph.map_field_state(&state);
    tracing::info!(
        step = state.step(),
        active_channel = geometry.active_channel,
        "Projected state"
    );
    println!("{}", serde_json::to_string_pretty(&geometry)?);
    Ok(())
}

fn verify_snapshot_dir(dir: &Path) -> Result<()> {
    let Some(snap) = load_latest_snapshot(dir)? else {
        bail!("no snapshot found in {}", dir.display());
    };
    let engine = restore_engine(&snap)?;
    let history = engine.history();
    verify_history(&history, engine.constants()).context("snapshot history")?;

    tracing::info!(step = snap.step(), history = history.len(), "Snapshot verified");
    println!("{}", json!({ "verified": true, "step": snap.step(), "hash": snap.hash }));
    Ok(())
}

fn verify_trajectory(config: &RuntimeConfig, path: &Path) -> Result<()> {
    let states = import_trajectory_from_file(path)
        .with_context(|| format!("reading trajectory from {}", path.display()))?;
    if states.is_empty() {
        bail!("trajectory {} is empty", path.display());
    }
    verify_history(&states, &config.engine.constants).context("trajectory")?;

    let hash = trajectory_hash(&states);
    tracing::info!(states = states.len(), "Trajectory verified");
    println!("{}", json!({ "verified": true, "states": states.len(), "trajectory_hash": hash }));
    Ok(())
}

/// Every entry must follow from the one before it. Split branches are
/// accepted either way; a failure reports drift against the positive-branch
/// replay of the preceding state.
fn verify_history(states: &[FieldState], constants: &KernelConstants) -> Result<()> {
    let Some(index) = first_invalid_transition(states, constants) else {
        return Ok(());
    };
    let expected = match advance(&states[index - 1], constants) {
        StepOutcome::Split(positive, _) => positive,
        StepOutcome::Imploded(next) | StepOutcome::Reflected(next) => next,
    };
    let report = compare_states(&expected, &states[index], constants);
    bail!(
        "diverges from replay at step {}: {}",
        states[index].step(),
        serde_json::to_string(&report)?
    );
}
