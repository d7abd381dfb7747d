//! Drift detection: determinism verification and state comparison.

use serde::Serialize;

use ascpi_kernel::analysis::{are_equivalent, distance, field_energy};
use ascpi_kernel::arithmetic::circular_distance;
use ascpi_kernel::domain::{EngineConfig, FieldState, KernelConstants};
use ascpi_kernel::hashing::canonical_hash;
use ascpi_kernel::transitions::is_successor;

use crate::replay;

/// Verify determinism by rebuilding the same trajectory twice and
/// asserting identical hashes. Panics on failure.
pub fn verify_determinism(initial: FieldState, constants: KernelConstants, steps: usize) {
    let config = EngineConfig {
        constants,
        history_limit: None,
    };
    let run = || match replay::rebuild_trajectory(initial, config, steps) {
        Ok((_, hash)) => hash,
        Err(e) => panic!("DETERMINISM FAILURE: replay could not start: {}", e),
    };
    let hash1 = run();
    let hash2 = run();

    if hash1 != hash2 {
        panic!(
            "DETERMINISM FAILURE: two replays produced different hashes.\n\
             Run 1: {}\n\
             Run 2: {}",
            hash1, hash2
        );
    }
}

/// Structured comparison of two states. Deltas are `b - a`; the phase delta
/// is the shortest circular distance. Equivalence uses
/// `constants.equivalence_tolerance`.
pub fn compare_states(
    state_a: &FieldState,
    state_b: &FieldState,
    constants: &KernelConstants,
) -> DriftReport {
    let tolerance = constants.equivalence_tolerance;
    let energy_a = field_energy(state_a);
    let energy_b = field_energy(state_b);

    DriftReport {
        step_a: state_a.step(),
        step_b: state_b.step(),
        diff_delta: state_b.diff() - state_a.diff(),
        curvature_delta: state_b.curvature() - state_a.curvature(),
        phase_distance: circular_distance(state_a.phase(), state_b.phase()),
        coherence_delta: state_b.coherence() - state_a.coherence(),
        context_delta: state_b.context() - state_a.context(),
        energy_a,
        energy_b,
        energy_delta: energy_b - energy_a,
        distance: distance(state_a, state_b),
        equivalent: are_equivalent(state_a, state_b, tolerance),
        identical_hash: canonical_hash(state_a) == canonical_hash(state_b),
    }
}

/// Index of the first position where two trajectories disagree, or where
/// one of them ends early. `None` when they are identical.
pub fn first_divergence(a: &[FieldState], b: &[FieldState]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

/// Index of the first history entry that is not a legal successor of the
/// entry before it. Either split branch is legal, so histories with
/// caller-chosen branches verify.
pub fn first_invalid_transition(
    history: &[FieldState],
    constants: &KernelConstants,
) -> Option<usize> {
    history
        .windows(2)
        .position(|pair| !is_successor(&pair[0], &pair[1], constants))
        .map(|i| i + 1)
}

/// Structured drift report between two states.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriftReport {
    pub step_a: u64,
    pub step_b: u64,
    pub diff_delta: f64,
    pub curvature_delta: f64,
    pub phase_distance: f64,
    pub coherence_delta: f64,
    pub context_delta: f64,
    pub energy_a: f64,
    pub energy_b: f64,
    pub energy_delta: f64,
    pub distance: f64,
    pub equivalent: bool,
    pub identical_hash: bool,
}
