//! Replay orchestrator: rebuild trajectories from an initial state.
//!
//! Delegates all motor logic to the kernel. No shortcuts, no cached state.

use ascpi_kernel::domain::{Branch, EngineConfig, FieldState, StepOutcome};
use ascpi_kernel::engine::AscpiEngine;
use ascpi_kernel::error::EngineError;
use ascpi_kernel::hashing::trajectory_hash;

/// Rebuild the trajectory of `steps + 1` states from `initial`.
///
/// Returns the states and their `trajectory_hash`. A pure function of its
/// inputs, deterministic by the kernel's guarantee.
pub fn rebuild_trajectory(
    initial: FieldState,
    config: EngineConfig,
    steps: usize,
) -> Result<(Vec<FieldState>, String), EngineError> {
    let engine = AscpiEngine::with_config(initial, config)?;
    let states = engine.evolve(steps);
    let hash = trajectory_hash(&states);
    Ok((states, hash))
}

/// Rebuild and return only the trajectory hash.
pub fn rebuild_hash(
    initial: FieldState,
    config: EngineConfig,
    steps: usize,
) -> Result<String, EngineError> {
    let (_, hash) = rebuild_trajectory(initial, config, steps)?;
    Ok(hash)
}

/// Drive a live engine through `steps` committed transitions, resolving
/// every split to the positive branch. The resulting history matches
/// `rebuild_trajectory` (subject to the history limit).
pub fn replay_engine(
    initial: FieldState,
    config: EngineConfig,
    steps: usize,
) -> Result<AscpiEngine, EngineError> {
    let mut engine = AscpiEngine::with_config(initial, config)?;
    for _ in 0..steps {
        if let StepOutcome::Split(..) = engine.step() {
            engine.resolve_split(Branch::Positive)?;
        }
    }
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ascpi_kernel::state::create_canonical_state;

    #[test]
    fn rebuild_is_deterministic() {
        let a = rebuild_trajectory(create_canonical_state(), EngineConfig::default(), 30).unwrap();
        let b = rebuild_trajectory(create_canonical_state(), EngineConfig::default(), 30).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.0.len(), 31);
    }

    #[test]
    fn replayed_engine_matches_rebuilt_trajectory() {
        let split_start = FieldState::new(0.0, 0.4, 1.0, 0.5, 1.0).unwrap();
        for initial in [create_canonical_state(), split_start] {
            let (states, _) = rebuild_trajectory(initial, EngineConfig::default(), 20).unwrap();
            let engine = replay_engine(initial, EngineConfig::default(), 20).unwrap();
            assert_eq!(engine.history(), states);
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig {
            history_limit: Some(0),
            ..Default::default()
        };
        assert_eq!(
            rebuild_hash(create_canonical_state(), config, 3),
            Err(EngineError::ZeroHistoryLimit)
        );
    }

    #[test]
    fn constants_change_the_hash() {
        let mut config = EngineConfig::default();
        config.constants.coherence_gain = 0.2;
        let base = rebuild_hash(create_canonical_state(), EngineConfig::default(), 10).unwrap();
        let tuned = rebuild_hash(create_canonical_state(), config, 10).unwrap();
        assert_ne!(base, tuned);
    }
}
