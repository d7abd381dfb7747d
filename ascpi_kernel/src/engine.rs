/// ASCπ Kernel v1: Engine
///
/// Stateful wrapper over the pure transition layer. Owns the current state
/// and an append-only history, validates every committed state.
///
/// Not internally synchronized: callers sharing an engine across threads
/// must lock around each operation.

use std::collections::VecDeque;

use crate::codec::to_value;
use crate::domain::{Branch, EngineConfig, FieldState, KernelConstants, Reflection, StepOutcome};
use crate::error::EngineError;
use crate::invariants::{
    try_validate_invariants, try_validate_transition, validate_invariants, validate_transition,
};
use crate::state::create_canonical_state;
use crate::transitions::{advance, reflect, should_implode};

/// The ASCπ kernel motor.
#[derive(Debug, Clone)]
pub struct AscpiEngine {
    current: FieldState,
    history: VecDeque<FieldState>,
    config: EngineConfig,
    evicted: u64,
}

impl AscpiEngine {
    /// Create an engine with default constants and unbounded history.
    pub fn new(initial: FieldState) -> Self {
        validate_invariants(&initial);
        Self {
            current: initial,
            history: VecDeque::from([initial]),
            config: EngineConfig::default(),
            evicted: 0,
        }
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(initial: FieldState, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let mut engine = Self::new(initial);
        engine.config = config;
        Ok(engine)
    }

    /// Engine seeded with `create_canonical_state()`.
    pub fn canonical() -> Self {
        Self::new(create_canonical_state())
    }

    /// Rebuild an engine from persisted parts. History is oldest-first,
    /// contiguous (one step apart, same context), and its newest entry must
    /// equal `current`.
    pub fn restore(
        current: FieldState,
        history: Vec<FieldState>,
        config: EngineConfig,
        evicted: u64,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        try_validate_invariants(&current)?;
        for state in &history {
            try_validate_invariants(state)?;
        }
        for pair in history.windows(2) {
            try_validate_transition(&pair[0], &pair[1])?;
        }
        let newest = history.last().ok_or(EngineError::EmptyHistory)?;
        if *newest != current {
            return Err(EngineError::HistoryMismatch {
                current_step: current.step(),
                history_step: newest.step(),
            });
        }

        let mut engine = Self {
            current,
            history: history.into(),
            config,
            evicted,
        };
        engine.enforce_history_limit();
        tracing::info!(
            step = current.step(),
            history = engine.history.len(),
            "Engine restored"
        );
        Ok(engine)
    }

    pub fn current(&self) -> &FieldState {
        &self.current
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn constants(&self) -> &KernelConstants {
        &self.config.constants
    }

    /// Snapshot of the retained history, oldest first.
    pub fn history(&self) -> Vec<FieldState> {
        self.history.iter().copied().collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of history entries dropped by the history limit.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn should_implode(&self) -> bool {
        should_implode(&self.current, &self.config.constants)
    }

    /// Execute one motor step.
    ///
    /// Implosion and single reflections are committed. A split is returned
    /// without committing either branch; call `resolve_split` to choose.
    pub fn step(&mut self) -> StepOutcome {
        let outcome = advance(&self.current, &self.config.constants);
        match outcome {
            StepOutcome::Imploded(next) | StepOutcome::Reflected(next) => {
                self.commit(next, outcome.operator());
            }
            StepOutcome::Split(positive, negative) => {
                tracing::debug!(
                    step = self.current.step(),
                    positive_diff = positive.diff(),
                    negative_diff = negative.diff(),
                    "Reflection split, awaiting branch choice"
                );
            }
        }
        outcome
    }

    /// Commit one branch of the split produced by the current state.
    pub fn resolve_split(&mut self, branch: Branch) -> Result<FieldState, EngineError> {
        if should_implode(&self.current, &self.config.constants) {
            return Err(EngineError::NoPendingSplit { step: self.current.step() });
        }
        match reflect(&self.current, &self.config.constants) {
            reflection @ Reflection::Split(..) => {
                let chosen = reflection.branch(branch);
                self.commit(chosen, "split");
                Ok(chosen)
            }
            Reflection::Single(_) => Err(EngineError::NoPendingSplit { step: self.current.step() }),
        }
    }

    /// Trajectory of `steps + 1` states starting at `current`. Does not touch
    /// engine state. On a split the positive branch is kept and the negative
    /// branch discarded.
    pub fn evolve(&self, steps: usize) -> Vec<FieldState> {
        self.trajectory().take(steps + 1).collect()
    }

    /// Unbounded streaming trajectory with the same rule as `evolve`.
    pub fn trajectory(&self) -> Trajectory {
        Trajectory {
            start: Some(self.current),
            last: None,
            constants: self.config.constants,
        }
    }

    /// Replace the current state and truncate history to it.
    pub fn reset(&mut self, state: FieldState) {
        validate_invariants(&state);
        self.current = state;
        self.history.clear();
        self.history.push_back(state);
        self.evicted = 0;
        tracing::info!(step = state.step(), diff = state.diff(), "Engine reset");
    }

    /// Current state in its flat export form.
    pub fn serialize_state(&self) -> serde_json::Value {
        to_value(&self.current)
    }

    fn commit(&mut self, next: FieldState, operator: &'static str) {
        validate_invariants(&next);
        validate_transition(&self.current, &next);
        tracing::debug!(
            step = next.step(),
            operator,
            diff = next.diff(),
            coherence = next.coherence(),
            "Committed transition"
        );
        self.current = next;
        self.history.push_back(next);
        self.enforce_history_limit();
    }

    fn enforce_history_limit(&mut self) {
        let Some(limit) = self.config.history_limit else {
            return;
        };
        while self.history.len() > limit {
            self.history.pop_front();
            if self.evicted == 0 {
                tracing::warn!(limit, "History limit reached, evicting oldest states");
            }
            self.evicted += 1;
        }
    }
}

impl Default for AscpiEngine {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Streaming trajectory iterator. Yields the starting state first.
#[derive(Debug, Clone)]
pub struct Trajectory {
    start: Option<FieldState>,
    last: Option<FieldState>,
    constants: KernelConstants,
}

impl Iterator for Trajectory {
    type Item = FieldState;

    fn next(&mut self) -> Option<FieldState> {
        if let Some(start) = self.start.take() {
            self.last = Some(start);
            return Some(start);
        }
        let current = self.last?;
        let successor = match advance(&current, &self.constants) {
            StepOutcome::Imploded(s) | StepOutcome::Reflected(s) => s,
            StepOutcome::Split(positive, _) => positive,
        };
        validate_invariants(&successor);
        validate_transition(&current, &successor);
        self.last = Some(successor);
        Some(successor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;
    use crate::state::create_initial_state;

    #[test]
    fn new_engine_has_single_history_entry() {
        let engine = AscpiEngine::canonical();
        assert_eq!(engine.history_len(), 1);
        assert_eq!(engine.history()[0], *engine.current());
    }

    #[test]
    fn step_commits_reflection() {
        let initial = create_initial_state(None, None, None, None, None).unwrap();
        let mut engine = AscpiEngine::new(initial);
        let outcome = engine.step();
        assert!(matches!(outcome, StepOutcome::Reflected(_)));
        assert_eq!(engine.current().step(), 1);
        assert_eq!(engine.history_len(), 2);
        assert_eq!(outcome.committed(), Some(*engine.current()));
    }

    #[test]
    fn step_uses_implosion_near_fixed_point() {
        let s = FieldState::new(0.001, 0.01, 0.0, 0.96, 1.0).unwrap();
        let mut engine = AscpiEngine::new(s);
        assert!(engine.should_implode());
        match engine.step() {
            StepOutcome::Imploded(next) => {
                assert_eq!(next.curvature(), (0.001_f64 * 0.8).abs());
            }
            other => panic!("Expected implosion, got {:?}", other),
        }
        assert_eq!(engine.current().step(), 1);
    }

    #[test]
    fn split_is_not_committed() {
        let s = FieldState::new(0.0, 0.5, 0.0, 0.5, 1.0).unwrap();
        let mut engine = AscpiEngine::new(s);
        let outcome = engine.step();
        assert!(matches!(outcome, StepOutcome::Split(..)));
        assert_eq!(outcome.committed(), None);
        assert_eq!(*engine.current(), s);
        assert_eq!(engine.history_len(), 1);
    }

    #[test]
    fn resolve_split_commits_chosen_branch() {
        let s = FieldState::new(0.0, 0.5, 0.0, 0.5, 1.0).unwrap();
        let mut engine = AscpiEngine::new(s);
        engine.step();
        let chosen = engine.resolve_split(Branch::Negative).unwrap();
        assert_eq!(chosen.diff(), -0.5);
        assert_eq!(*engine.current(), chosen);
        assert_eq!(engine.history_len(), 2);
    }

    #[test]
    fn resolve_split_without_split_fails() {
        let mut engine = AscpiEngine::canonical();
        assert_eq!(
            engine.resolve_split(Branch::Positive),
            Err(EngineError::NoPendingSplit { step: 0 })
        );
    }

    #[test]
    fn evolve_is_side_effect_free() {
        let engine = AscpiEngine::canonical();
        let before = engine.history();
        let traj = engine.evolve(10);
        assert_eq!(traj.len(), 11);
        assert_eq!(traj[0], *engine.current());
        assert_eq!(engine.history(), before);
        for (i, s) in traj.iter().enumerate() {
            assert_eq!(s.step(), i as u64);
        }
    }

    #[test]
    fn evolve_zero_returns_current() {
        let engine = AscpiEngine::canonical();
        assert_eq!(engine.evolve(0), vec![*engine.current()]);
    }

    #[test]
    fn evolve_keeps_positive_branch_on_split() {
        let s = FieldState::new(0.0, 0.5, 0.0, 0.5, 1.0).unwrap();
        let traj = AscpiEngine::new(s).evolve(1);
        assert_eq!(traj[1].diff(), 0.5);
    }

    #[test]
    fn evolve_matches_repeated_step() {
        let mut engine = AscpiEngine::canonical();
        let traj = engine.evolve(8);
        for _ in 0..8 {
            engine.step();
        }
        assert_eq!(engine.history(), traj);
    }

    #[test]
    fn history_is_a_copy() {
        let mut engine = AscpiEngine::canonical();
        let mut snapshot = engine.history();
        snapshot.clear();
        engine.step();
        assert_eq!(engine.history_len(), 2);
    }

    #[test]
    fn reset_truncates_history() {
        let mut engine = AscpiEngine::canonical();
        for _ in 0..5 {
            engine.step();
        }
        let fresh = FieldState::new(0.3, 0.2, 1.0, 0.4, 1.0).unwrap();
        engine.reset(fresh);
        assert_eq!(engine.history(), vec![fresh]);
        assert_eq!(*engine.current(), fresh);
    }

    #[test]
    fn history_limit_evicts_oldest() {
        let config = EngineConfig {
            history_limit: Some(3),
            ..Default::default()
        };
        let mut engine = AscpiEngine::with_config(create_canonical_state(), config).unwrap();
        for _ in 0..10 {
            engine.step();
        }
        assert_eq!(engine.history_len(), 3);
        assert_eq!(engine.evicted(), 8);
        assert_eq!(engine.history().last(), Some(engine.current()));
        assert_eq!(engine.history()[0].step(), 8);
    }

    #[test]
    fn with_config_rejects_bad_constants() {
        let config = EngineConfig {
            constants: KernelConstants {
                contraction_factor: 1.5,
                ..Default::default()
            },
            history_limit: None,
        };
        assert!(matches!(
            AscpiEngine::with_config(create_canonical_state(), config),
            Err(EngineError::InvalidConstants(_))
        ));
    }

    #[test]
    fn restore_checks_history_tail() {
        let mut engine = AscpiEngine::canonical();
        engine.step();
        engine.step();
        let restored =
            AscpiEngine::restore(*engine.current(), engine.history(), *engine.config(), 0).unwrap();
        assert_eq!(restored.history(), engine.history());

        let err = AscpiEngine::restore(
            *engine.current(),
            engine.history()[..1].to_vec(),
            EngineConfig::default(),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::HistoryMismatch { .. }));
        assert_eq!(
            AscpiEngine::restore(*engine.current(), Vec::new(), EngineConfig::default(), 0)
                .unwrap_err(),
            EngineError::EmptyHistory
        );
    }

    #[test]
    fn restore_rejects_gapped_history() {
        let mut engine = AscpiEngine::canonical();
        for _ in 0..3 {
            engine.step();
        }
        let mut history = engine.history();
        history.remove(1);
        let err = AscpiEngine::restore(*engine.current(), history, EngineConfig::default(), 0)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidState(StateError::StepGap { from: 0, to: 2 })
        );
    }

    #[test]
    fn restore_rejects_context_change_inside_history() {
        let mut engine = AscpiEngine::canonical();
        engine.step();
        let mut history = engine.history();
        history[0] = FieldState {
            context: 7.0,
            ..history[0]
        };
        let err = AscpiEngine::restore(*engine.current(), history, EngineConfig::default(), 0)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidState(StateError::ContextChanged { step: 1, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "finite_diff")]
    fn runaway_trajectory_aborts() {
        // |diff| roughly doubles every step and leaves f64 range near step 1024.
        let s = FieldState::new(1.0, 1.0, 0.0, 0.5, 1.0).unwrap();
        let _ = AscpiEngine::new(s).evolve(1100);
    }

    #[test]
    fn serialize_state_matches_codec() {
        let engine = AscpiEngine::canonical();
        assert_eq!(engine.serialize_state(), to_value(engine.current()));
    }
}
