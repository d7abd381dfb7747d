/// ASCπ Kernel v1: State Construction
///
/// Every public path into a FieldState goes through `FieldState::from_parts`,
/// which normalizes phase and rejects the rest. No implicit correction.

use crate::arithmetic::{normalize_phase, DIFF_STAR, PHI};
use crate::domain::FieldState;
use crate::error::StateError;

impl FieldState {
    /// Build a step-0 state.
    pub fn new(
        diff: f64,
        curvature: f64,
        phase: f64,
        coherence: f64,
        context: f64,
    ) -> Result<Self, StateError> {
        Self::from_parts(diff, curvature, phase, coherence, context, 0)
    }

    /// Build a state at an arbitrary step (used by import and restore).
    pub fn from_parts(
        diff: f64,
        curvature: f64,
        phase: f64,
        coherence: f64,
        context: f64,
        step: u64,
    ) -> Result<Self, StateError> {
        for (field, value) in [
            ("diff", diff),
            ("curvature", curvature),
            ("phase", phase),
            ("context", context),
        ] {
            if !value.is_finite() {
                return Err(StateError::NonFinite { field, value });
            }
        }
        if curvature < 0.0 {
            return Err(StateError::NegativeCurvature(curvature));
        }
        if !(0.0..=1.0).contains(&coherence) {
            return Err(StateError::CoherenceOutOfRange(coherence));
        }
        Ok(Self {
            diff,
            curvature,
            phase: normalize_phase(phase),
            coherence,
            context,
            step,
        })
    }
}

/// Create an initial (step 0) state, filling unspecified fields with defaults:
/// diff 0.1, curvature 1.0, phase 0.0, coherence 0.5, context 1.0.
pub fn create_initial_state(
    diff: Option<f64>,
    curvature: Option<f64>,
    phase: Option<f64>,
    coherence: Option<f64>,
    context: Option<f64>,
) -> Result<FieldState, StateError> {
    FieldState::new(
        diff.unwrap_or(0.1),
        curvature.unwrap_or(1.0),
        phase.unwrap_or(0.0),
        coherence.unwrap_or(0.5),
        context.unwrap_or(1.0),
    )
}

/// The canonical starting point: a small perturbation of the attractor with
/// golden-ratio context.
pub fn create_canonical_state() -> FieldState {
    FieldState {
        diff: DIFF_STAR * 0.1,
        curvature: 1.0,
        phase: 0.0,
        coherence: 0.5,
        context: PHI,
        step: 0,
    }
}
