/// ASCπ Kernel v1: Invariant Checks
///
/// Hard-fail validation of operator outputs. A violation here means an
/// operator produced an illegal state, so `validate_invariants` panics.

use crate::arithmetic::TAU;
use crate::domain::FieldState;
use crate::error::StateError;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run all invariant checks. Panics on the first failure.
pub fn validate_invariants(state: &FieldState) {
    if let Err(violation) = try_validate_invariants(state) {
        panic!(
            "Invariant violation: {} (state at step {})",
            violation,
            state.step()
        );
    }
}

/// Non-panicking variant of `validate_invariants`.
/// Used by restore paths that load states from outside the kernel.
pub fn try_validate_invariants(state: &FieldState) -> Result<(), StateError> {
    check_finite(state)?;
    check_curvature(state)?;
    check_coherence(state)?;
    check_phase(state)?;
    Ok(())
}

/// Context must be carried unchanged and the step counter must advance by one.
/// Panics otherwise.
pub fn validate_transition(previous: &FieldState, next: &FieldState) {
    if let Err(violation) = try_validate_transition(previous, next) {
        panic!("Invariant violation: {}", violation);
    }
}

/// Non-panicking variant of `validate_transition`.
pub fn try_validate_transition(previous: &FieldState, next: &FieldState) -> Result<(), StateError> {
    if next.context().to_bits() != previous.context().to_bits() {
        return Err(StateError::ContextChanged {
            from: previous.context(),
            to: next.context(),
            step: next.step(),
        });
    }
    if previous.step().checked_add(1) != Some(next.step()) {
        return Err(StateError::StepGap {
            from: previous.step(),
            to: next.step(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Individual checks (private)
// ---------------------------------------------------------------------------

fn check_finite(state: &FieldState) -> Result<(), StateError> {
    for (field, value) in [
        ("diff", state.diff()),
        ("curvature", state.curvature()),
        ("context", state.context()),
    ] {
        if !value.is_finite() {
            return Err(StateError::NonFinite { field, value });
        }
    }
    Ok(())
}

fn check_curvature(state: &FieldState) -> Result<(), StateError> {
    if state.curvature() < 0.0 {
        return Err(StateError::NegativeCurvature(state.curvature()));
    }
    Ok(())
}

fn check_coherence(state: &FieldState) -> Result<(), StateError> {
    if !(0.0..=1.0).contains(&state.coherence()) {
        return Err(StateError::CoherenceOutOfRange(state.coherence()));
    }
    Ok(())
}

fn check_phase(state: &FieldState) -> Result<(), StateError> {
    let phase = state.phase();
    if !(phase >= 0.0 && phase < TAU) {
        return Err(StateError::PhaseOutOfRange(phase));
    }
    Ok(())
}
