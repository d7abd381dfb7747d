/// ASCπ Kernel v1: Centralized Transition Logic
///
/// ALL state-transition logic lives here. Every function is pure: the input
/// state is never touched and the same input always yields the same bits.
/// Constants come from `KernelConstants`.

use crate::arithmetic::{clamp_unit, injection_sign, next_step, normalize_phase};
use crate::domain::{FieldState, KernelConstants, Reflection, StepOutcome};

// ---------------------------------------------------------------------------
// Combined motor rule
// ---------------------------------------------------------------------------

/// One motor step: implosion if the predicate holds, reflection otherwise.
pub fn advance(state: &FieldState, constants: &KernelConstants) -> StepOutcome {
    if should_implode(state, constants) {
        return StepOutcome::Imploded(implode(state, constants));
    }
    match reflect(state, constants) {
        Reflection::Single(next) => StepOutcome::Reflected(next),
        Reflection::Split(positive, negative) => StepOutcome::Split(positive, negative),
    }
}

/// True if `next` is a legal successor of `previous`: the committed result
/// of `advance`, or either branch of a split.
pub fn is_successor(previous: &FieldState, next: &FieldState, constants: &KernelConstants) -> bool {
    match advance(previous, constants) {
        StepOutcome::Imploded(s) | StepOutcome::Reflected(s) => s == *next,
        StepOutcome::Split(positive, negative) => positive == *next || negative == *next,
    }
}

// ---------------------------------------------------------------------------
// Reflection
// ---------------------------------------------------------------------------

/// Reflection operator R(Ψ).
///
/// Splits into two successors exactly when `diff == 0.0`; there is no
/// tolerance band at this boundary.
pub fn reflect(state: &FieldState, constants: &KernelConstants) -> Reflection {
    if state.diff == 0.0 {
        let (positive, negative) = split_reflection(state, constants);
        Reflection::Split(positive, negative)
    } else {
        Reflection::Single(deterministic_reflection(state, constants))
    }
}

fn deterministic_reflection(state: &FieldState, constants: &KernelConstants) -> FieldState {
    let injection = injection_sign(state.diff);

    let diff = state.diff + injection * state.curvature;
    let curvature = diff.abs();
    let phase = normalize_phase(state.phase + injection);

    // Nudge: gain shrinks with distance from the attractor, decay is constant.
    let distance_from_target = (diff - constants.target_diff).abs();
    let nudge = constants.coherence_gain / (1.0 + distance_from_target);
    let coherence = clamp_unit(state.coherence + nudge - constants.coherence_decay);

    FieldState {
        diff,
        curvature,
        phase,
        coherence,
        context: state.context,
        step: next_step(state.step),
    }
}

fn split_reflection(state: &FieldState, constants: &KernelConstants) -> (FieldState, FieldState) {
    let coherence = state.coherence * constants.split_damping;
    let step = next_step(state.step);

    let positive = FieldState {
        diff: state.curvature,
        curvature: state.curvature,
        phase: normalize_phase(state.phase + 1.0),
        coherence,
        context: state.context,
        step,
    };
    let negative = FieldState {
        diff: -state.curvature,
        curvature: state.curvature,
        phase: normalize_phase(state.phase - 1.0),
        coherence,
        context: state.context,
        step,
    };
    (positive, negative)
}

// ---------------------------------------------------------------------------
// Implosion
// ---------------------------------------------------------------------------

/// True when the state is already close to the fixed point: high coherence,
/// vanishing diff and vanishing curvature. All comparisons are strict.
pub fn should_implode(state: &FieldState, constants: &KernelConstants) -> bool {
    state.coherence > constants.implosion_coherence
        && state.diff.abs() < constants.implosion_diff
        && state.curvature < constants.implosion_curvature
}

/// Implosion operator.
///
/// A structural relabeling, not a dynamical law: it moves the state toward
/// the canonical representative of its equivalence class (diff contracted,
/// phase kept, coherence raised). It never splits.
pub fn implode(state: &FieldState, constants: &KernelConstants) -> FieldState {
    let diff = state.diff * constants.contraction_factor;
    FieldState {
        diff,
        curvature: diff.abs(),
        phase: state.phase,
        coherence: (state.coherence + constants.implosion_coherence_step).min(1.0),
        context: state.context,
        step: next_step(state.step),
    }
}
