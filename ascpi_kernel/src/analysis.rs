/// ASCπ Kernel v1: Field Analysis
///
/// Read-only metrics over field states. Nothing here feeds back into the
/// motor law.

use serde::Serialize;

use crate::arithmetic::{circular_distance, CRITICAL_EPSILON};
use crate::domain::FieldState;

/// E = |diff| + curvature + coherence
pub fn field_energy(state: &FieldState) -> f64 {
    state.diff().abs() + state.curvature() + state.coherence()
}

/// p = diff · cos(phase)
pub fn field_momentum(state: &FieldState) -> f64 {
    state.diff() * state.phase().cos()
}

/// K = curvature / (1 + |diff|)
pub fn curvature_invariant(state: &FieldState) -> f64 {
    state.curvature() / (1.0 + state.diff().abs())
}

/// λ = 1 + curvature. Always >= 1.
pub fn stability_eigenvalue(state: &FieldState) -> f64 {
    1.0 + state.curvature()
}

pub fn is_coherent(state: &FieldState, threshold: f64) -> bool {
    state.coherence() >= threshold
}

/// Near the split boundary within `CRITICAL_EPSILON`. Informational only;
/// the reflection operator itself splits on exact zero.
pub fn is_critical(state: &FieldState) -> bool {
    state.diff().abs() < CRITICAL_EPSILON
}

/// Topological distance:
/// `|Δdiff| + |Δcurvature| + min(|Δphase|, 2π - |Δphase|)`.
pub fn distance(a: &FieldState, b: &FieldState) -> f64 {
    (a.diff() - b.diff()).abs()
        + (a.curvature() - b.curvature()).abs()
        + circular_distance(a.phase(), b.phase())
}

/// Two states are equivalent when their distance is below `tolerance`.
pub fn are_equivalent(a: &FieldState, b: &FieldState, tolerance: f64) -> bool {
    distance(a, b) < tolerance
}

/// All metrics of one state, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldMetrics {
    pub step: u64,
    pub energy: f64,
    pub momentum: f64,
    pub curvature_invariant: f64,
    pub stability_eigenvalue: f64,
    pub critical: bool,
}

impl FieldMetrics {
    pub fn of(state: &FieldState) -> Self {
        Self {
            step: state.step(),
            energy: field_energy(state),
            momentum: field_momentum(state),
            curvature_invariant: curvature_invariant(state),
            stability_eigenvalue: stability_eigenvalue(state),
            critical: is_critical(state),
        }
    }
}
