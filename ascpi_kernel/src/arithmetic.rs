/// ASCπ Kernel v1: Arithmetic Primitives
///
/// Phase reduction, unit clamping and the checked step counter.
/// Every operator goes through these so rounding is identical everywhere.

/// Golden ratio φ = (1 + √5) / 2.
pub const PHI: f64 = 1.618033988749895;

/// Default attractor for `diff`: φ / 2.
pub const DIFF_STAR: f64 = PHI / 2.0;

/// Phase period.
pub const TAU: f64 = std::f64::consts::TAU;

/// Half-width of the "near zero" band used by analysis (not by the split trigger).
pub const CRITICAL_EPSILON: f64 = 1e-10;

/// Reduce a phase into `[0, TAU)`.
///
/// `rem_euclid` can round up to exactly `TAU` for tiny negative inputs, and
/// yields `-0.0` for negative zero; both collapse to `0.0`.
pub fn normalize_phase(phase: f64) -> f64 {
    let reduced = phase.rem_euclid(TAU);
    if reduced >= TAU || reduced == 0.0 {
        0.0
    } else {
        reduced
    }
}

/// Clamp into `[0, 1]`.
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Shortest distance between two phases on the circle.
pub fn circular_distance(a: f64, b: f64) -> f64 {
    let d = (normalize_phase(a) - normalize_phase(b)).abs();
    d.min(TAU - d)
}

/// Injection sign: `+1` for strictly positive, `-1` otherwise.
pub fn injection_sign(diff: f64) -> f64 {
    if diff > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Checked step increment. Panics on u64 overflow.
pub fn next_step(step: u64) -> u64 {
    match step.checked_add(1) {
        Some(next) => next,
        None => panic!("Overflow: step counter {} + 1 overflows u64", step),
    }
}
