//! Field value → geometric attribute mappings.
//!
//! Each function is pure and total over valid field states.

use ascpi_kernel::arithmetic::{clamp_unit, normalize_phase, TAU};

use crate::CHANNEL_COUNT;

/// Exponent applied to `diff` for the channel diameter.
pub const DIAMETER_ALPHA: f64 = 0.5;

/// `diameter = base · exp(α · diff)`. Smooth and positive on both sides of
/// `diff = 0`.
pub fn diff_to_diameter(diff: f64, base_diameter: f64) -> f64 {
    base_diameter * (DIAMETER_ALPHA * diff).exp()
}

pub fn curvature_to_density(curvature: f64) -> f64 {
    curvature.max(0.0)
}

/// Phase as an element of ℤ₆: `floor(phase / 2π · 6) mod 6`.
/// Interpreted cyclically, not as a spatial angle.
pub fn phase_to_channel(phase: f64) -> usize {
    let position = normalize_phase(phase) / TAU * CHANNEL_COUNT as f64;
    (position as usize) % CHANNEL_COUNT
}

pub fn coherence_to_smoothness(coherence: f64) -> f64 {
    clamp_unit(coherence)
}

/// Context maps to total volume, invariant under the motor law.
pub fn context_to_volume(context: f64) -> f64 {
    context.abs()
}
