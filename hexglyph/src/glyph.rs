//! Canonical glyph construction and isomorphism checks.

use ascpi_kernel::domain::FieldState;
use serde::{Deserialize, Serialize};

use crate::error::GlyphError;
use crate::geometry::{ChannelGeometry, GeometricInvariants, GlyphGeometry, Point3D};
use crate::mapper::{
    coherence_to_smoothness, context_to_volume, curvature_to_density, diff_to_diameter,
    phase_to_channel,
};
use crate::paths::generate_channel_path;
use crate::CHANNEL_COUNT;

/// Scale and complexity of the projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlyphConfig {
    pub base_scale: f64,
    /// Plain arcs when true, curvature-modulated paths when false.
    pub minimal: bool,
    /// Points per channel path.
    pub path_resolution: usize,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            base_scale: 1.0,
            minimal: true,
            path_resolution: 20,
        }
    }
}

impl GlyphConfig {
    pub fn validate(&self) -> Result<(), GlyphError> {
        if !(self.base_scale.is_finite() && self.base_scale > 0.0) {
            return Err(GlyphError::InvalidScale(self.base_scale));
        }
        if self.path_resolution < 2 {
            return Err(GlyphError::InvalidResolution(self.path_resolution));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, GlyphError> {
        let config: GlyphConfig =
            serde_json::from_str(json).map_err(|e| GlyphError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Project `state` with `config`.
pub fn project(state: &FieldState, config: &GlyphConfig) -> Result<GlyphGeometry, GlyphError> {
    Ok(Hex3DGlyph::new(*config)?.map_field_state(state))
}

/// Validated projector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hex3DGlyph {
    config: GlyphConfig,
}

impl Hex3DGlyph {
    pub fn new(config: GlyphConfig) -> Result<Self, GlyphError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn canonical() -> Self {
        Self {
            config: GlyphConfig::default(),
        }
    }

    pub fn config(&self) -> &GlyphConfig {
        &self.config
    }

    /// Map a field state to its hexagonal geometry. Idempotent.
    pub fn map_field_state(&self, state: &FieldState) -> GlyphGeometry {
        let diameter = diff_to_diameter(state.diff(), self.config.base_scale);
        let curvature_density = curvature_to_density(state.curvature());
        let active_channel = phase_to_channel(state.phase());
        let smoothness = coherence_to_smoothness(state.coherence());

        let channels = (0..CHANNEL_COUNT)
            .map(|channel_id| ChannelGeometry {
                channel_id,
                center_path: generate_channel_path(
                    channel_id,
                    curvature_density,
                    self.config.path_resolution,
                    self.config.minimal,
                    self.config.base_scale,
                ),
                diameter,
                curvature_density,
                smoothness,
                is_active: channel_id == active_channel,
            })
            .collect();

        GlyphGeometry {
            channels,
            active_channel,
            total_volume: context_to_volume(state.context()),
            traversal_markers: 0,
            center_point: Point3D::ORIGIN,
            scale_factor: self.config.base_scale,
        }
    }
}

/// Check that `geometry` is the projection of `state`: volume, traversal
/// markers, the single active channel, and per-channel attribute ranges.
pub fn try_validate_isomorphism(
    state: &FieldState,
    geometry: &GlyphGeometry,
) -> Result<(), GlyphError> {
    if (geometry.total_volume - state.context().abs()).abs() > 1e-6 {
        return Err(GlyphError::NotIsomorphic {
            check: "total_volume",
            detail: format!(
                "volume {} does not match |context| {}",
                geometry.total_volume,
                state.context().abs()
            ),
        });
    }
    if geometry.traversal_markers != 0 {
        return Err(GlyphError::NotIsomorphic {
            check: "traversal_markers",
            detail: format!("expected 0, got {}", geometry.traversal_markers),
        });
    }
    if geometry.channels.len() != CHANNEL_COUNT {
        return Err(GlyphError::NotIsomorphic {
            check: "channel_count",
            detail: format!("expected {}, got {}", CHANNEL_COUNT, geometry.channels.len()),
        });
    }

    let expected = phase_to_channel(state.phase());
    let active: Vec<usize> = geometry
        .channels
        .iter()
        .filter(|c| c.is_active)
        .map(|c| c.channel_id)
        .collect();
    if active != [expected] || geometry.active_channel != expected {
        return Err(GlyphError::NotIsomorphic {
            check: "active_channel",
            detail: format!("expected only channel {} active, got {:?}", expected, active),
        });
    }

    for channel in &geometry.channels {
        if !(channel.diameter >= 0.0) || !(channel.curvature_density >= 0.0) {
            return Err(GlyphError::NotIsomorphic {
                check: "non_negative",
                detail: format!(
                    "channel {} has diameter {} and curvature density {}",
                    channel.channel_id, channel.diameter, channel.curvature_density
                ),
            });
        }
        if !(0.0..=1.0).contains(&channel.smoothness) {
            return Err(GlyphError::NotIsomorphic {
                check: "smoothness_range",
                detail: format!(
                    "channel {} has smoothness {}",
                    channel.channel_id, channel.smoothness
                ),
            });
        }
        if channel.center_path.is_empty() {
            return Err(GlyphError::NotIsomorphic {
                check: "empty_path",
                detail: format!("channel {} has no path", channel.channel_id),
            });
        }
    }
    Ok(())
}

pub fn validate_isomorphism(state: &FieldState, geometry: &GlyphGeometry) -> bool {
    try_validate_isomorphism(state, geometry).is_ok()
}

pub fn geometric_invariants(geometry: &GlyphGeometry) -> GeometricInvariants {
    geometry.invariants()
}
