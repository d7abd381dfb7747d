//! Geometric value types. Pure data.

use serde::Serialize;

use crate::CHANNEL_COUNT;

/// 3D spatial coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const ORIGIN: Point3D = Point3D { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &Point3D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }

    /// Linear interpolation, `t = 0` at `self` and `t = 1` at `other`.
    pub fn lerp(&self, other: &Point3D, t: f64) -> Point3D {
        Point3D {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
            z: self.z + t * (other.z - self.z),
        }
    }
}

/// One channel of the hexagonal structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelGeometry {
    pub channel_id: usize,
    pub center_path: Vec<Point3D>,
    pub diameter: f64,
    pub curvature_density: f64,
    pub smoothness: f64,
    pub is_active: bool,
}

/// Complete hexagonal glyph. Always `CHANNEL_COUNT` channels with exactly
/// one active.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphGeometry {
    pub channels: Vec<ChannelGeometry>,
    pub active_channel: usize,
    pub total_volume: f64,
    /// Always 0: a glyph records no traversal.
    pub traversal_markers: u32,
    pub center_point: Point3D,
    pub scale_factor: f64,
}

impl GlyphGeometry {
    pub fn active(&self) -> &ChannelGeometry {
        &self.channels[self.active_channel]
    }

    pub fn channel(&self, channel_id: usize) -> Option<&ChannelGeometry> {
        self.channels.get(channel_id)
    }

    pub fn active_count(&self) -> usize {
        self.channels.iter().filter(|c| c.is_active).count()
    }

    /// Topological summary of this glyph.
    pub fn invariants(&self) -> GeometricInvariants {
        GeometricInvariants {
            total_volume: self.total_volume,
            channel_count: self.channels.len(),
            connectivity_degree: 2,
            traversal_count: self.traversal_markers,
        }
    }
}

/// Topological invariants of a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometricInvariants {
    pub total_volume: f64,
    pub channel_count: usize,
    pub connectivity_degree: usize,
    pub traversal_count: u32,
}

impl GeometricInvariants {
    pub fn is_hexagonal(&self) -> bool {
        self.channel_count == CHANNEL_COUNT && self.connectivity_degree == 2
    }
}
