//! 3D center paths for channels.

use ascpi_kernel::arithmetic::TAU;

use crate::geometry::Point3D;
use crate::CHANNEL_COUNT;

/// Number of points in a torus connection between two channel paths.
const CONNECTION_POINTS: usize = 5;

/// Path of one channel: `num_points` samples along its 60° arc.
///
/// Minimal paths stay on the circle of radius `scale` at z = 0. Embellished
/// paths modulate radius and height with the curvature density.
/// `num_points` must be at least 2.
pub fn generate_channel_path(
    channel_id: usize,
    curvature_density: f64,
    num_points: usize,
    minimal: bool,
    scale: f64,
) -> Vec<Point3D> {
    let base_angle = channel_id as f64 * TAU / CHANNEL_COUNT as f64;
    let sector = TAU / CHANNEL_COUNT as f64;
    let last = (num_points.max(2) - 1) as f64;

    (0..num_points)
        .map(|i| {
            let t = i as f64 / last;
            let angle = base_angle + t * sector;
            if minimal {
                Point3D::new(scale * angle.cos(), scale * angle.sin(), 0.0)
            } else {
                let k = curvature_density;
                let radius = 1.0 + 0.1 * k * (t * TAU * k).sin();
                let height = 0.2 * k * (t * TAU * k * 2.0).cos();
                Point3D::new(
                    scale * radius * angle.cos(),
                    scale * radius * angle.sin(),
                    scale * height,
                )
            }
        })
        .collect()
}

/// Straight bridge from the end of `path1` to the start of `path2`.
/// Empty if either path is empty.
pub fn torus_connection(path1: &[Point3D], path2: &[Point3D]) -> Vec<Point3D> {
    let (Some(start), Some(end)) = (path1.last(), path2.first()) else {
        return Vec::new();
    };
    let last = (CONNECTION_POINTS - 1) as f64;
    (0..CONNECTION_POINTS)
        .map(|i| start.lerp(end, i as f64 / last))
        .collect()
}
