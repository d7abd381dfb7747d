//! Channel connectivity.
//!
//! The six channels form a simple cycle: channel `i` touches `i - 1` and
//! `i + 1` (mod 6) and nothing else.

use std::collections::BTreeMap;

use ascpi_kernel::arithmetic::TAU;
use serde::Serialize;

use crate::geometry::Point3D;
use crate::CHANNEL_COUNT;

/// The two neighbours of a channel, `(previous, next)`.
pub fn adjacent_channels(channel_id: usize) -> (usize, usize) {
    let id = channel_id % CHANNEL_COUNT;
    ((id + CHANNEL_COUNT - 1) % CHANNEL_COUNT, (id + 1) % CHANNEL_COUNT)
}

/// A transition is valid only between neighbours.
pub fn is_valid_transition(from_channel: usize, to_channel: usize) -> bool {
    let (prev, next) = adjacent_channels(from_channel);
    to_channel == prev || to_channel == next
}

/// Full adjacency map, sorted by channel id.
pub fn connectivity() -> BTreeMap<usize, [usize; 2]> {
    (0..CHANNEL_COUNT)
        .map(|id| {
            let (prev, next) = adjacent_channels(id);
            (id, [prev, next])
        })
        .collect()
}

/// Anchor of a channel on the unit circle.
pub fn channel_anchor(channel_id: usize) -> Point3D {
    let angle = channel_id as f64 * TAU / CHANNEL_COUNT as f64;
    Point3D::new(angle.cos(), angle.sin(), 0.0)
}

/// Anchors of two channels, used as connection endpoints.
pub fn connection_points(from_channel: usize, to_channel: usize) -> (Point3D, Point3D) {
    (channel_anchor(from_channel), channel_anchor(to_channel))
}

/// How the active channel moved between two successive glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStep {
    Stay,
    Adjacent,
    Jump,
}

pub fn channel_step(previous: usize, next: usize) -> ChannelStep {
    if previous % CHANNEL_COUNT == next % CHANNEL_COUNT {
        ChannelStep::Stay
    } else if is_valid_transition(previous, next % CHANNEL_COUNT) {
        ChannelStep::Adjacent
    } else {
        ChannelStep::Jump
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_channel_has_two_neighbours() {
        let map = connectivity();
        assert_eq!(map.len(), CHANNEL_COUNT);
        for (id, [prev, next]) in &map {
            assert_ne!(prev, next);
            assert_eq!(adjacent_channels(*prev).1, *id);
            assert_eq!(adjacent_channels(*next).0, *id);
        }
        assert_eq!(adjacent_channels(0), (5, 1));
        assert_eq!(adjacent_channels(5), (4, 0));
    }

    #[test]
    fn validity_matches_adjacency() {
        for i in 0..CHANNEL_COUNT {
            for j in 0..CHANNEL_COUNT {
                let (prev, next) = adjacent_channels(i);
                assert_eq!(is_valid_transition(i, j), j == prev || j == next);
            }
        }
        assert!(!is_valid_transition(2, 2));
        assert!(!is_valid_transition(0, 3));
    }

    #[test]
    fn anchors_lie_on_unit_circle() {
        for id in 0..CHANNEL_COUNT {
            let p = channel_anchor(id);
            assert!((p.distance_to(&Point3D::ORIGIN) - 1.0).abs() < 1e-12);
        }
        let (a, b) = connection_points(0, 3);
        assert!((a.distance_to(&b) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn channel_step_classification() {
        assert_eq!(channel_step(2, 2), ChannelStep::Stay);
        assert_eq!(channel_step(5, 0), ChannelStep::Adjacent);
        assert_eq!(channel_step(1, 4), ChannelStep::Jump);
    }
}
