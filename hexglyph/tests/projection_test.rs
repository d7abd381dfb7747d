//! Projection of kernel trajectories onto the hexagonal glyph.

use ascpi_kernel::domain::{Branch, FieldState, StepOutcome};
use ascpi_kernel::engine::AscpiEngine;
use ascpi_kernel::state::create_canonical_state;

use hexglyph::glyph::{try_validate_isomorphism, validate_isomorphism};
use hexglyph::mapper::phase_to_channel;
use hexglyph::topology::{channel_step, ChannelStep};
use hexglyph::{project, GlyphConfig, Hex3DGlyph, CHANNEL_COUNT};

fn sample_states() -> Vec<FieldState> {
    let mut states = AscpiEngine::new(create_canonical_state()).evolve(40);
    let offset = FieldState::new(-0.2, 0.3, 4.0, 0.1, 3.0).unwrap();
    states.extend(AscpiEngine::new(offset).evolve(40));
    states.push(FieldState::new(0.0, 0.5, 0.0, 0.5, 1.0).unwrap());
    states.push(FieldState::new(0.001, 0.01, 5.9, 0.99, 0.0).unwrap());
    states
}

#[test]
fn every_trajectory_state_projects_isomorphically() {
    for minimal in [true, false] {
        let config = GlyphConfig {
            minimal,
            ..Default::default()
        };
        for state in sample_states() {
            let geometry = project(&state, &config).unwrap();
            try_validate_isomorphism(&state, &geometry).unwrap();
            assert_eq!(geometry.channels.len(), CHANNEL_COUNT);
            assert_eq!(geometry.active_count(), 1);
            assert_eq!(geometry.active().channel_id, phase_to_channel(state.phase()));
            for channel in &geometry.channels {
                assert!(channel.diameter >= 0.0);
                assert!(channel.curvature_density >= 0.0);
                assert!((0.0..=1.0).contains(&channel.smoothness));
                assert!(!channel.center_path.is_empty());
            }
        }
    }
}

#[test]
fn active_channel_never_jumps() {
    let glyph = Hex3DGlyph::canonical();
    for start in [
        create_canonical_state(),
        FieldState::new(-0.2, 0.3, 4.0, 0.1, 3.0).unwrap(),
        FieldState::new(0.0, 0.9, 1.0, 0.5, 1.0).unwrap(),
    ] {
        let trajectory = AscpiEngine::new(start).evolve(60);
        for pair in trajectory.windows(2) {
            let a = glyph.map_field_state(&pair[0]).active_channel;
            let b = glyph.map_field_state(&pair[1]).active_channel;
            assert_ne!(
                channel_step(a, b),
                ChannelStep::Jump,
                "jump {} -> {} at step {}",
                a,
                b,
                pair[1].step()
            );
        }
    }
}

#[test]
fn both_split_branches_stay_adjacent() {
    let start = FieldState::new(0.0, 0.5, 3.3, 0.5, 1.0).unwrap();
    let mut engine = AscpiEngine::new(start);
    let (positive, negative) = match engine.step() {
        StepOutcome::Split(a, b) => (a, b),
        other => panic!("Expected split, got {:?}", other),
    };
    let glyph = Hex3DGlyph::canonical();
    let origin = glyph.map_field_state(&start).active_channel;
    for branch in [positive, negative] {
        let moved = glyph.map_field_state(&branch).active_channel;
        assert_ne!(channel_step(origin, moved), ChannelStep::Jump);
    }
    let committed = engine.resolve_split(Branch::Positive).unwrap();
    assert_eq!(committed, positive);
}

#[test]
fn projection_does_not_touch_the_state() {
    let state = create_canonical_state();
    let before = state;
    let g1 = project(&state, &GlyphConfig::default()).unwrap();
    let g2 = project(&state, &GlyphConfig::default()).unwrap();
    assert_eq!(state, before);
    assert_eq!(g1, g2);
    assert!(validate_isomorphism(&state, &g1));
}
