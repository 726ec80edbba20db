//! Integration tests for the per-frame orchestration.
//!
//! These drive [`FrameOrchestrator`] the way the window loop does and check
//! the uniforms it hands to the GPU.

use emberglow::ripple::{NO_RIPPLE, RIPPLE_LIFETIME_MS, RIPPLE_MIN_INTERVAL_MS};
use emberglow::shading::{shade_fragment, sprite_size, SpriteFragment, MIN_POINT_SIZE};
use emberglow::{
    ConfigOverrides, FrameInput, FrameOrchestrator, GridSettings, ParticleConfig, ParticleGrid,
    Preset, Vec2, Vec3,
};
use rand::{Rng, SeedableRng};

// ============================================================================
// Helpers
// ============================================================================

fn orchestrator(size: u32) -> FrameOrchestrator {
    FrameOrchestrator::new(ParticleGrid::new(GridSettings::new(size, 1.0)).unwrap())
}

fn frame_at(ms: f64, pointer: Vec2) -> FrameInput {
    FrameInput {
        elapsed: (ms / 1000.0) as f32,
        delta: 1.0 / 60.0,
        now_ms: ms,
        pointer,
        introspect: false,
    }
}

// ============================================================================
// Grid
// ============================================================================

#[test]
fn test_particle_count_is_n_squared() {
    for n in 1..=32 {
        let o = orchestrator(n);
        assert_eq!(o.grid().particle_count(), n * n);
    }
}

// ============================================================================
// Reveal
// ============================================================================

#[test]
fn test_reveal_progress_monotonic_with_rewinding_manual_time() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    let mut o = orchestrator(8);
    let mut config = ParticleConfig {
        use_manual_time: true,
        ..ParticleConfig::default()
    };

    let mut last = 0.0_f32;
    let mut finished = false;
    for i in 0..400 {
        // Mostly forward, with occasional jumps back.
        config.manual_time = if rng.gen_bool(0.2) {
            rng.gen_range(0.0..2.0)
        } else {
            i as f32 * 0.02
        };
        let u = o.update(&config, &frame_at(i as f64 * 16.0, Vec2::splat(0.5)));
        let progress = u.points.reveal_progress;

        assert!((0.0..=1.0).contains(&progress));
        assert!(progress >= last, "progress went back: {last} -> {progress}");
        assert_eq!(progress == 1.0, !o.revealing(), "progress {progress} at frame {i}");
        last = progress;

        if finished {
            assert!(!o.revealing());
            assert_eq!(progress, 1.0);
        }
        finished |= !o.revealing();
    }
    assert!(finished);
}

// ============================================================================
// Ripples
// ============================================================================

#[test]
fn test_one_ripple_for_a_drag() {
    let config = ParticleConfig::default();
    let mut o = orchestrator(4);
    o.update(&config, &frame_at(0.0, Vec2::new(0.5, 0.5)));
    let u = o.update(&config, &frame_at(30.0 + 1.0, Vec2::new(0.5, 0.508)));

    assert_eq!(o.ripples().len(), 1);
    assert_eq!(o.ripples()[0].origin, Vec2::new(0.5, 0.508));
    assert_eq!(u.points.ripple_origin, [0.5, 0.508]);
}

#[test]
fn test_small_movement_no_ripple() {
    let config = ParticleConfig::default();
    let mut o = orchestrator(4);
    o.update(&config, &frame_at(0.0, Vec2::new(0.5, 0.5)));
    let u = o.update(&config, &frame_at(100.0, Vec2::new(0.5, 0.502)));

    assert!(o.ripples().is_empty());
    assert_eq!(u.points.ripple_time, NO_RIPPLE);
    assert_eq!(u.points.ripple_origin, [0.5, 0.502]);
}

#[test]
fn test_ripple_lifetime() {
    let config = ParticleConfig::default();
    let mut o = orchestrator(4);
    o.update(&config, &frame_at(0.0, Vec2::new(0.2, 0.2)));
    assert_eq!(o.ripples().len(), 1);

    // Hidden after 1.5 s but still stored.
    let u = o.update(&config, &frame_at(1600.0, Vec2::new(0.2, 0.2)));
    assert_eq!(u.points.ripple_time, NO_RIPPLE);
    assert_eq!(o.ripples().len(), 1);

    // Gone by 3001 ms even though the pointer never moved.
    o.update(&config, &frame_at(3001.0, Vec2::new(0.2, 0.2)));
    assert!(o.ripples().is_empty());
}

#[test]
fn test_ripples_bounded_under_rapid_movement() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(99);
    let config = ParticleConfig::default();
    let mut o = orchestrator(4);

    let bound = (RIPPLE_LIFETIME_MS / RIPPLE_MIN_INTERVAL_MS) as usize + 1;
    let mut ms = 0.0;
    for _ in 0..5000 {
        ms += rng.gen_range(1.0..40.0);
        let pointer = Vec2::new(rng.gen_range(-0.5..1.5), rng.gen_range(-0.5..1.5));
        o.update(&config, &frame_at(ms, pointer));
        assert!(o.ripples().len() <= bound);

        let ids: Vec<_> = o.ripples().iter().map(|r| r.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}

// ============================================================================
// Determinism and shading
// ============================================================================

#[test]
fn test_same_state_same_uniforms() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(3);
    let config = ParticleConfig::hero();
    let mut a = orchestrator(16);
    let mut b = orchestrator(16);

    let mut ms = 0.0;
    for _ in 0..300 {
        ms += 16.0;
        let frame = FrameInput {
            introspect: rng.gen_bool(0.5),
            ..frame_at(ms, Vec2::new(rng.gen(), rng.gen()))
        };
        assert_eq!(a.update(&config, &frame), b.update(&config, &frame));
    }
}

#[test]
fn test_uniforms_shade_without_nans() {
    let config = ParticleConfig::default();
    let mut o = orchestrator(4);
    o.update(&config, &frame_at(0.0, Vec2::new(0.4, 0.4)));
    let u = o.update(&config, &frame_at(500.0, Vec2::new(0.6, 0.4)));

    let fragment = SpriteFragment {
        point_coord: Vec2::splat(0.5),
        world: Vec3::new(0.1, 0.05, -0.3),
        initial: Vec3::new(0.1, 0.0, -0.3),
        focus_distance: 0.5,
    };
    let color = shade_fragment(&u.points, &fragment).expect("centre is never discarded");
    assert!(color.is_finite());
}

#[test]
fn test_point_size_floor() {
    let config = ParticleConfig::default();
    // Particle on the focal plane.
    assert_eq!(sprite_size(0.0, config.aperture, config.point_size), MIN_POINT_SIZE);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_partial_json_merges_with_preset() {
    let overrides = ConfigOverrides::from_json(r#"{ "preset": "hero", "opacity": 0.5 }"#).unwrap();
    assert_eq!(overrides.preset, Some(Preset::Hero));

    let (grid, config) = overrides.resolve().unwrap();
    assert_eq!(grid.plane_scale, 10.0);
    assert_eq!(config.opacity, 0.5);
    assert_eq!(config.point_size, ParticleConfig::hero().point_size);
}
