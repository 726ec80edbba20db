//! CPU reference of the point-sprite shading.
//!
//! These functions mirror the point-sprite WGSL in [`crate::shaders`]
//! one-to-one and share its helper names (`sparkle_brightness` is
//! `sparkle_noise` there). A change to either side belongs in both. The
//! constants below are injected into the generated shader source, so CPU and
//! GPU always agree on the numbers.
//!
//! Nothing here runs per frame in the renderer; the module exists so the
//! shading rules can be exercised and inspected without a GPU.

use glam::{Vec2, Vec3, Vec3Swizzles, Vec4};

use crate::ripple::RIPPLE_VISIBLE_SECS;
use crate::uniforms::PointUniforms;

/// Smallest sprite edge in pixels.
pub const MIN_POINT_SIZE: f32 = 3.0;
/// Radius of the circular footprint in `[-1, 1]` point space.
pub const SPRITE_RADIUS: f32 = 0.5;
/// Assumed half extent of the world in xz when mapping to screen space.
pub const WORLD_EXTENT: f32 = 10.0;
/// Screen-space radius of the pointer glow.
pub const GLOW_RADIUS: f32 = 0.4;
/// Number of concentric ripple rings.
pub const RIPPLE_LAYERS: u32 = 3;
/// Delay between ripple rings, in seconds.
pub const RIPPLE_LAYER_STAGGER: f32 = 0.12;
/// Ripple front speed in screen units per second.
pub const RIPPLE_SPEED: f32 = 0.7;
/// Upper clamp on ripple intensity.
pub const RIPPLE_MAX_INTENSITY: f32 = 1.5;
/// Sparkle amplitude kept by particles whose sparkle mask is low.
pub const SPARKLE_DAMPING: f32 = 0.05;
/// Sparkle mask value needed for full sparkle.
pub const SPARKLE_MASK_THRESHOLD: f32 = 0.3;
/// Offset subtracted from sparkle to form the introspect alpha.
pub const INTROSPECT_ALPHA_OFFSET: f32 = 1.1;

pub const BASE_COLOR: Vec3 = Vec3::new(1.0, 0.7, 0.3);
pub const ORANGE_TINT: Vec3 = Vec3::new(1.0, 0.5, 0.1);
pub const RIPPLE_COLOR: Vec3 = Vec3::new(1.0, 0.9, 0.7);

/// Hermite interpolation between two edges, as WGSL `smoothstep`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear blend, as WGSL `mix`.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Fractional part, as WGSL `fract` (always in `[0, 1)`).
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Smooth, time-periodic pseudo noise over the xz plane.
pub fn periodic_noise(p: Vec3, time: f32) -> f32 {
    let mut noise = 0.0_f32;
    noise += (p.x * 2.0 + time).sin() * (p.z * 1.5 + time).cos();
    noise += (p.x * 3.2 + time * 2.0).sin() * (p.z * 2.1 + time).cos() * 0.6;
    noise += (p.x * 1.7 + time).sin() * (p.z * 2.8 + time * 3.0).cos() * 0.4;
    noise += (p.x * p.z * 0.5 + p.y + time * 2.0).sin() * 0.3;
    noise * 0.3
}

/// Sprite edge in pixels, floored at [`MIN_POINT_SIZE`].
#[inline]
pub fn sprite_size(focus_distance: f32, aperture: f32, point_size: f32) -> f32 {
    (focus_distance * aperture * point_size).max(MIN_POINT_SIZE)
}

/// Distance from the focal plane for a view-space depth.
#[inline]
pub fn focus_distance(focus: f32, view_z: f32) -> f32 {
    (focus - (-view_z)).abs()
}

/// Signed distance from `p` to a circle of radius `r`.
#[inline]
pub fn sd_circle(p: Vec2, r: f32) -> f32 {
    p.length() - r
}

/// Whether a point coordinate (origin top-left, `[0, 1]²`) survives the
/// circular footprint test.
#[inline]
pub fn inside_sprite(point_coord: Vec2) -> bool {
    sd_circle(point_coord * 2.0 - Vec2::ONE, SPRITE_RADIUS) <= 0.0
}

/// Soft radial reveal with a noisy edge seeded by the initial position.
pub fn reveal_mask(world: Vec3, initial: Vec3, reveal_factor: f32) -> f32 {
    let d = world.xz().length();
    let threshold = reveal_factor + periodic_noise(initial * 4.0, 0.0) * 0.3;
    1.0 - smoothstep(threshold - 0.2, threshold + 0.1, d)
}

/// Per-particle twinkle multiplier in `[0.7, 2.0]`.
pub fn sparkle_brightness(seed: Vec3, time: f32) -> f32 {
    let phase = fract((seed.x * 127.1 + seed.y * 311.7 + seed.z * 74.7).sin() * 43758.5453);
    let mut sparkle = 0.0_f32;
    sparkle += (time + phase * 6.28318).sin() * 0.5;
    sparkle += (time * 1.7 + phase * 12.56636).sin() * 0.3;
    sparkle += (time * 0.8 + phase * 18.84954).sin() * 0.2;

    let gate = fract((seed.x * 113.5 + seed.y * 271.9 + seed.z * 97.3).sin() * 37849.3241);
    let mut sparkle_mask = (gate * 6.28318).sin() * 0.7;
    sparkle_mask += (gate * 12.56636).sin() * 0.3;
    if sparkle_mask < SPARKLE_MASK_THRESHOLD {
        sparkle *= SPARKLE_DAMPING;
    }

    let normalized = (sparkle + 1.0) * 0.5;
    let peaked = normalized.powf(4.0);
    let brightness = mix(normalized, peaked, normalized * normalized);
    0.7 + brightness * 1.3
}

/// Map a world position to an estimated `[0, 1]²` screen position.
#[inline]
pub fn screen_position(world: Vec3) -> Vec2 {
    (world.xz() + Vec2::splat(WORLD_EXTENT)) / (2.0 * WORLD_EXTENT)
}

/// Glow factor for a screen position relative to the pointer.
pub fn mouse_glow(screen: Vec2, pointer: Vec2) -> f32 {
    (1.0 - smoothstep(0.0, GLOW_RADIUS, screen.distance(pointer))).powf(1.5)
}

/// Brightness added by the active ripple. `ripple_time` outside
/// `(0, RIPPLE_VISIBLE_SECS)` means no ripple.
pub fn ripple_intensity(screen: Vec2, ripple_time: f32, origin: Vec2) -> f32 {
    let mut intensity = 0.0_f32;
    if ripple_time > 0.0 && ripple_time < RIPPLE_VISIBLE_SECS {
        let dist = screen.distance(origin);
        for i in 0..RIPPLE_LAYERS {
            let layer = i as f32;
            let layer_time = ripple_time - layer * RIPPLE_LAYER_STAGGER;
            if layer_time > 0.0 && layer_time < RIPPLE_VISIBLE_SECS {
                let wave = dist - layer_time * RIPPLE_SPEED;
                let mut ring = (wave * 10.0 - layer_time * 8.0).sin().abs();
                ring += (wave * 15.0 - layer_time * 12.0).sin().abs() * 0.5;
                let ring = ring.clamp(0.0, 1.0);
                let falloff = 1.0 - smoothstep(0.0, 0.8, dist);
                let sharp = (1.0 - smoothstep(0.0, 0.08, wave.abs())).powf(2.5);
                let fade = (1.0 - smoothstep(0.0, RIPPLE_VISIBLE_SECS, layer_time)).powf(1.2);
                intensity += ring * sharp * falloff * fade * (1.0 - layer * 0.15);
            }
        }
    }
    (intensity.powf(0.6) * 2.0).clamp(0.0, RIPPLE_MAX_INTENSITY)
}

/// Sprite colour before alpha.
pub fn sprite_color(distance_from_center: f32, glow_intensity: f32, ripple: f32) -> Vec3 {
    let gradient = (1.0 - distance_from_center * 0.2).clamp(0.6, 1.0);
    let color = BASE_COLOR.lerp(ORANGE_TINT, gradient * 0.4 + glow_intensity * 0.2);
    let color = color.lerp(RIPPLE_COLOR, ripple * 0.6);
    color * (1.0 + glow_intensity * 0.6 + ripple * 0.8)
}

/// One pixel of one sprite, as seen by the fragment stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFragment {
    /// Position within the sprite, origin top-left, `[0, 1]²`.
    pub point_coord: Vec2,
    /// Live particle position.
    pub world: Vec3,
    /// Seed particle position.
    pub initial: Vec3,
    /// Distance from the focal plane.
    pub focus_distance: f32,
}

/// Shade one fragment. `None` means the fragment is discarded.
///
/// The output alpha is `mix(alpha, sparkle - 1.1, transition)` and goes
/// negative while hovering on dim particles. It is kept as is.
pub fn shade_fragment(uniforms: &PointUniforms, fragment: &SpriteFragment) -> Option<Vec4> {
    if !inside_sprite(fragment.point_coord) {
        return None;
    }

    let revealed = reveal_mask(fragment.world, fragment.initial, uniforms.reveal_factor);
    let sparkle = sparkle_brightness(fragment.initial, uniforms.time);
    let screen = screen_position(fragment.world);
    let glow = mouse_glow(screen, Vec2::from(uniforms.mouse));
    let ripple = ripple_intensity(screen, uniforms.ripple_time, Vec2::from(uniforms.ripple_origin));
    let glow_intensity = glow * 0.4 + uniforms.transition * 0.3 + ripple * 0.8;

    let alpha = (1.04 - fragment.focus_distance.clamp(0.0, 1.0))
        * smoothstep(-0.5, 0.25, fragment.world.y).clamp(0.0, 1.0)
        * uniforms.opacity
        * revealed
        * uniforms.reveal_progress
        * sparkle;

    let color = sprite_color(fragment.world.xz().length(), glow_intensity, ripple);
    let alpha = mix(alpha, sparkle - INTROSPECT_ALPHA_OFFSET, uniforms.transition);
    Some(color.extend(alpha))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn uniforms() -> PointUniforms {
        PointUniforms {
            time: 2.0,
            opacity: 1.0,
            reveal_factor: 4.0,
            reveal_progress: 1.0,
            mouse: [0.5, 0.5],
            ripple_time: -1.0,
            ripple_origin: [0.5, 0.5],
            ..PointUniforms::default()
        }
    }

    fn center_fragment() -> SpriteFragment {
        SpriteFragment {
            point_coord: Vec2::splat(0.5),
            world: Vec3::ZERO,
            initial: Vec3::ZERO,
            focus_distance: 0.2,
        }
    }

    #[test]
    fn test_sprite_size_floor() {
        assert_eq!(sprite_size(0.0, 1.79, 2.0), MIN_POINT_SIZE);
        assert_eq!(sprite_size(0.5, 1.0, 2.0), MIN_POINT_SIZE);
        assert_eq!(sprite_size(1.4999, 1.0, 2.0), MIN_POINT_SIZE);
        assert_eq!(sprite_size(2.0, 1.0, 2.0), 4.0);
    }

    #[test]
    fn test_sprite_size_floor_random() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let d: f32 = rng.gen_range(0.0..5.0);
            let a: f32 = rng.gen_range(0.0..3.0);
            let s: f32 = rng.gen_range(0.0..12.0);
            let size = sprite_size(d, a, s);
            if d * a * s < MIN_POINT_SIZE {
                assert_eq!(size, MIN_POINT_SIZE);
            } else {
                assert_eq!(size, d * a * s);
            }
        }
    }

    #[test]
    fn test_focus_distance() {
        // Camera looks down -z; a point 3 units ahead has view z = -3.
        assert!((focus_distance(3.8, -3.0) - 0.8).abs() < 1e-6);
        assert!((focus_distance(3.8, -4.6) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_circular_discard() {
        assert!(inside_sprite(Vec2::splat(0.5)));
        assert!(inside_sprite(Vec2::new(0.5, 0.75)));
        // Radius 0.6 in [-1, 1] space.
        assert!(!inside_sprite(Vec2::new(0.8, 0.5)));
        // Corners of the quad are outside.
        assert!(!inside_sprite(Vec2::ZERO));
        assert!(!inside_sprite(Vec2::ONE));

        let mut fragment = center_fragment();
        fragment.point_coord = Vec2::new(0.0, 0.0);
        assert_eq!(shade_fragment(&uniforms(), &fragment), None);
    }

    #[test]
    fn test_sparkle_range() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..2000 {
            let seed = Vec3::new(rng.gen_range(-10.0..10.0), 0.0, rng.gen_range(-10.0..10.0));
            let b = sparkle_brightness(seed, rng.gen_range(0.0..100.0));
            assert!((0.7 - 1e-4..=2.0 + 1e-4).contains(&b), "brightness {b}");
        }
    }

    #[test]
    fn test_sparkle_static_mask_damps() {
        // At the zero seed the gate hash is 0, so the mask is 0 and sparkle
        // is damped to 5%: brightness stays near the middle of the band.
        let b = sparkle_brightness(Vec3::ZERO, std::f32::consts::FRAC_PI_2);
        let sparkle = 0.5 * SPARKLE_DAMPING
            + (1.7 * std::f32::consts::FRAC_PI_2).sin() * 0.3 * SPARKLE_DAMPING
            + (0.8 * std::f32::consts::FRAC_PI_2).sin() * 0.2 * SPARKLE_DAMPING;
        let n = (sparkle + 1.0) * 0.5;
        let expected = 0.7 + mix(n, n.powf(4.0), n * n) * 1.3;
        assert!((b - expected).abs() < 1e-5);
    }

    #[test]
    fn test_mouse_glow_falls_off() {
        let pointer = Vec2::splat(0.5);
        assert_eq!(mouse_glow(pointer, pointer), 1.0);
        let near = mouse_glow(Vec2::new(0.55, 0.5), pointer);
        let far = mouse_glow(Vec2::new(0.8, 0.5), pointer);
        assert!(near > far);
        assert_eq!(mouse_glow(Vec2::new(0.95, 0.5), pointer), 0.0);
        // Pointers outside the viewport only weaken the glow.
        assert_eq!(mouse_glow(Vec2::splat(0.5), Vec2::new(-3.0, 7.0)), 0.0);
    }

    #[test]
    fn test_screen_position_extent() {
        assert_eq!(screen_position(Vec3::new(-10.0, 5.0, -10.0)), Vec2::ZERO);
        assert_eq!(screen_position(Vec3::new(10.0, 0.0, 10.0)), Vec2::ONE);
        assert_eq!(screen_position(Vec3::ZERO), Vec2::splat(0.5));
    }

    #[test]
    fn test_ripple_inactive_sentinel() {
        let s = Vec2::splat(0.5);
        assert_eq!(ripple_intensity(s, -1.0, s), 0.0);
        assert_eq!(ripple_intensity(s, 0.0, s), 0.0);
        assert_eq!(ripple_intensity(s, RIPPLE_VISIBLE_SECS, s), 0.0);
    }

    #[test]
    fn test_ripple_bounded() {
        let origin = Vec2::splat(0.5);
        let mut peak: f32 = 0.0;
        for step in 1..150 {
            let t = step as f32 * 0.01;
            for r in 0..100 {
                let screen = origin + Vec2::new(r as f32 * 0.01, 0.0);
                let v = ripple_intensity(screen, t, origin);
                assert!((0.0..=RIPPLE_MAX_INTENSITY).contains(&v));
                peak = peak.max(v);
            }
        }
        assert!(peak > 0.5, "ripple never became visible");
    }

    #[test]
    fn test_ripple_front_moves_outward() {
        let origin = Vec2::ZERO;
        let t = 0.5;
        let on_front = ripple_intensity(Vec2::new(t * RIPPLE_SPEED, 0.0), t, origin);
        let behind = ripple_intensity(Vec2::new(t * RIPPLE_SPEED + 0.3, 0.0), t, origin);
        assert!(on_front > behind);
    }

    #[test]
    fn test_zero_textures_shade_finite() {
        let fragment = center_fragment();
        let color = shade_fragment(&PointUniforms::default(), &fragment).unwrap();
        assert!(color.is_finite());
        let color = shade_fragment(&uniforms(), &fragment).unwrap();
        assert!(color.is_finite());
    }

    #[test]
    fn test_hidden_before_reveal() {
        let mut u = uniforms();
        u.reveal_progress = 0.0;
        u.reveal_factor = 0.0;
        let color = shade_fragment(&u, &center_fragment()).unwrap();
        assert_eq!(color.w, 0.0);
    }

    #[test]
    fn test_introspect_alpha_formula() {
        let mut u = uniforms();
        u.transition = 1.0;
        let fragment = center_fragment();
        let color = shade_fragment(&u, &fragment).unwrap();
        let sparkle = sparkle_brightness(fragment.initial, u.time);
        assert!((color.w - (sparkle - INTROSPECT_ALPHA_OFFSET)).abs() < 1e-6);
    }

    #[test]
    fn test_ripple_brightens_color() {
        let plain = sprite_color(0.0, 0.0, 0.0);
        let rippled = sprite_color(0.0, 0.0, 1.0);
        assert!(rippled.x >= plain.x && rippled.y > plain.y && rippled.z > plain.z);
    }
}
