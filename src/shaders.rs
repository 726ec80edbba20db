//! WGSL sources for the two render stages.
//!
//! Both shaders are assembled from a generated constants header (taken from
//! [`crate::shading`] and [`crate::ripple`]) plus static bodies:
//!
//! - [`simulation_shader`] - fullscreen pass writing one texel per particle.
//! - [`points_shader`] - instanced quads that read the position textures and
//!   shade each particle as a soft circular sprite.
//!
//! Shared helpers available to both:
//! - `periodic_noise(p: vec3<f32>, time: f32) -> f32`

use std::fmt::Write;

use crate::ripple::RIPPLE_VISIBLE_SECS;
use crate::shading::{
    BASE_COLOR, GLOW_RADIUS, INTROSPECT_ALPHA_OFFSET, MIN_POINT_SIZE, ORANGE_TINT, RIPPLE_COLOR,
    RIPPLE_LAYERS, RIPPLE_LAYER_STAGGER, RIPPLE_MAX_INTENSITY, RIPPLE_SPEED, SPARKLE_DAMPING,
    SPARKLE_MASK_THRESHOLD, SPRITE_RADIUS, WORLD_EXTENT,
};

/// WGSL for the periodic displacement noise.
pub const PERIODIC_NOISE_WGSL: &str = r#"
fn periodic_noise(p: vec3<f32>, time: f32) -> f32 {
    var noise = 0.0;
    noise += sin(p.x * 2.0 + time) * cos(p.z * 1.5 + time);
    noise += sin(p.x * 3.2 + time * 2.0) * cos(p.z * 2.1 + time) * 0.6;
    noise += sin(p.x * 1.7 + time) * cos(p.z * 2.8 + time * 3.0) * 0.4;
    noise += sin(p.x * p.z * 0.5 + p.y + time * 2.0) * 0.3;
    return noise * 0.3;
}
"#;

const SIMULATION_BODY: &str = r#"
struct SimulationUniforms {
    time: f32,
    noise_scale: f32,
    noise_intensity: f32,
    time_scale: f32,
    response: f32,
    _padding0: f32,
    _padding1: f32,
    _padding2: f32,
};

@group(0) @binding(0)
var<uniform> sim: SimulationUniforms;

@group(0) @binding(1)
var previous_positions: texture_2d<f32>;

@group(0) @binding(2)
var initial_positions: texture_2d<f32>;

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> @builtin(position) vec4<f32> {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    return vec4<f32>(positions[vertex_index], 0.0, 1.0);
}

@fragment
fn fs_main(@builtin(position) frag_coord: vec4<f32>) -> @location(0) vec4<f32> {
    let texel = vec2<i32>(floor(frag_coord.xy));
    let previous = textureLoad(previous_positions, texel, 0).xyz;
    let origin = textureLoad(initial_positions, texel, 0).xyz;

    let t = sim.time * sim.time_scale;
    let p = origin * sim.noise_scale;
    let displacement = vec3<f32>(
        periodic_noise(p, t),
        periodic_noise(p + vec3<f32>(50.0, 0.0, 0.0), t + 2.094),
        periodic_noise(p + vec3<f32>(0.0, 50.0, 0.0), t + 4.188),
    ) * sim.noise_intensity;

    let goal = origin + displacement;
    return vec4<f32>(mix(previous, goal, vec3<f32>(sim.response)), 1.0);
}
"#;

// Helpers mirror `crate::shading` by name (`sparkle_noise` is `sparkle_brightness` there). Edit both.
const POINTS_BODY: &str = r#"
struct PointUniforms {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    viewport: vec2<f32>,
    mouse: vec2<f32>,
    ripple_origin: vec2<f32>,
    time: f32,
    focus: f32,
    blur: f32,
    point_size: f32,
    opacity: f32,
    reveal_factor: f32,
    reveal_progress: f32,
    ripple_time: f32,
    transition: f32,
    _padding: f32,
};

@group(0) @binding(0)
var<uniform> u: PointUniforms;

@group(0) @binding(1)
var positions: texture_2d<f32>;

@group(0) @binding(2)
var initial_positions: texture_2d<f32>;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) point_coord: vec2<f32>,
    @location(1) world_position: vec3<f32>,
    @location(2) initial_position: vec3<f32>,
    @location(3) focus_distance: f32,
};

fn lattice_texel(lattice: vec2<f32>) -> vec2<i32> {
    let dims = vec2<i32>(textureDimensions(positions));
    let texel = vec2<i32>(floor(lattice * vec2<f32>(dims)));
    return clamp(texel, vec2<i32>(0, 0), dims - vec2<i32>(1, 1));
}

fn sprite_size(focus_distance: f32, blur: f32, point_size: f32) -> f32 {
    return max(focus_distance * blur * point_size, MIN_POINT_SIZE);
}

fn sd_circle(p: vec2<f32>, r: f32) -> f32 {
    return length(p) - r;
}

fn reveal_mask(world: vec3<f32>, initial: vec3<f32>, reveal_factor: f32) -> f32 {
    let d = length(world.xz);
    let threshold = reveal_factor + periodic_noise(initial * 4.0, 0.0) * 0.3;
    return 1.0 - smoothstep(threshold - 0.2, threshold + 0.1, d);
}

fn sparkle_noise(seed: vec3<f32>, time: f32) -> f32 {
    let phase = fract(sin(seed.x * 127.1 + seed.y * 311.7 + seed.z * 74.7) * 43758.5453);
    var sparkle = 0.0;
    sparkle += sin(time + phase * 6.28318) * 0.5;
    sparkle += sin(time * 1.7 + phase * 12.56636) * 0.3;
    sparkle += sin(time * 0.8 + phase * 18.84954) * 0.2;

    // Static per-particle gate; most particles barely twinkle.
    let gate = fract(sin(seed.x * 113.5 + seed.y * 271.9 + seed.z * 97.3) * 37849.3241);
    var sparkle_mask = sin(gate * 6.28318) * 0.7;
    sparkle_mask += sin(gate * 12.56636) * 0.3;
    if sparkle_mask < SPARKLE_MASK_THRESHOLD {
        sparkle *= SPARKLE_DAMPING;
    }

    let normalized = (sparkle + 1.0) * 0.5;
    let peaked = pow(normalized, 4.0);
    let brightness = mix(normalized, peaked, normalized * normalized);
    return 0.7 + brightness * 1.3;
}

fn screen_position(world: vec3<f32>) -> vec2<f32> {
    return (world.xz + vec2<f32>(WORLD_EXTENT)) / (2.0 * WORLD_EXTENT);
}

fn mouse_glow(screen: vec2<f32>, pointer: vec2<f32>) -> f32 {
    return pow(1.0 - smoothstep(0.0, GLOW_RADIUS, length(screen - pointer)), 1.5);
}

fn ripple_intensity(screen: vec2<f32>, ripple_time: f32, origin: vec2<f32>) -> f32 {
    var intensity = 0.0;
    if ripple_time > 0.0 && ripple_time < RIPPLE_VISIBLE_SECS {
        let dist = length(screen - origin);
        for (var i = 0; i < RIPPLE_LAYERS; i++) {
            let layer = f32(i);
            let layer_time = ripple_time - layer * RIPPLE_LAYER_STAGGER;
            if layer_time > 0.0 && layer_time < RIPPLE_VISIBLE_SECS {
                let wave = dist - layer_time * RIPPLE_SPEED;
                var ring = abs(sin(wave * 10.0 - layer_time * 8.0));
                ring += abs(sin(wave * 15.0 - layer_time * 12.0)) * 0.5;
                ring = clamp(ring, 0.0, 1.0);
                let falloff = 1.0 - smoothstep(0.0, 0.8, dist);
                let sharp = pow(1.0 - smoothstep(0.0, 0.08, abs(wave)), 2.5);
                let fade = pow(1.0 - smoothstep(0.0, RIPPLE_VISIBLE_SECS, layer_time), 1.2);
                intensity += ring * sharp * falloff * fade * (1.0 - layer * 0.15);
            }
        }
    }
    return clamp(pow(intensity, 0.6) * 2.0, 0.0, RIPPLE_MAX_INTENSITY);
}

fn sprite_color(distance_from_center: f32, glow_intensity: f32, ripple: f32) -> vec3<f32> {
    let gradient = clamp(1.0 - distance_from_center * 0.2, 0.6, 1.0);
    var color = mix(BASE_COLOR, ORANGE_TINT, vec3<f32>(gradient * 0.4 + glow_intensity * 0.2));
    color = mix(color, RIPPLE_COLOR, vec3<f32>(ripple * 0.6));
    return color * (1.0 + glow_intensity * 0.6 + ripple * 0.8);
}

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) lattice: vec2<f32>,
) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    let corner = corners[vertex_index];

    let texel = lattice_texel(lattice);
    let pos = textureLoad(positions, texel, 0).xyz;
    let initial = textureLoad(initial_positions, texel, 0).xyz;

    let mv_position = u.view * vec4<f32>(pos, 1.0);
    var clip = u.proj * mv_position;

    let focus_distance = abs(u.focus - (-mv_position.z));
    let size = sprite_size(focus_distance, u.blur, u.point_size);

    // size is the sprite edge in pixels; NDC spans 2 per viewport.
    let half_extent = vec2<f32>(size) / max(u.viewport, vec2<f32>(1.0, 1.0));
    clip.x += corner.x * half_extent.x * clip.w;
    clip.y += corner.y * half_extent.y * clip.w;

    var out: VertexOutput;
    out.clip_position = clip;
    out.point_coord = vec2<f32>(corner.x * 0.5 + 0.5, 0.5 - corner.y * 0.5);
    out.world_position = pos;
    out.initial_position = initial;
    out.focus_distance = focus_distance;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let cxy = 2.0 * in.point_coord - vec2<f32>(1.0, 1.0);
    if sd_circle(cxy, SPRITE_RADIUS) > 0.0 {
        discard;
    }

    let revealed = reveal_mask(in.world_position, in.initial_position, u.reveal_factor);
    let sparkle = sparkle_noise(in.initial_position, u.time);
    let screen = screen_position(in.world_position);
    let glow = mouse_glow(screen, u.mouse);
    let ripple = ripple_intensity(screen, u.ripple_time, u.ripple_origin);
    let glow_intensity = glow * 0.4 + u.transition * 0.3 + ripple * 0.8;

    let alpha = (1.04 - clamp(in.focus_distance, 0.0, 1.0))
        * clamp(smoothstep(-0.5, 0.25, in.world_position.y), 0.0, 1.0)
        * u.opacity
        * revealed
        * u.reveal_progress
        * sparkle;

    let color = sprite_color(length(in.world_position.xz), glow_intensity, ripple);
    // May go negative on dim particles while hovering; kept as is.
    return vec4<f32>(color, mix(alpha, sparkle - INTROSPECT_ALPHA_OFFSET, u.transition));
}
"#;

/// Format an `f32` as a WGSL float literal.
fn wgsl_f32(v: f32) -> String {
    let s = format!("{v:?}");
    if s.contains('.') || s.contains('e') || s.contains("inf") || s.contains("NaN") {
        s
    } else {
        format!("{s}.0")
    }
}

fn wgsl_vec3(v: glam::Vec3) -> String {
    format!(
        "vec3<f32>({}, {}, {})",
        wgsl_f32(v.x),
        wgsl_f32(v.y),
        wgsl_f32(v.z)
    )
}

/// Module-scope constants shared with the CPU reference.
pub fn constants_wgsl() -> String {
    let mut out = String::new();
    let scalars: [(&str, f32); 11] = [
        ("MIN_POINT_SIZE", MIN_POINT_SIZE),
        ("SPRITE_RADIUS", SPRITE_RADIUS),
        ("WORLD_EXTENT", WORLD_EXTENT),
        ("GLOW_RADIUS", GLOW_RADIUS),
        ("RIPPLE_VISIBLE_SECS", RIPPLE_VISIBLE_SECS),
        ("RIPPLE_LAYER_STAGGER", RIPPLE_LAYER_STAGGER),
        ("RIPPLE_SPEED", RIPPLE_SPEED),
        ("RIPPLE_MAX_INTENSITY", RIPPLE_MAX_INTENSITY),
        ("SPARKLE_DAMPING", SPARKLE_DAMPING),
        ("SPARKLE_MASK_THRESHOLD", SPARKLE_MASK_THRESHOLD),
        ("INTROSPECT_ALPHA_OFFSET", INTROSPECT_ALPHA_OFFSET),
    ];
    for (name, value) in scalars {
        let _ = writeln!(out, "const {name}: f32 = {};", wgsl_f32(value));
    }
    let _ = writeln!(out, "const RIPPLE_LAYERS: i32 = {};", RIPPLE_LAYERS);
    let _ = writeln!(out, "const BASE_COLOR: vec3<f32> = {};", wgsl_vec3(BASE_COLOR));
    let _ = writeln!(out, "const ORANGE_TINT: vec3<f32> = {};", wgsl_vec3(ORANGE_TINT));
    let _ = writeln!(out, "const RIPPLE_COLOR: vec3<f32> = {};", wgsl_vec3(RIPPLE_COLOR));
    out
}

/// Complete WGSL for the simulation pass (`vs_main` / `fs_main`).
pub fn simulation_shader() -> String {
    format!("{}{}{}", constants_wgsl(), PERIODIC_NOISE_WGSL, SIMULATION_BODY)
}

/// Complete WGSL for the point-sprite pass (`vs_main` / `fs_main`).
pub fn points_shader() -> String {
    format!("{}{}{}", constants_wgsl(), PERIODIC_NOISE_WGSL, POINTS_BODY)
}
