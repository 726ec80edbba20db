//! Per-frame state that drives both render stages.
//!
//! The orchestrator owns everything that changes between frames: the reveal
//! timer, the ripple tracker and the hover transition. Each frame the host
//! hands it a [`FrameInput`] and the current [`ParticleConfig`] and gets back
//! the [`FrameUniforms`] to upload. It never touches the GPU, so it runs the
//! same in tests as in the window loop.
//!
//! ```ignore
//! let mut orchestrator = FrameOrchestrator::new(grid);
//! gpu.simulate();
//! let uniforms = orchestrator.update(&config, &input);
//! gpu.draw(&uniforms)?;
//! ```

use glam::Vec2;

use crate::config::ParticleConfig;
use crate::easing::Damped;
use crate::grid::ParticleGrid;
use crate::reveal::{RevealFrame, RevealTimer};
use crate::ripple::{Ripple, RippleSnapshot, RippleTracker};
use crate::uniforms::{FrameUniforms, PointUniforms, SimulationUniforms};

/// Smooth time for the transition rising toward 1 (introspect on).
pub const TRANSITION_IN_SECS: f32 = 0.2;

/// Smooth time for the transition falling toward 0 (introspect off).
pub const TRANSITION_OUT_SECS: f32 = 0.35;

/// Host-side inputs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Clock time since start, in seconds.
    pub elapsed: f32,
    /// Time since the previous frame, in seconds.
    pub delta: f32,
    /// Monotonic timestamp in milliseconds, used for ripple timing.
    pub now_ms: f64,
    /// Normalized pointer position. Not clamped.
    pub pointer: Vec2,
    /// Whether the pointer hovers the view.
    pub introspect: bool,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            delta: 0.0,
            now_ms: 0.0,
            pointer: Vec2::splat(0.5),
            introspect: false,
        }
    }
}

/// Owns the reveal, ripples and hover transition.
#[derive(Debug, Clone)]
pub struct FrameOrchestrator {
    grid: ParticleGrid,
    reveal: RevealTimer,
    ripples: RippleTracker,
    transition: Damped,
    last_reveal: Option<RevealFrame>,
}

impl FrameOrchestrator {
    /// Fresh state for a grid: reveal not started, no ripples, transition at 0.
    pub fn new(grid: ParticleGrid) -> Self {
        Self {
            grid,
            reveal: RevealTimer::new(),
            ripples: RippleTracker::default(),
            transition: Damped::new(0.0),
            last_reveal: None,
        }
    }

    /// The grid this orchestrator drives.
    pub fn grid(&self) -> &ParticleGrid {
        &self.grid
    }

    /// Whether the intro reveal is still running.
    pub fn revealing(&self) -> bool {
        self.reveal.is_revealing()
    }

    /// Reveal values of the last update, if any.
    pub fn last_reveal(&self) -> Option<RevealFrame> {
        self.last_reveal
    }

    /// Live ripples, oldest first.
    pub fn ripples(&self) -> &[Ripple] {
        self.ripples.ripples()
    }

    /// Current hover transition in `[0, 1]`.
    pub fn transition(&self) -> f32 {
        self.transition.value()
    }

    /// Time the stages animate with: manual when enabled, otherwise the clock.
    pub fn resolve_time(config: &ParticleConfig, input: &FrameInput) -> f32 {
        if config.use_manual_time {
            config.manual_time
        } else {
            input.elapsed
        }
    }

    /// Advance one frame and produce the uniforms for both stages.
    ///
    /// Camera and viewport fields of the point uniforms are left at their
    /// defaults; the renderer fills them in with
    /// [`PointUniforms::set_camera`].
    pub fn update(&mut self, config: &ParticleConfig, input: &FrameInput) -> FrameUniforms {
        let time = Self::resolve_time(config, input);

        self.ripples.observe(input.pointer, input.now_ms);
        let ripple: RippleSnapshot = self.ripples.snapshot(input.now_ms, input.pointer);

        let reveal = self.reveal.advance(time);
        self.last_reveal = Some(reveal);

        let (target, smooth_time) = if input.introspect {
            (1.0, TRANSITION_IN_SECS)
        } else {
            (0.0, TRANSITION_OUT_SECS)
        };
        let transition = self.transition.step(target, smooth_time, input.delta);

        let simulation = SimulationUniforms {
            time,
            noise_scale: config.noise_scale,
            noise_intensity: config.noise_intensity,
            time_scale: config.simulation_time_scale(),
            response: config.response.clamp(0.0, 1.0),
            _padding: [0.0; 3],
        };

        let points = PointUniforms {
            mouse: input.pointer.to_array(),
            ripple_origin: ripple.origin.to_array(),
            time,
            focus: config.focus,
            blur: config.aperture,
            point_size: config.point_size,
            opacity: config.opacity,
            reveal_factor: reveal.factor,
            reveal_progress: reveal.progress,
            ripple_time: ripple.time,
            transition,
            ..PointUniforms::default()
        };

        FrameUniforms { simulation, points }
    }
}
