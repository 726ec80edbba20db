//! # emberglow
//!
//! A GPU particle field for hero sections: a square grid of particles on a
//! horizontal plane, displaced by periodic noise and drawn as soft,
//! depth-of-field point sprites.
//!
//! ## Quick Start
//!
//! ```ignore
//! use emberglow::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     Hero::new()
//!         .with_config(ParticleConfig::hero())
//!         .with_grid(GridSettings::new(512, 10.0))
//!         .run()
//! }
//! ```
//!
//! ## How a frame works
//!
//! Two render stages share a pair of position textures:
//!
//! - **Simulation** writes one texel per particle: the particle's initial
//!   position plus a noise displacement that depends on time.
//! - **Points** draws one sprite per particle at the simulated position.
//!   Sprite size follows the distance from the focal plane, and each sprite
//!   is shaded with a radial reveal, per-particle sparkle, a glow around the
//!   pointer and ripples left by pointer drags.
//!
//! The [`FrameOrchestrator`] owns every piece of state that changes between
//! frames (reveal timer, ripples, hover transition) and turns a
//! [`FrameInput`] plus the [`ParticleConfig`] into [`FrameUniforms`]. It has
//! no GPU dependency, so the whole per-frame logic can be tested headless.
//!
//! ## Configuration
//!
//! [`ParticleConfig::default()`] is the single table of defaults.
//! [`ConfigOverrides`] is its sparse, serde-friendly counterpart used for
//! JSON files and the command line.
//!
//! ## Shading without a GPU
//!
//! [`shading`] is a CPU mirror of the fragment shader. Its constants are
//! injected into the WGSL built by [`shaders`], so both sides share one set
//! of numbers.

pub mod config;
pub mod easing;
pub mod error;
pub mod gpu;
pub mod grid;
mod hero;
pub mod input;
pub mod orchestrator;
pub mod reveal;
pub mod ripple;
pub mod shaders;
pub mod shading;
pub mod time;
pub mod uniforms;

pub use bytemuck;
pub use config::{ConfigOverrides, GridSettings, ParticleConfig, Preset};
pub use error::{ConfigError, GpuError, RunError};
pub use glam::{Vec2, Vec3, Vec4};
pub use grid::ParticleGrid;
pub use hero::Hero;
pub use orchestrator::{FrameInput, FrameOrchestrator};
pub use uniforms::{FrameUniforms, PointUniforms, SimulationUniforms};

/// Convenient imports for building a hero.
///
/// ```ignore
/// use emberglow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConfigOverrides, GridSettings, ParticleConfig, Preset};
    pub use crate::error::{ConfigError, GpuError, RunError};
    pub use crate::grid::ParticleGrid;
    pub use crate::hero::Hero;
    pub use crate::orchestrator::{FrameInput, FrameOrchestrator};
    pub use crate::time::FrameClock;
    pub use crate::uniforms::FrameUniforms;
    pub use crate::{Vec2, Vec3, Vec4};
}
