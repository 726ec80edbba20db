//! Uniform blocks shared with the WGSL shaders.
//!
//! Field order and padding match the structs in [`crate::shaders`]
//! byte-for-byte; the layout tests in that module check the sizes against
//! naga's reflection.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Uniforms for the simulation pass.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable)]
pub struct SimulationUniforms {
    pub time: f32,
    pub noise_scale: f32,
    pub noise_intensity: f32,
    /// Already multiplied by speed.
    pub time_scale: f32,
    pub response: f32,
    pub _padding: [f32; 3],
}

/// Uniforms for the point-sprite pass.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable)]
pub struct PointUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    /// Render target size in physical pixels.
    pub viewport: [f32; 2],
    /// Normalized pointer position.
    pub mouse: [f32; 2],
    pub ripple_origin: [f32; 2],
    pub time: f32,
    pub focus: f32,
    /// Aperture.
    pub blur: f32,
    pub point_size: f32,
    pub opacity: f32,
    pub reveal_factor: f32,
    pub reveal_progress: f32,
    /// Active ripple age in seconds, or -1.
    pub ripple_time: f32,
    pub transition: f32,
    pub _padding: f32,
}

impl PointUniforms {
    /// Fill in the camera and viewport, which the orchestrator does not own.
    pub fn set_camera(&mut self, view: Mat4, proj: Mat4, width: u32, height: u32) {
        self.view = view.to_cols_array_2d();
        self.proj = proj.to_cols_array_2d();
        self.viewport = [width as f32, height as f32];
    }
}

/// Everything the GPU needs for one frame.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FrameUniforms {
    pub simulation: SimulationUniforms,
    pub points: PointUniforms,
}
