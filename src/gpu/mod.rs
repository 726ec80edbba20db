//! wgpu device, surface and the two render stages.
//!
//! A frame is two submissions:
//!
//! 1. [`GpuState::simulate`] advances the position textures using the
//!    simulation uniforms staged on the previous frame.
//! 2. [`GpuState::draw`] stages the new uniforms and draws the sprites to
//!    the surface.

mod camera;
mod points;
mod simulation;

use std::sync::Arc;

use winit::window::Window;

pub use camera::Camera;
pub use points::PointsPass;
pub use simulation::{SimulationPass, POSITION_FORMAT};

use crate::error::GpuError;
use crate::grid::ParticleGrid;
use crate::uniforms::FrameUniforms;

/// Background behind the particles.
const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    simulation: SimulationPass,
    points: PointsPass,
    pub camera: Camera,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, grid: &ParticleGrid) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("using {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let simulation = SimulationPass::new(&device, &queue, grid);
        let points = PointsPass::new(&device, surface_format, grid, &simulation);
        log::info!(
            "{} particles on a {}×{} grid, surface {:?}",
            grid.particle_count(),
            grid.size(),
            grid.size(),
            surface_format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            simulation,
            points,
            camera: Camera::new(),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Run one simulation step into the offscreen target.
    pub fn simulate(&mut self) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Simulation Encoder"),
            });
        self.simulation.encode(&mut encoder);
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Stage `uniforms` and draw the particles to the surface.
    ///
    /// The camera and viewport in `uniforms.points` are replaced with this
    /// state's camera and surface size.
    pub fn draw(&mut self, uniforms: &FrameUniforms) -> Result<(), wgpu::SurfaceError> {
        let mut points = uniforms.points;
        points.set_camera(
            self.camera.view_matrix(),
            self.camera
                .projection_matrix(self.config.width, self.config.height),
            self.config.width,
            self.config.height,
        );
        self.points.write_uniforms(&self.queue, &points);
        self.simulation
            .write_uniforms(&self.queue, &uniforms.simulation);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Points Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.points.draw(&mut render_pass, self.simulation.current());
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
