//! Window host: builder plus the winit event loop.
//!
//! ```ignore
//! use emberglow::prelude::*;
//!
//! Hero::new()
//!     .with_config(ParticleConfig::hero())
//!     .with_grid(GridSettings::new(512, 10.0))
//!     .run()?;
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::{ConfigOverrides, GridSettings, ParticleConfig};
use crate::error::{ConfigError, RunError};
use crate::gpu::GpuState;
use crate::grid::ParticleGrid;
use crate::input::{self, Input};
use crate::orchestrator::{FrameInput, FrameOrchestrator};
use crate::time::FrameClock;

/// Builder for the hero window.
#[derive(Debug, Clone, Default)]
pub struct Hero {
    config: ParticleConfig,
    grid: GridSettings,
    title: Option<String>,
}

impl Hero {
    /// Default config on the default grid.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ParticleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_grid(mut self, grid: GridSettings) -> Self {
        self.grid = grid;
        self
    }

    /// Replace config and grid with `overrides` resolved against its preset.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let (grid, config) = overrides.resolve()?;
        self.grid = grid;
        self.config = config;
        Ok(self)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridSettings {
        &self.grid
    }

    /// Open the window and block until it closes.
    pub fn run(self) -> Result<(), RunError> {
        let mut app = App::new(self)?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct App {
    title: String,
    config: ParticleConfig,
    orchestrator: FrameOrchestrator,
    input: Input,
    clock: FrameClock,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    error: Option<RunError>,
}

impl App {
    fn new(hero: Hero) -> Result<Self, ConfigError> {
        let grid = ParticleGrid::new(hero.grid)?;
        Ok(Self {
            title: hero.title.unwrap_or_else(|| "emberglow".to_string()),
            config: hero.config,
            orchestrator: FrameOrchestrator::new(grid),
            input: Input::new(),
            clock: FrameClock::new(),
            window: None,
            gpu_state: None,
            error: None,
        })
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);

        let gpu_state = pollster::block_on(GpuState::new(window.clone(), self.orchestrator.grid()))?;
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (elapsed, delta) = self.clock.tick();
        if self.input.apply_controls(&mut self.config, elapsed) == input::ControlFlow::Exit {
            event_loop.exit();
            return;
        }
        self.input.begin_frame();

        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };

        gpu_state.simulate();

        let frame = FrameInput {
            elapsed,
            delta,
            now_ms: self.clock.now_ms(),
            pointer: self.input.pointer(),
            introspect: self.input.hovering(),
        };
        let uniforms = self.orchestrator.update(&self.config, &frame);

        if let Err(e) = gpu_state.draw(&uniforms) {
            match SurfaceRecovery::for_error(e) {
                SurfaceRecovery::Reconfigure => gpu_state.reconfigure(),
                SurfaceRecovery::Skip => {}
                SurfaceRecovery::Fatal(e) => {
                    log::error!("{e}");
                    self.error = Some(e);
                    event_loop.exit();
                }
            }
        }
    }
}

/// What the loop does after a frame failed to reach the surface.
#[derive(Debug)]
enum SurfaceRecovery {
    Reconfigure,
    Skip,
    Fatal(RunError),
}

impl SurfaceRecovery {
    fn for_error(error: wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigure,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal(RunError::SurfaceOutOfMemory),
            e => {
                log::warn!("skipped frame: {e}");
                Self::Skip
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("startup failed: {e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.input
                    .set_window_size(physical_size.width, physical_size.height);
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_memory_is_fatal() {
        assert!(matches!(
            SurfaceRecovery::for_error(wgpu::SurfaceError::OutOfMemory),
            SurfaceRecovery::Fatal(RunError::SurfaceOutOfMemory)
        ));
    }

    #[test]
    fn test_lost_surface_reconfigures() {
        for error in [wgpu::SurfaceError::Lost, wgpu::SurfaceError::Outdated] {
            assert!(matches!(
                SurfaceRecovery::for_error(error),
                SurfaceRecovery::Reconfigure
            ));
        }
        assert!(matches!(
            SurfaceRecovery::for_error(wgpu::SurfaceError::Timeout),
            SurfaceRecovery::Skip
        ));
    }

    #[test]
    fn test_invalid_grid_fails_before_window() {
        let hero = Hero::new().with_grid(GridSettings::new(0, 1.0));
        assert!(matches!(
            hero.run(),
            Err(RunError::Config(ConfigError::InvalidGridSize(0)))
        ));
    }

    #[test]
    fn test_title_defaults_to_crate_name() {
        let app = App::new(Hero::new()).unwrap();
        assert_eq!(app.title, "emberglow");

        let app = App::new(Hero::new().with_title("ember")).unwrap();
        assert_eq!(app.title, "ember");
    }
}
