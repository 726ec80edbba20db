//! Error types for emberglow.
//!
//! Setup can fail while loading configuration, acquiring a GPU or creating
//! the window. Once frames are running, problems are absorbed locally (a
//! frame is skipped, values are clamped); only running out of GPU memory
//! ends the session with an error.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON for [`crate::ConfigOverrides`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// Grid size outside `1..=MAX_GRID_SIZE`.
    #[error("grid size {0} is out of range (expected 1..={max})", max = crate::grid::MAX_GRID_SIZE)]
    InvalidGridSize(u32),
    /// Plane scale must be finite and positive.
    #[error("plane scale {0} must be a finite, positive number")]
    InvalidPlaneScale(f32),
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; a WebGPU/Vulkan/Metal/DX12 capable GPU is required")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    #[error("surface has no supported texture format")]
    NoSurfaceFormat,
}

/// Errors that can occur when running the hero window.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Configuration was rejected before startup.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The GPU ran out of memory while acquiring a frame.
    #[error("surface out of memory")]
    SurfaceOutOfMemory,
}
