//! Particle field configuration.
//!
//! Two kinds of settings exist:
//!
//! - [`GridSettings`] are fixed at construction. Changing them means
//!   rebuilding the simulation textures.
//! - [`ParticleConfig`] is read every frame. The host may change any value
//!   between frames; the core never writes to it.
//!
//! Defaults live in exactly one place, the [`Default`] impls below. Callers
//! usually start from those and apply a [`ConfigOverrides`], which is also the
//! shape of the JSON config file accepted by the binary.
//!
//! ```ignore
//! use emberglow::{ConfigOverrides, ParticleConfig};
//!
//! let overrides: ConfigOverrides = serde_json::from_str(r#"{ "focus": 4.2 }"#)?;
//! let config = ParticleConfig::default().merged(&overrides);
//! assert_eq!(config.focus, 4.2);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::MAX_GRID_SIZE;

/// Construction-time settings for the particle lattice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Lattice edge length N. The field holds N² particles.
    pub size: u32,
    /// Half extent of the initial plane in world units.
    pub plane_scale: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: 512,
            plane_scale: 1.0,
        }
    }
}

impl GridSettings {
    /// Create settings for an N×N lattice.
    pub fn new(size: u32, plane_scale: f32) -> Self {
        Self { size, plane_scale }
    }

    /// Check that the settings can back a GPU texture.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 || self.size > MAX_GRID_SIZE {
            return Err(ConfigError::InvalidGridSize(self.size));
        }
        if !self.plane_scale.is_finite() || self.plane_scale <= 0.0 {
            return Err(ConfigError::InvalidPlaneScale(self.plane_scale));
        }
        Ok(())
    }
}

/// Per-frame parameters for both render stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Multiplier on the simulation's time scale.
    pub speed: f32,
    /// Depth-of-field blur strength. Larger values grow out-of-focus sprites.
    pub aperture: f32,
    /// View-space distance that is in perfect focus.
    pub focus: f32,
    /// Spatial frequency of the displacement noise.
    pub noise_scale: f32,
    /// Amplitude of the displacement noise.
    pub noise_intensity: f32,
    /// Base speed of the noise animation.
    pub time_scale: f32,
    /// Point size multiplier before the 3px floor.
    pub point_size: f32,
    /// Global alpha multiplier.
    pub opacity: f32,
    /// Fraction of the gap to the noise target covered each simulation step.
    /// 1.0 snaps to the target, smaller values trail behind it.
    pub response: f32,
    /// Use `manual_time` instead of the frame clock.
    pub use_manual_time: bool,
    /// Time in seconds used while `use_manual_time` is set.
    pub manual_time: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            aperture: 1.79,
            focus: 3.8,
            noise_scale: 1.0,
            noise_intensity: 0.5,
            time_scale: 0.5,
            point_size: 2.0,
            opacity: 1.0,
            response: 1.0,
            use_manual_time: false,
            manual_time: 0.0,
        }
    }
}

impl ParticleConfig {
    /// Settings tuned for a full-viewport hero backdrop.
    pub fn hero() -> Self {
        Self {
            noise_scale: 0.6,
            noise_intensity: 0.52,
            time_scale: 1.0,
            point_size: 10.0,
            opacity: 0.8,
            ..Self::default()
        }
    }

    /// Return a copy with every field present in `overrides` replaced.
    pub fn merged(&self, overrides: &ConfigOverrides) -> Self {
        Self {
            speed: overrides.speed.unwrap_or(self.speed),
            aperture: overrides.aperture.unwrap_or(self.aperture),
            focus: overrides.focus.unwrap_or(self.focus),
            noise_scale: overrides.noise_scale.unwrap_or(self.noise_scale),
            noise_intensity: overrides.noise_intensity.unwrap_or(self.noise_intensity),
            time_scale: overrides.time_scale.unwrap_or(self.time_scale),
            point_size: overrides.point_size.unwrap_or(self.point_size),
            opacity: overrides.opacity.unwrap_or(self.opacity),
            response: overrides
                .response
                .unwrap_or(self.response)
                .clamp(0.0, 1.0),
            use_manual_time: overrides.use_manual_time.unwrap_or(self.use_manual_time),
            manual_time: overrides.manual_time.unwrap_or(self.manual_time),
        }
    }

    /// Effective simulation time scale (`time_scale × speed`).
    #[inline]
    pub fn simulation_time_scale(&self) -> f32 {
        self.time_scale * self.speed
    }
}

/// Named starting points for [`ParticleConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// The plain defaults table.
    #[default]
    Default,
    /// Wide plane, large soft sprites.
    Hero,
}

impl Preset {
    /// Per-frame parameters for this preset.
    pub fn config(self) -> ParticleConfig {
        match self {
            Preset::Default => ParticleConfig::default(),
            Preset::Hero => ParticleConfig::hero(),
        }
    }

    /// Construction-time settings for this preset.
    pub fn grid(self) -> GridSettings {
        match self {
            Preset::Default => GridSettings::default(),
            Preset::Hero => GridSettings::new(512, 10.0),
        }
    }
}

/// Sparse set of caller-supplied values. Absent fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub preset: Option<Preset>,
    pub size: Option<u32>,
    pub plane_scale: Option<f32>,
    pub speed: Option<f32>,
    pub aperture: Option<f32>,
    pub focus: Option<f32>,
    pub noise_scale: Option<f32>,
    pub noise_intensity: Option<f32>,
    pub time_scale: Option<f32>,
    pub point_size: Option<f32>,
    pub opacity: Option<f32>,
    pub response: Option<f32>,
    pub use_manual_time: Option<bool>,
    pub manual_time: Option<f32>,
}

impl ConfigOverrides {
    /// Parse overrides from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read overrides from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Resolve into concrete settings, starting from the selected preset.
    pub fn resolve(&self) -> Result<(GridSettings, ParticleConfig), ConfigError> {
        let preset = self.preset.unwrap_or_default();
        let base = preset.grid();
        let grid = GridSettings {
            size: self.size.unwrap_or(base.size),
            plane_scale: self.plane_scale.unwrap_or(base.plane_scale),
        };
        grid.validate()?;
        Ok((grid, preset.config().merged(self)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_table() {
        let config = ParticleConfig::default();
        assert_eq!(config.noise_scale, 1.0);
        assert_eq!(config.noise_intensity, 0.5);
        assert_eq!(config.time_scale, 0.5);
        assert_eq!(config.point_size, 2.0);
        assert_eq!(config.opacity, 1.0);
        assert!(!config.use_manual_time);

        let grid = GridSettings::default();
        assert_eq!(grid.size, 512);
        assert_eq!(grid.plane_scale, 1.0);
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let overrides = ConfigOverrides {
            focus: Some(4.2),
            use_manual_time: Some(true),
            ..Default::default()
        };
        let merged = ParticleConfig::default().merged(&overrides);
        assert_eq!(merged.focus, 4.2);
        assert!(merged.use_manual_time);
        assert_eq!(merged.aperture, ParticleConfig::default().aperture);
    }

    #[test]
    fn test_response_is_clamped() {
        let overrides = ConfigOverrides {
            response: Some(3.0),
            ..Default::default()
        };
        assert_eq!(ParticleConfig::default().merged(&overrides).response, 1.0);
    }

    #[test]
    fn test_partial_json() {
        let overrides = ConfigOverrides::from_json(r#"{ "preset": "hero", "opacity": 0.25 }"#).unwrap();
        let (grid, config) = overrides.resolve().unwrap();
        assert_eq!(grid.plane_scale, 10.0);
        assert_eq!(config.opacity, 0.25);
        assert_eq!(config.point_size, 10.0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            ConfigOverrides::from_json(r#"{ "fov": 50 }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_grid_validation() {
        assert!(GridSettings::new(1, 1.0).validate().is_ok());
        assert!(matches!(
            GridSettings::new(0, 1.0).validate(),
            Err(ConfigError::InvalidGridSize(0))
        ));
        assert!(matches!(
            GridSettings::new(MAX_GRID_SIZE + 1, 1.0).validate(),
            Err(ConfigError::InvalidGridSize(_))
        ));
        assert!(matches!(
            GridSettings::new(64, f32::NAN).validate(),
            Err(ConfigError::InvalidPlaneScale(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.json");
        std::fs::write(&path, r#"{ "size": 64, "speed": 2.0 }"#).unwrap();

        let (grid, config) = ConfigOverrides::load(&path).unwrap().resolve().unwrap();
        assert_eq!(grid.size, 64);
        assert_eq!(config.speed, 2.0);
        assert_eq!(config.simulation_time_scale(), 1.0);

        assert!(matches!(
            ConfigOverrides::load(dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
