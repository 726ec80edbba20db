//! The particle lattice.
//!
//! Every particle is identified by its `(u, v)` cell in an N×N lattice. That
//! coordinate never changes; it addresses the particle's texel in both the
//! live and the initial position textures.

use bytemuck::{Pod, Zeroable};
use glam::Vec4;

use crate::config::GridSettings;
use crate::error::ConfigError;

/// Largest lattice edge accepted. Matches the default wgpu 2D texture limit
/// with headroom for the ping-pong pair.
pub const MAX_GRID_SIZE: u32 = 4096;

/// Per-instance vertex data for the point pass.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LatticeVertex {
    /// Texel-centre coordinate in `[0, 1)²`.
    pub uv: [f32; 2],
}

/// Fixed N×N lattice of particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleGrid {
    size: u32,
    plane_scale: f32,
}

impl ParticleGrid {
    /// Create a lattice. Fails unless `settings` pass
    /// [`GridSettings::validate`], which also keeps N² within `u32`.
    pub fn new(settings: GridSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            size: settings.size,
            plane_scale: settings.plane_scale,
        })
    }

    /// Lattice edge length N.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Half extent of the initial plane.
    #[inline]
    pub fn plane_scale(&self) -> f32 {
        self.plane_scale
    }

    /// Total particle count, N².
    #[inline]
    pub fn particle_count(&self) -> u32 {
        self.size * self.size
    }

    /// Lattice cell `(column, row)` of a particle index.
    #[inline]
    pub fn cell(&self, index: u32) -> (u32, u32) {
        (index % self.size, index / self.size)
    }

    /// Lattice coordinate of each particle, in index order.
    pub fn lattice(&self) -> Vec<LatticeVertex> {
        let n = self.size as f32;
        (0..self.particle_count())
            .map(|i| {
                let (col, row) = self.cell(i);
                LatticeVertex {
                    uv: [(col as f32 + 0.5) / n, (row as f32 + 0.5) / n],
                }
            })
            .collect()
    }

    /// Seed position of one lattice cell: a flat plane in xz spanning
    /// `±plane_scale`, with `w = 1`.
    pub fn initial_position(&self, col: u32, row: u32) -> Vec4 {
        let span = self.size.saturating_sub(1).max(1) as f32;
        let (fx, fz) = if self.size == 1 {
            (0.5, 0.5)
        } else {
            (col as f32 / span, row as f32 / span)
        };
        Vec4::new(
            (fx - 0.5) * 2.0 * self.plane_scale,
            0.0,
            (fz - 0.5) * 2.0 * self.plane_scale,
            1.0,
        )
    }

    /// RGBA32F texel data for the initial position texture, row-major.
    pub fn initial_positions(&self) -> Vec<[f32; 4]> {
        (0..self.particle_count())
            .map(|i| {
                let (col, row) = self.cell(i);
                self.initial_position(col, row).to_array()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(size: u32, scale: f32) -> ParticleGrid {
        ParticleGrid::new(GridSettings::new(size, scale)).unwrap()
    }

    #[test]
    fn test_particle_count_is_square() {
        for n in [1, 2, 3, 7, 64, 512] {
            let g = grid(n, 1.0);
            assert_eq!(g.particle_count(), n * n);
            assert_eq!(g.lattice().len(), (n * n) as usize);
            assert_eq!(g.initial_positions().len(), (n * n) as usize);
        }
    }

    #[test]
    fn test_lattice_maps_back_to_its_texel() {
        let g = grid(5, 1.0);
        for (i, vertex) in g.lattice().iter().enumerate() {
            let (col, row) = g.cell(i as u32);
            assert_eq!((vertex.uv[0] * 5.0).floor() as u32, col);
            assert_eq!((vertex.uv[1] * 5.0).floor() as u32, row);
        }
    }

    #[test]
    fn test_plane_corners() {
        let g = grid(4, 10.0);
        let first = g.initial_position(0, 0);
        let last = g.initial_position(3, 3);
        assert!((first.x + 10.0).abs() < 1e-5);
        assert!((first.z + 10.0).abs() < 1e-5);
        assert!((last.x - 10.0).abs() < 1e-5);
        assert!((last.z - 10.0).abs() < 1e-5);
        assert_eq!(first.y, 0.0);
        assert_eq!(first.w, 1.0);
    }

    #[test]
    fn test_single_particle_at_origin() {
        let g = grid(1, 3.0);
        let p = g.initial_position(0, 0);
        assert_eq!(p, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        for n in [MAX_GRID_SIZE + 1, 65_536, 70_000, u32::MAX] {
            assert!(matches!(
                ParticleGrid::new(GridSettings::new(n, 1.0)),
                Err(ConfigError::InvalidGridSize(size)) if size == n
            ));
        }
        assert!(ParticleGrid::new(GridSettings::new(0, 1.0)).is_err());
    }

    #[test]
    fn test_largest_grid_count() {
        let g = grid(MAX_GRID_SIZE, 1.0);
        assert_eq!(g.particle_count(), MAX_GRID_SIZE * MAX_GRID_SIZE);
    }
}
