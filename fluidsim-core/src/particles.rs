//! Particle storage
//!
//! Structure-of-arrays layout: index `i` identifies the same particle in every
//! array for the lifetime of the set. The set never grows or shrinks.

use crate::config::{Bounds, LayoutMode, SimConfig};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{rng, Rng, SeedableRng};

/// Positions, velocities and derived densities of every particle.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSet {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    densities: Vec<f32>,
}

impl ParticleSet {
    /// Particles at the given positions, at rest, with zero density.
    pub fn from_positions(positions: Vec<Vec2>) -> Self {
        let n = positions.len();
        Self {
            positions,
            velocities: vec![Vec2::ZERO; n],
            densities: vec![0.0; n],
        }
    }

    /// Lay particles out according to `config.layout`.
    ///
    /// The config is assumed to be validated.
    pub fn from_config(config: &SimConfig) -> Self {
        let positions = match config.layout {
            LayoutMode::Grid => grid_layout(config),
            LayoutMode::Random => {
                let seed = config.seed.unwrap_or_else(|| rng().random());
                random_layout(config.particle_count(), &config.bounds, seed)
            }
        };
        Self::from_positions(positions)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec2] {
        &self.velocities
    }

    pub fn densities(&self) -> &[f32] {
        &self.densities
    }

    /// Mutable views of positions and velocities at the same time.
    pub(crate) fn kinematics_mut(&mut self) -> (&mut [Vec2], &mut [Vec2]) {
        (&mut self.positions, &mut self.velocities)
    }

    /// Replace the densities; the new slice must have one entry per particle.
    pub(crate) fn set_densities(&mut self, densities: Vec<f32>) {
        debug_assert_eq!(densities.len(), self.positions.len());
        self.densities = densities;
    }

    /// Overwrite one particle's velocity.
    #[cfg(test)]
    pub(crate) fn set_velocity(&mut self, index: usize, velocity: Vec2) {
        self.velocities[index] = velocity;
    }
}

/// `rows × cols` block with pitch `particle_size + spacing`.
///
/// Row index advances along x, column index along y; particle `(i, j)` has
/// index `i * cols + j`.
pub fn grid_layout(config: &SimConfig) -> Vec<Vec2> {
    let pitch = config.pitch();
    let origin = match config.origin {
        Some([x, y]) => Vec2::new(x, y),
        None => {
            let b = &config.bounds;
            let centre = Vec2::new((b.left + b.right) * 0.5, (b.top + b.bottom) * 0.5);
            let extent = Vec2::new(
                config.rows.saturating_sub(1) as f32 * pitch,
                config.cols.saturating_sub(1) as f32 * pitch,
            );
            centre - extent * 0.5
        }
    };

    let mut positions = Vec::with_capacity(config.particle_count());
    for i in 0..config.rows {
        for j in 0..config.cols {
            positions.push(origin + Vec2::new(i as f32, j as f32) * pitch);
        }
    }
    positions
}

/// `count` positions drawn uniformly from the closed bounds rectangle.
pub fn random_layout(count: usize, bounds: &Bounds, seed: u64) -> Vec<Vec2> {
    let mut rng: StdRng = SeedableRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Vec2::new(
                rng.random_range(bounds.left..=bounds.right),
                rng.random_range(bounds.top..=bounds.bottom),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_share_length() {
        let set = ParticleSet::from_config(&SimConfig::default());
        assert_eq!(set.len(), 100);
        assert_eq!(set.velocities().len(), 100);
        assert_eq!(set.densities().len(), 100);
    }

    #[test]
    fn grid_layout_uses_explicit_origin() {
        let config = SimConfig {
            rows: 2,
            cols: 3,
            particle_size: 1.0,
            spacing: 0.5,
            origin: Some([1.0, 2.0]),
            ..SimConfig::default()
        };
        let positions = grid_layout(&config);
        assert_eq!(positions.len(), 6);
        assert_eq!(positions[0], Vec2::new(1.0, 2.0));
        assert_eq!(positions[1], Vec2::new(1.0, 3.5));
        assert_eq!(positions[3], Vec2::new(2.5, 2.0));
        assert_eq!(positions[5], Vec2::new(2.5, 5.0));
    }

    #[test]
    fn grid_layout_centres_block_by_default() {
        let config = SimConfig {
            rows: 3,
            cols: 3,
            ..SimConfig::default()
        };
        let positions = grid_layout(&config);
        // Middle particle sits on the bounds centre.
        assert_eq!(positions[4], Vec2::new(20.0, 20.0));
    }

    #[test]
    fn random_layout_is_seeded_and_bounded() {
        let bounds = Bounds::new(-3.0, 3.0, 10.0, 20.0);
        let a = random_layout(500, &bounds, 42);
        let b = random_layout(500, &bounds, 42);
        let c = random_layout(500, &bounds, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|p| bounds.contains(p.x, p.y)));
    }
}
