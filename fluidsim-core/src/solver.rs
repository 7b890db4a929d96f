//! Density estimation, equation of state and pressure-gradient force

use crate::config::NeighborSearch;
use crate::kernel::{smoothing_kernel, smoothing_kernel_derivative};
use crate::spatial::SpatialGrid;
use glam::Vec2;

/// Pair direction used when two particles coincide.
pub const DEGENERATE_DIRECTION: Vec2 = Vec2::X;

/// Material constants for the linear equation of state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureParams {
    pub target_density: f32,
    pub stiffness: f32,
    pub mass: f32,
}

/// `(density − target_density) * stiffness`.
///
/// Negative for under-dense regions, which pulls particles together.
#[inline]
pub fn density_to_pressure(density: f32, target_density: f32, stiffness: f32) -> f32 {
    (density - target_density) * stiffness
}

/// All-pairs density sum. Every particle counts itself.
pub fn compute_densities(positions: &[Vec2], radius: f32, mass: f32) -> Vec<f32> {
    compute_densities_with(positions, radius, mass, NeighborSearch::AllPairs)
}

/// Density of every particle using the requested neighbour search.
pub fn compute_densities_with(
    positions: &[Vec2],
    radius: f32,
    mass: f32,
    search: NeighborSearch,
) -> Vec<f32> {
    match search {
        NeighborSearch::AllPairs => positions
            .iter()
            .map(|&p| {
                positions
                    .iter()
                    .map(|&q| mass * smoothing_kernel(radius, p.distance(q)))
                    .sum::<f32>()
            })
            .collect(),
        NeighborSearch::Grid => {
            let grid = SpatialGrid::build(positions, radius);
            positions
                .iter()
                .map(|&p| {
                    let mut density = 0.0;
                    grid.for_each_candidate(p, |j| {
                        density += mass * smoothing_kernel(radius, p.distance(positions[j]));
                    });
                    density
                })
                .collect()
        }
    }
}

/// Pressure-gradient force on every particle.
///
/// `densities` must come from the same positions and radius; the self term
/// keeps every entry strictly positive.
pub fn compute_pressure_forces(
    positions: &[Vec2],
    densities: &[f32],
    radius: f32,
    params: &PressureParams,
    search: NeighborSearch,
) -> Vec<Vec2> {
    debug_assert_eq!(positions.len(), densities.len());
    match search {
        NeighborSearch::AllPairs => (0..positions.len())
            .map(|i| {
                let mut force = Vec2::ZERO;
                for j in 0..positions.len() {
                    force += pair_pressure_force(i, j, positions, densities, radius, params);
                }
                force
            })
            .collect(),
        NeighborSearch::Grid => {
            let grid = SpatialGrid::build(positions, radius);
            (0..positions.len())
                .map(|i| {
                    let mut force = Vec2::ZERO;
                    grid.for_each_candidate(positions[i], |j| {
                        force += pair_pressure_force(i, j, positions, densities, radius, params);
                    });
                    force
                })
                .collect()
        }
    }
}

/// Contribution of neighbour `j` to the pressure force on `i`.
fn pair_pressure_force(
    i: usize,
    j: usize,
    positions: &[Vec2],
    densities: &[f32],
    radius: f32,
    params: &PressureParams,
) -> Vec2 {
    if i == j {
        return Vec2::ZERO;
    }
    let offset = positions[i] - positions[j];
    let distance = offset.length();
    if distance >= radius {
        return Vec2::ZERO;
    }
    let direction = if distance == 0.0 {
        DEGENERATE_DIRECTION
    } else {
        offset / distance
    };
    let slope = smoothing_kernel_derivative(radius, distance);
    let density = densities[j];
    let pressure = density_to_pressure(density, params.target_density, params.stiffness);
    -pressure * direction * slope * params.mass / density
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: PressureParams = PressureParams {
        target_density: 0.06,
        stiffness: 1.0,
        mass: 1.0,
    };

    #[test]
    fn pressure_is_linear_in_density_error() {
        assert_eq!(density_to_pressure(0.06, 0.06, 3.0), 0.0);
        assert!((density_to_pressure(0.16, 0.06, 2.0) - 0.2).abs() < 1e-6);
        assert!(density_to_pressure(0.01, 0.06, 1.0) < 0.0);
    }

    #[test]
    fn isolated_particle_density_is_self_contribution() {
        let positions = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        let densities = compute_densities(&positions, 2.0, 1.5);
        let expected = 1.5 * smoothing_kernel(2.0, 0.0);
        assert_eq!(densities[0], expected);
        assert_eq!(densities[1], expected);
    }

    #[test]
    fn close_pair_is_denser_than_isolated() {
        let positions = [Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.0)];
        let densities = compute_densities(&positions, 2.0, 1.0);
        assert!(densities[0] > smoothing_kernel(2.0, 0.0));
        assert_eq!(densities[0], densities[1]);
    }

    #[test]
    fn over_dense_pair_repels() {
        // Two close particles are well above the 0.06 target density.
        let positions = [Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.0)];
        let densities = compute_densities(&positions, 2.0, 1.0);
        let forces =
            compute_pressure_forces(&positions, &densities, 2.0, &PARAMS, NeighborSearch::AllPairs);
        assert!(forces[0].x < 0.0, "left particle pushed left: {:?}", forces[0]);
        assert!(forces[1].x > 0.0, "right particle pushed right: {:?}", forces[1]);
        assert!((forces[0] + forces[1]).length() < 1e-6);
    }

    #[test]
    fn under_dense_pair_attracts() {
        let params = PressureParams {
            target_density: 10.0,
            ..PARAMS
        };
        let positions = [Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0)];
        let densities = compute_densities(&positions, 2.0, 1.0);
        let forces =
            compute_pressure_forces(&positions, &densities, 2.0, &params, NeighborSearch::AllPairs);
        assert!(forces[0].y > 0.0);
        assert!(forces[1].y < 0.0);
    }

    #[test]
    fn coincident_particles_do_not_produce_nan() {
        let positions = [Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0)];
        let densities = compute_densities(&positions, 2.0, 1.0);
        let forces =
            compute_pressure_forces(&positions, &densities, 2.0, &PARAMS, NeighborSearch::AllPairs);
        assert!(forces.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn grid_search_matches_all_pairs() {
        let positions: Vec<Vec2> = (0..150)
            .map(|i| {
                let t = i as f32;
                Vec2::new((t * 0.61).sin() * 6.0 + 6.0, (t * 1.7).cos() * 6.0 + 6.0)
            })
            .collect();
        let reference = compute_densities_with(&positions, 1.5, 1.0, NeighborSearch::AllPairs);
        let grid = compute_densities_with(&positions, 1.5, 1.0, NeighborSearch::Grid);
        for (a, b) in reference.iter().zip(&grid) {
            assert!((a - b).abs() <= 1e-4 * a.abs().max(1.0));
        }

        let f_ref =
            compute_pressure_forces(&positions, &reference, 1.5, &PARAMS, NeighborSearch::AllPairs);
        let f_grid =
            compute_pressure_forces(&positions, &reference, 1.5, &PARAMS, NeighborSearch::Grid);
        for (a, b) in f_ref.iter().zip(&f_grid) {
            assert!((*a - *b).length() <= 1e-4 * a.length().max(1.0));
        }
    }

    #[test]
    fn far_drifted_particle_counts_itself_once() {
        let positions = [Vec2::new(1e30, 0.0), Vec2::new(0.0, -1e30), Vec2::ZERO];
        let densities = compute_densities_with(&positions, 2.0, 1.0, NeighborSearch::Grid);
        for d in densities {
            assert_eq!(d, smoothing_kernel(2.0, 0.0));
        }
    }
}
