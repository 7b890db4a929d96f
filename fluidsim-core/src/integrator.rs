use crate::boundary::resolve_boundaries;
use crate::config::SimConfig;
use crate::particles::ParticleSet;
use crate::solver::{compute_densities_with, compute_pressure_forces, PressureParams};
use glam::Vec2;

/// Unit vector gravity is scaled by.
pub const DOWN: Vec2 = Vec2::new(0.0, -1.0);

/// Per-tick bookkeeping returned by [`step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Particles that touched a wall this tick.
    pub boundary_hits: usize,
}

/// Acceleration of every particle from gravity and, when enabled, pressure.
///
/// Pressure force is divided by the particle's own density. Refreshes the
/// stored densities as a side effect.
pub fn accumulate_accelerations(particles: &mut ParticleSet, config: &SimConfig) -> Vec<Vec2> {
    let densities = compute_densities_with(
        particles.positions(),
        config.smoothing_radius,
        config.mass,
        config.neighbor_search,
    );

    let gravity = DOWN * config.gravity;
    let mut accelerations = vec![gravity; particles.len()];

    if config.pressure {
        let params = PressureParams {
            target_density: config.target_density,
            stiffness: config.pressure_multiplier,
            mass: config.mass,
        };
        let forces = compute_pressure_forces(
            particles.positions(),
            &densities,
            config.smoothing_radius,
            &params,
            config.neighbor_search,
        );
        for ((accel, force), density) in accelerations.iter_mut().zip(&forces).zip(&densities) {
            *accel += *force / *density;
        }
    }

    particles.set_densities(densities);
    accelerations
}

/// Advance the particle set by `dt` using semi-implicit Euler integration.
///
/// All reads (densities, forces) finish before any particle is written.
/// `dt` is taken as given: zero is a no-op for kinematics, negative runs the
/// integration backwards.
pub fn step(particles: &mut ParticleSet, config: &SimConfig, dt: f32) -> StepReport {
    // First, compute all accelerations
    let accelerations = accumulate_accelerations(particles, config);

    // Velocity first, then position with the updated velocity
    let (positions, velocities) = particles.kinematics_mut();
    for ((pos, vel), accel) in positions.iter_mut().zip(velocities.iter_mut()).zip(&accelerations) {
        *vel += *accel * dt;
        *pos += *vel * dt;
    }

    let boundary_hits = resolve_boundaries(
        positions,
        velocities,
        &config.bounds,
        config.collision_damping,
        config.boundary_policy,
        config.boundary_test,
    );

    StepReport { boundary_hits }
}
