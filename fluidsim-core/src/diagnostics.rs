//! Diagnostics for a running simulation
//!
//! This module summarises particle state for logs and front ends and formats
//! errors the way the command line reports them.

use crate::config::SimConfig;
use crate::particles::ParticleSet;
use std::fmt;

/// Snapshot of aggregate particle quantities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationStats {
    pub particles: usize,
    /// Sum of `½ m |v|²`.
    pub kinetic_energy: f32,
    pub density_min: f32,
    pub density_mean: f32,
    pub density_max: f32,
    /// Particles currently outside the bounds rectangle.
    pub out_of_bounds: usize,
}

impl SimulationStats {
    pub fn collect(particles: &ParticleSet, config: &SimConfig) -> Self {
        let kinetic_energy = kinetic_energy(particles.velocities(), config.mass);

        let densities = particles.densities();
        let (mut min, mut max, mut sum) = (f32::INFINITY, f32::NEG_INFINITY, 0.0_f64);
        for &d in densities {
            min = min.min(d);
            max = max.max(d);
            sum += f64::from(d);
        }
        // Rounding to f32 can still land one ulp outside the observed range.
        let mean = if densities.is_empty() {
            0.0
        } else {
            ((sum / densities.len() as f64) as f32).max(min).min(max)
        };

        let b = &config.bounds;
        let out_of_bounds = particles
            .positions()
            .iter()
            .filter(|p| !b.contains(p.x, p.y))
            .count();

        Self {
            particles: particles.len(),
            kinetic_energy,
            density_min: if densities.is_empty() { 0.0 } else { min },
            density_mean: mean,
            density_max: if densities.is_empty() { 0.0 } else { max },
            out_of_bounds,
        }
    }
}

impl fmt::Display for SimulationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "particles={} ke={:.6} density_min={:.6} density_mean={:.6} density_max={:.6} out_of_bounds={}",
            self.particles,
            self.kinetic_energy,
            self.density_min,
            self.density_mean,
            self.density_max,
            self.out_of_bounds
        )
    }
}

/// Total kinetic energy of equal-mass particles.
pub fn kinetic_energy(velocities: &[glam::Vec2], mass: f32) -> f32 {
    0.5 * mass * velocities.iter().map(|v| v.length_squared()).sum::<f32>()
}

/// Format a configuration error for the terminal
pub fn format_config_error(error: &dyn std::error::Error, source: Option<&str>) -> String {
    match source {
        Some(path) => format!("Configuration error in {}: {}", path, error),
        None => format!("Configuration error: {}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bounds;
    use crate::error::SimError;
    use glam::Vec2;

    #[test]
    fn stats_before_first_tick() {
        let config = SimConfig {
            bounds: Bounds::new(0.0, 10.0, 0.0, 10.0),
            ..SimConfig::default()
        };
        let mut set = ParticleSet::from_positions(vec![Vec2::new(1.0, 1.0), Vec2::new(20.0, 1.0)]);
        set.set_velocity(0, Vec2::new(3.0, 4.0));
        let stats = SimulationStats::collect(&set, &config);
        assert_eq!(stats.particles, 2);
        assert_eq!(stats.kinetic_energy, 12.5);
        assert_eq!(stats.out_of_bounds, 1);
        assert_eq!(stats.density_mean, 0.0);
    }

    #[test]
    fn mean_of_identical_densities_stays_in_range() {
        for n in [1, 3, 7, 100, 1000] {
            let mut set = ParticleSet::from_positions(vec![Vec2::ZERO; n]);
            set.set_densities(vec![0.318_309_9; n]);
            let stats = SimulationStats::collect(&set, &SimConfig::default());
            assert_eq!(stats.density_min, stats.density_max);
            assert_eq!(stats.density_mean, stats.density_min, "n = {n}");
        }
    }

    #[test]
    fn mean_lies_between_min_and_max() {
        let densities: Vec<f32> = (0..257).map(|i| 0.1 + (i as f32 * 0.37).sin().abs()).collect();
        let mut set = ParticleSet::from_positions(vec![Vec2::ZERO; densities.len()]);
        set.set_densities(densities);
        let stats = SimulationStats::collect(&set, &SimConfig::default());
        assert!(stats.density_min <= stats.density_mean);
        assert!(stats.density_mean <= stats.density_max);
    }

    #[test]
    fn display_is_single_line() {
        let set = ParticleSet::from_positions(vec![Vec2::ZERO]);
        let line = SimulationStats::collect(&set, &SimConfig::default()).to_string();
        assert!(line.starts_with("particles=1 "));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn config_error_mentions_path() {
        let err = SimError::invalid("mass must be finite and > 0");
        let msg = format_config_error(&err, Some("sim.json"));
        assert!(msg.contains("sim.json"));
        assert!(msg.contains("mass"));
    }
}
