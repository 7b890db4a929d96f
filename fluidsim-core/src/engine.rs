use crate::config::{validate_smoothing_radius, Bounds, LayoutMode, SimConfig};
use crate::diagnostics::SimulationStats;
use crate::error::Result;
use crate::integrator::{self, StepReport};
use crate::interaction::apply_radial_force;
use crate::particles::ParticleSet;
use glam::Vec2;
use rand::{rng, Rng};
use tracing::{debug, info, trace};

/// The fluid simulation: sole owner of its particles and parameters.
///
/// Collaborators drive it through [`step`](Self::step), read state through the
/// slice accessors, and tweak gravity or smoothing radius through the setters.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    particles: ParticleSet,
    initial_positions: Vec<Vec2>,
    steps: u64,
}

impl Simulation {
    /// Validate `config` and lay out the particles.
    ///
    /// A random layout without a seed draws one here and pins it into the
    /// stored config, so the config reported back reproduces the same scatter.
    pub fn new(mut config: SimConfig) -> Result<Self> {
        config.validate()?;
        if config.layout == LayoutMode::Random && config.seed.is_none() {
            config.seed = Some(rng().random());
        }

        let particles = ParticleSet::from_config(&config);
        info!(
            particles = particles.len(),
            layout = ?config.layout,
            smoothing_radius = config.smoothing_radius,
            pressure = config.pressure,
            boundary = ?config.boundary_policy,
            search = ?config.neighbor_search,
            "simulation constructed"
        );

        Ok(Self {
            config,
            initial_positions: particles.positions().to_vec(),
            particles,
            steps: 0,
        })
    }

    /// Build a simulation from the handful of parameters a front end usually sets.
    #[allow(clippy::too_many_arguments)]
    pub fn construct(
        rows: usize,
        cols: usize,
        spacing: f32,
        smoothing_radius: f32,
        gravity: f32,
        bounds: Bounds,
        layout: LayoutMode,
        seed: Option<u64>,
    ) -> Result<Self> {
        Self::new(SimConfig {
            rows,
            cols,
            spacing,
            smoothing_radius,
            gravity,
            bounds,
            layout,
            seed,
            ..SimConfig::default()
        })
    }

    /// Build a simulation around explicit particle positions.
    ///
    /// `config.rows`/`cols` and layout are ignored; the count comes from `positions`.
    pub fn from_positions(config: SimConfig, positions: Vec<Vec2>) -> Result<Self> {
        let config = SimConfig {
            rows: positions.len(),
            cols: 1,
            ..config
        };
        config.validate()?;
        info!(particles = positions.len(), "simulation constructed from positions");
        Ok(Self {
            config,
            particles: ParticleSet::from_positions(positions.clone()),
            initial_positions: positions,
            steps: 0,
        })
    }

    /// Advance one tick.
    pub fn step(&mut self, dt: f32) -> StepReport {
        let report = integrator::step(&mut self.particles, &self.config, dt);
        self.steps += 1;
        trace!(step = self.steps, dt, hits = report.boundary_hits, "tick");
        report
    }

    pub fn positions(&self) -> &[Vec2] {
        self.particles.positions()
    }

    pub fn velocities(&self) -> &[Vec2] {
        self.particles.velocities()
    }

    /// Densities from the most recent tick; zero before the first one.
    pub fn densities(&self) -> &[f32] {
        self.particles.densities()
    }

    /// Read-only view of the particle set. State changes only through the
    /// methods on `Simulation`:
    ///
    /// ```compile_fail
    /// let mut sim = fluidsim_core::Simulation::new(Default::default()).unwrap();
    /// let _ = sim.particles_mut();
    /// ```
    ///
    /// ```compile_fail
    /// let sim = fluidsim_core::Simulation::new(Default::default()).unwrap();
    /// let mut set = sim.particles().clone();
    /// set.set_velocity(0, glam::Vec2::ONE);
    /// ```
    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Ticks taken since construction or the last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn gravity(&self) -> f32 {
        self.config.gravity
    }

    pub fn smoothing_radius(&self) -> f32 {
        self.config.smoothing_radius
    }

    /// Takes effect on the next tick.
    pub fn set_gravity(&mut self, gravity: f32) {
        debug!(gravity, "gravity changed");
        self.config.gravity = gravity;
    }

    /// Takes effect on the next tick. Radii the kernels cannot represent are rejected.
    pub fn set_smoothing_radius(&mut self, radius: f32) -> Result<()> {
        validate_smoothing_radius(radius, self.config.mass)?;
        debug!(radius, "smoothing radius changed");
        self.config.smoothing_radius = radius;
        Ok(())
    }

    /// Add a radial push/pull to particle velocities.
    ///
    /// Call once per tick while the external trigger is active.
    pub fn apply_interaction(&mut self, center: Vec2, radius: f32, strength: f32, dt: f32) {
        debug!(x = center.x, y = center.y, radius, strength, "interaction");
        let (positions, velocities) = self.particles.kinematics_mut();
        apply_radial_force(positions, velocities, center, radius, strength, dt);
    }

    /// Return every particle to its initial position at rest and clear the step count.
    pub fn reset(&mut self) {
        self.particles = ParticleSet::from_positions(self.initial_positions.clone());
        self.steps = 0;
        info!(particles = self.particles.len(), "simulation reset");
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats::collect(&self.particles, &self.config)
    }
}
