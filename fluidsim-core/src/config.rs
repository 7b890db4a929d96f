//! Simulation configuration
//!
//! `SimConfig` is plain data: it can be built in code, deserialised from JSON by
//! the CLI, and is validated once when a [`Simulation`](crate::Simulation) is
//! constructed.

use crate::error::{Result, SimError};
use crate::kernel::{derivative_scale, kernel_peak};
use serde::{Deserialize, Serialize};

/// Axis-aligned confinement rectangle in screen-style coordinates (+y down).
///
/// Particles live in `[left, right] × [top, bottom]`, so `top < bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Bounds {
    pub fn new(top: f32, bottom: f32, left: f32, right: f32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Closed-interval containment test on both axes.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    fn validate(&self) -> Result<()> {
        let all_finite = [self.top, self.bottom, self.left, self.right]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(SimError::invalid("bounds must be finite"));
        }
        if self.left >= self.right {
            return Err(SimError::invalid(format!(
                "bounds: left ({}) must be < right ({})",
                self.left, self.right
            )));
        }
        if self.top >= self.bottom {
            return Err(SimError::invalid(format!(
                "bounds: top ({}) must be < bottom ({})",
                self.top, self.bottom
            )));
        }
        Ok(())
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0.0, 40.0, 0.0, 40.0)
    }
}

/// Initial particle placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Regular `rows × cols` block, fully deterministic.
    Grid,
    /// Uniform scatter over the bounds from a seeded RNG.
    Random,
}

/// How a particle that crossed a wall is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Snap the position onto the wall and reflect the velocity component.
    ClampReflect,
    /// Reflect the velocity component only; the position may stay outside.
    ReflectOnly,
}

/// How wall violations are detected. Both produce the same decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryTest {
    /// Four per-axis comparisons.
    Inequality,
    /// Signed sub-rectangle areas, branch-free.
    Area,
}

/// Neighbour enumeration strategy for the density and pressure passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSearch {
    /// O(N²) reference sweep.
    AllPairs,
    /// Uniform grid with cell size equal to the smoothing radius.
    Grid,
}

/// Full parameter set for a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Grid layout rows (also the particle count factor for random layout).
    pub rows: usize,
    /// Grid layout columns.
    pub cols: usize,
    /// Particle diameter; grid pitch is `particle_size + spacing`.
    pub particle_size: f32,
    /// Gap between neighbouring particles in the grid layout.
    pub spacing: f32,
    pub smoothing_radius: f32,
    /// Signed gravity magnitude; acceleration is `(0, −1) * gravity`.
    pub gravity: f32,
    pub bounds: Bounds,
    /// Rest density at which pressure is zero.
    pub target_density: f32,
    /// Equation-of-state stiffness.
    pub pressure_multiplier: f32,
    /// Fraction of the reflected velocity kept after a wall hit, in `[0, 1]`.
    pub collision_damping: f32,
    /// Uniform particle mass.
    pub mass: f32,
    pub layout: LayoutMode,
    /// Grid origin; `None` centres the block inside the bounds.
    pub origin: Option<[f32; 2]>,
    /// RNG seed for the random layout; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
    /// Enables the pressure-gradient force.
    pub pressure: bool,
    pub boundary_policy: BoundaryPolicy,
    pub boundary_test: BoundaryTest,
    pub neighbor_search: NeighborSearch,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            particle_size: 1.0,
            spacing: 0.5,
            smoothing_radius: 2.0,
            gravity: -9.81,
            bounds: Bounds::default(),
            target_density: 0.06,
            pressure_multiplier: 1.0,
            collision_damping: 0.75,
            mass: 1.0,
            layout: LayoutMode::Grid,
            origin: None,
            seed: None,
            pressure: true,
            boundary_policy: BoundaryPolicy::ClampReflect,
            boundary_test: BoundaryTest::Inequality,
            neighbor_search: NeighborSearch::AllPairs,
        }
    }
}

impl SimConfig {
    /// Number of particles the layout will produce.
    pub fn particle_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Distance between neighbouring grid particles.
    pub fn pitch(&self) -> f32 {
        self.particle_size + self.spacing
    }

    /// Check every invariant the solver relies on.
    pub fn validate(&self) -> Result<()> {
        if self.particle_count() == 0 {
            return Err(SimError::invalid(format!(
                "particle count must be > 0 (rows = {}, cols = {})",
                self.rows, self.cols
            )));
        }
        self.bounds.validate()?;

        let scalars = [
            ("particle_size", self.particle_size),
            ("spacing", self.spacing),
            ("gravity", self.gravity),
            ("target_density", self.target_density),
            ("pressure_multiplier", self.pressure_multiplier),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(SimError::invalid(format!("{name} must be finite")));
            }
        }
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(SimError::invalid("mass must be finite and > 0"));
        }
        validate_smoothing_radius(self.smoothing_radius, self.mass)?;
        if !(0.0..=1.0).contains(&self.collision_damping) {
            return Err(SimError::invalid(format!(
                "collision_damping must be in [0, 1], got {}",
                self.collision_damping
            )));
        }
        if let Some([x, y]) = self.origin {
            if !x.is_finite() || !y.is_finite() {
                return Err(SimError::invalid("origin must be finite"));
            }
        }
        Ok(())
    }
}

/// Reject radii the kernels cannot represent in f32.
///
/// Beyond the sign check, the kernel normalisation, the derivative scale and
/// the self-density `mass · W(r, 0)` must all be normal floats. Otherwise a
/// tick would divide by a zero density or scale forces by infinity.
pub(crate) fn validate_smoothing_radius(radius: f32, mass: f32) -> Result<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(SimError::invalid(format!(
            "smoothing_radius must be finite and > 0, got {radius}"
        )));
    }
    let representable = kernel_peak(radius).is_normal()
        && derivative_scale(radius).is_normal()
        && (mass * kernel_peak(radius)).is_normal();
    if !representable {
        return Err(SimError::invalid(format!(
            "smoothing_radius {radius} is outside the representable range for mass {mass}"
        )));
    }
    Ok(())
}
