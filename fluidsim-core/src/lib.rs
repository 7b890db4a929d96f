//! 2-D SPH particle fluid simulation.
//!
//! Particles fall under gravity, push each other apart through a
//! density-derived pressure force, bounce inside an axis-aligned box and can be
//! stirred by a radial interaction force. [`Simulation`] is the entry point for
//! front ends.

pub mod boundary;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod integrator;
pub mod interaction;
pub mod kernel;
pub mod particles;
pub mod solver;
pub mod spatial;

pub use config::{BoundaryPolicy, BoundaryTest, Bounds, LayoutMode, NeighborSearch, SimConfig};
pub use diagnostics::SimulationStats;
pub use engine::Simulation;
pub use error::{Result, SimError};
pub use integrator::StepReport;
pub use kernel::{smoothing_kernel, smoothing_kernel_derivative};
pub use particles::ParticleSet;
pub use solver::{compute_densities, density_to_pressure};
