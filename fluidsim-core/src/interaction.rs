//! Pointer-driven radial force

use crate::kernel::gaussian;
use glam::Vec2;

/// A radial push (`strength > 0`) or pull (`strength < 0`) around `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialForce {
    pub center: Vec2,
    pub radius: f32,
    pub strength: f32,
}

impl RadialForce {
    pub fn new(center: Vec2, radius: f32, strength: f32) -> Self {
        Self {
            center,
            radius,
            strength,
        }
    }

    /// Gaussian falloff with mean and standard deviation `radius / 2`.
    pub fn weight(&self, distance: f32) -> f32 {
        let half = self.radius * 0.5;
        gaussian(distance, half, half)
    }

    /// Velocity change this force imparts on a particle at `position`.
    pub fn impulse(&self, position: Vec2, dt: f32) -> Vec2 {
        if self.radius <= 0.0 {
            return Vec2::ZERO;
        }
        let offset = position - self.center;
        let distance = offset.length();
        // A particle on the centre has no direction to be pushed in.
        let direction = if distance == 0.0 {
            Vec2::ZERO
        } else {
            offset / distance
        };
        self.weight(distance) * direction * self.strength * dt
    }
}

/// Add the radial impulse to every velocity.
///
/// Stateless: call once per tick while the external trigger is held. A
/// non-positive `radius` applies nothing.
pub fn apply_radial_force(
    positions: &[Vec2],
    velocities: &mut [Vec2],
    center: Vec2,
    radius: f32,
    strength: f32,
    dt: f32,
) {
    let force = RadialForce::new(center, radius, strength);
    for (p, v) in positions.iter().zip(velocities.iter_mut()) {
        *v += force.impulse(*p, dt);
    }
}
