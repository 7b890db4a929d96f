//! Confinement to the axis-aligned bounds rectangle

use crate::config::{BoundaryPolicy, BoundaryTest, Bounds};
use glam::Vec2;

/// Which edges of the bounds a point lies beyond.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Violation {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Violation {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

/// Per-axis comparison against the four edges.
pub fn detect_inequality(p: Vec2, bounds: &Bounds) -> Violation {
    Violation {
        left: p.x < bounds.left,
        right: p.x > bounds.right,
        top: p.y < bounds.top,
        bottom: p.y > bounds.bottom,
    }
}

/// Area-based detection.
///
/// Splitting the rectangle at the point gives a strip on each side of it. For
/// a point inside, the signed strip areas are non-negative and each opposing
/// pair sums to the full area; a negative strip area marks the edge that was
/// crossed.
pub fn detect_area(p: Vec2, bounds: &Bounds) -> Violation {
    let width = bounds.width();
    let height = bounds.height();

    let left_area = (p.x - bounds.left) * height;
    let right_area = (bounds.right - p.x) * height;
    let top_area = (p.y - bounds.top) * width;
    let bottom_area = (bounds.bottom - p.y) * width;

    Violation {
        left: left_area < 0.0,
        right: right_area < 0.0,
        top: top_area < 0.0,
        bottom: bottom_area < 0.0,
    }
}

pub fn detect(p: Vec2, bounds: &Bounds, test: BoundaryTest) -> Violation {
    match test {
        BoundaryTest::Inequality => detect_inequality(p, bounds),
        BoundaryTest::Area => detect_area(p, bounds),
    }
}

/// Reflect (and, with `ClampReflect`, clamp) one particle.
///
/// Returns the violation that was handled.
pub fn resolve_particle(
    position: &mut Vec2,
    velocity: &mut Vec2,
    bounds: &Bounds,
    damping: f32,
    policy: BoundaryPolicy,
    test: BoundaryTest,
) -> Violation {
    let hit = detect(*position, bounds, test);
    let clamp = policy == BoundaryPolicy::ClampReflect;

    if hit.left || hit.right {
        if clamp {
            position.x = if hit.left { bounds.left } else { bounds.right };
        }
        velocity.x *= -damping;
    }
    if hit.top || hit.bottom {
        if clamp {
            position.y = if hit.top { bounds.top } else { bounds.bottom };
        }
        velocity.y *= -damping;
    }
    hit
}

/// Resolve every particle; returns how many touched a wall.
pub fn resolve_boundaries(
    positions: &mut [Vec2],
    velocities: &mut [Vec2],
    bounds: &Bounds,
    damping: f32,
    policy: BoundaryPolicy,
    test: BoundaryTest,
) -> usize {
    positions
        .iter_mut()
        .zip(velocities.iter_mut())
        .map(|(p, v)| resolve_particle(p, v, bounds, damping, policy, test))
        .filter(Violation::any)
        .count()
}
