//! Bounding boxes and orientation helpers shared by the layout modules.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// World up axis. Imported scenes are Z-up.
pub const WORLD_UP: Vec3 = Vec3::Z;

/// Below this magnitude a rotation axis is treated as degenerate.
const AXIS_EPSILON: f32 = 0.01;

/// An axis-aligned bounding box.
///
/// An *empty* box has `min > max` on some axis and is the identity for
/// [`merge`](Self::merge) and [`expand_to_include`](Self::expand_to_include).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Creates a box from two corners, swapping components where `min > max`.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a box centered at `center` with full extents `size`.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// An inverted box that contains nothing.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Returns the smallest box containing both `self` and `other`.
    pub fn merge(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extents along each axis (the "dimensions" of the box).
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Length of the box diagonal. Zero for empty boxes.
    pub fn diagonal(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.size().length()
        }
    }

    pub fn translated(&self, offset: Vec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// Rotation that carries the local up axis ([`WORLD_UP`]) onto `direction`.
///
/// Uses axis `WORLD_UP × dir` and the angle between them. When that axis is
/// degenerate the direction is (anti-)parallel to up: anti-parallel flips 180°
/// about X, parallel (or zero) needs no rotation.
pub fn rotation_from_direction(direction: Vec3) -> Quat {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let axis = WORLD_UP.cross(dir);
    if axis.length() > AXIS_EPSILON {
        let angle = WORLD_UP.angle_between(dir);
        Quat::from_axis_angle(axis.normalize(), angle)
    } else if dir.dot(WORLD_UP) < 0.0 {
        Quat::from_axis_angle(Vec3::X, PI)
    } else {
        Quat::IDENTITY
    }
}

/// Orientation for an object at `from` whose local -Z looks at `target`,
/// keeping its local +Y as close to [`WORLD_UP`] as possible.
///
/// Returns `None` when `from` and `target` coincide.
pub fn look_rotation(from: Vec3, target: Vec3) -> Option<Quat> {
    let forward = (target - from).normalize_or_zero();
    if forward == Vec3::ZERO {
        return None;
    }

    // Looking straight along the up axis: pick another hint for "up".
    let hint = if forward.cross(WORLD_UP).length() > 1e-6 {
        WORLD_UP
    } else {
        Vec3::Y
    };
    let right = forward.cross(hint).normalize();
    let up = right.cross(forward);

    Some(Quat::from_mat3(&Mat3::from_cols(right, up, -forward)))
}
