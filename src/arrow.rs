//! Directional arrow indicators (cylinder shaft + cone head).

use crate::config::ArrowConfig;
use crate::geometry::rotation_from_direction;
use crate::part::{Part, part_size};
use bevy_math::primitives::{Cone, Cylinder};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Segments shorter than this produce no arrow.
pub const MIN_ARROW_LENGTH: f32 = 0.01;

/// Fraction of the length taken by the shaft.
pub const SHAFT_FRACTION: f32 = 0.75;

/// Fraction of the length taken by the head. Overlaps the shaft slightly.
pub const HEAD_FRACTION: f32 = 0.3;

/// The head radius never exceeds this multiple of the head depth.
pub const HEAD_RADIUS_PER_DEPTH: f32 = 1.5;

/// Fully resolved arrow geometry. `rotation` carries local +Z onto the arrow
/// direction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArrowIndicator {
    /// Id of the part the arrow belongs to.
    pub part_id: String,
    pub start: Vec3,
    /// Tip position. May lie beyond the requested end when the arrow was
    /// extended to its minimum length.
    pub end: Vec3,
    /// Total length from `start` to `end`.
    pub length: f32,
    /// Shaft radius.
    pub thickness: f32,
    pub shaft_length: f32,
    pub shaft_center: Vec3,
    pub head_depth: f32,
    pub head_radius: f32,
    pub head_center: Vec3,
    pub rotation: Quat,
}

impl ArrowIndicator {
    /// Unit vector from `start` to `end`.
    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Length by which shaft and head overlap.
    pub fn overlap(&self) -> f32 {
        self.shaft_length + self.head_depth - self.length
    }

    /// The shaft as a `bevy_math` cylinder (axis along local Y).
    pub fn shaft_primitive(&self) -> Cylinder {
        Cylinder::new(self.thickness, self.shaft_length)
    }

    /// The head as a `bevy_math` cone (axis along local Y).
    pub fn head_primitive(&self) -> Cone {
        Cone {
            radius: self.head_radius,
            height: self.head_depth,
        }
    }

    /// Rotation for the Y-aligned `bevy_math` primitives.
    pub fn primitive_rotation(&self) -> Quat {
        self.rotation * Quat::from_rotation_arc(Vec3::Y, Vec3::Z)
    }

    fn is_finite(&self) -> bool {
        self.end.is_finite()
            && self.length.is_finite()
            && self.thickness.is_finite()
            && self.head_radius.is_finite()
            && self.shaft_center.is_finite()
            && self.head_center.is_finite()
            && self.rotation.is_finite()
    }
}

/// Builds arrows sized relative to the part they point at.
#[derive(Clone, Debug)]
pub struct ArrowGenerator {
    config: ArrowConfig,
}

impl ArrowGenerator {
    pub fn new(config: ArrowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ArrowConfig {
        &self.config
    }

    /// Builds an arrow from `start` toward `end` for `part`.
    ///
    /// Returns `None` for segments under [`MIN_ARROW_LENGTH`] and whenever the
    /// computed geometry is not finite. Segments shorter than
    /// `size(part) * min_length_factor` are extended along their direction.
    pub fn make_arrow(&self, start: Vec3, end: Vec3, part: Option<&Part>) -> Option<ArrowIndicator> {
        let part_id = part.map(|p| p.id.clone()).unwrap_or_default();
        let mut direction = end - start;
        let mut height = direction.length();

        if !(height >= MIN_ARROW_LENGTH) {
            warn!(part = %part_id, "arrow has near-zero length ({height:.4}), skipping");
            return None;
        }

        let size = part_size(part);
        let min_length = size * self.config.min_length_factor;
        let mut end = end;

        if height < min_length {
            let Some(unit) = direction.try_normalize() else {
                warn!(part = %part_id, "arrow direction is zero, skipping");
                return None;
            };
            debug!(part = %part_id, "extending arrow from {height:.4} to {min_length:.4}");
            end = start + unit * min_length;
            direction = end - start;
            height = direction.length();
        }

        let c = &self.config;
        let thickness = (size * c.thickness_ratio).min(c.max_thickness).max(c.min_thickness);
        let head_depth = height * HEAD_FRACTION;
        let head_radius = (size * c.head_size_ratio)
            .min(c.max_head_size)
            .max(c.min_head_size)
            .min(head_depth * HEAD_RADIUS_PER_DEPTH);

        let unit = direction / height;
        let arrow = ArrowIndicator {
            part_id,
            start,
            end,
            length: height,
            thickness,
            shaft_length: height * SHAFT_FRACTION,
            shaft_center: start + unit * (height * SHAFT_FRACTION * 0.5),
            head_depth,
            head_radius,
            head_center: start + unit * (height * (1.0 - HEAD_FRACTION * 0.5)),
            rotation: rotation_from_direction(unit),
        };

        if !arrow.is_finite() {
            warn!(part = %arrow.part_id, "arrow geometry is not finite, discarding");
            return None;
        }

        debug!(
            part = %arrow.part_id,
            "arrow L={:.2}, T={:.3}, H={:.3}",
            arrow.length, arrow.thickness, arrow.head_radius
        );
        Some(arrow)
    }
}
