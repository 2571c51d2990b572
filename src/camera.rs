//! Camera framing for a set of world-space objects.

use crate::config::CameraConfig;
use crate::geometry::{Aabb, look_rotation};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Something the camera should keep in view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameTarget {
    /// A world-space bounding box.
    Bounds(Aabb),
    /// A point-like marker that occupies `display_size` around `position`.
    Marker { position: Vec3, display_size: f32 },
    /// A bare location (lights, cameras).
    Point(Vec3),
}

impl FrameTarget {
    fn extent(&self) -> Aabb {
        match *self {
            FrameTarget::Bounds(aabb) => aabb,
            FrameTarget::Marker {
                position,
                display_size,
            } => Aabb::from_center_size(position, Vec3::splat(display_size)),
            FrameTarget::Point(p) => Aabb::new(p, p),
        }
    }
}

/// A computed view. Derived per render and never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FramingResult {
    /// Midpoint of the framed bounds.
    pub center: Vec3,
    /// Diagonal of the framed bounds, floored at the configured minimum.
    pub size: f32,
    /// Distance from the camera to `center`.
    pub distance: f32,
    pub camera_position: Vec3,
    pub look_at: Vec3,
    /// Camera orientation (-Z toward `look_at`). `None` leaves the host's
    /// current orientation untouched.
    pub orientation: Option<Quat>,
}

/// Places a camera at a fixed oblique angle so that targets fit the view.
#[derive(Clone, Debug)]
pub struct CameraFramer {
    config: CameraConfig,
}

impl CameraFramer {
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Frames `targets`, or returns `None` (with a warning) when there is
    /// nothing with usable bounds.
    ///
    /// Every frame uses the same viewing direction so consecutive step images
    /// stay comparable.
    pub fn frame(&self, targets: &[FrameTarget]) -> Option<FramingResult> {
        if targets.is_empty() {
            warn!("frame called with no targets");
            return None;
        }

        let bounds = targets
            .iter()
            .map(FrameTarget::extent)
            .filter(|b| !b.is_empty() && b.min.is_finite() && b.max.is_finite())
            .reduce(|acc, b| acc.merge(&b));

        let Some(bounds) = bounds else {
            warn!(targets = targets.len(), "no valid bounds for framing");
            return None;
        };

        let center = bounds.center();
        let size = bounds.diagonal().max(self.config.min_size);
        Some(self.frame_center(center, size))
    }

    /// Places the camera for an already known center and size.
    pub fn frame_center(&self, center: Vec3, size: f32) -> FramingResult {
        let distance = size * self.config.distance_factor;
        let offset = self.config.offset_direction.normalize_or(Vec3::Z) * distance;
        let camera_position = center + offset;

        debug!(
            "framed center ({:.2}, {:.2}, {:.2}), size {:.2}, distance {:.2}",
            center.x, center.y, center.z, size, distance
        );

        FramingResult {
            center,
            size,
            distance,
            camera_position,
            look_at: center,
            orientation: look_rotation(camera_position, center),
        }
    }
}
