//! Parts of an imported model and their characteristic size.

use crate::geometry::Aabb;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Dimensions at or below this are treated as degenerate.
pub const SIZE_EPSILON: f32 = 1e-6;

/// Size reported for a missing or malformed part.
pub const DEFAULT_PART_SIZE: f32 = 1.0;

/// A single rigid piece of the model.
///
/// The base position is the assembled location recorded at import. Every
/// per-step position is derived from it; the part itself is never moved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Stable identifier assigned by the scene host at import.
    pub id: String,

    /// Manual part number (e.g. `P001`).
    pub number: String,

    /// Display name (e.g. `Leg 1`).
    pub name: String,

    /// Free-form category label assigned by the classifier.
    pub category: String,

    pub quantity: u32,

    /// Bounding box relative to the part's origin.
    pub bounds: Aabb,

    base_position: Option<Vec3>,
}

impl Part {
    /// Creates a part at `position` whose bounds are centered on its origin
    /// with full extents `dimensions`.
    pub fn new(id: impl Into<String>, position: Vec3, dimensions: Vec3) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            number: id.clone(),
            id,
            category: "part".to_string(),
            quantity: 1,
            bounds: Aabb::from_center_size(Vec3::ZERO, dimensions),
            base_position: Some(position),
        }
    }

    /// Creates a part whose assembled location is unknown.
    ///
    /// Such parts are skipped by the step planner instead of aborting the run.
    pub fn unplaced(id: impl Into<String>, dimensions: Vec3) -> Self {
        Self {
            base_position: None,
            ..Self::new(id, Vec3::ZERO, dimensions)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Replaces the local bounding box.
    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = bounds;
        self
    }

    /// The assembled location, if one was recorded.
    pub fn base_position(&self) -> Option<Vec3> {
        self.base_position
    }

    /// Full bounding-box extents along each axis.
    pub fn dimensions(&self) -> Vec3 {
        if self.bounds.is_empty() {
            Vec3::ZERO
        } else {
            self.bounds.size()
        }
    }

    /// World-space bounds with the part's origin placed at `position`.
    pub fn world_bounds_at(&self, position: Vec3) -> Aabb {
        self.bounds.translated(position)
    }

    /// Characteristic size: mean of the non-degenerate bounding dimensions.
    ///
    /// Always strictly positive. A completely flat part reports
    /// [`SIZE_EPSILON`]; malformed bounds report [`DEFAULT_PART_SIZE`].
    pub fn size(&self) -> f32 {
        if self.bounds.is_empty() || !self.bounds.size().is_finite() {
            return DEFAULT_PART_SIZE;
        }

        let dims = self.bounds.size().to_array();
        let (sum, count) = dims
            .iter()
            .filter(|&&d| d > SIZE_EPSILON)
            .fold((0.0, 0u32), |(s, n), &d| (s + d, n + 1));

        if count == 0 {
            SIZE_EPSILON
        } else {
            sum / count as f32
        }
    }
}

/// Size of an optional part; a missing part reports [`DEFAULT_PART_SIZE`].
pub fn part_size(part: Option<&Part>) -> f32 {
    part.map_or(DEFAULT_PART_SIZE, Part::size)
}
