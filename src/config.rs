//! Tunables for explosion, arrows, camera framing and the parts diagram.
//!
//! A [`LayoutConfig`] is handed to the planner at construction; nothing here is
//! process-global, so differently configured planners can run side by side.

use crate::error::{LayoutError, LayoutResult};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level layout configuration.
///
/// Deserializes with `#[serde(default)]`, so a JSON document only needs the
/// fields it wants to override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Base explode distance. Lower values keep parts closer to the assembly.
    pub explode_factor: f32,
    /// Upper bound on the radial explode distance.
    pub max_explode_distance: f32,
    /// Desired number of assembly steps. `0` falls back to 5.
    pub target_steps: usize,
    pub arrow: ArrowConfig,
    pub camera: CameraConfig,
    pub diagram: DiagramConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            explode_factor: 0.8,
            max_explode_distance: 10.0,
            target_steps: 6,
            arrow: ArrowConfig::default(),
            camera: CameraConfig::default(),
            diagram: DiagramConfig::default(),
        }
    }
}

/// Arrow sizing relative to the part an arrow points at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowConfig {
    /// Shaft radius as a fraction of the part size.
    pub thickness_ratio: f32,
    /// Head radius as a fraction of the part size.
    pub head_size_ratio: f32,
    pub min_thickness: f32,
    pub max_thickness: f32,
    pub min_head_size: f32,
    pub max_head_size: f32,
    /// Arrows shorter than `part_size * min_length_factor` are extended.
    pub min_length_factor: f32,
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self {
            thickness_ratio: 0.05,
            head_size_ratio: 0.15,
            min_thickness: 0.02,
            max_thickness: 0.15,
            min_head_size: 0.06,
            max_head_size: 0.4,
            min_length_factor: 0.5,
        }
    }
}

/// Camera placement relative to the framed bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera distance as a multiple of the framed diagonal.
    pub distance_factor: f32,
    /// Fixed viewing direction from the target to the camera (front-right-top).
    pub offset_direction: Vec3,
    /// Floor for the framed diagonal, in world units.
    pub min_size: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance_factor: 1.5,
            offset_direction: Vec3::new(0.8, -0.8, 0.6),
            min_size: 0.5,
        }
    }
}

/// Grid layout of the parts inventory image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Cell spacing as a multiple of the average part size.
    pub spacing_factor: f32,
    pub min_spacing: f32,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            spacing_factor: 2.5,
            min_spacing: 1.5,
        }
    }
}

impl LayoutConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ConfigParse`] on malformed JSON and
    /// [`LayoutError::InvalidConfig`] when a value is out of range.
    pub fn from_json_str(json: &str) -> LayoutResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(LayoutError::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`from_json_str`](Self::from_json_str).
    pub fn from_json_file(path: &Path) -> LayoutResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| LayoutError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks that every tunable is finite and in range.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> LayoutResult<()> {
        positive("explode_factor", self.explode_factor)?;
        positive("max_explode_distance", self.max_explode_distance)?;

        let a = &self.arrow;
        positive("arrow.thickness_ratio", a.thickness_ratio)?;
        positive("arrow.head_size_ratio", a.head_size_ratio)?;
        positive("arrow.min_thickness", a.min_thickness)?;
        positive("arrow.max_thickness", a.max_thickness)?;
        positive("arrow.min_head_size", a.min_head_size)?;
        positive("arrow.max_head_size", a.max_head_size)?;
        non_negative("arrow.min_length_factor", a.min_length_factor)?;
        ordered("arrow.max_thickness", a.min_thickness, a.max_thickness)?;
        ordered("arrow.max_head_size", a.min_head_size, a.max_head_size)?;

        let c = &self.camera;
        positive("camera.distance_factor", c.distance_factor)?;
        positive("camera.min_size", c.min_size)?;
        if !c.offset_direction.is_finite() || c.offset_direction.length_squared() < 1e-12 {
            return Err(LayoutError::InvalidConfig {
                field: "camera.offset_direction",
                reason: format!("must be a finite non-zero vector, got {}", c.offset_direction),
            });
        }

        positive("diagram.spacing_factor", self.diagram.spacing_factor)?;
        positive("diagram.min_spacing", self.diagram.min_spacing)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> LayoutResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidConfig {
            field,
            reason: format!("must be finite and > 0, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> LayoutResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidConfig {
            field,
            reason: format!("must be finite and >= 0, got {value}"),
        })
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> LayoutResult<()> {
    if min <= max {
        Ok(())
    } else {
        Err(LayoutError::InvalidConfig {
            field,
            reason: format!("maximum {max} is below minimum {min}"),
        })
    }
}
