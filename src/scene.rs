//! The rendering host boundary and the manual generation driver.
//!
//! The layout engine never imports meshes or encodes images itself. A
//! [`Scene`] adapter over the chosen backend provides those capabilities;
//! [`ManualGenerator`] drives it through every planned snapshot.

use crate::arrow::ArrowIndicator;
use crate::camera::FramingResult;
use crate::classify::{Classifier, Palette, assign_names};
use crate::config::LayoutConfig;
use crate::error::{LayoutError, LayoutResult, SceneError};
use crate::layout::{AssemblyPlanner, Snapshot};
use crate::manifest::Manifest;
use crate::part::Part;
use glam::Vec3;
use std::cmp::Ordering;
use std::path::Path;
use tracing::{error, info, warn};

/// Opaque handle to an arrow mesh created by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArrowHandle(pub u64);

/// Name of the manifest file written next to the images.
pub const MANIFEST_FILE: &str = "metadata.json";

/// Capabilities the layout engine needs from a 3D host.
///
/// Parts are addressed by the [`Part::id`] the host returned from
/// [`import_model`](Self::import_model); the generator never changes it.
pub trait Scene {
    /// Loads a model and decomposes it into parts at their assembled positions.
    fn import_model(&mut self, path: &Path) -> Result<Vec<Part>, SceneError>;

    /// Called once after classification, when parts have their final
    /// numbers, names and categories. Hosts typically rename objects and assign
    /// materials here. Failures are logged and ignored.
    fn prepare_parts(&mut self, parts: &[Part], palette: &Palette) -> Result<(), SceneError> {
        let _ = (parts, palette);
        Ok(())
    }

    fn set_part_position(&mut self, part_id: &str, position: Vec3) -> Result<(), SceneError>;

    fn set_part_visible(&mut self, part_id: &str, visible: bool) -> Result<(), SceneError>;

    /// Creates the shaft and head meshes for `arrow`. On failure the host must
    /// not leave partial geometry behind.
    fn spawn_arrow(
        &mut self,
        arrow: &ArrowIndicator,
        palette: &Palette,
    ) -> Result<ArrowHandle, SceneError>;

    fn despawn_arrow(&mut self, handle: ArrowHandle);

    fn set_camera(&mut self, framing: &FramingResult);

    /// Renders the current state to `output`.
    fn render_frame(&mut self, output: &Path) -> Result<(), SceneError>;
}

/// Produces a full assembly manual from a model file.
#[derive(Debug)]
pub struct ManualGenerator {
    planner: AssemblyPlanner,
    classifier: Classifier,
    palette: Palette,
}

impl ManualGenerator {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            planner: AssemblyPlanner::new(config),
            classifier: Classifier::standard(),
            palette: Palette::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn planner(&self) -> &AssemblyPlanner {
        &self.planner
    }

    /// Imports `model_path`, renders every manual image into `output_dir` and
    /// writes `output_dir/metadata.json`.
    ///
    /// Individual part, arrow and render failures are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ModelImport`] if the model cannot be imported,
    /// [`LayoutError::EmptyPartList`] if it has no parts, and
    /// [`LayoutError::Io`] if the output directory or manifest cannot be
    /// written.
    pub fn run<S: Scene>(
        &self,
        scene: &mut S,
        model_path: &Path,
        output_dir: &Path,
    ) -> LayoutResult<Manifest> {
        let model_id = model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown_model")
            .to_string();
        info!(model = %model_id, "starting manual generation");
        std::fs::create_dir_all(output_dir).map_err(|e| LayoutError::Io {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

        let mut parts = scene.import_model(model_path).map_err(|e| {
            error!(path = %model_path.display(), "failed to import model: {e}");
            LayoutError::ModelImport {
                path: model_path.to_path_buf(),
                source: e,
            }
        })?;
        if parts.is_empty() {
            error!("no parts to process");
            return Err(LayoutError::EmptyPartList);
        }

        // Bottom-to-top is a reasonable first guess at assembly order.
        parts.sort_by(|a, b| {
            let za = a.base_position().map_or(f32::INFINITY, |p| p.z);
            let zb = b.base_position().map_or(f32::INFINITY, |p| p.z);
            za.partial_cmp(&zb).unwrap_or(Ordering::Equal)
        });

        assign_names(&mut parts, &self.classifier);
        if let Err(e) = scene.prepare_parts(&parts, &self.palette) {
            warn!("failed to prepare parts, continuing with host defaults: {e}");
        }

        let plan = self.planner.plan(&parts)?;
        for snapshot in plan.snapshots() {
            info!(image = %snapshot.image, "rendering");
            self.render_snapshot(scene, &parts, snapshot, output_dir);
        }

        let manifest = Manifest::assemble(&model_id, &parts, &plan)?;
        manifest.write_to(&output_dir.join(MANIFEST_FILE))?;
        info!(model = %model_id, "manual generation finished");
        Ok(manifest)
    }

    /// Applies one frozen snapshot to the scene, renders it and removes its
    /// arrows again.
    fn render_snapshot<S: Scene>(
        &self,
        scene: &mut S,
        parts: &[Part],
        snapshot: &Snapshot,
        output_dir: &Path,
    ) {
        for (i, part) in parts.iter().enumerate() {
            let position = snapshot.positions.get(i).copied().flatten();
            let visible = position.is_some() && snapshot.visible.get(i).copied().unwrap_or(false);

            if let Some(position) = position
                && let Err(e) = scene.set_part_position(&part.id, position)
            {
                warn!(part = %part.id, "could not position part: {e}");
            }
            if let Err(e) = scene.set_part_visible(&part.id, visible) {
                warn!(part = %part.id, "could not set visibility: {e}");
            }
        }

        let handles: Vec<ArrowHandle> = snapshot
            .arrows
            .iter()
            .filter_map(|arrow| match scene.spawn_arrow(arrow, &self.palette) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    warn!(part = %arrow.part_id, "failed to create arrow: {e}");
                    None
                }
            })
            .collect();

        if let Some(framing) = &snapshot.framing {
            scene.set_camera(framing);
        } else {
            warn!(image = %snapshot.image, "no framing available, keeping previous camera");
        }

        let output = output_dir.join(snapshot.image_file());
        if let Err(e) = scene.render_frame(&output) {
            error!(path = %output.display(), "failed to render image: {e}");
        }

        for handle in handles {
            scene.despawn_arrow(handle);
        }
    }
}
