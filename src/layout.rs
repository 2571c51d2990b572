//! Per-shot layout snapshots and the planner that produces them.
//!
//! A [`Snapshot`] is the complete state of one image: where every part sits,
//! which parts are shown, which arrows exist and how the camera is placed.
//! Snapshots are computed from the immutable base positions alone and are
//! frozen before anything is rendered.

use crate::arrow::{ArrowGenerator, ArrowIndicator};
use crate::camera::{CameraFramer, FrameTarget, FramingResult};
use crate::config::LayoutConfig;
use crate::error::{LayoutError, LayoutResult};
use crate::explode::{
    FINAL_CAPTION, assembled_center, caption_for_step, exploded_position, partition_steps,
};
use crate::part::Part;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, error, info, warn};

/// Which image a snapshot is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotKind {
    /// Fully assembled model.
    Overview,
    /// All parts laid out on a grid.
    PartsDiagram,
    /// Assembly step `n` (0-based).
    Step(usize),
    /// Fully assembled model closing the sequence.
    Final,
}

/// The frozen layout of a single image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub kind: ShotKind,
    /// Image base name without extension (`step00`, `final_assembly`, ...).
    pub image: String,
    /// Position per part, in part-list order. `None` when the part could not
    /// be placed for this shot.
    pub positions: Vec<Option<Vec3>>,
    /// Visibility per part, in part-list order.
    pub visible: Vec<bool>,
    pub arrows: Vec<ArrowIndicator>,
    pub framing: Option<FramingResult>,
    pub caption: Option<String>,
    /// Indices of the parts introduced by this shot. Empty outside steps.
    pub added: Range<usize>,
}

impl Snapshot {
    /// File name of the rendered image.
    pub fn image_file(&self) -> String {
        format!("{}.png", self.image)
    }

    /// Indices of parts that are shown and placed.
    pub fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.visible
            .iter()
            .zip(&self.positions)
            .enumerate()
            .filter(|(_, (v, p))| **v && p.is_some())
            .map(|(i, _)| i)
    }
}

/// Every snapshot of a manual, in render order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssemblyPlan {
    pub overview: Snapshot,
    pub parts_diagram: Option<Snapshot>,
    pub steps: Vec<Snapshot>,
    pub final_assembly: Snapshot,
}

impl AssemblyPlan {
    /// Overview, parts diagram, assembly steps and final image, in order.
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        std::iter::once(&self.overview)
            .chain(self.parts_diagram.as_ref())
            .chain(&self.steps)
            .chain(std::iter::once(&self.final_assembly))
    }
}

/// Turns an ordered part list into an [`AssemblyPlan`].
#[derive(Clone, Debug)]
pub struct AssemblyPlanner {
    config: LayoutConfig,
    arrows: ArrowGenerator,
    framer: CameraFramer,
}

impl Default for AssemblyPlanner {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl AssemblyPlanner {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            arrows: ArrowGenerator::new(config.arrow.clone()),
            framer: CameraFramer::new(config.camera.clone()),
            config,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn framer(&self) -> &CameraFramer {
        &self.framer
    }

    pub fn arrows(&self) -> &ArrowGenerator {
        &self.arrows
    }

    /// Plans every image of the manual.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::EmptyPartList`] if `parts` is empty.
    pub fn plan(&self, parts: &[Part]) -> LayoutResult<AssemblyPlan> {
        if parts.is_empty() {
            error!("no parts to assemble");
            return Err(LayoutError::EmptyPartList);
        }

        let ranges = partition_steps(parts.len(), self.config.target_steps);
        info!(
            parts = parts.len(),
            steps = ranges.len(),
            "planning assembly sequence"
        );

        let steps = ranges
            .into_iter()
            .enumerate()
            .map(|(n, range)| self.step(parts, range, n))
            .collect();

        Ok(AssemblyPlan {
            overview: self.overview(parts),
            parts_diagram: self.parts_diagram(parts),
            steps,
            final_assembly: self.final_assembly(parts),
        })
    }

    /// Every part at its base position, framed as a whole.
    pub fn overview(&self, parts: &[Part]) -> Snapshot {
        self.assembled_shot(parts, ShotKind::Overview, "overview", None)
    }

    /// The closing image: every part assembled, no arrows.
    pub fn final_assembly(&self, parts: &[Part]) -> Snapshot {
        self.assembled_shot(
            parts,
            ShotKind::Final,
            "final_assembly",
            Some(FINAL_CAPTION.to_string()),
        )
    }

    /// All parts on a square grid in list order, left to right, top to bottom.
    ///
    /// Returns `None` for an empty part list.
    pub fn parts_diagram(&self, parts: &[Part]) -> Option<Snapshot> {
        if parts.is_empty() {
            warn!("no parts to arrange for diagram");
            return None;
        }

        let columns = (parts.len() as f32).sqrt().ceil() as usize;
        let average = parts.iter().map(Part::size).sum::<f32>() / parts.len() as f32;
        let spacing = (average * self.config.diagram.spacing_factor).max(self.config.diagram.min_spacing);

        let positions: Vec<Option<Vec3>> = (0..parts.len())
            .map(|i| {
                let (row, col) = (i / columns, i % columns);
                Some(Vec3::new(col as f32 * spacing, -(row as f32) * spacing, 0.0))
            })
            .collect();

        let targets: Vec<FrameTarget> = parts
            .iter()
            .zip(&positions)
            .filter_map(|(part, pos)| pos.map(|p| FrameTarget::Bounds(part.world_bounds_at(p))))
            .collect();

        Some(Snapshot {
            kind: ShotKind::PartsDiagram,
            image: "parts_diagram".to_string(),
            visible: vec![true; parts.len()],
            positions,
            arrows: Vec::new(),
            framing: self.framer.frame(&targets),
            caption: None,
            added: 0..0,
        })
    }

    /// Layout of assembly step `step_index`, introducing the parts in `added`.
    ///
    /// Parts before `added.start` sit at their base positions; every later
    /// part is exploded away from the centroid of the assembled ones. Only
    /// assembled and newly added parts are visible, and each added part gets
    /// an arrow from its exploded position to its base position.
    pub fn step(&self, parts: &[Part], added: Range<usize>, step_index: usize) -> Snapshot {
        let total = parts.len();
        let added = added.start.min(total)..added.end.min(total);
        info!(step = step_index + 1, parts = ?added, "laying out step");

        let center = assembled_center(parts, 0..added.start);

        // Positions are rebuilt from base positions for every step, so no
        // displacement from an earlier step can leak into this one.
        let positions: Vec<Option<Vec3>> = parts
            .iter()
            .enumerate()
            .map(|(j, part)| {
                let Some(base) = part.base_position() else {
                    warn!(part = %part.id, "part has no base position, skipping for this step");
                    return None;
                };
                if j < added.start {
                    Some(base)
                } else {
                    Some(exploded_position(&self.config, part, base, center, j, total))
                }
            })
            .collect();

        let visible: Vec<bool> = (0..total).map(|j| j < added.end).collect();

        let mut arrows = Vec::new();
        let mut markers = Vec::new();
        for j in added.clone() {
            let part = &parts[j];
            let (Some(destination), Some(start)) = (part.base_position(), positions[j]) else {
                continue;
            };

            markers.push(FrameTarget::Marker {
                position: destination,
                display_size: (part.size() * 0.3).max(0.1),
            });

            match self.arrows.make_arrow(start, destination, Some(part)) {
                Some(arrow) => arrows.push(arrow),
                None => debug!(part = %part.id, "no arrow for part"),
            }
        }

        // Frame the assembly plus where the new parts will land; the exploded
        // parts themselves are only used when there is nothing else.
        let mut targets: Vec<FrameTarget> = (0..added.start)
            .filter_map(|j| positions[j].map(|p| FrameTarget::Bounds(parts[j].world_bounds_at(p))))
            .collect();
        targets.extend(markers);
        if targets.is_empty() {
            targets = added
                .clone()
                .filter_map(|j| positions[j].map(|p| FrameTarget::Bounds(parts[j].world_bounds_at(p))))
                .collect();
        }
        debug!(targets = targets.len(), "framing step");
        let framing = self.framer.frame(&targets);

        let new_parts: Vec<&Part> = parts[added.clone()].iter().collect();

        Snapshot {
            kind: ShotKind::Step(step_index),
            image: format!("step{step_index:02}"),
            positions,
            visible,
            arrows,
            framing,
            caption: Some(caption_for_step(step_index, &new_parts)),
            added,
        }
    }

    fn assembled_shot(
        &self,
        parts: &[Part],
        kind: ShotKind,
        image: &str,
        caption: Option<String>,
    ) -> Snapshot {
        let positions: Vec<Option<Vec3>> = parts.iter().map(Part::base_position).collect();
        let targets: Vec<FrameTarget> = parts
            .iter()
            .zip(&positions)
            .filter_map(|(part, pos)| pos.map(|p| FrameTarget::Bounds(part.world_bounds_at(p))))
            .collect();

        Snapshot {
            kind,
            image: image.to_string(),
            visible: vec![true; parts.len()],
            positions,
            arrows: Vec::new(),
            framing: self.framer.frame(&targets),
            caption,
            added: 0..0,
        }
    }
}
