//! Step partitioning and exploded-position math.
//!
//! Everything here is a pure function of the part list and its base
//! positions; [`AssemblyPlanner`](crate::AssemblyPlanner) combines them into
//! per-step snapshots.

use crate::config::LayoutConfig;
use crate::part::Part;
use glam::Vec3;
use std::ops::Range;

/// Step count used when the configured target is zero.
pub const FALLBACK_TARGET_STEPS: usize = 5;

/// Below this distance from the assembled centroid a part gets a
/// pseudo-radial direction instead of a radial one.
pub const CENTROID_RADIUS: f32 = 0.1;

/// Number of parts introduced per step: `ceil(total / target)`, at least 1.
pub fn step_size(total: usize, target_steps: usize) -> usize {
    let target = if target_steps == 0 {
        FALLBACK_TARGET_STEPS
    } else {
        target_steps
    };
    total.div_ceil(target).max(1)
}

/// Contiguous index ranges, one per step, covering `0..total` exactly once.
pub fn partition_steps(total: usize, target_steps: usize) -> Vec<Range<usize>> {
    let size = step_size(total, target_steps);
    (0..total)
        .step_by(size)
        .map(|start| start..(start + size).min(total))
        .collect()
}

/// Mean base position of the parts in `assembled`.
///
/// Parts without a base position are ignored; returns the origin when nothing
/// is assembled yet.
pub fn assembled_center(parts: &[Part], assembled: Range<usize>) -> Vec3 {
    let (sum, count) = parts[assembled]
        .iter()
        .filter_map(Part::base_position)
        .fold((Vec3::ZERO, 0u32), |(s, n), p| (s + p, n + 1));

    if count == 0 {
        Vec3::ZERO
    } else {
        sum / count as f32
    }
}

/// Unit direction in which the part at `index` moves away from `center`.
///
/// Parts sitting on the centroid get a direction that swings around the up
/// axis with `index`, so coincident parts fan out instead of stacking.
pub fn explode_direction(base: Vec3, center: Vec3, index: usize) -> Vec3 {
    let radial = base - center;
    let direction = if radial.length() < CENTROID_RADIUS {
        let angle = index as f32 * 0.5;
        Vec3::new(angle.cos() * 0.5, angle.sin() * 0.5, 1.0)
    } else {
        radial
    };
    direction.normalize_or(Vec3::Z)
}

/// `(total - index) / total`: 1 for the first part, approaching 0 for the last.
pub fn remaining_factor(index: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        total.saturating_sub(index) as f32 / total as f32
    }
}

/// Radial explode distance for the part at `index`, capped at the configured
/// maximum. Parts late in the order move less.
pub fn explode_distance(config: &LayoutConfig, index: usize, total: usize) -> f32 {
    let remaining = remaining_factor(index, total);
    (config.explode_factor * (1.0 + remaining * 4.0)).min(config.max_explode_distance)
}

/// Exploded position of `part` (at list position `index`) given the centroid
/// of the already assembled parts.
///
/// Adds a vertical lift proportional to the part size on top of the radial
/// offset.
pub fn exploded_position(
    config: &LayoutConfig,
    part: &Part,
    base: Vec3,
    center: Vec3,
    index: usize,
    total: usize,
) -> Vec3 {
    let direction = explode_direction(base, center, index);
    let distance = explode_distance(config, index, total);
    let remaining = remaining_factor(index, total);
    let lift = config.explode_factor * 0.8 * (1.0 + remaining) * part.size();

    base + direction * distance + Vec3::Z * lift
}

/// Caption for step `step_index` introducing `added`.
///
/// Each part is listed as `Name (number)` in list order.
pub fn caption_for_step(step_index: usize, added: &[&Part]) -> String {
    let listed = added
        .iter()
        .map(|p| format!("{} ({})", display_or_na(&p.name), display_or_na(&p.number)))
        .collect::<Vec<_>>()
        .join(", ");

    if step_index == 0 {
        format!("Start assembly with: {listed}.")
    } else {
        format!("Attach {listed} as shown.")
    }
}

/// Caption of the implicit final step.
pub const FINAL_CAPTION: &str = "Assembly complete.";

pub(crate) fn display_or_na(s: &str) -> &str {
    if s.trim().is_empty() { "N/A" } else { s }
}
