//! The serializable manual record consumed by document generation.

use crate::error::{LayoutError, LayoutResult};
use crate::explode::display_or_na;
use crate::layout::AssemblyPlan;
use crate::part::Part;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{error, info};

/// Lower bound for the time estimate, in minutes.
const MIN_TIME_ESTIMATE: usize = 5;

/// One row of the parts inventory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSummary {
    pub name: String,
    /// Manual part number (e.g. `P001`).
    pub number: String,
    #[serde(rename = "type")]
    pub part_type: String,
    pub quantity: u32,
}

/// One image of the manual with its caption.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSummary {
    /// Image file name relative to the output directory.
    pub image: String,
    pub caption: String,
    pub parts_added_ids: Vec<String>,
}

/// Manual metadata, written once per run as `metadata.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub model_id: String,
    pub title: String,
    pub parts: Vec<PartSummary>,
    /// Assembly steps followed by the final "Assembly complete." entry.
    pub steps: Vec<StepSummary>,
    pub has_parts_diagram: bool,
    /// Human readable, e.g. `"12 minutes"`.
    pub time_estimate: String,
}

impl Manifest {
    /// Builds the manual record from the named parts and their plan.
    ///
    /// Blank names, numbers or categories are recorded as `"N/A"`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::EmptyPartList`] if `parts` is empty.
    pub fn assemble(model_id: &str, parts: &[Part], plan: &AssemblyPlan) -> LayoutResult<Self> {
        if parts.is_empty() {
            return Err(LayoutError::EmptyPartList);
        }

        let summaries = parts
            .iter()
            .map(|p| PartSummary {
                name: display_or_na(&p.name).to_string(),
                number: display_or_na(&p.number).to_string(),
                part_type: display_or_na(&p.category).to_string(),
                quantity: p.quantity,
            })
            .collect::<Vec<_>>();

        let mut steps: Vec<StepSummary> = plan
            .steps
            .iter()
            .map(|snapshot| StepSummary {
                image: snapshot.image_file(),
                caption: snapshot.caption.clone().unwrap_or_else(|| "N/A".to_string()),
                parts_added_ids: parts
                    .get(snapshot.added.clone())
                    .unwrap_or_default()
                    .iter()
                    .map(|p| display_or_na(&p.number).to_string())
                    .collect(),
            })
            .collect();

        let assembly_steps = steps.len();
        steps.push(StepSummary {
            image: plan.final_assembly.image_file(),
            caption: plan
                .final_assembly
                .caption
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            parts_added_ids: Vec::new(),
        });

        Ok(Self {
            model_id: display_or_na(model_id).to_string(),
            title: title_from_model_id(model_id),
            parts: summaries,
            steps,
            has_parts_diagram: plan.parts_diagram.is_some(),
            time_estimate: format!("{} minutes", estimate_minutes(parts.len(), assembly_steps)),
        })
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Serialize`] if serialization fails.
    pub fn to_json_pretty(&self) -> LayoutResult<String> {
        serde_json::to_string_pretty(self).map_err(LayoutError::Serialize)
    }

    /// Writes the manifest as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Io`] if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> LayoutResult<()> {
        let json = self.to_json_pretty()?;
        let io_err = |source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        std::fs::write(path, json).map_err(|e| {
            error!(path = %path.display(), "failed to save metadata: {e}");
            io_err(e)
        })?;

        info!(path = %path.display(), "metadata saved");
        Ok(())
    }
}

/// `"office_chair"` becomes `"Office Chair"`.
pub fn title_from_model_id(model_id: &str) -> String {
    let title = model_id
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() { "N/A".to_string() } else { title }
}

/// One minute per part plus two per assembly step, at least five.
pub fn estimate_minutes(part_count: usize, assembly_steps: usize) -> usize {
    (part_count + assembly_steps * 2).max(MIN_TIME_ESTIMATE)
}
