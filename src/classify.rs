//! Heuristic part categories, display names and the color palette.
//!
//! Categories come from a ranked list of rules over bounding-box ratios. The
//! first rule whose predicate matches wins; rules can be reordered or replaced
//! without touching the layout code.

use crate::part::{Part, SIZE_EPSILON};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Label used when no rule matches.
pub const FALLBACK_CATEGORY: &str = "part";

/// Bounding-box measurements fed to classification rules.
///
/// Every axis is floored at [`SIZE_EPSILON`], so ratios never divide by zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxMetrics {
    /// Extent along X.
    pub width: f32,
    /// Extent along Y.
    pub depth: f32,
    /// Extent along Z (up).
    pub height: f32,
    pub volume: f32,
    pub max_dim: f32,
    pub min_dim: f32,
}

impl BoxMetrics {
    pub fn from_dimensions(dims: Vec3) -> Self {
        let floor = |d: f32| if d > SIZE_EPSILON { d } else { SIZE_EPSILON };
        let (width, depth, height) = (floor(dims.x), floor(dims.y), floor(dims.z));
        Self {
            width,
            depth,
            height,
            volume: width * depth * height,
            max_dim: width.max(depth).max(height),
            min_dim: width.min(depth).min(height),
        }
    }

    /// Long along X or Y relative to the other two axes.
    pub fn is_horizontally_elongated(&self) -> bool {
        self.width / self.height.max(self.depth) > 2.5
            || self.depth / self.height.max(self.width) > 2.5
    }
}

/// A single `predicate -> label` entry.
pub struct Rule {
    pub label: String,
    predicate: Box<dyn Fn(&BoxMetrics) -> bool + Send + Sync>,
}

impl Rule {
    pub fn new(
        label: impl Into<String>,
        predicate: impl Fn(&BoxMetrics) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn matches(&self, metrics: &BoxMetrics) -> bool {
        (self.predicate)(metrics)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("label", &self.label).finish()
    }
}

/// Ranked-rule category classifier.
#[derive(Debug)]
pub struct Classifier {
    rules: Vec<Rule>,
    fallback: String,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::standard()
    }
}

impl Classifier {
    /// A classifier with no rules; everything maps to the fallback label.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            fallback: FALLBACK_CATEGORY.to_string(),
        }
    }

    /// The furniture-oriented rule table: screw, leg, beam, horizontal leg, seat.
    pub fn standard() -> Self {
        Self::empty()
            .with_rule(Rule::new("screw", |m| m.volume < 0.005 && m.max_dim < 0.15))
            .with_rule(Rule::new("leg", |m| {
                m.height / m.width.max(m.depth) > 2.5
            }))
            .with_rule(Rule::new("beam", |m| {
                m.is_horizontally_elongated() && m.min_dim / m.max_dim < 0.3
            }))
            .with_rule(Rule::new("leg", BoxMetrics::is_horizontally_elongated))
            .with_rule(Rule::new("seat", |m| {
                (m.width - m.depth).abs() < 0.15 * m.width.max(m.depth)
                    && m.height / m.max_dim < 0.4
            }))
    }

    /// Appends a rule at the lowest priority (builder pattern).
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Inserts a rule at `rank` (0 is evaluated first). Ranks past the end append.
    pub fn insert_rule(&mut self, rank: usize, rule: Rule) {
        let rank = rank.min(self.rules.len());
        self.rules.insert(rank, rule);
    }

    pub fn clear_rules(&mut self) {
        self.rules.clear();
    }

    pub fn set_fallback(&mut self, label: impl Into<String>) {
        self.fallback = label.into();
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Label of the first matching rule, or the fallback.
    pub fn classify(&self, dimensions: Vec3) -> &str {
        let metrics = BoxMetrics::from_dimensions(dimensions);
        self.rules
            .iter()
            .find(|r| r.matches(&metrics))
            .map_or(self.fallback.as_str(), |r| r.label.as_str())
    }
}

/// Classifies every part and assigns display names and part numbers.
///
/// Names count per category in list order (`Leg 1`, `Leg 2`, `Seat 1`);
/// numbers follow the 1-based list position (`P001`, `P002`, ...). Ids are
/// left untouched.
pub fn assign_names(parts: &mut [Part], classifier: &Classifier) {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for (i, part) in parts.iter_mut().enumerate() {
        let category = classifier.classify(part.dimensions()).to_string();
        let n = counts.entry(category.clone()).or_insert(0);
        *n += 1;

        part.name = format!("{} {}", capitalize(&category), n);
        part.number = format!("P{:03}", i + 1);
        debug!(id = %part.id, number = %part.number, name = %part.name, category = %category, "named part");
        part.category = category;
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// RGBA color.
pub type Color = [f32; 4];

/// Category colors and arrow styling handed to the scene host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub categories: HashMap<String, Color>,
    pub arrow: Color,
    pub arrow_emission: f32,
    pub background: Color,
}

impl Default for Palette {
    fn default() -> Self {
        let categories = [
            ("leg", [1.0, 0.2, 0.0, 1.0]),
            ("seat", [0.0, 0.4, 1.0, 1.0]),
            ("beam", [1.0, 0.9, 0.0, 1.0]),
            ("screw", [0.2, 0.2, 0.2, 1.0]),
            (FALLBACK_CATEGORY, [0.0, 0.8, 0.2, 1.0]),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            categories,
            arrow: [1.0, 0.0, 0.0, 1.0],
            arrow_emission: 15.0,
            background: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl Palette {
    /// Color for `category`, falling back to the generic part color.
    pub fn color_for(&self, category: &str) -> Color {
        self.categories
            .get(category)
            .or_else(|| self.categories.get(FALLBACK_CATEGORY))
            .copied()
            .unwrap_or([0.0, 0.8, 0.2, 1.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_lowercases_tail() {
        assert_eq!(capitalize("leg"), "Leg");
        assert_eq!(capitalize("SCREW"), "Screw");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn metrics_floor_degenerate_axes() {
        let m = BoxMetrics::from_dimensions(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(m.width, SIZE_EPSILON);
        assert_eq!(m.height, SIZE_EPSILON);
        assert_eq!(m.max_dim, 2.0);
        assert!(m.volume > 0.0);
    }
}
