//! Legend derivation
//!
//! Describes the symbols a rendered pedigree uses so hosts can lay out their
//! own key next to the drawing.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::core::{PedigreeConfig, Person, Sex};

/// Symbol shown next to a legend label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Swatch {
    Square,
    Circle,
}

impl fmt::Display for Swatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Swatch::Square => write!(f, "square"),
            Swatch::Circle => write!(f, "circle"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub swatch: Swatch,
    /// Fill color; `None` for outline-only sex entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub label: String,
}

impl fmt::Display for LegendEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.color {
            Some(color) => write!(f, "{} {} {}", self.swatch, color, self.label),
            None => write!(f, "{} {}", self.swatch, self.label),
        }
    }
}

/// Sex shapes present, then phenotypes in first-appearance order
///
/// Phenotype ids resolve through the registry with the usual fallback;
/// entries resolving to the same style appear once, and styles without a
/// fill color are left out.
pub fn legend(persons: &[Person], config: &PedigreeConfig) -> Vec<LegendEntry> {
    let mut entries = Vec::new();

    for (sex, swatch, label) in [
        (Sex::Male, Swatch::Square, "Male"),
        (Sex::Female, Swatch::Circle, "Female"),
    ] {
        if persons.iter().any(|p| p.sex == sex) {
            entries.push(LegendEntry {
                swatch,
                color: None,
                label: label.to_string(),
            });
        }
    }

    let mut seen = HashSet::new();
    for phenotype in persons.iter().flat_map(|p| p.phenotypes.iter()) {
        let Some((key, style)) = config.phenotype_style(phenotype) else {
            continue;
        };
        let Some(color) = &style.facecolor else {
            continue;
        };
        if seen.insert(key) {
            entries.push(LegendEntry {
                swatch: Swatch::Square,
                color: Some(color.clone()),
                label: style.description.clone(),
            });
        }
    }
    entries
}
