//! Rendering configuration
//!
//! Geometry, spacing, styles and toggles shared by every stage of the
//! pipeline. Deserializes from the camelCase JSON object hosts already use,
//! with every field optional.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{BusExtent, PedigreeError, UnknownSexPolicy};

/// Registry key of the style used for unknown phenotype ids
pub const DEFAULT_AFFECTED: &str = "default_affected";

/// Fill style of one phenotype
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PhenotypeStyle {
    /// Fill color; a style without one renders no segment
    #[serde(default)]
    pub facecolor: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl PhenotypeStyle {
    pub fn new(facecolor: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            facecolor: Some(facecolor.into()),
            description: description.into(),
        }
    }

    /// A style that is listed but never painted
    pub fn unfilled(description: impl Into<String>) -> Self {
        Self {
            facecolor: None,
            description: description.into(),
        }
    }
}

/// Offset of grid origin from the surface origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: f64,
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 40.0,
            left: 40.0,
        }
    }
}

/// Configuration for layout, rendering and interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PedigreeConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Pixels per horizontal grid unit
    pub h_spacing: f64,
    /// Pixels per vertical grid unit
    pub v_spacing: f64,
    pub padding: Padding,
    pub line_width: f64,
    pub line_color: String,
    pub font: String,
    /// Distance between stacked label lines
    pub line_height: f64,
    pub text_color: String,
    pub proband_arrow_size: f64,
    pub auto_layout_optimize: bool,
    pub interactive: bool,
    pub bus_extent: BusExtent,
    pub unknown_sex: UnknownSexPolicy,
    pub phenotypes: BTreeMap<String, PhenotypeStyle>,
}

impl Default for PedigreeConfig {
    fn default() -> Self {
        let mut phenotypes = BTreeMap::new();
        phenotypes.insert(
            DEFAULT_AFFECTED.to_string(),
            PhenotypeStyle::new("#333333", "Affected"),
        );
        Self {
            node_width: 40.0,
            node_height: 40.0,
            h_spacing: 80.0,
            v_spacing: 100.0,
            padding: Padding::default(),
            line_width: 2.0,
            line_color: "#000000".to_string(),
            font: "12px sans-serif".to_string(),
            line_height: 14.0,
            text_color: "#000000".to_string(),
            proband_arrow_size: 20.0,
            auto_layout_optimize: true,
            interactive: true,
            bus_extent: BusExtent::default(),
            unknown_sex: UnknownSexPolicy::default(),
            phenotypes,
        }
    }
}

impl PedigreeConfig {
    /// Parse a configuration from JSON, filling unspecified fields with defaults
    pub fn from_json(input: &str) -> Result<Self, PedigreeError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Register or replace a phenotype style
    pub fn with_phenotype(mut self, id: impl Into<String>, style: PhenotypeStyle) -> Self {
        self.phenotypes.insert(id.into(), style);
        self
    }

    /// Check the invariants the pipeline relies on
    pub fn validate(&self) -> Result<(), PedigreeError> {
        if !self.phenotypes.contains_key(DEFAULT_AFFECTED) {
            return Err(PedigreeError::config_error(format!(
                "phenotype registry must contain a '{}' entry",
                DEFAULT_AFFECTED
            )));
        }
        if !(self.node_width > 0.0 && self.node_height > 0.0) {
            return Err(PedigreeError::config_error(format!(
                "node size must be positive, got {}x{}",
                self.node_width, self.node_height
            )));
        }
        if !(self.h_spacing > 0.0 && self.v_spacing > 0.0) {
            return Err(PedigreeError::config_error(format!(
                "grid spacing must be positive, got {}x{}",
                self.h_spacing, self.v_spacing
            )));
        }
        Ok(())
    }

    /// Resolve a phenotype id, falling back to `default_affected`
    ///
    /// Returns the registry key actually used alongside the style.
    pub fn phenotype_style<'a>(&'a self, id: &'a str) -> Option<(&'a str, &'a PhenotypeStyle)> {
        self.phenotypes
            .get_key_value(id)
            .or_else(|| self.phenotypes.get_key_value(DEFAULT_AFFECTED))
            .map(|(key, style)| (key.as_str(), style))
    }
}

/// Font size in pixels from a CSS font shorthand such as `"bold 16px Arial"`
///
/// Falls back to 12 when no `px` size is present.
pub fn font_size_px(font: &str) -> f64 {
    font.split_whitespace()
        .find_map(|part| part.strip_suffix("px").and_then(|n| n.parse().ok()))
        .unwrap_or(12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PedigreeConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.auto_layout_optimize);
        assert!(config.interactive);
    }

    #[test]
    fn test_missing_default_affected_is_rejected() {
        let mut config = PedigreeConfig::default();
        config.phenotypes.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains(DEFAULT_AFFECTED));
    }

    #[test]
    fn test_non_positive_geometry_is_rejected() {
        let config = PedigreeConfig {
            node_width: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PedigreeConfig {
            v_spacing: -10.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = PedigreeConfig::from_json(
            r#"{"nodeWidth": 30, "hSpacing": 60, "padding": {"top": 10},
                "autoLayoutOptimize": false, "busExtent": "children_only"}"#,
        )
        .unwrap();
        assert_eq!(config.node_width, 30.0);
        assert_eq!(config.node_height, 40.0);
        assert_eq!(config.h_spacing, 60.0);
        assert_eq!(config.padding.top, 10.0);
        assert_eq!(config.padding.left, 40.0);
        assert!(!config.auto_layout_optimize);
        assert_eq!(config.bus_extent, BusExtent::ChildrenOnly);
    }

    #[test]
    fn test_from_json_replacing_registry_needs_default() {
        let result = PedigreeConfig::from_json(
            r##"{"phenotypes": {"asthma": {"facecolor": "#f00", "description": "Asthma"}}}"##,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_phenotype_fallback() {
        let config = PedigreeConfig::default()
            .with_phenotype("asthma", PhenotypeStyle::new("#ff0000", "Asthma"));
        let (key, style) = config.phenotype_style("asthma").unwrap();
        assert_eq!(key, "asthma");
        assert_eq!(style.facecolor.as_deref(), Some("#ff0000"));

        let (key, style) = config.phenotype_style("unheard_of").unwrap();
        assert_eq!(key, DEFAULT_AFFECTED);
        assert_eq!(style.description, "Affected");
    }

    #[test]
    fn test_font_size_px() {
        assert_eq!(font_size_px(&PedigreeConfig::default().font), 12.0);
        assert_eq!(font_size_px("bold 16px Arial"), 16.0);
        assert_eq!(font_size_px("italic 9.5px serif"), 9.5);
        assert_eq!(font_size_px("Arial"), 12.0);
    }
}
