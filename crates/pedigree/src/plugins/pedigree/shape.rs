//! Node shapes
//!
//! Resolves a person's sex into the outline drawn for it and answers the
//! geometric questions routing and hit-testing ask about a node.

use std::fmt;

use crate::core::{PedigreeConfig, Point, Sex, UnknownSexPolicy};

/// Outline drawn for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeShape {
    /// Axis-aligned box of the configured node size
    Square,
    /// Circle whose diameter is the node width
    Circle,
    /// Diamond inscribed in the node box
    Diamond,
    /// Nothing is outlined; the node box is still used for geometry
    Unmarked,
}

impl NodeShape {
    pub fn for_sex(sex: Sex, policy: UnknownSexPolicy) -> Self {
        match (sex, policy) {
            (Sex::Male, _) => NodeShape::Square,
            (Sex::Female, _) => NodeShape::Circle,
            (Sex::Unknown, UnknownSexPolicy::Diamond) => NodeShape::Diamond,
            (Sex::Unknown, UnknownSexPolicy::Omit) => NodeShape::Unmarked,
        }
    }

    /// Half width and half height of the node around its centre
    pub fn half_extents(&self, config: &PedigreeConfig) -> (f64, f64) {
        match self {
            NodeShape::Circle => (config.node_width / 2.0, config.node_width / 2.0),
            NodeShape::Square | NodeShape::Diamond | NodeShape::Unmarked => {
                (config.node_width / 2.0, config.node_height / 2.0)
            }
        }
    }

    /// Whether `point` falls on a node of this shape centred at `center`
    ///
    /// Circles use a radial test; every other shape uses its bounding box.
    pub fn contains(&self, center: Point, point: Point, config: &PedigreeConfig) -> bool {
        match self {
            NodeShape::Circle => center.distance_to(point) <= config.node_width / 2.0,
            NodeShape::Square | NodeShape::Diamond | NodeShape::Unmarked => {
                let (hw, hh) = self.half_extents(config);
                (point.x - center.x).abs() <= hw && (point.y - center.y).abs() <= hh
            }
        }
    }
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeShape::Square => write!(f, "square"),
            NodeShape::Circle => write!(f, "circle"),
            NodeShape::Diamond => write!(f, "diamond"),
            NodeShape::Unmarked => write!(f, "unmarked"),
        }
    }
}
