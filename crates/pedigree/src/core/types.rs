//! Core type definitions for pedigree processing
//!
//! This module contains the fundamental types used throughout the crate:
//! person records, sex categories, grid and pixel coordinates, and the
//! named policies that resolve ambiguous drawing behavior.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Marker separating the lines of a multi-line name, besides `\n`
pub const LINE_BREAK_MARKER: &str = "<br>";

/// Sex category of a person, controlling shape and fill geometry
///
/// The category is closed: any unrecognized input value maps to
/// [`Sex::Unknown`], whose drawing is governed by [`UnknownSexPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Sex {
    /// Drawn as a square; phenotypes fill as vertical bars
    Male,
    /// Drawn as a circle; phenotypes fill as pie wedges
    Female,
    /// Anything else
    #[default]
    Unknown,
}

impl Sex {
    /// Parse the external sex code (`M`/`F`, `male`/`female`, case-insensitive)
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "m" | "male" => Sex::Male,
            "f" | "female" => Sex::Female,
            _ => Sex::Unknown,
        }
    }

    /// The canonical external code
    pub fn code(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Unknown => "U",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
            Sex::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for Sex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Sex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Sex::from_code(&code))
    }
}

/// A logical layout position, in grid units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: f64,
    pub y: f64,
}

impl GridPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both axes clamped to be non-negative
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.max(0.0),
            y: self.y.max(0.0),
        }
    }
}

/// A position on the drawing surface, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_from(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        self.offset_from(rhs)
    }
}

/// One family member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Unique identifier, stable across renders
    pub id: String,
    /// Display label; lines separated by `\n` or `<br>`
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sex: Sex,
    /// Grid coordinate
    pub pos: GridPos,
    /// Partner id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mate: Option<String>,
    /// Exactly two parent ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<[String; 2]>,
    /// Phenotype ids, in fill order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phenotypes: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_proband: bool,
}

impl Person {
    /// Create a person with no relationships or phenotypes
    pub fn new(id: impl Into<String>, name: impl Into<String>, sex: Sex, pos: GridPos) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sex,
            pos,
            mate: None,
            parents: None,
            phenotypes: Vec::new(),
            is_proband: false,
        }
    }

    pub fn with_mate(mut self, mate: impl Into<String>) -> Self {
        self.mate = Some(mate.into());
        self
    }

    pub fn with_parents(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.parents = Some([first.into(), second.into()]);
        self
    }

    pub fn with_phenotypes<I, S>(mut self, phenotypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phenotypes = phenotypes.into_iter().map(Into::into).collect();
        self
    }

    pub fn proband(mut self) -> Self {
        self.is_proband = true;
        self
    }

    /// Parent ids in sorted order, the key shared by a sibship
    pub fn parent_key(&self) -> Option<(&str, &str)> {
        self.parents.as_ref().map(|[a, b]| {
            if a <= b {
                (a.as_str(), b.as_str())
            } else {
                (b.as_str(), a.as_str())
            }
        })
    }

    /// True when both persons have parents and the sorted pairs match
    pub fn is_sibling_of(&self, other: &Person) -> bool {
        match (self.parent_key(), other.parent_key()) {
            (Some(mine), Some(theirs)) => mine == theirs,
            _ => false,
        }
    }

    /// Label lines, split on `\n` and the `<br>` marker
    pub fn label_lines(&self) -> Vec<&str> {
        if self.name.is_empty() {
            return Vec::new();
        }
        self.name
            .split('\n')
            .flat_map(|line| line.split(LINE_BREAK_MARKER))
            .collect()
    }
}

/// How far the sibship bus line extends horizontally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusExtent {
    /// Only from the leftmost to the rightmost child
    ChildrenOnly,
    /// Also reaching the parents' midpoint so the drop line always connects
    #[default]
    IncludeParentMidpoint,
}

impl fmt::Display for BusExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusExtent::ChildrenOnly => write!(f, "children_only"),
            BusExtent::IncludeParentMidpoint => write!(f, "include_parent_midpoint"),
        }
    }
}

/// How a person of [`Sex::Unknown`] is outlined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownSexPolicy {
    /// No outline; fill and label are still drawn
    #[default]
    Omit,
    /// Diamond inscribed in the node box
    Diamond,
}

/// Pointer cursor affordance requested from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorStyle {
    #[default]
    Default,
    Grab,
    Grabbing,
}

impl fmt::Display for CursorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorStyle::Default => write!(f, "default"),
            CursorStyle::Grab => write!(f, "grab"),
            CursorStyle::Grabbing => write!(f, "grabbing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_parsing() {
        assert_eq!(Sex::from_code("M"), Sex::Male);
        assert_eq!(Sex::from_code("male"), Sex::Male);
        assert_eq!(Sex::from_code("F"), Sex::Female);
        assert_eq!(Sex::from_code(" Female "), Sex::Female);
        assert_eq!(Sex::from_code("X"), Sex::Unknown);
        assert_eq!(Sex::from_code(""), Sex::Unknown);
    }

    #[test]
    fn test_sex_serde() {
        let sex: Sex = serde_json::from_str("\"F\"").unwrap();
        assert_eq!(sex, Sex::Female);
        let sex: Sex = serde_json::from_str("\"other\"").unwrap();
        assert_eq!(sex, Sex::Unknown);
        assert_eq!(serde_json::to_string(&Sex::Male).unwrap(), "\"M\"");
    }

    #[test]
    fn test_grid_pos_clamped() {
        assert_eq!(GridPos::new(-2.0, 3.0).clamped(), GridPos::new(0.0, 3.0));
        assert_eq!(GridPos::new(1.0, -0.5).clamped(), GridPos::new(1.0, 0.0));
    }

    #[test]
    fn test_point_arithmetic() {
        let p = Point::new(10.0, 20.0) - Point::new(4.0, 5.0);
        assert_eq!(p, Point::new(6.0, 15.0));
        assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_parent_key_is_sorted() {
        let child = Person::new("C", "", Sex::Male, GridPos::default()).with_parents("Z", "A");
        assert_eq!(child.parent_key(), Some(("A", "Z")));
    }

    #[test]
    fn test_siblings_ignore_parent_order() {
        let a = Person::new("A", "", Sex::Male, GridPos::default()).with_parents("P", "Q");
        let b = Person::new("B", "", Sex::Female, GridPos::default()).with_parents("Q", "P");
        let c = Person::new("C", "", Sex::Female, GridPos::default());
        assert!(a.is_sibling_of(&b));
        assert!(!a.is_sibling_of(&c));
        assert!(!c.is_sibling_of(&c));
    }

    #[test]
    fn test_label_lines() {
        let p = Person::new("A", "Jane Doe<br>b. 1950\nd. 2001", Sex::Female, GridPos::default());
        assert_eq!(p.label_lines(), vec!["Jane Doe", "b. 1950", "d. 2001"]);
        let empty = Person::new("B", "", Sex::Male, GridPos::default());
        assert!(empty.label_lines().is_empty());
    }

    #[test]
    fn test_person_json_field_names() {
        let json = r#"{"id":"P","name":"Pat","sex":"F","pos":{"x":1,"y":2},
                       "mate":"Q","parents":["A","B"],"phenotypes":["p1"],"isProband":true}"#;
        let person: Person = serde_json::from_str(json).unwrap();
        assert_eq!(person.mate.as_deref(), Some("Q"));
        assert!(person.is_proband);
        assert_eq!(person.pos, GridPos::new(1.0, 2.0));
    }

    #[test]
    fn test_parents_must_have_two_entries() {
        let json = r#"{"id":"P","pos":{"x":0,"y":0},"parents":["A"]}"#;
        assert!(serde_json::from_str::<Person>(json).is_err());
    }

    #[test]
    fn test_policy_defaults() {
        assert_eq!(BusExtent::default(), BusExtent::IncludeParentMidpoint);
        assert_eq!(UnknownSexPolicy::default(), UnknownSexPolicy::Omit);
        assert_eq!(CursorStyle::Grab.to_string(), "grab");
    }
}
