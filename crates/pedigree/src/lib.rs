//! Pedigree - Render clinical pedigree charts from JSON family records
//!
//! A library for laying out, routing and drawing pedigree diagrams onto any
//! 2D surface, with pointer-driven node dragging.
//!
//! # Quick Start
//!
//! ```rust
//! use pedigree::render_svg;
//!
//! let input = r#"[
//!     {"id": "A", "name": "Father", "sex": "M", "pos": {"x": 0, "y": 0}, "mate": "B"},
//!     {"id": "B", "name": "Mother", "sex": "F", "pos": {"x": 2, "y": 0}},
//!     {"id": "C", "name": "Child", "sex": "F", "pos": {"x": 1, "y": 1},
//!      "parents": ["A", "B"], "isProband": true}
//! ]"#;
//! let svg = render_svg(input).unwrap();
//! assert!(svg.starts_with("<svg"));
//! assert!(svg.contains("Child"));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, build an engine over your own surface:
//!
//! ```rust
//! use pedigree::prelude::*;
//!
//! let document = pedigree::parse(r#"[
//!     {"id": "A", "sex": "M", "pos": {"x": 0, "y": 0}}
//! ]"#).unwrap();
//!
//! let mut engine = PedigreeEngine::builder()
//!     .persons(document.persons)
//!     .config(document.config)
//!     .surface(RecordingSurface::new())
//!     .build()
//!     .unwrap();
//!
//! engine.move_node("A", GridPos::new(3.0, 1.0));
//! assert_eq!(engine.coordinates().get("A"), Some(Point::new(280.0, 140.0)));
//! ```

pub mod core;
pub mod plugins;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        BusExtent, CursorStyle, DrawCommand, ExportFormat, GridPos, LayoutAlgorithm,
        PedigreeConfig, PedigreeError, Person, PhenotypeStyle, Point, RecordingSurface, Sex,
        Surface, SvgSurface, UnknownSexPolicy,
    };
    pub use crate::plugins::pedigree::{
        Connection, ConnectionKind, CoordinateIndex, InteractionState, LegendEntry,
        PedigreeDatabase, PedigreeDocument, PedigreeEngine, PedigreeParser, PedigreeRenderer,
        SiblingSwapOptimizer, TouchPoint,
    };
}

/// Render a JSON dataset to an SVG document
///
/// Accepts a bare array of persons or an object with `persons` and an
/// optional `config`.
///
/// # Example
/// ```rust
/// use pedigree::render_svg;
///
/// let svg = render_svg(r#"[{"id": "A", "name": "Ann", "sex": "F", "pos": {"x": 0, "y": 0}}]"#).unwrap();
/// assert!(svg.contains("Ann"));
/// ```
pub fn render_svg(input: &str) -> anyhow::Result<String> {
    let document = parse(input)?;
    let engine = plugins::pedigree::PedigreeEngine::builder()
        .persons(document.persons)
        .config(document.config)
        .surface(SvgSurface::new())
        .build()?;
    Ok(String::from_utf8(engine.export(ExportFormat::Svg)?)?)
}

/// Render a JSON dataset and return the recorded draw commands as JSON
///
/// # Example
/// ```rust
/// use pedigree::render_commands;
///
/// let json = render_commands(r#"[{"id": "A", "sex": "M", "pos": {"x": 0, "y": 0}}]"#).unwrap();
/// assert!(json.contains(r#""op":"rect""#));
/// ```
pub fn render_commands(input: &str) -> anyhow::Result<String> {
    let document = parse(input)?;
    let engine = plugins::pedigree::PedigreeEngine::builder()
        .persons(document.persons)
        .config(document.config)
        .surface(RecordingSurface::new())
        .build()?;
    Ok(engine.surface().to_json()?)
}

/// Parse a JSON dataset without rendering
///
/// # Example
/// ```rust
/// use pedigree::{parse, Sex};
///
/// let document = parse(r#"{"persons": [{"id": "A", "sex": "male", "pos": {"x": 0, "y": 0}}]}"#).unwrap();
/// assert_eq!(document.persons[0].sex, Sex::Male);
/// ```
pub fn parse(input: &str) -> anyhow::Result<plugins::pedigree::PedigreeDocument> {
    Ok(plugins::pedigree::PedigreeParser::new().parse(input)?)
}
