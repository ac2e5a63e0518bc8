//! Drawing surface abstraction
//!
//! Every renderer draws through the [`Surface`] trait, a minimal immediate
//! mode 2D context: path building, filling, stroking and text. Hosts adapt
//! their own canvas to it; [`RecordingSurface`] keeps the calls as data.

use serde::Serialize;
use std::fmt;

use super::PedigreeError;

/// Horizontal anchoring of text relative to its x coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Serialization formats a surface may be able to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Svg,
    Png,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Svg => write!(f, "svg"),
            ExportFormat::Png => write!(f, "png"),
        }
    }
}

/// A 2D drawing target
///
/// Angles are in radians, measured clockwise from the positive x axis
/// (y grows downwards).
pub trait Surface {
    /// Erase everything drawn so far
    fn clear(&mut self);

    fn set_fill_color(&mut self, color: &str);
    fn set_stroke_color(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);

    /// Start a new path, discarding the current one
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Circular arc around `(cx, cy)` from `start` to `end`
    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64);
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Fill the current path with the fill color
    fn fill(&mut self);
    /// Stroke the current path with the stroke color and line width
    fn stroke(&mut self);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Serialize what has been drawn, if this surface knows how
    fn export(&self, format: ExportFormat) -> Result<Vec<u8>, PedigreeError> {
        Err(PedigreeError::export_unsupported(format))
    }
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn clear(&mut self) {
        (**self).clear()
    }
    fn set_fill_color(&mut self, color: &str) {
        (**self).set_fill_color(color)
    }
    fn set_stroke_color(&mut self, color: &str) {
        (**self).set_stroke_color(color)
    }
    fn set_line_width(&mut self, width: f64) {
        (**self).set_line_width(width)
    }
    fn set_font(&mut self, font: &str) {
        (**self).set_font(font)
    }
    fn set_text_align(&mut self, align: TextAlign) {
        (**self).set_text_align(align)
    }
    fn begin_path(&mut self) {
        (**self).begin_path()
    }
    fn move_to(&mut self, x: f64, y: f64) {
        (**self).move_to(x, y)
    }
    fn line_to(&mut self, x: f64, y: f64) {
        (**self).line_to(x, y)
    }
    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) {
        (**self).arc(cx, cy, radius, start, end)
    }
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        (**self).rect(x, y, width, height)
    }
    fn fill(&mut self) {
        (**self).fill()
    }
    fn stroke(&mut self) {
        (**self).stroke()
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        (**self).fill_text(text, x, y)
    }
    fn export(&self, format: ExportFormat) -> Result<Vec<u8>, PedigreeError> {
        (**self).export(format)
    }
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    Clear,
    SetFillColor { color: String },
    SetStrokeColor { color: String },
    SetLineWidth { width: f64 },
    SetFont { font: String },
    SetTextAlign { align: TextAlign },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc { cx: f64, cy: f64, radius: f64, start: f64, end: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Fill,
    Stroke,
    FillText { text: String, x: f64, y: f64 },
}

/// Surface that records calls instead of drawing them
///
/// `clear` drops everything recorded before it, so after a render the
/// command list describes exactly that render.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands matching a predicate
    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }

    /// Every text drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The recorded commands as a JSON array
    pub fn to_json(&self) -> Result<String, PedigreeError> {
        Ok(serde_json::to_string(&self.commands)?)
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn set_fill_color(&mut self, color: &str) {
        self.commands.push(DrawCommand::SetFillColor {
            color: color.to_string(),
        });
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.commands.push(DrawCommand::SetStrokeColor {
            color: color.to_string(),
        });
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::SetLineWidth { width });
    }

    fn set_font(&mut self, font: &str) {
        self.commands.push(DrawCommand::SetFont {
            font: font.to_string(),
        });
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.commands.push(DrawCommand::SetTextAlign { align });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) {
        self.commands.push(DrawCommand::Arc {
            cx,
            cy,
            radius,
            start,
            end,
        });
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface_records_in_order() {
        let mut surface = RecordingSurface::new();
        surface.begin_path();
        surface.move_to(1.0, 2.0);
        surface.line_to(3.0, 4.0);
        surface.stroke();

        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::BeginPath,
                DrawCommand::MoveTo { x: 1.0, y: 2.0 },
                DrawCommand::LineTo { x: 3.0, y: 4.0 },
                DrawCommand::Stroke,
            ]
        );
    }

    #[test]
    fn test_clear_drops_previous_commands() {
        let mut surface = RecordingSurface::new();
        surface.fill();
        surface.fill_text("old", 0.0, 0.0);
        surface.clear();
        surface.fill_text("new", 0.0, 0.0);

        assert_eq!(surface.commands()[0], DrawCommand::Clear);
        assert_eq!(surface.texts(), vec!["new"]);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Fill)), 0);
    }

    #[test]
    fn test_recording_surface_cannot_export() {
        let surface = RecordingSurface::new();
        let err = surface.export(ExportFormat::Png).unwrap_err();
        assert!(matches!(err, PedigreeError::ExportUnsupported { .. }));
    }

    #[test]
    fn test_commands_serialize_tagged() {
        let mut surface = RecordingSurface::new();
        surface.rect(0.0, 0.0, 10.0, 5.0);
        surface.set_text_align(TextAlign::Center);
        let json = surface.to_json().unwrap();
        assert!(json.contains(r#""op":"rect""#));
        assert!(json.contains(r#""align":"center""#));
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn fill_once(mut surface: impl Surface) {
            surface.fill();
        }

        let mut surface = RecordingSurface::new();
        fill_once(&mut surface);
        assert_eq!(surface.commands(), &[DrawCommand::Fill]);
    }
}
