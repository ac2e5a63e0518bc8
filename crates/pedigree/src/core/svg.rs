//! SVG drawing surface
//!
//! Translates surface calls into SVG elements. Paths accumulate as `d`
//! segments until `begin_path`; every `fill`/`stroke` emits one `<path>`
//! element, like a canvas context would paint it.

use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;
use unicode_width::UnicodeWidthStr;

use super::{font_size_px, ExportFormat, PedigreeError, Surface, TextAlign};

const MARGIN: f64 = 20.0;
/// Average glyph advance as a fraction of the font size
const GLYPH_ASPECT: f64 = 0.6;

#[derive(Debug, Clone, Copy)]
struct Bounds {
    max_x: f64,
    max_y: f64,
}

/// Surface producing an SVG document
#[derive(Debug, Clone)]
pub struct SvgSurface {
    elements: Vec<String>,
    path: String,
    has_current_point: bool,
    fill_color: String,
    stroke_color: String,
    line_width: f64,
    font: String,
    text_align: TextAlign,
    background: Option<String>,
    bounds: Option<Bounds>,
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            path: String::new(),
            has_current_point: false,
            fill_color: "#000000".to_string(),
            stroke_color: "#000000".to_string(),
            line_width: 1.0,
            font: "12px sans-serif".to_string(),
            text_align: TextAlign::Left,
            background: Some("#FFFFFF".to_string()),
            bounds: None,
        }
    }
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a transparent background instead of white
    pub fn transparent(mut self) -> Self {
        self.background = None;
        self
    }

    /// Number of painted elements
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Document size, covering everything drawn plus a margin
    pub fn size(&self) -> (f64, f64) {
        match self.bounds {
            Some(b) => (b.max_x + MARGIN, b.max_y + MARGIN),
            None => (MARGIN, MARGIN),
        }
    }

    /// Render the complete SVG document
    pub fn to_svg_string(&self) -> String {
        let (width, height) = self.size();
        let mut svg = String::new();
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">"
        );
        if let Some(background) = &self.background {
            let _ = write!(
                svg,
                "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                escape_xml(background)
            );
        }
        for element in &self.elements {
            svg.push_str(element);
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn include(&mut self, x: f64, y: f64) {
        let bounds = self.bounds.get_or_insert(Bounds {
            max_x: x,
            max_y: y,
        });
        bounds.max_x = bounds.max_x.max(x);
        bounds.max_y = bounds.max_y.max(y);
    }

    fn arc_segment(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) {
        let (x1, y1) = (cx + radius * end.cos(), cy + radius * end.sin());
        let large_arc = if end - start > PI { 1 } else { 0 };
        let _ = write!(
            self.path,
            "A {radius:.2} {radius:.2} 0 {large_arc} 1 {x1:.2} {y1:.2} "
        );
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self) {
        self.elements.clear();
        self.path.clear();
        self.has_current_point = false;
        self.bounds = None;
    }

    fn set_fill_color(&mut self, color: &str) {
        self.fill_color = color.to_string();
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.stroke_color = color.to_string();
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.text_align = align;
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.has_current_point = false;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.path, "M {x:.2} {y:.2} ");
        self.has_current_point = true;
        self.include(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let op = if self.has_current_point { 'L' } else { 'M' };
        let _ = write!(self.path, "{op} {x:.2} {y:.2} ");
        self.has_current_point = true;
        self.include(x, y);
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) {
        let (x0, y0) = (cx + radius * start.cos(), cy + radius * start.sin());
        let op = if self.has_current_point { 'L' } else { 'M' };
        let _ = write!(self.path, "{op} {x0:.2} {y0:.2} ");

        let sweep = (end - start).clamp(0.0, TAU);
        if sweep >= TAU - 1e-9 {
            // A single SVG arc cannot close on itself
            self.arc_segment(cx, cy, radius, start, start + PI);
            self.arc_segment(cx, cy, radius, start + PI, start + TAU);
        } else {
            self.arc_segment(cx, cy, radius, start, start + sweep);
        }
        self.has_current_point = true;
        self.include(cx + radius, cy + radius);
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let _ = write!(
            self.path,
            "M {x:.2} {y:.2} h {width:.2} v {height:.2} h {:.2} Z ",
            -width
        );
        self.has_current_point = true;
        self.include(x + width, y + height);
    }

    fn fill(&mut self) {
        if self.path.is_empty() {
            return;
        }
        self.elements.push(format!(
            "<path d=\"{}\" fill=\"{}\" stroke=\"none\"/>",
            self.path.trim_end(),
            escape_xml(&self.fill_color)
        ));
    }

    fn stroke(&mut self) {
        if self.path.is_empty() {
            return;
        }
        self.elements.push(format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\"/>",
            self.path.trim_end(),
            escape_xml(&self.stroke_color),
            self.line_width
        ));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let anchor = match self.text_align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        self.elements.push(format!(
            "<text x=\"{x:.2}\" y=\"{y:.2}\" style=\"font: {}\" fill=\"{}\" text-anchor=\"{anchor}\">{}</text>",
            escape_xml(&self.font),
            escape_xml(&self.fill_color),
            escape_xml(text)
        ));

        let width = UnicodeWidthStr::width(text) as f64 * font_size_px(&self.font) * GLYPH_ASPECT;
        let right = match self.text_align {
            TextAlign::Left => x + width,
            TextAlign::Center => x + width / 2.0,
            TextAlign::Right => x,
        };
        self.include(right, y);
    }

    fn export(&self, format: ExportFormat) -> Result<Vec<u8>, PedigreeError> {
        match format {
            ExportFormat::Svg => Ok(self.to_svg_string().into_bytes()),
            ExportFormat::Png => Err(PedigreeError::export_unsupported(format)),
        }
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let svg = SvgSurface::new().to_svg_string();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_stroke_emits_path() {
        let mut surface = SvgSurface::new();
        surface.set_stroke_color("#123456");
        surface.set_line_width(2.0);
        surface.begin_path();
        surface.move_to(10.0, 10.0);
        surface.line_to(50.0, 10.0);
        surface.stroke();

        let svg = surface.to_svg_string();
        assert!(svg.contains("d=\"M 10.00 10.00 L 50.00 10.00\""));
        assert!(svg.contains("stroke=\"#123456\""));
        assert!(svg.contains("stroke-width=\"2.00\""));
        assert_eq!(surface.element_count(), 1);
    }

    #[test]
    fn test_full_circle_uses_two_arcs() {
        let mut surface = SvgSurface::new();
        surface.begin_path();
        surface.arc(50.0, 50.0, 10.0, 0.0, TAU);
        surface.stroke();
        let svg = surface.to_svg_string();
        assert_eq!(svg.matches("A 10.00").count(), 2);
    }

    #[test]
    fn test_text_is_escaped_and_anchored() {
        let mut surface = SvgSurface::new();
        surface.set_text_align(TextAlign::Center);
        surface.fill_text("A & B <twins>", 100.0, 80.0);
        let svg = surface.to_svg_string();
        assert!(svg.contains("A &amp; B &lt;twins&gt;"));
        assert!(svg.contains("text-anchor=\"middle\""));
    }

    #[test]
    fn test_size_covers_drawing() {
        let mut surface = SvgSurface::new();
        surface.begin_path();
        surface.rect(10.0, 10.0, 100.0, 50.0);
        surface.fill();
        assert_eq!(surface.size(), (110.0 + MARGIN, 60.0 + MARGIN));
    }

    #[test]
    fn test_text_bounds_follow_font_size() {
        let mut surface = SvgSurface::new();
        surface.set_font("bold 20px sans-serif");
        surface.fill_text("ABCD", 10.0, 30.0);
        // 4 glyphs at 0.6 * 20px
        assert_eq!(surface.size(), (58.0 + MARGIN, 30.0 + MARGIN));
    }

    #[test]
    fn test_clear_resets_document() {
        let mut surface = SvgSurface::new();
        surface.begin_path();
        surface.rect(0.0, 0.0, 400.0, 400.0);
        surface.fill();
        surface.clear();
        assert_eq!(surface.element_count(), 0);
        assert_eq!(surface.size(), (MARGIN, MARGIN));
    }

    #[test]
    fn test_export_formats() {
        let surface = SvgSurface::new().transparent();
        let bytes = surface.export(ExportFormat::Svg).unwrap();
        let svg = String::from_utf8(bytes).unwrap();
        assert!(!svg.contains("fill=\"#FFFFFF\""));
        assert!(surface.export(ExportFormat::Png).is_err());
    }
}
