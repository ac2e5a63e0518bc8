//! Pedigree rendering
//!
//! Draws every person onto a [`Surface`] in input order, recording the
//! resolved node centres into a [`CoordinateIndex`], and strokes the routed
//! connections once all nodes are down.

use std::f64::consts::{FRAC_PI_2, TAU};
use tracing::{debug, info, span, trace, Level};

use super::{Connection, ConnectionRouter, CoordinateIndex, GridTransform, NodeShape, PedigreeDatabase};
use crate::core::{PedigreeConfig, Person, Point, Surface, TextAlign};

/// Horizontal gap between a node's right edge and the proband arrow tip
pub const PROBAND_ARROW_GAP: f64 = 5.0;

/// Arrow head length as a fraction of the shaft
const ARROW_HEAD_RATIO: f64 = 0.4;

/// Pedigree renderer
#[derive(Debug, Clone)]
pub struct PedigreeRenderer {
    config: PedigreeConfig,
    transform: GridTransform,
    router: ConnectionRouter,
}

impl PedigreeRenderer {
    pub fn new(config: PedigreeConfig) -> Self {
        Self {
            transform: GridTransform::from_config(&config),
            router: ConnectionRouter::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &PedigreeConfig {
        &self.config
    }

    pub fn transform(&self) -> GridTransform {
        self.transform
    }

    /// Clear `surface` and draw the whole pedigree
    ///
    /// `index` is rebuilt from scratch. Returns the routed connections in
    /// the order they were stroked.
    pub fn render<S: Surface + ?Sized>(
        &self,
        database: &PedigreeDatabase,
        surface: &mut S,
        index: &mut CoordinateIndex,
    ) -> Vec<Connection> {
        let render_span = span!(
            Level::INFO,
            "render_pedigree",
            person_count = database.len()
        );
        let _enter = render_span.enter();

        surface.clear();
        index.clear();
        surface.set_line_width(self.config.line_width);
        surface.set_stroke_color(&self.config.line_color);

        for person in database.persons() {
            let center = self.transform.grid_to_pixel(person.pos);
            index.insert(person.id.clone(), center);
            self.draw_person(surface, person, center);
        }

        let connections = self.router.route(database, index);
        self.draw_connections(surface, &connections);

        info!(
            nodes = index.len(),
            connections = connections.len(),
            "Rendered pedigree"
        );
        connections
    }

    fn draw_person<S: Surface + ?Sized>(&self, surface: &mut S, person: &Person, center: Point) {
        let shape = NodeShape::for_sex(person.sex, self.config.unknown_sex);
        let filled = self.draw_phenotypes(surface, person, shape, center);
        trace!(id = %person.id, %shape, x = center.x, y = center.y, filled, "Drawing person");

        self.draw_outline(surface, shape, center);
        if person.is_proband {
            self.draw_proband_arrow(surface, center);
        }
        self.draw_label(surface, person, shape, center);
    }

    /// Fill one segment per colored phenotype, beneath the outline
    fn draw_phenotypes<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        person: &Person,
        shape: NodeShape,
        center: Point,
    ) -> usize {
        let count = person.phenotypes.len();
        if count == 0 {
            return 0;
        }

        let mut filled = 0;
        for (i, phenotype) in person.phenotypes.iter().enumerate() {
            let Some(color) = self
                .config
                .phenotype_style(phenotype)
                .and_then(|(_, style)| style.facecolor.as_deref())
            else {
                debug!(id = %person.id, phenotype = %phenotype, "Phenotype has no fill color");
                continue;
            };

            surface.set_fill_color(color);
            surface.begin_path();
            match shape {
                NodeShape::Circle => {
                    let radius = self.config.node_width / 2.0;
                    let sweep = TAU / count as f64;
                    let start = -FRAC_PI_2 + sweep * i as f64;
                    surface.move_to(center.x, center.y);
                    surface.arc(center.x, center.y, radius, start, start + sweep);
                    surface.line_to(center.x, center.y);
                }
                NodeShape::Square | NodeShape::Diamond | NodeShape::Unmarked => {
                    let bar_width = self.config.node_width / count as f64;
                    let left = center.x - self.config.node_width / 2.0;
                    let top = center.y - self.config.node_height / 2.0;
                    surface.rect(
                        left + bar_width * i as f64,
                        top,
                        bar_width,
                        self.config.node_height,
                    );
                }
            }
            surface.fill();
            filled += 1;
        }
        filled
    }

    fn draw_outline<S: Surface + ?Sized>(&self, surface: &mut S, shape: NodeShape, center: Point) {
        let (hw, hh) = shape.half_extents(&self.config);
        match shape {
            NodeShape::Square => {
                surface.begin_path();
                surface.rect(center.x - hw, center.y - hh, hw * 2.0, hh * 2.0);
                surface.stroke();
            }
            NodeShape::Circle => {
                surface.begin_path();
                surface.arc(center.x, center.y, hw, 0.0, TAU);
                surface.stroke();
            }
            NodeShape::Diamond => {
                surface.begin_path();
                surface.move_to(center.x, center.y - hh);
                surface.line_to(center.x + hw, center.y);
                surface.line_to(center.x, center.y + hh);
                surface.line_to(center.x - hw, center.y);
                surface.line_to(center.x, center.y - hh);
                surface.stroke();
            }
            NodeShape::Unmarked => {}
        }
    }

    /// Left-pointing arrow to the right of the node
    fn draw_proband_arrow<S: Surface + ?Sized>(&self, surface: &mut S, center: Point) {
        let size = self.config.proband_arrow_size;
        let head = size * ARROW_HEAD_RATIO;
        let tip = Point::new(
            center.x + self.config.node_width / 2.0 + PROBAND_ARROW_GAP,
            center.y,
        );

        surface.begin_path();
        surface.move_to(tip.x + size, tip.y);
        surface.line_to(tip.x, tip.y);
        surface.stroke();

        surface.begin_path();
        surface.move_to(tip.x + head, tip.y - head / 2.0);
        surface.line_to(tip.x, tip.y);
        surface.line_to(tip.x + head, tip.y + head / 2.0);
        surface.stroke();
    }

    fn draw_label<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        person: &Person,
        shape: NodeShape,
        center: Point,
    ) {
        let lines = person.label_lines();
        if lines.is_empty() {
            return;
        }

        let (_, hh) = shape.half_extents(&self.config);
        surface.set_fill_color(&self.config.text_color);
        surface.set_font(&self.config.font);
        surface.set_text_align(TextAlign::Center);
        for (i, line) in lines.iter().enumerate() {
            let y = center.y + hh + self.config.line_height * (i + 1) as f64;
            surface.fill_text(line, center.x, y);
        }
    }

    fn draw_connections<S: Surface + ?Sized>(&self, surface: &mut S, connections: &[Connection]) {
        surface.set_stroke_color(&self.config.line_color);
        surface.set_line_width(self.config.line_width);
        for connection in connections {
            surface.begin_path();
            surface.move_to(connection.from.x, connection.from.y);
            surface.line_to(connection.to.x, connection.to.y);
            surface.stroke();
        }
    }
}

impl Default for PedigreeRenderer {
    fn default() -> Self {
        Self::new(PedigreeConfig::default())
    }
}
