//! Pedigree layout
//!
//! Maps grid coordinates to surface pixels and back, and hosts the default
//! crossing-reduction strategy: a single forward pass that swaps a partner
//! with a sibling sitting between the partners on the same row.

use tracing::{debug, span, trace, Level};

use super::PedigreeDatabase;
use crate::core::{GridPos, LayoutAlgorithm, PedigreeConfig, Point};

/// Affine grid to pixel transform
///
/// A resolved pixel position is the centre of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTransform {
    pub h_spacing: f64,
    pub v_spacing: f64,
    pub padding_left: f64,
    pub padding_top: f64,
}

impl GridTransform {
    pub fn new(h_spacing: f64, v_spacing: f64, padding_left: f64, padding_top: f64) -> Self {
        Self {
            h_spacing,
            v_spacing,
            padding_left,
            padding_top,
        }
    }

    pub fn from_config(config: &PedigreeConfig) -> Self {
        Self::new(
            config.h_spacing,
            config.v_spacing,
            config.padding.left,
            config.padding.top,
        )
    }

    pub fn grid_to_pixel(&self, pos: GridPos) -> Point {
        Point::new(
            pos.x * self.h_spacing + self.padding_left,
            pos.y * self.v_spacing + self.padding_top,
        )
    }

    /// Inverse of [`grid_to_pixel`](Self::grid_to_pixel), snapped to the
    /// nearest grid cell and clamped to non-negative coordinates
    pub fn pixel_to_grid(&self, point: Point) -> GridPos {
        let gx = ((point.x - self.padding_left) / self.h_spacing).round();
        let gy = ((point.y - self.padding_top) / self.v_spacing).round();
        GridPos::new(gx, gy).clamped()
    }
}

impl Default for GridTransform {
    fn default() -> Self {
        Self::from_config(&PedigreeConfig::default())
    }
}

/// Single-pass sibling swap heuristic
///
/// For each person `P` (input order) and each partner `Q` of `P` in the
/// normalized partnership set, the span between `P` and `Q` on `P`'s row is
/// computed once, whichever partner declared the `mate` link. Every other
/// person strictly inside that span on the same row who is a sibling of `P`
/// trades x coordinates with `P`, pulling `P` away from its partner's line
/// crossing the sibling's drop line. Not iterated to a fixed point.
#[derive(Debug, Clone, Copy)]
pub struct SiblingSwapOptimizer {
    transform: GridTransform,
}

impl SiblingSwapOptimizer {
    pub fn new() -> Self {
        Self::with_transform(GridTransform::default())
    }

    pub fn with_transform(transform: GridTransform) -> Self {
        Self { transform }
    }

    /// Swap `p` with each sibling strictly between `p` and partner `q`
    fn swap_siblings_between(&self, database: &mut PedigreeDatabase, p: usize, q: usize) -> usize {
        let px = self.transform.grid_to_pixel(database.persons()[p].pos).x;
        let qx = self.transform.grid_to_pixel(database.persons()[q].pos).x;
        let (min_x, max_x) = (px.min(qx), px.max(qx));

        let mut swaps = 0;
        for r in 0..database.len() {
            if r == p || r == q {
                continue;
            }
            let persons = database.persons();
            let (partner, other) = (&persons[p], &persons[r]);
            if other.pos.y != partner.pos.y {
                continue;
            }
            let rx = self.transform.grid_to_pixel(other.pos).x;
            if rx > min_x && rx < max_x && other.is_sibling_of(partner) {
                trace!(partner = %partner.id, sibling = %other.id, "Swapping sibling positions");
                database.swap_x(p, r);
                swaps += 1;
            }
        }
        swaps
    }
}

impl Default for SiblingSwapOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutAlgorithm<PedigreeDatabase> for SiblingSwapOptimizer {
    fn optimize(&self, database: &mut PedigreeDatabase) -> usize {
        let optimize_span = span!(
            Level::DEBUG,
            "optimize_layout",
            person_count = database.len()
        );
        let _enter = optimize_span.enter();

        let mut swaps = 0;
        for p in 0..database.len() {
            let id = database.persons()[p].id.as_str();
            let partners: Vec<usize> = database
                .partnerships()
                .iter()
                .filter(|pair| pair.contains(id))
                .filter_map(|pair| {
                    let other = if pair.first() == id {
                        pair.second()
                    } else {
                        pair.first()
                    };
                    database.position_of(other)
                })
                .collect();

            for q in partners {
                swaps += self.swap_siblings_between(database, p, q);
            }
        }

        debug!(swaps, "Layout optimization finished");
        swaps
    }

    fn name(&self) -> &'static str {
        "sibling-swap"
    }
}
