//! Connection routing for pedigrees
//!
//! Derives the line topology of a rendered pedigree from the relationship
//! fields and the coordinate index:
//!
//! ```text
//!   [A]────────(B)        partnership line, edge to edge
//!          │              sibship drop from the partners' midpoint
//!     ┌────┴────┐         sibship bus at parent row + vSpacing / 2
//!     │         │         one drop per child, down to its top edge
//!    (C)       [D]
//! ```
//!
//! Families are keyed purely on the shared `parents` pair; a declared
//! partnership between the parents is not required. Anything whose
//! coordinates cannot be resolved is skipped without failing the render.

use std::collections::HashMap;
use std::fmt;
use tracing::{debug, span, trace, Level};

use super::{CoordinateIndex, NodeShape, PedigreeDatabase};
use crate::core::{BusExtent, PedigreeConfig, Point};

/// What a routed segment represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    /// Horizontal line between two partners
    Partnership,
    /// Vertical line from the parents' midpoint down to the sibship row
    SibshipDrop,
    /// Horizontal line along the sibship row
    SibshipBus,
    /// Vertical line from the sibship row to a child
    ChildDrop,
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionKind::Partnership => write!(f, "partnership"),
            ConnectionKind::SibshipDrop => write!(f, "sibship-drop"),
            ConnectionKind::SibshipBus => write!(f, "sibship-bus"),
            ConnectionKind::ChildDrop => write!(f, "child-drop"),
        }
    }
}

/// A straight routed segment
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub kind: ConnectionKind,
    pub from: Point,
    pub to: Point,
    /// Partnership key, parent pair key, or child id for child drops
    pub key: String,
}

impl Connection {
    fn new(kind: ConnectionKind, from: Point, to: Point, key: impl Into<String>) -> Self {
        Self {
            kind,
            from,
            to,
            key: key.into(),
        }
    }

    /// Horizontal extent as `(min_x, max_x)`
    pub fn x_range(&self) -> (f64, f64) {
        (self.from.x.min(self.to.x), self.from.x.max(self.to.x))
    }
}

/// Persons sharing one sorted parent pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingGroup {
    pub parents: (String, String),
    /// Child ids in input order
    pub children: Vec<String>,
}

impl SiblingGroup {
    pub fn key(&self) -> String {
        format!("{}+{}", self.parents.0, self.parents.1)
    }
}

/// Bucket persons by their sorted parent pair, in first-appearance order
pub fn sibling_groups(database: &PedigreeDatabase) -> Vec<SiblingGroup> {
    let mut groups: Vec<SiblingGroup> = Vec::new();
    let mut by_parents: HashMap<(&str, &str), usize> = HashMap::new();

    for person in database.persons() {
        let Some(key) = person.parent_key() else {
            continue;
        };
        match by_parents.get(&key) {
            Some(&i) => groups[i].children.push(person.id.clone()),
            None => {
                by_parents.insert(key, groups.len());
                groups.push(SiblingGroup {
                    parents: (key.0.to_string(), key.1.to_string()),
                    children: vec![person.id.clone()],
                });
            }
        }
    }
    groups
}

/// Connection router
#[derive(Debug, Clone)]
pub struct ConnectionRouter {
    config: PedigreeConfig,
}

impl ConnectionRouter {
    pub fn new(config: PedigreeConfig) -> Self {
        Self { config }
    }

    pub fn bus_extent(&self) -> BusExtent {
        self.config.bus_extent
    }

    /// Route every connection resolvable against `index`
    ///
    /// Partnership lines come first, then per family: drop, bus, child drops.
    pub fn route(&self, database: &PedigreeDatabase, index: &CoordinateIndex) -> Vec<Connection> {
        let route_span = span!(
            Level::DEBUG,
            "route_connections",
            partnership_count = database.partnerships().len()
        );
        let _enter = route_span.enter();

        let mut connections = Vec::new();
        self.route_partnerships(database, index, &mut connections);
        for group in sibling_groups(database) {
            self.route_sibship(&group, database, index, &mut connections);
        }

        debug!(connection_count = connections.len(), "Routed connections");
        connections
    }

    fn route_partnerships(
        &self,
        database: &PedigreeDatabase,
        index: &CoordinateIndex,
        connections: &mut Vec<Connection>,
    ) {
        for partnership in database.partnerships() {
            let (Some(a), Some(b)) = (index.get(partnership.first()), index.get(partnership.second()))
            else {
                debug!(%partnership, "Skipping partnership with unresolved partner");
                continue;
            };

            let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
            let half = self.config.node_width / 2.0;
            let y = (a.y + b.y) / 2.0;
            connections.push(Connection::new(
                ConnectionKind::Partnership,
                Point::new(left.x + half, y),
                Point::new(right.x - half, y),
                partnership.key(),
            ));
        }
    }

    fn route_sibship(
        &self,
        group: &SiblingGroup,
        database: &PedigreeDatabase,
        index: &CoordinateIndex,
        connections: &mut Vec<Connection>,
    ) {
        let key = group.key();
        let (Some(p1), Some(p2)) = (index.get(&group.parents.0), index.get(&group.parents.1)) else {
            debug!(family = %key, "Skipping family with unresolved parents");
            return;
        };

        let children: Vec<(&str, Point, f64)> = group
            .children
            .iter()
            .filter_map(|id| {
                let point = index.get(id)?;
                let person = database.get(id)?;
                let (_, half_height) = NodeShape::for_sex(person.sex, self.config.unknown_sex)
                    .half_extents(&self.config);
                Some((id.as_str(), point, half_height))
            })
            .collect();
        if children.is_empty() {
            debug!(family = %key, "Skipping family without resolved children");
            return;
        }

        let mid_x = (p1.x + p2.x) / 2.0;
        let parent_y = (p1.y + p2.y) / 2.0;
        let sibship_y = parent_y + self.config.v_spacing / 2.0;

        let mut min_x = children.iter().map(|c| c.1.x).fold(f64::INFINITY, f64::min);
        let mut max_x = children.iter().map(|c| c.1.x).fold(f64::NEG_INFINITY, f64::max);
        if self.config.bus_extent == BusExtent::IncludeParentMidpoint {
            min_x = min_x.min(mid_x);
            max_x = max_x.max(mid_x);
        }
        trace!(family = %key, min_x, max_x, sibship_y, "Routing sibship");

        connections.push(Connection::new(
            ConnectionKind::SibshipDrop,
            Point::new(mid_x, parent_y),
            Point::new(mid_x, sibship_y),
            key.clone(),
        ));
        connections.push(Connection::new(
            ConnectionKind::SibshipBus,
            Point::new(min_x, sibship_y),
            Point::new(max_x, sibship_y),
            key,
        ));
        for (id, point, half_height) in children {
            connections.push(Connection::new(
                ConnectionKind::ChildDrop,
                Point::new(point.x, sibship_y),
                Point::new(point.x, point.y - half_height),
                id,
            ));
        }
    }
}
