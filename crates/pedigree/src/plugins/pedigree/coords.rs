//! Coordinate index
//!
//! Per-render mapping from person id to the resolved pixel position of the
//! node centre. Rebuilt from scratch by every render; stale as soon as the
//! dataset is mutated.

use std::collections::HashMap;

use crate::core::Point;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateIndex {
    positions: HashMap<String, Point>,
    /// Ids in the order they were drawn
    order: Vec<String>,
}

impl CoordinateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, point: Point) {
        let id = id.into();
        if self.positions.insert(id.clone(), point).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Entries in drawing order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, Point)> {
        self.order
            .iter()
            .map(|id| (id.as_str(), self.positions[id.as_str()]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.order.clear();
    }
}
