//! Hit-testing against the last render

use super::{CoordinateIndex, NodeShape, PedigreeDatabase};
use crate::core::{PedigreeConfig, Point};

/// Id of the node under `point`, if any
///
/// Nodes are checked in reverse drawing order so the topmost (last drawn)
/// node wins where shapes overlap. Ids in the index that are no longer in
/// the database are ignored.
pub fn hit_test<'a>(
    point: Point,
    database: &PedigreeDatabase,
    index: &'a CoordinateIndex,
    config: &PedigreeConfig,
) -> Option<&'a str> {
    index
        .iter()
        .rev()
        .find(|(id, center)| {
            database.get(id).is_some_and(|person| {
                NodeShape::for_sex(person.sex, config.unknown_sex).contains(*center, point, config)
            })
        })
        .map(|(id, _)| id)
}
