//! Pedigree diagram plugin
//!
//! Layout, routing, rendering and interaction for clinical pedigree charts.

mod coords;
mod database;
mod engine;
mod hit;
mod interaction;
mod layout;
mod legend;
mod parser;
mod renderer;
mod routing;
mod shape;

pub use coords::*;
pub use database::*;
pub use engine::*;
pub use hit::*;
pub use interaction::*;
pub use layout::*;
pub use legend::*;
pub use parser::*;
pub use renderer::*;
pub use routing::*;
pub use shape::*;
