//! Core abstractions for pedigree processing
//!
//! This module defines the data model, configuration, drawing surface and
//! layout seams shared by the pedigree plugin and the bindings built on it.

mod config;
mod error;
mod layout;
pub mod logging;
mod surface;
mod svg;
mod types;

pub use config::*;
pub use error::*;
pub use layout::*;
pub use logging::*;
pub use surface::*;
pub use svg::*;
pub use types::*;
