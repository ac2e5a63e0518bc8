//! Plugin implementations for different diagram types
//!
//! Each plugin builds on the shared abstractions in [`crate::core`]: the
//! data model, the [`Surface`](crate::core::Surface) it draws on and the
//! [`LayoutAlgorithm`](crate::core::LayoutAlgorithm) seam.

pub mod pedigree;

pub use pedigree::*;
