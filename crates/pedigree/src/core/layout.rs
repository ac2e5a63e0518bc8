//! Core layout trait for pedigree positioning
//!
//! Layout strategies rearrange grid positions of the working dataset before
//! each render. They run once per redraw and must stay single-pass so that a
//! drag never triggers unbounded work.

/// Core trait for layout optimization strategies over a dataset `D`
///
/// # Example
/// ```
/// use pedigree::core::LayoutAlgorithm;
/// use pedigree::plugins::pedigree::{PedigreeDatabase, SiblingSwapOptimizer};
///
/// let mut db = PedigreeDatabase::new();
/// let optimizer = SiblingSwapOptimizer::new();
/// assert_eq!(optimizer.optimize(&mut db), 0);
/// ```
pub trait LayoutAlgorithm<D>: Send + Sync {
    /// Rearrange positions in place, returning how many moves were made
    fn optimize(&self, database: &mut D) -> usize;

    /// Get the name of this layout algorithm
    fn name(&self) -> &'static str;
}

/// Strategy that leaves every position untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLayout;

impl<D> LayoutAlgorithm<D> for NoopLayout {
    fn optimize(&self, _database: &mut D) -> usize {
        0
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
