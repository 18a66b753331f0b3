//! Strategies for combining two packages into one.
//!
//! A strategy only proposes a combined package. It never checks carrier
//! limits; the packer evaluates every proposal against its constraint sets.

use crate::package::Package;
use crate::Result;
use std::fmt;

/// Combines two packages into a single candidate package.
pub trait MergeStrategy: fmt::Debug + Send + Sync {
    /// Returns the strategy name (used in logs).
    fn name(&self) -> &'static str;

    /// Merges `b` into `a`, failing with [`crate::Error::MergeFailed`] when the
    /// options of the two packages cannot be combined.
    fn merge(&self, a: &Package, b: &Package) -> Result<Package>;
}

/// Stacks the second package on top of the first.
///
/// Length and width are the larger of the two, heights add up. Wastes space
/// when the footprints differ a lot, but never under-estimates the box.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalStackMerge;

impl MergeStrategy for VerticalStackMerge {
    fn name(&self) -> &'static str {
        "vertical_stack"
    }

    fn merge(&self, a: &Package, b: &Package) -> Result<Package> {
        let length = a.length().max(b.length());
        let width = a.width().max(b.width());
        let height = a.height() + b.height();
        combine(a, b, [length, width, height])
    }
}

/// Places the second package beside the first, along the width.
#[derive(Debug, Clone, Copy, Default)]
pub struct SideBySideMerge;

impl MergeStrategy for SideBySideMerge {
    fn name(&self) -> &'static str {
        "side_by_side"
    }

    fn merge(&self, a: &Package, b: &Package) -> Result<Package> {
        let length = a.length().max(b.length());
        let width = a.width() + b.width();
        let height = a.height().max(b.height());
        combine(a, b, [length, width, height])
    }
}

fn combine(a: &Package, b: &Package, dimensions: [f64; 3]) -> Result<Package> {
    let options = a.merge_options(b)?;
    Ok(Package::new(a.weight() + b.weight(), dimensions, options)?
        .with_unit_count(a.unit_count() + b.unit_count()))
}
