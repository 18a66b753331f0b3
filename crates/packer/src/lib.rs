//! # Parcel Packer
//!
//! Packers that turn shippable items into carrier-compliant packages.
//!
//! Every packer holds a [`PackerCore`]: the carrier limits as required
//! constraints, optional constraints for surcharges worth avoiding, an
//! optional additional handling constraint and the merge strategies.
//!
//! - [`DefaultPacker`]: one package per unit
//! - [`RecursivePacker`]: folds units into earlier packages, then packs the rest
//!   in batches that are halved until they fit
//!
//! ```rust,ignore
//! use parcel_core::{Item, VerticalStackMerge};
//! use parcel_packer::{Packer, PackerConfig, RecursivePacker};
//!
//! let mut packer = RecursivePacker::new(PackerConfig::default())?;
//! packer.add_merge_strategy(Box::new(VerticalStackMerge));
//! packer.set_preferred_weight(70.0)?;
//!
//! let result = packer.make_packages(vec![Item::new("mug", 1.2, 5.0, 4.0, 4.0).with_quantity(12)])?;
//! ```

pub mod config;
pub mod default;
pub mod packer;
pub mod recursive;
pub mod registry;

// Re-exports
pub use config::PackerConfig;
pub use default::DefaultPacker;
pub use packer::{ItemPacking, Packer, PackerCore, PackingResult};
pub use recursive::{batch_layout, PackingContext, RecursivePacker};
pub use registry::{ConstraintEntry, ConstraintRegistry, ConstraintSet};
pub use parcel_core::{Error, Result};
