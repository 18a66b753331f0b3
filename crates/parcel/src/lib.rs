//! # Parcel
//!
//! Turns shippable items into carrier-compliant packages.
//!
//! This crate provides:
//! - **Packages and constraints**: carrier limits (weight, length, length plus
//!   girth), option ceilings and additional handling thresholds
//! - **Packers**: one package per unit, or merging into earlier packages
//!   followed by recursive splitting of the remainder
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use parcel::core::{Item, VerticalStackMerge};
//! use parcel::packer::{Packer, PackerConfig, RecursivePacker};
//!
//! let mut packer = RecursivePacker::new(PackerConfig::default())?;
//! packer.add_merge_strategy(Box::new(VerticalStackMerge));
//!
//! let items = vec![Item::new("mug", 1.2, 5.0, 4.0, 4.0).with_quantity(12)];
//! let result = packer.make_packages(items)?;
//! for package in &result.packages {
//!     println!("{package}");
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `packer` (default): default and recursive packers
//! - `serde`: Serialization support

/// Packages, constraints, merge strategies and items.
pub use parcel_core as core;

/// Packers.
#[cfg(feature = "packer")]
pub use parcel_packer as packer;

// Re-export commonly used types at root level
pub use parcel_core::{Error, Item, Package, PackageOptions, Result, ShippableItem};

#[cfg(feature = "packer")]
pub use parcel_packer::{DefaultPacker, Packer, PackerConfig, PackingResult, RecursivePacker};
